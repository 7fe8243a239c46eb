use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = EncoderConfig::default();
    assert_eq!(cfg.binary, None);
    assert_eq!(cfg.output_dir, PathBuf::from("Capture"));
    assert_eq!(cfg.container_ext, "mp4");
    assert_eq!(cfg.loglevel, "warning");
    assert_eq!(cfg.extra_args().unwrap(), vec!["-pix_fmt", "yuv420p"]);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = EncoderConfig::from_json_str(r#"{ "container_ext": "mov" }"#).unwrap();
    assert_eq!(cfg.container_ext, "mov");
    assert_eq!(cfg.loglevel, "warning");
    assert_eq!(cfg.output_dir, PathBuf::from("Capture"));
}

#[test]
fn invalid_json_is_a_config_error() {
    let err = EncoderConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, CaptureError::Config(_)));
}

#[test]
fn dotted_extension_is_rejected() {
    let err = EncoderConfig::from_json_str(r#"{ "container_ext": ".mp4" }"#).unwrap_err();
    assert!(err.to_string().contains("bare extension"));
}

#[test]
fn extra_args_split_on_any_whitespace() {
    let cfg = EncoderConfig {
        extra_args: "  -c:v libx264\t-crf 18 \n".to_string(),
        ..EncoderConfig::default()
    };
    assert_eq!(cfg.extra_args().unwrap(), vec!["-c:v", "libx264", "-crf", "18"]);
}

#[test]
fn output_dir_resolves_against_working_dir() {
    let cfg = EncoderConfig::default().with_working_dir("/tmp/work");
    assert_eq!(cfg.output_dir(), PathBuf::from("/tmp/work/Capture"));
}

#[test]
fn missing_explicit_binary_is_a_setup_error() {
    let cfg = EncoderConfig {
        binary: Some(PathBuf::from("definitely/not/here/ffmpeg")),
        ..EncoderConfig::default()
    };
    let err = cfg.resolve_binary().unwrap_err();
    assert!(err.is_setup());
    assert!(!cfg.check_available());
}

#[test]
fn existing_explicit_binary_resolves_relative_to_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("enc"), b"").unwrap();
    let cfg = EncoderConfig {
        binary: Some(PathBuf::from("enc")),
        ..EncoderConfig::default()
    }
    .with_working_dir(dir.path());
    assert_eq!(cfg.resolve_binary().unwrap(), dir.path().join("enc"));
    assert!(cfg.check_available());
}

#[test]
fn quoted_extra_args_stay_single_arguments() {
    let cfg = EncoderConfig {
        extra_args: r#"-metadata title="my clip" -vf 'scale=640:360, fps=30'"#.to_string(),
        ..EncoderConfig::default()
    };
    assert_eq!(
        cfg.extra_args().unwrap(),
        vec!["-metadata", "title=my clip", "-vf", "scale=640:360, fps=30"]
    );
}

#[test]
fn unbalanced_quotes_are_a_config_error() {
    let cfg = EncoderConfig {
        extra_args: r#"-metadata title="my clip"#.to_string(),
        ..EncoderConfig::default()
    };
    assert!(matches!(cfg.extra_args(), Err(CaptureError::Config(_))));

    let err = EncoderConfig::from_json_str(r#"{ "extra_args": "-vf \"scale=2:2" }"#).unwrap_err();
    assert!(err.to_string().contains("unbalanced quotes"));
}
