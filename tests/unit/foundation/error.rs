use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptureError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CaptureError::encoder_missing("x")
            .to_string()
            .contains("encoder missing:")
    );
    assert!(CaptureError::spawn("x").to_string().contains("spawn error:"));
    assert!(CaptureError::io("x").to_string().contains("io error:"));
    assert!(CaptureError::config("x").to_string().contains("config error:"));
}

#[test]
fn only_missing_encoder_is_a_setup_failure() {
    assert!(CaptureError::encoder_missing("gone").is_setup());
    assert!(!CaptureError::spawn("denied").is_setup());
    assert!(!CaptureError::validation("zero width").is_setup());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptureError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
