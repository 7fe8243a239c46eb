use super::*;
use crate::capture::host::FixedSizeHost;

fn missing_encoder_config() -> Arc<EncoderConfig> {
    Arc::new(EncoderConfig {
        binary: Some(PathBuf::from("no/such/dir/ffmpeg")),
        ..EncoderConfig::default()
    })
}

fn controller(cfg: Arc<EncoderConfig>) -> CaptureController<FixedSizeHost> {
    let settings = CaptureSettings::new("cam0", FrameRate::new(30).unwrap())
        .with_record_length(RecordLength::from_secs(0.05));
    let host = FixedSizeHost::new(FrameFormat::new(4, 4).unwrap());
    CaptureController::new(cfg, SharedFrameRate::new(), settings, host)
}

#[test]
fn new_controller_is_disabled_and_idle() {
    let ctl = controller(missing_encoder_config());
    assert!(!ctl.is_enabled());
    assert_eq!(ctl.state(), CaptureState::Idle);
    assert_eq!(ctl.frame_format(), None);
}

#[test]
fn ticks_before_enable_do_nothing() {
    let mut ctl = controller(missing_encoder_config());
    assert!(ctl.tick(Duration::from_millis(10), Some(&[0u8; 48])).is_empty());
    assert_eq!(ctl.elapsed(), Duration::ZERO);
}

#[test]
fn missing_encoder_disables_and_reports_once() {
    let mut ctl = controller(missing_encoder_config());

    let events = ctl.enable();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], CaptureEvent::SetupFailed(_)));
    assert!(!ctl.is_enabled());

    assert!(ctl.tick(Duration::ZERO, Some(&[0u8; 48])).is_empty());
    assert_eq!(ctl.state(), CaptureState::Idle);

    // A second attempt stays disabled without a second report.
    assert!(ctl.enable().is_empty());
    assert!(!ctl.is_enabled());
}

#[test]
fn disable_without_session_is_a_no_op() {
    let mut ctl = controller(missing_encoder_config());
    assert!(ctl.disable().is_empty());
    assert!(ctl.disable().is_empty());
    assert!(ctl.shutdown().is_empty());
}

#[test]
fn settings_builders() {
    let fmt = FrameFormat::new(1280, 720).unwrap();
    let s = CaptureSettings::new("main", FrameRate::new(60).unwrap())
        .with_resolution(fmt)
        .with_record_length(RecordLength::from_secs(2.0));
    assert_eq!(s.name, "main");
    assert_eq!(s.resolution, Some(fmt));
    assert_eq!(s.frame_rate.get(), 60);
    assert_eq!(s.record_length.as_secs(), 2.0);
    assert_eq!(
        CaptureSettings::new("x", FrameRate::new(1).unwrap()).record_length,
        RecordLength::default()
    );
}
