use super::*;

#[test]
fn frame_rate_rejects_zero() {
    assert!(FrameRate::new(0).is_err());
    assert_eq!(FrameRate::new(30).unwrap().get(), 30);
}

#[test]
fn frame_duration_matches_rate() {
    let d = FrameRate::new(25).unwrap().frame_duration();
    assert_eq!(d, Duration::from_millis(40));
}

#[test]
fn frame_format_byte_math() {
    let fmt = FrameFormat::new(320, 240).unwrap();
    assert_eq!(fmt.frame_len(), 230_400);
    assert_eq!(fmt.row_len(), 960);
    assert_eq!(fmt.size_arg(), "320x240");
}

#[test]
fn frame_format_rejects_zero_dimensions() {
    assert!(FrameFormat::new(0, 240).is_err());
    assert!(FrameFormat::new(320, 0).is_err());
}

#[test]
fn record_length_is_clamped_to_minimum() {
    assert_eq!(RecordLength::from_secs(0.0).as_secs(), MIN_RECORD_LENGTH_SECS);
    assert_eq!(RecordLength::from_secs(-3.0).as_secs(), MIN_RECORD_LENGTH_SECS);
    assert_eq!(RecordLength::from_secs(f64::NAN).as_secs(), MIN_RECORD_LENGTH_SECS);
    assert_eq!(RecordLength::from_secs(2.5).as_secs(), 2.5);
}

#[test]
fn record_length_window_is_half_open() {
    let len = RecordLength::from_secs(0.05);
    assert!(len.contains(Duration::ZERO));
    assert!(len.contains(Duration::from_millis(49)));
    assert!(!len.contains(Duration::from_millis(50)));
    assert!(!len.contains(Duration::from_millis(60)));
}
