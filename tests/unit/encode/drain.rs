use super::*;
use std::io::Cursor;

#[test]
fn drain_collects_everything_until_eof() {
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let drain = DiagnosticDrain::spawn("test", Cursor::new(payload.clone())).unwrap();
    let log = drain.join();
    assert_eq!(log.as_bytes(), payload.as_slice());
}

#[test]
fn empty_stream_yields_empty_log() {
    let drain = DiagnosticDrain::spawn("empty", Cursor::new(Vec::new())).unwrap();
    let log = drain.join();
    assert!(log.is_empty());
    assert_eq!(log.into_text(), "");
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let log = DiagnosticLog::from_bytes(vec![b'o', b'k', 0xff]);
    assert_eq!(log.into_text(), "ok\u{fffd}");
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("pipe gone"))
    }
}

#[test]
fn read_error_ends_drain_without_panicking() {
    let drain = DiagnosticDrain::spawn("failing", FailingReader).unwrap();
    assert!(drain.join().is_empty());
}
