use super::*;

#[test]
/// Reference vector for poly 0x1021 with a zero initial value.
fn test_ccitt_check_string() {
    assert_eq!(Crc16Ccitt.compute(b"123456789"), 0x31C3);
}

#[test]
fn test_ccitt_empty_and_zero() {
    assert_eq!(Crc16Ccitt.compute(&[]), 0x0000);
    // A single zero byte shifts through without setting any taps.
    assert_eq!(Crc16Ccitt.compute(&[0x00]), 0x0000);
}

#[test]
fn test_ccitt_sample_payload() {
    let payload = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99];
    assert_eq!(Crc16Ccitt.compute(&payload), 0x34BA);
}

#[test]
/// Any single flipped bit changes the checksum.
fn test_ccitt_detects_single_bit_errors() {
    let payload = [0xDE, 0xAD, 0xBE, 0xEF];
    let clean = Crc16Ccitt.compute(&payload);
    for bit in 0..payload.len() * 8 {
        let mut corrupted = payload;
        corrupted[bit / 8] ^= 0x80 >> (bit % 8);
        assert_ne!(Crc16Ccitt.compute(&corrupted), clean, "bit {bit}");
    }
}

#[test]
fn test_masked_compute() {
    let payload = [0x01, 0x02];
    let plain = Crc16Ccitt.compute(&payload);
    assert_eq!(compute_masked(&Crc16Ccitt, &payload, None), plain);
    assert_eq!(
        compute_masked(&Crc16Ccitt, &payload, Some(0x9696)),
        plain ^ 0x9696
    );
}

#[test]
/// Verification splits off the trailing big-endian checksum.
fn test_verify_span() {
    let payload = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99];
    let mut span = payload.to_vec();
    span.extend_from_slice(&0x34BAu16.to_be_bytes());
    let report = verify(&span, &Crc16Ccitt, None).unwrap();
    assert!(report.valid);
    assert_eq!(report.computed, 0x34BA);
    assert_eq!(report.received, 0x34BA);

    span[0] ^= 0x01;
    let report = verify(&span, &Crc16Ccitt, None).unwrap();
    assert!(!report.valid);
    assert_eq!(report.received, 0x34BA);

    assert!(verify(&[0xFF], &Crc16Ccitt, None).is_none());
}

#[test]
fn test_lookup() {
    assert_eq!(lookup("crc_ccitt").unwrap().name(), "crc_ccitt");
    assert!(lookup("crc32").is_none());
}
