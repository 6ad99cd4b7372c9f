use super::*;

#[test]
/// All three codecs resolve by their registry key.
fn test_lookup_known_codecs() {
    for name in [
        "reed_solomon_12_9_4",
        "golay_20_8_7",
        "quadratic_residue_16_7_6",
    ] {
        let codec = lookup(name).unwrap();
        assert_eq!(codec.name(), name);
    }
    assert!(lookup("hamming_7_4").is_none());
}

#[test]
fn test_codec_geometry() {
    let rs = lookup("reed_solomon_12_9_4").unwrap();
    assert_eq!((rs.data_len(), rs.codeword_len()), (9, 12));
    let golay = lookup("golay_20_8_7").unwrap();
    assert_eq!((golay.data_bits(), golay.codeword_bits()), (8, 20));
    assert_eq!((golay.data_len(), golay.codeword_len()), (1, 3));
    let qr = lookup("quadratic_residue_16_7_6").unwrap();
    assert_eq!((qr.data_bits(), qr.codeword_bits()), (7, 16));
    assert_eq!((qr.data_len(), qr.codeword_len()), (1, 2));
}

#[test]
/// Byte-level round trip through each codec, with one flipped bit.
fn test_byte_roundtrip_with_error() {
    let cases: [(&str, Vec<u8>); 3] = [
        ("reed_solomon_12_9_4", vec![1, 2, 3, 4, 5, 6, 7, 8, 9]),
        ("golay_20_8_7", vec![0xC3]),
        // 7 data bits, MSB-aligned: low bit must be pad.
        ("quadratic_residue_16_7_6", vec![0b1010_1010]),
    ];
    for (name, data) in cases {
        let codec = lookup(name).unwrap();
        let mut wire = codec.encode(&data).unwrap();
        assert_eq!(wire.len(), codec.codeword_len());
        wire[0] ^= 0x08;
        let out = codec.decode(&wire);
        assert_eq!(out.data, data, "{name}");
        assert_eq!(out.errors_found, 1);
        assert!(!out.uncorrectable);
    }
}

#[test]
/// Sub-byte codewords keep their pad bits zero on the wire.
fn test_msb_aligned_padding() {
    let golay = lookup("golay_20_8_7").unwrap();
    let wire = golay.encode(&[0xFF]).unwrap();
    assert_eq!(wire[2] & 0x0F, 0, "low nibble of the last byte is pad");
}

#[test]
fn test_encode_wrong_length() {
    let golay = lookup("golay_20_8_7").unwrap();
    assert!(matches!(
        golay.encode(&[1, 2]),
        Err(FecError::InvalidLength {
            expected: 1,
            found: 2
        })
    ));
}

#[test]
fn test_decode_wrong_length_soft_fails() {
    let qr = lookup("quadratic_residue_16_7_6").unwrap();
    let out = qr.decode(&[0xAA]);
    assert!(out.uncorrectable);
    assert_eq!(out.data.len(), qr.data_len());
}
