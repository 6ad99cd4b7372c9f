use super::*;

#[test]
/// Encoding is systematic: data bits ride in the codeword's top bits.
fn test_golay_systematic() {
    let code = BlockCode::golay_20_8();
    for data in 0..256u32 {
        assert_eq!(code.encode_word(data).unwrap() >> 12, data);
    }
}

#[test]
fn test_qr_systematic() {
    let code = BlockCode::quadratic_residue_16_7();
    for data in 0..128u32 {
        assert_eq!(code.encode_word(data).unwrap() >> 9, data);
    }
}

#[test]
/// Minimum distance of the shortened Golay code stays at 8.
fn test_golay_min_distance() {
    assert_eq!(BlockCode::golay_20_8().min_distance(), 8);
}

#[test]
fn test_qr_min_distance() {
    assert_eq!(BlockCode::quadratic_residue_16_7().min_distance(), 6);
}

#[test]
/// Every pattern of up to 3 bit errors is corrected by the Golay code.
fn test_golay_corrects_up_to_three_errors() {
    let code = BlockCode::golay_20_8();
    let clean = code.encode_word(0xA7).unwrap();
    for a in 0..20u32 {
        for b in a..20 {
            for c in b..20 {
                let noise = (1 << a) | (1 << b) | (1 << c);
                let (data, errors, uncorrectable) = code.decode_word(clean ^ noise);
                assert_eq!(data, 0xA7, "noise {noise:#07x}");
                assert_eq!(errors, noise.count_ones());
                assert!(!uncorrectable);
            }
        }
    }
}

#[test]
/// Every pattern of up to 2 bit errors is corrected by the (16,7) code.
fn test_qr_corrects_up_to_two_errors() {
    let code = BlockCode::quadratic_residue_16_7();
    let clean = code.encode_word(0x55).unwrap();
    for a in 0..16u32 {
        for b in a..16 {
            let noise = (1 << a) | (1 << b);
            let (data, errors, uncorrectable) = code.decode_word(clean ^ noise);
            assert_eq!(data, 0x55, "noise {noise:#06x}");
            assert_eq!(errors, noise.count_ones());
            assert!(!uncorrectable);
        }
    }
}

#[test]
/// Four bit errors push the word outside the Golay correction radius.
fn test_golay_four_errors_uncorrectable() {
    let code = BlockCode::golay_20_8();
    let clean = code.encode_word(0x3C).unwrap();
    let (_, _, uncorrectable) = code.decode_word(clean ^ 0b1111);
    assert!(uncorrectable);
}

#[test]
/// Three bit errors exceed the (16,7) correction radius.
fn test_qr_three_errors_uncorrectable() {
    let code = BlockCode::quadratic_residue_16_7();
    let clean = code.encode_word(0x2A).unwrap();
    let (_, _, uncorrectable) = code.decode_word(clean ^ 0b111);
    assert!(uncorrectable);
}

#[test]
/// Data words wider than the code rejects cleanly.
fn test_encode_word_out_of_range() {
    let code = BlockCode::quadratic_residue_16_7();
    assert!(code.encode_word(0x80).is_err());
    assert!(code.encode_word(0x7F).is_ok());
}
