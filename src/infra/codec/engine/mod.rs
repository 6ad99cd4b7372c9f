//! Schema interpreter: walks a compiled [`PduSchema`] to turn wire bytes
//! into a [`DecodedPdu`] and back.
//!
//! Decode order is FEC correction, then CRC verification, then fields in
//! declaration order; encode runs the same stages in reverse. FEC and CRC
//! outcomes are attached as reports: an uncorrectable pattern or a checksum
//! mismatch never aborts the field pass, the caller inspects the reports and
//! decides.
use crate::core::{
    BitRange, DecodedField, DecodedPdu, EnumValue, FecReport, FieldKind, FieldSchema, PduSchema,
    PduValue, RawBits,
};
use crate::error::{BitReaderError, BitWriterError, DecodeError, EncodeError};
use crate::infra::codec::bits::{deposit_range, extract_range, BitReader, BitWriter};
use crate::infra::codec::registry::SchemaRegistry;
use crate::{crc, fec};

/// Wire size in bytes of one PDU: the FEC codeword when the schema is
/// protected, the bare field span otherwise.
pub fn wire_len(schema: &PduSchema) -> Result<usize, DecodeError> {
    match &schema.fec {
        Some(directive) => {
            let codec =
                fec::lookup(&directive.codec).ok_or_else(|| DecodeError::UnknownFecCodec {
                    name: directive.codec.clone(),
                })?;
            Ok(codec.codeword_len())
        }
        None => Ok(schema.span_bytes()),
    }
}

/// Wire size in bits, before byte rounding. Distinct from `wire_len * 8` for
/// sub-byte FEC codewords.
fn wire_bits(schema: &PduSchema) -> Result<u32, DecodeError> {
    match &schema.fec {
        Some(directive) => {
            let codec =
                fec::lookup(&directive.codec).ok_or_else(|| DecodeError::UnknownFecCodec {
                    name: directive.codec.clone(),
                })?;
            Ok(codec.codeword_bits() as u32)
        }
        None => Ok(schema.total_bits),
    }
}

//==================================================================================DECODE

/// Decode a wire payload against a linked schema.
pub fn decode(
    schema: &PduSchema,
    payload: &[u8],
    registry: &SchemaRegistry,
) -> Result<DecodedPdu, DecodeError> {
    let expected = wire_len(schema)?;
    if payload.len() != expected {
        return Err(DecodeError::InvalidLength {
            expected,
            found: payload.len(),
        });
    }

    let mut pdu = DecodedPdu::new(schema.name.clone());

    // Stage 1: FEC correction. The field span reads from the corrected
    // data block, never from the raw codeword.
    let working: Vec<u8> = match &schema.fec {
        Some(directive) => {
            let codec =
                fec::lookup(&directive.codec).ok_or_else(|| DecodeError::UnknownFecCodec {
                    name: directive.codec.clone(),
                })?;
            let outcome = codec.decode(payload);
            pdu.fec = Some(FecReport {
                errors_found: outcome.errors_found,
                uncorrectable: outcome.uncorrectable,
            });
            outcome.data
        }
        None => payload.to_vec(),
    };
    if working.len() < schema.span_bytes() {
        return Err(DecodeError::InvalidLength {
            expected: schema.span_bytes(),
            found: working.len(),
        });
    }

    // Stage 2: CRC verification, detection only.
    if let Some(directive) = &schema.crc {
        let algorithm =
            crc::lookup(&directive.algorithm).ok_or_else(|| DecodeError::UnknownCrcAlgorithm {
                name: directive.algorithm.clone(),
            })?;
        let span = &working[..schema.span_bytes()];
        pdu.crc = Some(crc::verify(span, algorithm, directive.mask).ok_or(
            DecodeError::InvalidLength {
                expected: 2,
                found: span.len(),
            },
        )?);
    }

    // Stage 3: fields in declaration order.
    for field in &schema.fields {
        let decoded = decode_field(field, &working, &pdu, registry)?;
        pdu.fields.push(decoded);
    }
    Ok(pdu)
}

fn decode_field(
    field: &FieldSchema,
    working: &[u8],
    pdu: &DecodedPdu,
    registry: &SchemaRegistry,
) -> Result<DecodedField, DecodeError> {
    let width = field.width();
    let (raw, value) = match field.kind {
        FieldKind::Bool => {
            let raw = gather_scalar(working, &field.ranges)?;
            (Some(raw), PduValue::Bool(raw != 0))
        }
        FieldKind::UnsignedInt => {
            let raw = gather_scalar(working, &field.ranges)?;
            (Some(raw), PduValue::Unsigned(raw))
        }
        FieldKind::SignedInt => {
            let raw = gather_scalar(working, &field.ranges)?;
            (Some(raw), PduValue::Signed(sign_extend(raw, width)))
        }
        FieldKind::Enum => {
            let raw = gather_scalar(working, &field.ranges)?;
            let resolver = field.resolver.as_deref().unwrap_or(&field.value_type);
            let table =
                registry
                    .enum_table(resolver)
                    .ok_or_else(|| DecodeError::UnknownResolver {
                        name: resolver.to_string(),
                    })?;
            let label = table.label(raw);
            if label.is_none() && field.resolver_mode == crate::core::ResolverMode::Checked {
                return Err(DecodeError::EnumOutOfDomain {
                    field: field.name.clone(),
                    value: raw,
                    resolver: resolver.to_string(),
                });
            }
            let value = PduValue::Enum(EnumValue {
                raw,
                label: label.map(str::to_string),
            });
            (Some(raw), value)
        }
        FieldKind::Coordinate(axis) => {
            let raw = gather_scalar(working, &field.ranges)?;
            let degrees = sign_extend(raw, width) as f64 * axis.scale(width);
            (Some(raw), PduValue::Coordinate(degrees))
        }
        FieldKind::Raw => {
            let bits = gather_bits(working, &field.ranges)?;
            (None, PduValue::Bits(bits))
        }
        FieldKind::Packed => {
            let bits = gather_bits(working, &field.ranges)?;
            (None, PduValue::Bytes(bits.data))
        }
        FieldKind::Delegate => {
            let nested = decode_nested(field, &field.value_type, working, registry)?;
            (None, PduValue::Nested(Box::new(nested)))
        }
        FieldKind::Dispatch => {
            let spec = field
                .dispatch
                .as_ref()
                .ok_or_else(|| DecodeError::MissingDiscriminant {
                    field: field.name.clone(),
                })?;
            let discriminant =
                pdu.raw(&spec.discriminant)
                    .ok_or_else(|| DecodeError::MissingDiscriminant {
                        field: field.name.clone(),
                    })?;
            let target = registry
                .dispatch_target(&field.value_type, discriminant)
                .ok_or_else(|| DecodeError::UnknownVariant {
                    field: field.name.clone(),
                    value: discriminant,
                })?
                .to_string();
            let nested = decode_nested(field, &target, working, registry)?;
            (None, PduValue::Nested(Box::new(nested)))
        }
    };
    Ok(DecodedField {
        name: field.name.clone(),
        raw,
        value,
    })
}

/// Recurse into the schema covering a delegate/dispatch span.
fn decode_nested(
    field: &FieldSchema,
    target: &str,
    working: &[u8],
    registry: &SchemaRegistry,
) -> Result<DecodedPdu, DecodeError> {
    let sub = registry
        .schema(target)
        .ok_or_else(|| DecodeError::UnknownSchema {
            name: target.to_string(),
        })?;
    let needed = wire_bits(sub)?;
    let available = field.width();
    if needed > available {
        return Err(DecodeError::SpanTooSmall {
            field: field.name.clone(),
            needed,
            available,
        });
    }
    let span = gather_bits(working, &field.ranges)?;
    let sub_len = wire_len(sub)?;
    decode(sub, &span.data[..sub_len], registry)
}

/// Assemble a scalar field: ranges concatenate most-significant-piece-first.
fn gather_scalar(buffer: &[u8], ranges: &[BitRange]) -> Result<u64, DecodeError> {
    let mut value: u64 = 0;
    for range in ranges {
        let piece = extract_range(buffer, range)?;
        // A range spanning the full accumulator cannot be shifted into.
        value = if range.width() >= 64 {
            piece
        } else {
            (value << range.width()) | piece
        };
    }
    Ok(value)
}

/// Collect a field's ranges into an MSB-aligned bit block.
fn gather_bits(buffer: &[u8], ranges: &[BitRange]) -> Result<RawBits, BitReaderError> {
    let total: u32 = ranges.iter().map(BitRange::width).sum();
    let mut data = vec![0u8; (total as usize).div_ceil(8)];
    let mut reader = BitReader::new(buffer);
    {
        let mut writer = BitWriter::new(&mut data);
        for range in ranges {
            reader.seek(range.start as usize)?;
            let mut remaining = range.width();
            while remaining > 0 {
                let chunk = remaining.min(64) as u8;
                let piece = reader.read_u64(chunk)?;
                // Destination was sized from the range sum.
                writer
                    .write_u64(piece, chunk)
                    .map_err(|_| BitReaderError::OutOfBounds {
                        asked: chunk as usize,
                        available: 0,
                    })?;
                remaining -= chunk as u32;
            }
        }
    }
    Ok(RawBits {
        data,
        bit_len: total as usize,
    })
}

fn sign_extend(raw: u64, width: u32) -> i64 {
    if width >= 64 || raw & (1u64 << (width - 1)) == 0 {
        raw as i64
    } else {
        (raw | (u64::MAX << width)) as i64
    }
}

fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

//==================================================================================ENCODE

/// Pack a PDU instance into wire bytes against a linked schema.
pub fn encode(
    schema: &PduSchema,
    pdu: &DecodedPdu,
    registry: &SchemaRegistry,
) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = vec![0u8; schema.span_bytes()];

    for field in &schema.fields {
        encode_field(field, pdu, &mut buffer, registry)?;
    }

    // CRC over the span minus its trailing checksum bytes.
    if let Some(directive) = &schema.crc {
        let algorithm =
            crc::lookup(&directive.algorithm).ok_or_else(|| EncodeError::UnknownCrcAlgorithm {
                name: directive.algorithm.clone(),
            })?;
        let split = buffer
            .len()
            .checked_sub(2)
            .ok_or(EncodeError::InvalidLength {
                expected: 2,
                found: buffer.len(),
            })?;
        let checksum = crc::compute_masked(algorithm, &buffer[..split], directive.mask);
        buffer[split..].copy_from_slice(&checksum.to_be_bytes());
    }

    // FEC last: the span becomes the codec's data block, zero-padded.
    if let Some(directive) = &schema.fec {
        let codec =
            fec::lookup(&directive.codec).ok_or_else(|| EncodeError::UnknownFecCodec {
                name: directive.codec.clone(),
            })?;
        if buffer.len() > codec.data_len() {
            return Err(EncodeError::InvalidLength {
                expected: codec.data_len(),
                found: buffer.len(),
            });
        }
        buffer.resize(codec.data_len(), 0);
        return Ok(codec.encode(&buffer)?);
    }

    Ok(buffer)
}

fn encode_field(
    field: &FieldSchema,
    pdu: &DecodedPdu,
    buffer: &mut [u8],
    registry: &SchemaRegistry,
) -> Result<(), EncodeError> {
    let width = field.width();
    let value = pdu.get(&field.name).ok_or_else(|| EncodeError::FieldNotFound {
        field: field.name.clone(),
    })?;

    match (field.kind, value) {
        (FieldKind::Bool, PduValue::Bool(b)) => {
            scatter_scalar(buffer, &field.ranges, *b as u64)?;
        }
        (FieldKind::UnsignedInt, PduValue::Unsigned(v)) => {
            if *v & !width_mask(width) != 0 {
                return Err(EncodeError::ValueTooWide {
                    field: field.name.clone(),
                    width,
                });
            }
            scatter_scalar(buffer, &field.ranges, *v)?;
        }
        (FieldKind::SignedInt, PduValue::Signed(v)) => {
            let raw = signed_to_raw(*v, width).ok_or_else(|| EncodeError::ValueTooWide {
                field: field.name.clone(),
                width,
            })?;
            scatter_scalar(buffer, &field.ranges, raw)?;
        }
        (FieldKind::Enum, value) => {
            let raw = match value {
                PduValue::Enum(e) => e.raw,
                PduValue::Unsigned(v) => *v,
                _ => {
                    return Err(EncodeError::TypeMismatch {
                        field: field.name.clone(),
                        expected: "enum or unsigned",
                    })
                }
            };
            if raw & !width_mask(width) != 0 {
                return Err(EncodeError::ValueTooWide {
                    field: field.name.clone(),
                    width,
                });
            }
            let resolver = field.resolver.as_deref().unwrap_or(&field.value_type);
            let table =
                registry
                    .enum_table(resolver)
                    .ok_or_else(|| EncodeError::UnknownResolver {
                        name: resolver.to_string(),
                    })?;
            if field.resolver_mode == crate::core::ResolverMode::Checked
                && table.label(raw).is_none()
            {
                return Err(EncodeError::InvalidValue {
                    field: field.name.clone(),
                    value: raw,
                });
            }
            scatter_scalar(buffer, &field.ranges, raw)?;
        }
        (FieldKind::Coordinate(axis), PduValue::Coordinate(degrees)) => {
            let scaled = (degrees / axis.scale(width)).round() as i64;
            let raw = signed_to_raw(scaled, width).ok_or_else(|| EncodeError::ValueTooWide {
                field: field.name.clone(),
                width,
            })?;
            scatter_scalar(buffer, &field.ranges, raw)?;
        }
        (FieldKind::Raw, PduValue::Bits(bits)) => {
            if bits.bit_len != width as usize {
                return Err(EncodeError::TypeMismatch {
                    field: field.name.clone(),
                    expected: "bit block matching the field width",
                });
            }
            scatter_bits(buffer, &field.ranges, &bits.data, bits.bit_len)?;
        }
        (FieldKind::Packed, PduValue::Bytes(bytes)) => {
            if bytes.len() * 8 != width as usize {
                return Err(EncodeError::TypeMismatch {
                    field: field.name.clone(),
                    expected: "byte block matching the field width",
                });
            }
            scatter_bits(buffer, &field.ranges, bytes, bytes.len() * 8)?;
        }
        (FieldKind::Delegate, PduValue::Nested(nested)) => {
            encode_nested(field, &field.value_type, nested, buffer, registry)?;
        }
        (FieldKind::Dispatch, PduValue::Nested(nested)) => {
            let spec = field
                .dispatch
                .as_ref()
                .ok_or_else(|| EncodeError::FieldNotFound {
                    field: field.name.clone(),
                })?;
            let discriminant = match pdu.get(&spec.discriminant) {
                Some(PduValue::Unsigned(v)) => *v,
                Some(PduValue::Enum(e)) => e.raw,
                Some(PduValue::Bool(b)) => *b as u64,
                _ => {
                    return Err(EncodeError::FieldNotFound {
                        field: spec.discriminant.clone(),
                    })
                }
            };
            let target = registry
                .dispatch_target(&field.value_type, discriminant)
                .ok_or_else(|| EncodeError::UnknownVariant {
                    field: field.name.clone(),
                    value: discriminant,
                })?
                .to_string();
            if nested.name != target {
                return Err(EncodeError::TypeMismatch {
                    field: field.name.clone(),
                    expected: "instance of the dispatch-selected schema",
                });
            }
            encode_nested(field, &target, nested, buffer, registry)?;
        }
        (_, _) => {
            return Err(EncodeError::TypeMismatch {
                field: field.name.clone(),
                expected: expected_variant(field.kind),
            });
        }
    }
    Ok(())
}

/// Encode a nested PDU and lay its wire bits into the host span.
fn encode_nested(
    field: &FieldSchema,
    target: &str,
    nested: &DecodedPdu,
    buffer: &mut [u8],
    registry: &SchemaRegistry,
) -> Result<(), EncodeError> {
    let sub = registry
        .schema(target)
        .ok_or_else(|| EncodeError::UnknownSchema {
            name: target.to_string(),
        })?;
    let needed = match &sub.fec {
        Some(directive) => fec::lookup(&directive.codec)
            .ok_or_else(|| EncodeError::UnknownFecCodec {
                name: directive.codec.clone(),
            })?
            .codeword_bits() as u32,
        None => sub.total_bits,
    };
    let available = field.width();
    if needed > available {
        return Err(EncodeError::SpanTooSmall {
            field: field.name.clone(),
            needed,
            available,
        });
    }
    let encoded = encode(sub, nested, registry)?;
    scatter_bits(buffer, &field.ranges, &encoded, needed as usize)
}

/// Lay a scalar into its ranges, most-significant-piece-first.
fn scatter_scalar(
    buffer: &mut [u8],
    ranges: &[BitRange],
    value: u64,
) -> Result<(), BitWriterError> {
    let total: u32 = ranges.iter().map(BitRange::width).sum();
    let mut remaining = total;
    for range in ranges {
        remaining -= range.width();
        let piece = (value >> remaining) & width_mask(range.width());
        deposit_range(buffer, range, piece)?;
    }
    Ok(())
}

/// Lay an MSB-aligned bit block into a field's ranges; when the block is
/// shorter than the span the trailing span bits stay zero.
fn scatter_bits(
    buffer: &mut [u8],
    ranges: &[BitRange],
    src: &[u8],
    bit_len: usize,
) -> Result<(), EncodeError> {
    let mut reader = BitReader::new(src);
    let mut src_left = bit_len;
    let mut writer = BitWriter::new(buffer);
    for range in ranges {
        writer.seek(range.start as usize)?;
        let mut remaining = range.width();
        while remaining > 0 {
            let chunk = remaining.min(64) as usize;
            let take = chunk.min(src_left);
            let piece = if take > 0 {
                let bits = reader
                    .read_u64(take as u8)
                    .map_err(|_| BitWriterError::OutOfBounds {
                        asked: take,
                        available: 0,
                    })?;
                bits << (chunk - take)
            } else {
                0
            };
            writer.write_u64(piece, chunk as u8)?;
            src_left -= take;
            remaining -= chunk as u32;
        }
    }
    Ok(())
}

fn signed_to_raw(value: i64, width: u32) -> Option<u64> {
    if width < 64 {
        let min = -(1i64 << (width - 1));
        let max = (1i64 << (width - 1)) - 1;
        if value < min || value > max {
            return None;
        }
    }
    Some((value as u64) & width_mask(width))
}

fn expected_variant(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Bool => "bool",
        FieldKind::UnsignedInt => "unsigned",
        FieldKind::SignedInt => "signed",
        FieldKind::Enum => "enum",
        FieldKind::Raw => "bit block",
        FieldKind::Packed => "byte block",
        FieldKind::Delegate | FieldKind::Dispatch => "nested instance",
        FieldKind::Coordinate(_) => "coordinate",
    }
}
