//! Schema compiler: turns textual field annotations and struct-level
//! directives into an immutable [`PduSchema`].
//!
//! Annotation grammar, one string per field: `bitspec(,modifier)*` with
//! `bitspec` ∈ {`bit:N`, `bits:S-E`, `bits:S-E+S2-E2(+…)`} and `modifier` ∈
//! {`enum`, `raw`, `delegate`, `packed`, `signed`, `noptr`, `err`,
//! `type:longitude`, `type:latitude`, `from:<resolver>`,
//! `dispatch:<field>=<v1>|<v2>|…`}. Struct-level directives are separate
//! lines: `fec <codec>`, `crc <algorithm>`, `crc_mask <hex16>`,
//! `input_size <bits>`; any other line is kept verbatim as the schema's
//! specification citation.
use crate::core::{
    BitRange, CoordinateAxis, CrcDirective, DispatchSpec, FecDirective, FieldKind, FieldSchema,
    PduSchema, ResolverMode,
};
use crate::error::SchemaError;

pub mod manifest;

/// One field declaration as supplied by the schema source: identifier,
/// declared value type and the annotation string.
#[derive(Debug, Clone)]
pub struct FieldAnnotation {
    pub name: String,
    pub value_type: String,
    pub spec: String,
}

/// Compile one PDU type. Fails on the first malformed annotation; a failed
/// type never yields a partial schema.
pub fn compile(
    type_name: &str,
    fields: &[FieldAnnotation],
    directives: &[String],
) -> Result<PduSchema, SchemaError> {
    let mut compiled: Vec<FieldSchema> = Vec::with_capacity(fields.len());
    for annotation in fields {
        let field = compile_field(annotation)?;
        if compiled.iter().any(|f| f.name == field.name) {
            return Err(SchemaError::DuplicateField {
                field: field.name.clone(),
            });
        }
        compiled.push(field);
    }
    check_dispatch_ordering(&compiled)?;
    check_overlaps(&compiled)?;

    let mut schema = PduSchema {
        name: type_name.to_string(),
        total_bits: compiled
            .iter()
            .flat_map(|f| &f.ranges)
            .map(|r| r.end + 1)
            .max()
            .unwrap_or(0),
        fields: compiled,
        fec: None,
        crc: None,
        citation: None,
    };
    apply_directives(&mut schema, directives)?;
    Ok(schema)
}

//==================================================================================FIELD_GRAMMAR

fn compile_field(annotation: &FieldAnnotation) -> Result<FieldSchema, SchemaError> {
    let mut parts = annotation.spec.split(',').map(str::trim);
    let bitspec = parts.next().unwrap_or("");
    let ranges = parse_bitspec(&annotation.name, bitspec)?;

    let mut explicit_kind: Option<FieldKind> = None;
    let mut resolver: Option<String> = None;
    let mut resolver_mode = ResolverMode::Infallible;
    let mut dispatch: Option<DispatchSpec> = None;
    let mut by_value = false;

    for modifier in parts {
        match modifier {
            "enum" => explicit_kind = Some(FieldKind::Enum),
            "raw" => explicit_kind = Some(FieldKind::Raw),
            "delegate" => explicit_kind = Some(FieldKind::Delegate),
            "packed" => explicit_kind = Some(FieldKind::Packed),
            "signed" => explicit_kind = Some(FieldKind::SignedInt),
            "noptr" => by_value = true,
            "err" => resolver_mode = ResolverMode::Checked,
            _ => {
                if let Some(transform) = modifier.strip_prefix("type:") {
                    explicit_kind = Some(match transform {
                        "longitude" => FieldKind::Coordinate(CoordinateAxis::Longitude),
                        "latitude" => FieldKind::Coordinate(CoordinateAxis::Latitude),
                        _ => {
                            return Err(SchemaError::UnsupportedTransform {
                                field: annotation.name.clone(),
                                transform: transform.to_string(),
                            })
                        }
                    });
                } else if let Some(name) = modifier.strip_prefix("from:") {
                    resolver = Some(name.to_string());
                } else if let Some(arms) = modifier.strip_prefix("dispatch:") {
                    explicit_kind = Some(FieldKind::Dispatch);
                    dispatch = Some(parse_dispatch(&annotation.name, arms)?);
                } else {
                    return Err(SchemaError::UnknownModifier {
                        field: annotation.name.clone(),
                        modifier: modifier.to_string(),
                    });
                }
            }
        }
    }

    let width: u32 = ranges.iter().map(BitRange::width).sum();
    let kind = explicit_kind.unwrap_or_else(|| infer_kind(&annotation.value_type));
    if kind == FieldKind::Bool && width != 1 {
        return Err(SchemaError::BoolWidth {
            field: annotation.name.clone(),
            width,
        });
    }
    if kind == FieldKind::Packed && width % 8 != 0 {
        return Err(SchemaError::PackedWidth {
            field: annotation.name.clone(),
            width,
        });
    }

    Ok(FieldSchema {
        name: annotation.name.clone(),
        kind,
        ranges,
        value_type: annotation.value_type.clone(),
        resolver,
        resolver_mode,
        dispatch,
        by_value,
    })
}

/// Kind inference when no modifier states one: boolean-typed fields become
/// `Bool` (the width check enforces the single bit), unsigned integer types
/// and everything else read as raw unsigned until a modifier says otherwise.
fn infer_kind(value_type: &str) -> FieldKind {
    match value_type {
        "bool" => FieldKind::Bool,
        _ => FieldKind::UnsignedInt,
    }
}

fn parse_bitspec(field: &str, spec: &str) -> Result<Vec<BitRange>, SchemaError> {
    let bad = || SchemaError::BadBitSpec {
        field: field.to_string(),
        spec: spec.to_string(),
    };

    if let Some(n) = spec.strip_prefix("bit:") {
        let bit: u32 = n.parse().map_err(|_| bad())?;
        return Ok(vec![BitRange {
            start: bit,
            end: bit,
        }]);
    }
    if let Some(list) = spec.strip_prefix("bits:") {
        let mut ranges = Vec::new();
        for piece in list.split('+') {
            let (start, end) = piece.split_once('-').ok_or_else(bad)?;
            let start: u32 = start.parse().map_err(|_| bad())?;
            let end: u32 = end.parse().map_err(|_| bad())?;
            if end < start {
                return Err(bad());
            }
            ranges.push(BitRange { start, end });
        }
        if ranges.is_empty() {
            return Err(bad());
        }
        return Ok(ranges);
    }
    Err(bad())
}

fn parse_dispatch(field: &str, arms: &str) -> Result<DispatchSpec, SchemaError> {
    let malformed = || SchemaError::MalformedDispatch {
        field: field.to_string(),
    };
    let (discriminant, values) = arms.split_once('=').ok_or_else(malformed)?;
    if discriminant.is_empty() || values.is_empty() {
        return Err(malformed());
    }
    let values = values
        .split('|')
        .map(|v| v.trim().parse::<u64>().map_err(|_| malformed()))
        .collect::<Result<Vec<u64>, SchemaError>>()?;
    Ok(DispatchSpec {
        discriminant: discriminant.trim().to_string(),
        values,
    })
}

//==================================================================================STRUCTURAL_CHECKS

/// A dispatch field must name a discriminant declared before it.
fn check_dispatch_ordering(fields: &[FieldSchema]) -> Result<(), SchemaError> {
    for (index, field) in fields.iter().enumerate() {
        if let Some(spec) = &field.dispatch {
            let earlier = fields[..index]
                .iter()
                .any(|f| f.name == spec.discriminant);
            if !earlier {
                return Err(SchemaError::UnknownDiscriminant {
                    field: field.name.clone(),
                    discriminant: spec.discriminant.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Ranges of distinct fields must be disjoint, except a dispatch payload
/// overlapping its own discriminant.
fn check_overlaps(fields: &[FieldSchema]) -> Result<(), SchemaError> {
    for (i, first) in fields.iter().enumerate() {
        for second in &fields[i + 1..] {
            let allowed = dispatch_pair(first, second) || dispatch_pair(second, first);
            if allowed {
                continue;
            }
            let collide = first
                .ranges
                .iter()
                .any(|a| second.ranges.iter().any(|b| a.overlaps(b)));
            if collide {
                return Err(SchemaError::OverlappingFields {
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn dispatch_pair(payload: &FieldSchema, discriminant: &FieldSchema) -> bool {
    payload
        .dispatch
        .as_ref()
        .is_some_and(|spec| spec.discriminant == discriminant.name)
}

//==================================================================================DIRECTIVES

fn apply_directives(schema: &mut PduSchema, directives: &[String]) -> Result<(), SchemaError> {
    let mut mask: Option<u16> = None;
    let mut citation_lines: Vec<&str> = Vec::new();

    for line in directives {
        let line = line.trim();
        let bad = || SchemaError::BadDirective {
            directive: line.to_string(),
        };
        match line.split_once(char::is_whitespace) {
            Some(("fec", codec)) => {
                schema.fec = Some(FecDirective {
                    codec: codec.trim().to_string(),
                });
            }
            Some(("crc", algorithm)) => {
                schema.crc = Some(CrcDirective {
                    algorithm: algorithm.trim().to_string(),
                    mask: None,
                });
            }
            Some(("crc_mask", value)) => {
                let value = value.trim().trim_start_matches("0x");
                mask = Some(u16::from_str_radix(value, 16).map_err(|_| bad())?);
            }
            Some(("input_size", bits)) => {
                schema.total_bits = bits.trim().parse().map_err(|_| bad())?;
            }
            _ => citation_lines.push(line),
        }
    }

    if let Some(mask) = mask {
        match &mut schema.crc {
            Some(crc) => crc.mask = Some(mask),
            None => {
                return Err(SchemaError::BadDirective {
                    directive: "crc_mask without a crc directive".to_string(),
                })
            }
        }
    }
    if !citation_lines.is_empty() {
        schema.citation = Some(citation_lines.join("\n"));
    }
    Ok(())
}
