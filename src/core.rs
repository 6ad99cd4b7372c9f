//! Defines the "data contract" between the schema compiler (the scribe) and
//! the decode/encode engine (the interpreter).
//!
//! The compiler produces immutable [`PduSchema`] values from textual field
//! annotations. The engine in `infra::codec` consumes those schemas to parse
//! or build fixed-width PDU bitstreams.

use crate::error::IntegrityError;

/// Inclusive bit range into a PDU bitstream.
///
/// Bit 0 is the most significant bit of the PDU. A field may own several
/// ranges (non-contiguous layout); pieces are concatenated
/// most-significant-piece-first in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    /// First bit covered (counted from the PDU MSB).
    pub start: u32,
    /// Last bit covered, inclusive.
    pub end: u32,
}

impl BitRange {
    /// Number of bits covered by this range.
    #[inline]
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Whether two ranges share at least one bit.
    #[inline]
    pub fn overlaps(&self, other: &BitRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Semantic interpretation applied after a field's raw bits are assembled
/// into an unsigned integer of the field's total width.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldKind {
    /// Single bit mapped to false/true. Width must be 1.
    Bool,
    /// Raw unsigned value, no transform.
    UnsignedInt,
    /// Two's-complement reinterpretation over the field's bit width.
    SignedInt,
    /// Raw value passed to a named resolver mapping integer to a variant.
    Enum,
    /// Opaque ordered bit block, kept as bits rather than collapsed.
    Raw,
    /// Bits regrouped into byte-aligned values. Width must be a multiple of 8.
    Packed,
    /// Span handed to a nested PDU schema named by the field's value type.
    Delegate,
    /// Span whose concrete sub-schema is selected by the already-decoded
    /// value of another field in the same PDU.
    Dispatch,
    /// Two's-complement raw scaled to degrees along a geographic axis.
    Coordinate(CoordinateAxis),
}

/// Geographic axis of a `Coordinate` field. Carrying the axis in the kind
/// keeps the degree span total: there is no coordinate without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    /// Degrees over [-180, 180).
    Longitude,
    /// Degrees over [-90, 90).
    Latitude,
}

impl CoordinateAxis {
    /// Linear scale factor for the coordinate transform.
    ///
    /// A `w`-bit two's-complement raw value maps to degrees as
    /// `raw * 360 / 2^w` (longitude) or `raw * 180 / 2^w` (latitude), the
    /// ETSI TS 102 361-2 convention. Kept in one place so a deployment with
    /// a different per-field formula changes exactly this function.
    pub fn scale(self, width: u32) -> f64 {
        let full_circle = match self {
            CoordinateAxis::Longitude => 360.0,
            CoordinateAxis::Latitude => 180.0,
        };
        full_circle / (1u64 << width.min(63)) as f64
    }
}

/// Failure contract of an enum resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverMode {
    /// Out-of-domain values resolve to an "unknown" sentinel; never fails.
    #[default]
    Infallible,
    /// Out-of-domain values are reported as errors (`err` modifier).
    Checked,
}

/// Dispatch parameters of a `Dispatch` field: which earlier field carries the
/// discriminant, and which discriminant values the PDU family declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSpec {
    /// Name of the discriminant field (must be declared earlier).
    pub discriminant: String,
    /// Declared discriminant values, in annotation order.
    pub values: Vec<u64>,
}

/// Layout and semantics of a single PDU field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field identifier, unique within one PDU type.
    pub name: String,
    /// Semantic kind driving the decode/encode transform.
    pub kind: FieldKind,
    /// Primary range first, then any extra non-contiguous ranges.
    pub ranges: Vec<BitRange>,
    /// Declared value type (also the nested schema name for `Delegate` and
    /// the dispatch group name for `Dispatch`).
    pub value_type: String,
    /// Enum resolver name (`from:` modifier).
    pub resolver: Option<String>,
    /// Failure contract of the resolver.
    pub resolver_mode: ResolverMode,
    /// Dispatch parameters, present iff `kind == Dispatch`.
    pub dispatch: Option<DispatchSpec>,
    /// `noptr` modifier: nested value is stored inline by the host type.
    /// Documentation only; carries no decode/encode semantics.
    pub by_value: bool,
}

impl FieldSchema {
    /// Total field width: sum of all owned ranges.
    pub fn width(&self) -> u32 {
        self.ranges.iter().map(BitRange::width).sum()
    }
}

/// Struct-level FEC directive: names a registered codec. The codec's fixed
/// shape defines the protected byte span (payload plus trailing parity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FecDirective {
    pub codec: String,
}

/// Struct-level CRC directive. Covers the PDU minus its trailing checksum
/// bytes; the optional mask is XORed into the computed checksum before
/// comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrcDirective {
    pub algorithm: String,
    pub mask: Option<u16>,
}

/// Compiled layout of one PDU type. Built once from a textual description,
/// immutable thereafter; drives both decode and encode for every instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PduSchema {
    /// PDU type name.
    pub name: String,
    /// Ordered field list (declaration order is the decode/encode order).
    pub fields: Vec<FieldSchema>,
    /// Total bit width: highest bit end across all fields plus one, unless
    /// overridden by an `input_size` directive.
    pub total_bits: u32,
    /// Optional FEC directive.
    pub fec: Option<FecDirective>,
    /// Optional CRC directive.
    pub crc: Option<CrcDirective>,
    /// Free-text specification citation. Documentation only.
    pub citation: Option<String>,
}

impl PduSchema {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Byte size of the field-covered span (total bits rounded up).
    #[inline]
    pub fn span_bytes(&self) -> usize {
        (self.total_bits as usize + 7) / 8
    }
}

//==================================================================================VALUE_MODEL

/// Opaque bit block produced by a `Raw` field. Bits are packed MSB-first;
/// any trailing pad bits in the last byte are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBits {
    pub data: Vec<u8>,
    pub bit_len: usize,
}

/// Resolved enum value: the raw integer plus the variant label, when the
/// resolver's domain covers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub raw: u64,
    /// `None` means the infallible resolver's "unknown" sentinel.
    pub label: Option<String>,
}

/// Dynamic value of one decoded field.
#[derive(Debug, Clone, PartialEq)]
pub enum PduValue {
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Enum(EnumValue),
    /// Geographic coordinate in degrees (`Coordinate` kind).
    Coordinate(f64),
    Bits(RawBits),
    /// Byte-aligned regrouped values (`Packed` kind).
    Bytes(Vec<u8>),
    /// Nested PDU (`Delegate` and `Dispatch` kinds).
    Nested(Box<DecodedPdu>),
}

/// Result of the CRC verification step. Mismatch is reported, never
/// corrected, and never blocks field inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrcReport {
    pub valid: bool,
    pub computed: u16,
    pub received: u16,
}

/// Result of the FEC correction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FecReport {
    pub errors_found: usize,
    pub uncorrectable: bool,
}

/// One decoded field: the raw assembled integer (when the kind has one) and
/// the transformed value.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    pub name: String,
    /// Raw field-width unsigned integer, absent for `Raw`/`Packed`/
    /// `Delegate`/`Dispatch` kinds.
    pub raw: Option<u64>,
    pub value: PduValue,
}

/// Dynamic PDU instance: decode output and encode input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedPdu {
    /// Schema name this instance conforms to.
    pub name: String,
    /// Fields in declaration order (decode) or insertion order (builder).
    pub fields: Vec<DecodedField>,
    /// CRC verification report, when the schema carries a CRC directive.
    pub crc: Option<CrcReport>,
    /// FEC correction report, when the schema carries a FEC directive.
    pub fec: Option<FecReport>,
}

impl DecodedPdu {
    /// Empty instance for the given schema name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            crc: None,
            fec: None,
        }
    }

    /// Set a field value, replacing any previous value of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: PduValue) {
        let name = name.into();
        if let Some(f) = self.fields.iter_mut().find(|f| f.name == name) {
            f.raw = None;
            f.value = value;
        } else {
            self.fields.push(DecodedField {
                name,
                raw: None,
                value,
            });
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: PduValue) -> Self {
        self.set(name, value);
        self
    }

    /// Value of a field, if present.
    pub fn get(&self, name: &str) -> Option<&PduValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Raw assembled integer of a field, if the kind produced one.
    pub fn raw(&self, name: &str) -> Option<u64> {
        self.fields.iter().find(|f| f.name == name).and_then(|f| f.raw)
    }

    /// Error form of the CRC report: `Err` iff verification ran and failed.
    /// The decoded fields stay available either way.
    pub fn integrity(&self) -> Result<(), IntegrityError> {
        match self.crc {
            Some(report) if !report.valid => Err(IntegrityError {
                computed: report.computed,
                received: report.received,
            }),
            _ => Ok(()),
        }
    }

    /// Field-by-field equality, ignoring the CRC/FEC reports and the raw
    /// integers, recursing into nested instances. Useful for round-trip
    /// comparisons between built and decoded instances.
    pub fn fields_eq(&self, other: &DecodedPdu) -> bool {
        fn value_eq(a: &PduValue, b: &PduValue) -> bool {
            match (a, b) {
                (PduValue::Nested(x), PduValue::Nested(y)) => x.fields_eq(y),
                _ => a == b,
            }
        }
        self.name == other.name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|f| other.get(&f.name).is_some_and(|v| value_eq(&f.value, v)))
    }
}
