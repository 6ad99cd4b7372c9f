//! Error definitions shared across library modules.
//! Each type models a specific failure scope (schema compilation, decode,
//! encode, FEC, bit-level buffer access). No error here is process-wide:
//! every failure is scoped to the single PDU type or instance being handled.
use thiserror::Error;

//==================================================================================SCHEMA_ERROR

#[derive(Debug, Error, PartialEq, Eq)]
/// Malformed annotation or inconsistent schema set. Fatal at compile/link
/// time for the affected PDU type; never recovered.
pub enum SchemaError {
    /// Bit specifier does not match `bit:N` / `bits:S-E` / `bits:S-E+S2-E2`.
    #[error("unrecognized bit specifier `{spec}` for field `{field}`")]
    BadBitSpec { field: String, spec: String },

    /// Modifier unknown to the annotation grammar.
    #[error("unknown modifier `{modifier}` for field `{field}`")]
    UnknownModifier { field: String, modifier: String },

    /// `dispatch:` modifier missing its `=` separator or value list.
    #[error("malformed dispatch modifier for field `{field}`")]
    MalformedDispatch { field: String },

    /// `type:` modifier names an unsupported semantic transform.
    #[error("unsupported semantic transform `{transform}` for field `{field}`")]
    UnsupportedTransform { field: String, transform: String },

    /// Bool fields must cover exactly one bit.
    #[error("bool field `{field}` spans {width} bits, expected 1")]
    BoolWidth { field: String, width: u32 },

    /// Packed fields must regroup whole bytes.
    #[error("packed field `{field}` spans {width} bits, not a byte multiple")]
    PackedWidth { field: String, width: u32 },

    /// Two fields with the same name in one PDU type.
    #[error("duplicate field `{field}`")]
    DuplicateField { field: String },

    /// Bit ranges overlap outside the dispatch-payload/discriminant case.
    #[error("fields `{first}` and `{second}` overlap illegally")]
    OverlappingFields { first: String, second: String },

    /// Dispatch field references a discriminant not declared earlier.
    #[error("dispatch field `{field}` references `{discriminant}`, which is not declared earlier")]
    UnknownDiscriminant { field: String, discriminant: String },

    /// Struct-level directive argument could not be parsed.
    #[error("malformed directive `{directive}`")]
    BadDirective { directive: String },

    /// Two schemas registered under the same name.
    #[error("duplicate schema `{pdu}`")]
    DuplicateSchema { pdu: String },

    /// Two enum tables registered under the same resolver name.
    #[error("duplicate resolver `{resolver}`")]
    DuplicateResolver { resolver: String },

    /// A dispatch arm bound twice within one group.
    #[error("dispatch value {value} bound twice in group `{group}`")]
    DuplicateDispatchBinding { group: String, value: u64 },

    /// A dispatch arm value has no schema bound in the registry.
    #[error("dispatch arm {value} of `{pdu}.{field}` is not bound to a schema")]
    UnboundDispatchArm {
        pdu: String,
        field: String,
        value: u64,
    },

    /// Delegate target schema is not registered.
    #[error("delegate field `{pdu}.{field}` targets unknown schema `{target}`")]
    UnknownDelegate {
        pdu: String,
        field: String,
        target: String,
    },

    /// Enum resolver is not registered.
    #[error("field `{pdu}.{field}` names unknown resolver `{resolver}`")]
    UnknownResolver {
        pdu: String,
        field: String,
        resolver: String,
    },

    /// Schema manifest could not be parsed.
    #[error("malformed schema manifest: {reason}")]
    BadManifest { reason: String },
}

//==================================================================================INTEGRITY_ERROR

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// CRC mismatch. Reported to the caller; decoding still completes so the
/// caller can choose to use or discard the result.
#[error("CRC mismatch: computed {computed:#06x}, received {received:#06x}")]
pub struct IntegrityError {
    pub computed: u16,
    pub received: u16,
}

//==================================================================================DECODE_ERROR

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised while decoding a bitstream against a schema.
pub enum DecodeError {
    /// Payload size does not match the schema (or its FEC codeword shape).
    #[error("invalid payload length: expected {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },

    /// Dispatch discriminant has no matching sub-schema.
    #[error("unknown variant {value} for dispatch field `{field}`")]
    UnknownVariant { field: String, value: u64 },

    /// Checked resolver rejected an out-of-domain value.
    #[error("value {value} of field `{field}` is outside the domain of resolver `{resolver}`")]
    EnumOutOfDomain {
        field: String,
        value: u64,
        resolver: String,
    },

    /// Nested schema is missing from the registry.
    #[error("unknown schema `{name}`")]
    UnknownSchema { name: String },

    /// Enum resolver is missing from the registry.
    #[error("unknown resolver `{name}`")]
    UnknownResolver { name: String },

    /// FEC directive names a codec absent from the registry.
    #[error("unknown FEC codec `{name}`")]
    UnknownFecCodec { name: String },

    /// CRC directive names an algorithm absent from the registry.
    #[error("unknown CRC algorithm `{name}`")]
    UnknownCrcAlgorithm { name: String },

    /// Delegate/dispatch span is too narrow for the nested schema.
    #[error("span of field `{field}` holds {available} bits, nested schema needs {needed}")]
    SpanTooSmall {
        field: String,
        needed: u32,
        available: u32,
    },

    /// Dispatch field decoded before its discriminant produced a raw value.
    #[error("dispatch field `{field}` read before its discriminant")]
    MissingDiscriminant { field: String },

    /// Bit-level access on the buffer failed.
    #[error("bit read error: {err}")]
    BitRead {
        #[from]
        err: BitReaderError,
    },
}

//==================================================================================ENCODE_ERROR

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised while packing field values into a bitstream.
pub enum EncodeError {
    /// Output shape constraint violated (buffer sizing).
    #[error("invalid buffer length: expected {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },

    /// Field value is outside its declared domain (checked enums).
    #[error("value {value} of field `{field}` is outside the enum domain")]
    InvalidValue { field: String, value: u64 },

    /// Expected field was missing from the instance.
    #[error("field `{field}` not found in instance")]
    FieldNotFound { field: String },

    /// Instance value variant does not match the field kind.
    #[error("field `{field}` expects a {expected} value")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// Discriminant value has no bound sub-schema.
    #[error("unknown variant {value} for dispatch field `{field}`")]
    UnknownVariant { field: String, value: u64 },

    /// Nested schema is missing from the registry.
    #[error("unknown schema `{name}`")]
    UnknownSchema { name: String },

    /// Enum resolver is missing from the registry.
    #[error("unknown resolver `{name}`")]
    UnknownResolver { name: String },

    /// FEC directive names a codec absent from the registry.
    #[error("unknown FEC codec `{name}`")]
    UnknownFecCodec { name: String },

    /// CRC directive names an algorithm absent from the registry.
    #[error("unknown CRC algorithm `{name}`")]
    UnknownCrcAlgorithm { name: String },

    /// Value does not fit the field's bit width.
    #[error("value of field `{field}` does not fit in {width} bits")]
    ValueTooWide { field: String, width: u32 },

    /// Delegate/dispatch span is too narrow for the nested schema.
    #[error("span of field `{field}` holds {available} bits, nested schema needs {needed}")]
    SpanTooSmall {
        field: String,
        needed: u32,
        available: u32,
    },

    /// FEC encoding rejected the data block.
    #[error("FEC error: {0}")]
    Fec(#[from] FecError),

    /// Bit-level access on the buffer failed.
    #[error("bit write error: {err}")]
    BitWrite {
        #[from]
        err: BitWriterError,
    },
}

//==================================================================================FEC_ERROR

#[derive(Debug, Error, PartialEq, Eq)]
/// Hard failures of the FEC encode path. Decode never raises: uncorrectable
/// patterns are reported through the decode result flags instead.
pub enum FecError {
    /// Caller supplied a wrong-sized data block.
    #[error("invalid data length: expected {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },
}

//==================================================================================BITREADER_ERRORS

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when required.
    #[error("non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

//==================================================================================BITWRITER_ERRORS

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Value or length is too large for the provided type.
    #[error("cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when the operation requires it.
    #[error("non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}
