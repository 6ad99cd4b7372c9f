//! `dmr-codec` library: wire-level codec layer for ETSI-style land mobile
//! radio PDUs. A declarative bit-layout schema (compiled from per-field
//! annotation strings) drives exact decode/encode behavior, with the
//! forward-error-correction and checksum primitives such PDUs reference:
//! Reed-Solomon(12,9,4) over GF(256), Golay(20,8,7), quadratic-residue
//! (16,7,6) and CRC-CCITT.
//==================================================================================
/// Schema and value models shared by the compiler and the codec engine.
pub mod core;
/// Domain errors (schema compilation, decode/encode, FEC, bit access).
pub mod error;
/// Annotation-grammar compiler turning textual field layouts into schemas.
pub mod compiler;
/// Checksum algorithms and their registry.
pub mod crc;
/// Forward-error-correction codecs and their registry.
pub mod fec;
/// Bit-level infrastructure and the interpretive decode/encode engine.
pub mod infra;
//==================================================================================
