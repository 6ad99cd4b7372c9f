/// Bit-level buffers and the schema-driven codec engine.
pub mod codec;
