/// MSB-first bit readers/writers and absolute-range accessors.
pub mod bits;
/// Interpretive decode/encode engine driven by compiled schemas.
pub mod engine;
/// Schema, enum-resolver and dispatch-arm registry.
pub mod registry;
