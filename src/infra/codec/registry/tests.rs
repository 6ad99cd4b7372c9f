use super::*;
use crate::core::{BitRange, DispatchSpec, FieldSchema, ResolverMode};

fn field(name: &str, kind: FieldKind, start: u32, end: u32) -> FieldSchema {
    FieldSchema {
        name: name.into(),
        kind,
        ranges: vec![BitRange { start, end }],
        value_type: "u8".into(),
        resolver: None,
        resolver_mode: ResolverMode::Infallible,
        dispatch: None,
        by_value: false,
    }
}

fn schema(name: &str, fields: Vec<FieldSchema>) -> PduSchema {
    let total_bits = fields.iter().flat_map(|f| &f.ranges).map(|r| r.end + 1).max();
    PduSchema {
        name: name.into(),
        fields,
        total_bits: total_bits.unwrap_or(0),
        fec: None,
        crc: None,
        citation: None,
    }
}

fn fmt_table() -> EnumTable {
    EnumTable {
        name: "data_format".into(),
        variants: vec![(0, "Unconfirmed".into()), (1, "Confirmed".into())],
    }
}

#[test]
fn test_register_and_lookup() {
    let mut reg = SchemaRegistry::new();
    reg.register_schema(schema("ServiceOptions", vec![field("emergency", FieldKind::Bool, 0, 0)]))
        .unwrap();
    reg.register_enum(fmt_table()).unwrap();
    reg.bind_dispatch("lc_opcode", 3, "ServiceOptions").unwrap();

    assert!(reg.schema("ServiceOptions").is_some());
    assert_eq!(reg.enum_table("data_format").unwrap().label(1), Some("Confirmed"));
    assert_eq!(reg.enum_table("data_format").unwrap().raw("Unconfirmed"), Some(0));
    assert_eq!(reg.dispatch_target("lc_opcode", 3), Some("ServiceOptions"));
    assert_eq!(reg.dispatch_target("lc_opcode", 4), None);
    assert!(reg.link().is_ok());
}

#[test]
fn test_duplicate_schema_rejected() {
    let mut reg = SchemaRegistry::new();
    reg.register_schema(schema("Header", vec![])).unwrap();
    assert!(matches!(
        reg.register_schema(schema("Header", vec![])),
        Err(SchemaError::DuplicateSchema { .. })
    ));
}

#[test]
fn test_duplicate_resolver_rejected() {
    let mut reg = SchemaRegistry::new();
    reg.register_enum(fmt_table()).unwrap();
    assert!(matches!(
        reg.register_enum(fmt_table()),
        Err(SchemaError::DuplicateResolver { .. })
    ));
}

#[test]
fn test_duplicate_dispatch_binding_rejected() {
    let mut reg = SchemaRegistry::new();
    reg.bind_dispatch("lc_opcode", 3, "A").unwrap();
    assert!(matches!(
        reg.bind_dispatch("lc_opcode", 3, "B"),
        Err(SchemaError::DuplicateDispatchBinding { value: 3, .. })
    ));
    // Same value in another group is a separate arm.
    reg.bind_dispatch("csbk_opcode", 3, "C").unwrap();
}

#[test]
/// Linking fails when a delegate field targets an unregistered schema.
fn test_link_unknown_delegate() {
    let mut reg = SchemaRegistry::new();
    let mut delegate = field("options", FieldKind::Delegate, 8, 15);
    delegate.value_type = "ServiceOptions".into();
    reg.register_schema(schema("VoiceHeader", vec![delegate])).unwrap();
    assert!(matches!(
        reg.link(),
        Err(SchemaError::UnknownDelegate { ref target, .. }) if target == "ServiceOptions"
    ));
}

#[test]
/// Linking fails when a declared dispatch arm has no binding.
fn test_link_unbound_dispatch_arm() {
    let mut reg = SchemaRegistry::new();
    let mut disc = field("opcode", FieldKind::UnsignedInt, 0, 5);
    disc.value_type = "lc_opcode".into();
    let mut payload = field("payload", FieldKind::Dispatch, 0, 71);
    payload.value_type = "lc_opcode".into();
    payload.dispatch = Some(DispatchSpec {
        discriminant: "opcode".into(),
        values: vec![0, 3],
    });
    reg.register_schema(schema("FullLc", vec![disc, payload])).unwrap();
    reg.register_schema(schema("GroupVoice", vec![])).unwrap();
    reg.bind_dispatch("lc_opcode", 0, "GroupVoice").unwrap();
    assert!(matches!(
        reg.link(),
        Err(SchemaError::UnboundDispatchArm { value: 3, .. })
    ));
}

#[test]
/// Linking fails when an enum field names a resolver with no table.
fn test_link_unknown_resolver() {
    let mut reg = SchemaRegistry::new();
    let mut fmt = field("format", FieldKind::Enum, 0, 1);
    fmt.resolver = Some("data_format".into());
    reg.register_schema(schema("DataHeader", vec![fmt])).unwrap();
    assert!(matches!(
        reg.link(),
        Err(SchemaError::UnknownResolver { ref resolver, .. }) if resolver == "data_format"
    ));
}

#[test]
/// Without `from:` the declared value type is the resolver name; linking
/// applies the same fallback the engine does.
fn test_link_resolver_falls_back_to_value_type() {
    let mut reg = SchemaRegistry::new();
    let mut fmt = field("format", FieldKind::Enum, 0, 1);
    fmt.value_type = "data_format".into();
    reg.register_schema(schema("DataHeader", vec![fmt])).unwrap();
    assert!(matches!(
        reg.link(),
        Err(SchemaError::UnknownResolver { ref resolver, .. }) if resolver == "data_format"
    ));

    reg.register_enum(fmt_table()).unwrap();
    assert!(reg.link().is_ok());
}
