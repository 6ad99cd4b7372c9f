//! Declarative JSON schema manifest: the discovery side of the compiler.
//! A manifest bundles PDU definitions (annotation strings plus directives),
//! enum resolver tables and dispatch bindings; [`compile_manifest`] turns it
//! into a linked, ready-to-use [`SchemaRegistry`].
use serde::Deserialize;

use crate::compiler::{compile, FieldAnnotation};
use crate::error::SchemaError;
use crate::infra::codec::registry::{EnumTable, SchemaRegistry};

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub enums: Vec<EnumDef>,
    pub pdus: Vec<PduDef>,
    #[serde(default)]
    pub dispatch: Vec<DispatchBinding>,
}

#[derive(Debug, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Deserialize)]
pub struct VariantDef {
    pub value: u64,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct PduDef {
    pub name: String,
    #[serde(default)]
    pub directives: Vec<String>,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub spec: String,
}

#[derive(Debug, Deserialize)]
pub struct DispatchBinding {
    pub group: String,
    pub value: u64,
    pub schema: String,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::BadManifest {
            reason: e.to_string(),
        })
    }
}

/// Compile every definition of a JSON manifest into a linked registry.
pub fn compile_manifest(json: &str) -> Result<SchemaRegistry, SchemaError> {
    let manifest = Manifest::from_json(json)?;
    let mut registry = SchemaRegistry::new();

    for def in &manifest.enums {
        registry.register_enum(EnumTable {
            name: def.name.clone(),
            variants: def
                .variants
                .iter()
                .map(|v| (v.value, v.label.clone()))
                .collect(),
        })?;
    }

    for pdu in &manifest.pdus {
        let annotations: Vec<FieldAnnotation> = pdu
            .fields
            .iter()
            .map(|f| FieldAnnotation {
                name: f.name.clone(),
                value_type: f.value_type.clone(),
                spec: f.spec.clone(),
            })
            .collect();
        let schema = compile(&pdu.name, &annotations, &pdu.directives)?;
        registry.register_schema(schema)?;
    }

    for binding in &manifest.dispatch {
        registry.bind_dispatch(binding.group.clone(), binding.value, binding.schema.clone())?;
    }

    registry.link()?;
    Ok(registry)
}
