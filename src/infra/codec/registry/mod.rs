//! Registry tying compiled PDU schemas together: nested schema references,
//! enum resolver tables and dispatch bindings all resolve through here. The
//! registry is mutable while schemas are being registered, then [`link`]
//! checks cross-references once and the whole structure is shared read-only.
//!
//! [`link`]: SchemaRegistry::link
use std::collections::HashMap;

use crate::core::{FieldKind, PduSchema};
use crate::error::SchemaError;

/// Integer-to-variant mapping backing an `Enum` field's resolver. Whether an
/// out-of-domain raw value is a sentinel or an error is decided per field,
/// not per table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTable {
    /// Resolver name referenced by field annotations.
    pub name: String,
    /// `(raw value, variant label)` pairs, in declaration order.
    pub variants: Vec<(u64, String)>,
}

impl EnumTable {
    /// Variant label for a raw value, if the domain covers it.
    pub fn label(&self, raw: u64) -> Option<&str> {
        self.variants
            .iter()
            .find(|(v, _)| *v == raw)
            .map(|(_, l)| l.as_str())
    }

    /// Raw value of a variant label.
    pub fn raw(&self, label: &str) -> Option<u64> {
        self.variants
            .iter()
            .find(|(_, l)| l == label)
            .map(|(v, _)| *v)
    }
}

/// The full schema set of one protocol deployment.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, PduSchema>,
    enums: HashMap<String, EnumTable>,
    /// `(dispatch group, discriminant value) → schema name`.
    dispatch: HashMap<(String, u64), String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiled schema under its type name.
    pub fn register_schema(&mut self, schema: PduSchema) -> Result<(), SchemaError> {
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::DuplicateSchema {
                pdu: schema.name.clone(),
            });
        }
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Register an enum resolver table.
    pub fn register_enum(&mut self, table: EnumTable) -> Result<(), SchemaError> {
        if self.enums.contains_key(&table.name) {
            return Err(SchemaError::DuplicateResolver {
                resolver: table.name.clone(),
            });
        }
        self.enums.insert(table.name.clone(), table);
        Ok(())
    }

    /// Bind one dispatch arm: within `group`, discriminant value `value`
    /// selects the schema named `schema`.
    pub fn bind_dispatch(
        &mut self,
        group: impl Into<String>,
        value: u64,
        schema: impl Into<String>,
    ) -> Result<(), SchemaError> {
        let group = group.into();
        let key = (group, value);
        if self.dispatch.contains_key(&key) {
            return Err(SchemaError::DuplicateDispatchBinding {
                group: key.0,
                value,
            });
        }
        self.dispatch.insert(key, schema.into());
        Ok(())
    }

    pub fn schema(&self, name: &str) -> Option<&PduSchema> {
        self.schemas.get(name)
    }

    pub fn enum_table(&self, name: &str) -> Option<&EnumTable> {
        self.enums.get(name)
    }

    /// Schema selected by a dispatch group for a discriminant value.
    pub fn dispatch_target(&self, group: &str, value: u64) -> Option<&str> {
        self.dispatch
            .get(&(group.to_string(), value))
            .map(String::as_str)
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Cross-reference check over the whole registry. Verifies that every
    /// delegate target and dispatch arm resolves to a registered schema and
    /// that every named resolver has a table. Run once after registration;
    /// afterwards the registry is shared read-only and the engine can trust
    /// every reference except the discriminant values seen on the wire.
    pub fn link(&self) -> Result<(), SchemaError> {
        for schema in self.schemas.values() {
            for field in &schema.fields {
                match field.kind {
                    FieldKind::Delegate => {
                        if !self.schemas.contains_key(&field.value_type) {
                            return Err(SchemaError::UnknownDelegate {
                                pdu: schema.name.clone(),
                                field: field.name.clone(),
                                target: field.value_type.clone(),
                            });
                        }
                    }
                    FieldKind::Dispatch => {
                        let spec = field.dispatch.as_ref().ok_or_else(|| {
                            SchemaError::MalformedDispatch {
                                field: field.name.clone(),
                            }
                        })?;
                        for &value in &spec.values {
                            let target = self
                                .dispatch_target(&field.value_type, value)
                                .ok_or_else(|| SchemaError::UnboundDispatchArm {
                                    pdu: schema.name.clone(),
                                    field: field.name.clone(),
                                    value,
                                })?;
                            if !self.schemas.contains_key(target) {
                                return Err(SchemaError::UnknownDelegate {
                                    pdu: schema.name.clone(),
                                    field: field.name.clone(),
                                    target: target.to_string(),
                                });
                            }
                        }
                    }
                    FieldKind::Enum => {
                        // Same fallback the engine applies: without `from:`
                        // the declared value type names the resolver.
                        let resolver = field.resolver.as_deref().unwrap_or(&field.value_type);
                        if !self.enums.contains_key(resolver) {
                            return Err(SchemaError::UnknownResolver {
                                pdu: schema.name.clone(),
                                field: field.name.clone(),
                                resolver: resolver.to_string(),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }
        log::debug!(
            "schema registry linked: {} schemas, {} resolvers, {} dispatch arms",
            self.schemas.len(),
            self.enums.len(),
            self.dispatch.len()
        );
        Ok(())
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
