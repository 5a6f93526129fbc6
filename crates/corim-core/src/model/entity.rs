use crate::model::field::FieldSpec;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// SchemaError
///
/// A malformed schema table. These are programming errors in an entity
/// definition, never document errors.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("entity '{entity}': key {key} claimed by both '{first}' and '{second}'")]
    KeyCollision {
        entity: &'static str,
        key: u64,
        first: &'static str,
        second: &'static str,
    },

    #[error("entity '{entity}': field name '{name}' declared twice")]
    NameCollision {
        entity: &'static str,
        name: &'static str,
    },

    #[error("entity '{entity}': array layout requires dense mandatory keys, found '{field}' ({key})")]
    SparseArray {
        entity: &'static str,
        field: &'static str,
        key: u64,
    },
}

///
/// Layout
///
/// Binary-form shape of a record. Array-layout records are positional
/// arrays indexed by field key; the text form is always an object.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Layout {
    #[default]
    Map,
    Array,
}

///
/// EntitySchema
/// Static schema descriptor for one entity.
///
/// Declared as a `static` struct literal so the field table and the
/// embedded list borrow for the whole program.
///

#[derive(Debug)]
pub struct EntitySchema {
    /// Stable entity name used in diagnostics.
    pub entity: &'static str,
    pub layout: Layout,
    /// Fields declared directly on the entity.
    pub fields: &'static [FieldSpec],
    /// Sub-schemas whose fields are flattened into this entity's map.
    pub embedded: &'static [&'static Self],
}

impl EntitySchema {
    /// Own fields followed by every embedded field, depth first.
    #[must_use]
    pub fn flattened(&self) -> Vec<&'static FieldSpec> {
        let mut out = Vec::with_capacity(self.fields.len());
        self.collect(&mut out);

        out
    }

    fn collect(&self, out: &mut Vec<&'static FieldSpec>) {
        out.extend(self.fields.iter());
        for embedded in self.embedded {
            embedded.collect(out);
        }
    }

    /// Look up a flattened field by its text-form name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.flattened().into_iter().find(|f| f.name == name)
    }

    /// Look up a flattened field by its binary-form key.
    #[must_use]
    pub fn field_by_key(&self, key: u64) -> Option<&'static FieldSpec> {
        self.flattened().into_iter().find(|f| f.key == key)
    }

    /// Verify keys and names are unique across the flattened field set.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut keys: BTreeMap<u64, &'static str> = BTreeMap::new();
        let mut names: BTreeMap<&'static str, u64> = BTreeMap::new();
        let fields = self.flattened();

        for field in &fields {
            if let Some(first) = keys.insert(field.key, field.name) {
                return Err(SchemaError::KeyCollision {
                    entity: self.entity,
                    key: field.key,
                    first,
                    second: field.name,
                });
            }
            if names.insert(field.name, field.key).is_some() {
                return Err(SchemaError::NameCollision {
                    entity: self.entity,
                    name: field.name,
                });
            }
        }

        if self.layout == Layout::Array {
            for (expected, field) in (0u64..).zip(keys.iter()) {
                let (key, name) = field;
                let spec = fields.iter().find(|f| f.key == *key);
                if *key != expected || spec.is_some_and(|f| f.optional) {
                    return Err(SchemaError::SparseArray {
                        entity: self.entity,
                        field: *name,
                        key: *key,
                    });
                }
            }
        }

        Ok(())
    }
}
