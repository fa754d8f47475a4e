//! Schema extraction: from a binding table to an ordered list of descriptors.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::field::{Args, FieldDef};
use crate::metadata;
use crate::value::ValueKind;

/// Describes one bindable flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDescriptor {
    pub field: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub long_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub kind: ValueKind,
    pub type_name: String,
}

impl FieldDescriptor {
    /// Neither an alias nor a long name: no token can ever match it.
    pub fn is_unreachable(&self) -> bool {
        self.alias.is_empty() && self.long_name.is_empty()
    }
}

/// Two descriptors answering to the same flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The flag as typed, e.g. `--all` or `-a`.
    pub flag: String,
    /// Field that wins lookups (declared first).
    pub first: String,
    pub second: String,
}

/// Annotated fields of a target, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: IndexMap<String, FieldDescriptor>,
}

impl Schema {
    /// Extract the schema of `T`.
    pub fn extract<T: Args>() -> Result<Self> {
        Self::from_fields(&T::fields())
    }

    /// Build a schema from a binding table.
    ///
    /// Fails with `InvalidTarget` when the table does not describe a struct,
    /// i.e. a field identifier is empty or appears twice.
    pub fn from_fields<T>(defs: &[FieldDef<T>]) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, def) in defs.iter().enumerate() {
            if def.name().is_empty() {
                return Err(Error::InvalidTarget(format!(
                    "field #{index} has an empty identifier"
                )));
            }
            if !seen.insert(def.name()) {
                return Err(Error::InvalidTarget(format!(
                    "field `{}` is declared more than once",
                    def.name()
                )));
            }
        }

        let mut fields = IndexMap::new();
        for def in defs {
            let Some(annotation) = def.annotation() else {
                tracing::trace!(field = def.name(), "field has no annotation, skipping");
                continue;
            };
            let meta = metadata::parse(annotation).map_err(|source| Error::MalformedMetadata {
                field: def.name().to_string(),
                source,
            })?;
            fields.insert(
                def.name().to_string(),
                FieldDescriptor {
                    field: def.name().to_string(),
                    alias: meta.alias,
                    long_name: meta.long_name,
                    description: meta.description,
                    kind: def.kind(),
                    type_name: def.type_name().to_string(),
                },
            );
        }

        let schema = Self { fields };
        for c in schema.collisions() {
            tracing::warn!(
                flag = %c.flag,
                first = %c.first,
                second = %c.second,
                "flag declared twice, the first field wins"
            );
        }
        for d in schema.iter().filter(|d| d.is_unreachable()) {
            tracing::debug!(field = %d.field, "field has neither alias nor argument");
        }
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn get(&self, field: &str) -> Option<&FieldDescriptor> {
        self.fields.get(field)
    }

    /// First descriptor whose long name is `name`. An empty name never matches.
    pub fn lookup_long(&self, name: &str) -> Option<&FieldDescriptor> {
        if name.is_empty() {
            return None;
        }
        self.iter().find(|d| d.long_name == name)
    }

    /// First descriptor whose alias is `name`. An empty name never matches.
    pub fn lookup_alias(&self, name: &str) -> Option<&FieldDescriptor> {
        if name.is_empty() {
            return None;
        }
        self.iter().find(|d| d.alias == name)
    }

    /// Every alias or long name claimed by more than one descriptor.
    pub fn collisions(&self) -> Vec<Collision> {
        let mut longs: IndexMap<&str, &str> = IndexMap::new();
        let mut aliases: IndexMap<&str, &str> = IndexMap::new();
        let mut out = Vec::new();

        for d in self.iter() {
            if !d.long_name.is_empty() {
                match longs.get(d.long_name.as_str()) {
                    Some(first) => out.push(Collision {
                        flag: format!("--{}", d.long_name),
                        first: first.to_string(),
                        second: d.field.clone(),
                    }),
                    None => {
                        longs.insert(&d.long_name, &d.field);
                    }
                }
            }
            if !d.alias.is_empty() {
                match aliases.get(d.alias.as_str()) {
                    Some(first) => out.push(Collision {
                        flag: format!("-{}", d.alias),
                        first: first.to_string(),
                        second: d.field.clone(),
                    }),
                    None => {
                        aliases.insert(&d.alias, &d.field);
                    }
                }
            }
        }

        out
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDescriptor;
    type IntoIter = indexmap::map::Values<'a, String, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}
