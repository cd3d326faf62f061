//! Serializable snapshot of registered layouts.
//!
//! Exporting the registry of each program version to TOML gives a reviewable
//! record of what the engine will match by name when one version reads a
//! segment written by another.

use serde::{Deserialize, Serialize};

use crate::descriptor::{FieldKind, StructDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrySchema {
    pub records: Vec<RecordSchema>,
}

impl RegistrySchema {
    /// Convert the schema to a TOML string.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self)
            .unwrap_or_else(|e| format!("# Error serializing to TOML: {}", e))
    }

    pub fn record(&self, name: &str) -> Option<&RecordSchema> {
        self.records.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordSchema {
    pub name: String,
    pub type_name: String,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    #[serde(flatten)]
    pub kind: KindSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KindSchema {
    Scalar { scalar: String },
    Array { len: usize, element: Box<KindSchema> },
    Record { record: String },
}

impl From<&FieldKind> for KindSchema {
    fn from(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(scalar) => KindSchema::Scalar {
                scalar: scalar.to_string(),
            },
            FieldKind::FixedArray(array) => KindSchema::Array {
                len: array.len(),
                element: Box::new(KindSchema::from(array.element())),
            },
            FieldKind::Nested(record) => KindSchema::Record {
                record: record.descriptor().name().to_owned(),
            },
        }
    }
}

impl StructDescriptor {
    pub fn schema(&self) -> RecordSchema {
        RecordSchema {
            name: self.name().to_owned(),
            type_name: self.type_name().to_owned(),
            fields: self
                .fields()
                .iter()
                .map(|field| FieldSchema {
                    name: field.name().to_owned(),
                    kind: KindSchema::from(field.kind()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Migratable;
    use crate::registry::RegistryBuilder;

    #[derive(Migratable)]
    struct Cell {
        id: u16,
    }

    #[derive(Migratable)]
    struct Grid {
        cells: [Cell; 4],
        scale: f32,
    }

    #[test]
    fn test_record_schema() {
        let schema = Grid::descriptor().schema();
        assert_eq!(schema.name, "Grid");
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(
            schema.fields[0].kind,
            KindSchema::Array {
                len: 4,
                element: Box::new(KindSchema::Record {
                    record: "Cell".to_string()
                }),
            }
        );
        assert_eq!(
            schema.fields[1].kind,
            KindSchema::Scalar {
                scalar: "f32".to_string()
            }
        );
    }

    #[test]
    fn test_registry_schema_to_toml() {
        let registry = RegistryBuilder::new().register::<Grid>().unwrap().build();
        let schema = registry.schema();
        assert!(schema.record("Cell").is_some());

        let toml = schema.to_toml();
        assert!(toml.contains("name = \"Grid\""));
        assert!(toml.contains("name = \"cells\""));
        assert!(toml.contains("kind = \"array\""));
        assert!(toml.contains("len = 4"));
        assert!(toml.contains("scalar = \"u16\""));
    }
}
