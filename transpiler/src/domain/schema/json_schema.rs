//! Schema loaded from a JSON document
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "age", "type": "integer" },
//!     { "name": "status", "type": "enum", "allowedValues": ["active", "banned"] }
//!   ]
//! }
//! ```

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::provider::{FieldType, SchemaError, SchemaProvider};

/// A single field declaration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, alias = "allowed_values", skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            allowed_values: Vec::new(),
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            field_type: FieldType::Enum,
            allowed_values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
struct SchemaDocument {
    fields: Vec<FieldSchema>,
}

/// In-memory [`SchemaProvider`] keyed by full field name (`user.address.city`)
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: FxHashMap<String, FieldSchema>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        let mut map = FxHashMap::default();
        for field in fields {
            if field.field_type == FieldType::Enum && field.allowed_values.is_empty() {
                return Err(SchemaError::EmptyEnum(field.name));
            }
            if map.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField(field.name));
            }
            map.insert(field.name.clone(), field);
        }
        Ok(Self { fields: map })
    }

    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Self::new(document.fields)
    }

    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let schema = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), fields = schema.len(), "Loaded schema");
        Ok(schema)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Field names in sorted order
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl SchemaProvider for Schema {
    fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).map(|f| f.field_type)
    }

    fn allowed_values(&self, name: &str) -> Option<&[String]> {
        self.fields
            .get(name)
            .filter(|f| f.field_type == FieldType::Enum)
            .map(|f| f.allowed_values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample() -> Schema {
        Schema::from_json(
            r#"{
                "fields": [
                    {"name": "age", "type": "integer"},
                    {"name": "price", "type": "number"},
                    {"name": "name", "type": "string"},
                    {"name": "active", "type": "boolean"},
                    {"name": "tags", "type": "array"},
                    {"name": "user.address", "type": "object"},
                    {"name": "status", "type": "enum", "allowedValues": ["active", "banned"]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_type_predicates() {
        let schema = sample();
        assert!(schema.is_numeric_type("age"));
        assert!(schema.is_numeric_type("price"));
        assert!(!schema.is_numeric_type("name"));
        assert!(schema.is_string_type("name"));
        assert!(schema.is_boolean_type("active"));
        assert!(schema.is_array_type("tags"));
        assert!(schema.is_enum_type("status"));
        assert!(schema.has_field("user.address"));
        assert!(!schema.has_field("user"));
    }

    #[test]
    fn test_validate_field() {
        let schema = sample();
        assert!(schema.validate_field("age").is_ok());
        let err = schema.validate_field("height").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField(ref f) if f == "height"));
    }

    #[test]
    fn test_validate_enum_value() {
        let schema = sample();
        assert!(schema.validate_enum_value("status", "active").is_ok());
        let err = schema.validate_enum_value("status", "deleted").unwrap_err();
        assert!(err.to_string().contains("active, banned"));
        assert!(matches!(
            schema.validate_enum_value("age", "1"),
            Err(SchemaError::NotEnum(_))
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_enums() {
        let err = Schema::new(vec![
            FieldSchema::new("a", FieldType::String),
            FieldSchema::new("a", FieldType::Integer),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField(_)));

        let err = Schema::new(vec![FieldSchema::enumeration("e", Vec::<String>::new())]).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyEnum(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fields": [{{"name": "score", "type": "number"}}]}}"#
        )
        .unwrap();
        let schema = Schema::from_file(file.path()).unwrap();
        assert_eq!(schema.field_names(), vec!["score"]);
        assert_eq!(schema.field("score").unwrap().field_type, FieldType::Number);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Schema::from_file(Path::new("/nonexistent/schema.json")).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Schema::from_json(r#"{"fields": [{"name": "a", "type": "date"}]}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }
}
