//! Field metadata lookup used for compile-time checks

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Enum,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Enum => "enum",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Number)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("field '{0}' is not defined in the schema")]
    UnknownField(String),

    #[error("field '{0}' is not an enum field")]
    NotEnum(String),

    #[error("value '{value}' is not allowed for field '{field}' (allowed: {allowed})")]
    ValueNotAllowed {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("enum field '{0}' declares no allowed values")]
    EmptyEnum(String),

    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of field metadata
///
/// Only `has_field`, `field_type` and `allowed_values` are required; the
/// remaining checks derive from them.
pub trait SchemaProvider: Send + Sync {
    fn has_field(&self, name: &str) -> bool;

    fn field_type(&self, name: &str) -> Option<FieldType>;

    /// Allowed values of an enum field, `None` for other fields
    fn allowed_values(&self, name: &str) -> Option<&[String]>;

    fn validate_field(&self, name: &str) -> Result<(), SchemaError> {
        if self.has_field(name) {
            Ok(())
        } else {
            Err(SchemaError::UnknownField(name.to_string()))
        }
    }

    fn is_array_type(&self, name: &str) -> bool {
        self.field_type(name) == Some(FieldType::Array)
    }

    fn is_string_type(&self, name: &str) -> bool {
        self.field_type(name) == Some(FieldType::String)
    }

    fn is_numeric_type(&self, name: &str) -> bool {
        self.field_type(name).is_some_and(|t| t.is_numeric())
    }

    fn is_boolean_type(&self, name: &str) -> bool {
        self.field_type(name) == Some(FieldType::Boolean)
    }

    fn is_enum_type(&self, name: &str) -> bool {
        self.field_type(name) == Some(FieldType::Enum)
    }

    fn validate_enum_value(&self, name: &str, value: &str) -> Result<(), SchemaError> {
        self.validate_field(name)?;
        let allowed = self
            .allowed_values(name)
            .ok_or_else(|| SchemaError::NotEnum(name.to_string()))?;
        if allowed.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(SchemaError::ValueNotAllowed {
                field: name.to_string(),
                value: value.to_string(),
                allowed: allowed.join(", "),
            })
        }
    }
}
