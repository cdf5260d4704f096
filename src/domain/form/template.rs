use crate::domain::form::field_type::FieldType;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Key holding the template's identifying name in a raw record.
pub const NAME_KEY: &str = "name";

/// Store identity keys that are never part of the field comparison.
pub const METADATA_KEYS: &[&str] = &["_id", "id"];

/// A named set of field name -> expected type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub fields: BTreeMap<String, FieldType>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateRecordError {
    #[error("template record is not a JSON object")]
    NotAnObject,
    #[error("template record has no string 'name' field")]
    MissingName,
    #[error("template '{template}' field '{field}' has an invalid type tag: {value}")]
    InvalidFieldType {
        template: String,
        field: String,
        value: JsonValue,
    },
    #[error("template '{0}' defines no fields")]
    NoFields(String),
}

impl Template {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = (String, FieldType)>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// Parses a raw stored record (`{"name": "...", "<field>": "<tag>", ...}`).
    ///
    /// Identity metadata is stripped; every other key must map to a known type tag.
    pub fn from_record(record: &JsonValue) -> Result<Self, TemplateRecordError> {
        let obj = record.as_object().ok_or(TemplateRecordError::NotAnObject)?;
        let name = obj
            .get(NAME_KEY)
            .and_then(|v| v.as_str())
            .ok_or(TemplateRecordError::MissingName)?
            .to_string();

        let mut fields = BTreeMap::new();
        for (key, value) in obj {
            if key == NAME_KEY || METADATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            let field_type = value
                .as_str()
                .and_then(|s| s.parse::<FieldType>().ok())
                .ok_or_else(|| TemplateRecordError::InvalidFieldType {
                    template: name.clone(),
                    field: key.clone(),
                    value: value.clone(),
                })?;
            fields.insert(key.clone(), field_type);
        }

        if fields.is_empty() {
            return Err(TemplateRecordError::NoFields(name));
        }
        Ok(Self { name, fields })
    }
}
