//! Schemaless record used by the command line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use indigo_types::Entity;

/// A JSON object with an optional numeric `id`. Every other key is a field
/// that an index may target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Document {
    /// Text of a field as an index sees it. Strings are used as they are,
    /// arrays contribute each element, missing fields and nulls are empty.
    pub fn field_text(&self, field: &str) -> String {
        self.fields.get(field).map(value_text).unwrap_or_default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

impl Entity for Document {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}
