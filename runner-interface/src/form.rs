use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub sections: Vec<FormSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub children: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormField {
    #[serde(rename_all = "camelCase")]
    TextField {
        id: String,
        title: String,
        value: String,
        /// Rendered as a password field.
        secure: bool,
    },
    #[serde(rename_all = "camelCase")]
    Toggle {
        id: String,
        title: String,
        value: bool,
    },
    #[serde(rename_all = "camelCase")]
    Stepper {
        id: String,
        title: String,
        value: f64,
        upper_bound: Option<f64>,
        allow_decimal: bool,
    },
}

impl FormField {
    pub fn id(&self) -> &str {
        match self {
            FormField::TextField { id, .. } | FormField::Toggle { id, .. } | FormField::Stepper { id, .. } => id,
        }
    }
}

/// A value produced by a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self { FieldValue::Text(s) => Some(s), _ => None }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self { FieldValue::Bool(b) => Some(*b), _ => None }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }
}

/// Submitted form, keyed by field id.
pub type FormValues = HashMap<String, FieldValue>;
