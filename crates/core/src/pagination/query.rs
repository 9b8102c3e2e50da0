//! Per-resource query parameters appended to every page request

use serde_json::Value;

/// Field projection and extra query parameters for a resource fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    fields: Vec<String>,
    params: Vec<(String, String)>,
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fields to the `fields` projection. Repeated names are kept once.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.fields.contains(&field) {
                self.fields.push(field);
            }
        }
        self
    }

    /// Add a plain query parameter such as `parent=DocType`.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The projection as Frappe expects it, e.g. `["name","module"]`.
    pub fn fields_projection(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        let names = self.fields.iter().cloned().map(Value::String).collect();
        Some(Value::Array(names).to_string())
    }

    /// Extra parameters followed by the `fields` projection.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.params.clone();
        if let Some(projection) = self.fields_projection() {
            pairs.push(("fields".to_string(), projection));
        }
        pairs
    }
}
