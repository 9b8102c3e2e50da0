//! DocType metadata records as served by a Frappe site, and the assembled
//! [`DocType`] built from them.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{CUSTOM_FIELD_RESOURCE, DOCFIELD_RESOURCE, DOCTYPE_RESOURCE};

/// A record type that can be fetched page by page from `/api/resource`.
pub trait ResourceRecord: DeserializeOwned + Send + 'static {
    /// Remote collection name.
    const RESOURCE: &'static str;
    /// Serialized field names requested through the `fields` projection.
    const FIELDS: &'static [&'static str];
}

/// Row of the `DocType` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTypeRaw {
    pub name: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub istable: bool,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub issingle: bool,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub is_submittable: bool,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub custom: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title_field: Option<String>,
}

impl ResourceRecord for DocTypeRaw {
    const RESOURCE: &'static str = DOCTYPE_RESOURCE;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "module",
        "istable",
        "issingle",
        "is_submittable",
        "custom",
        "description",
        "title_field",
    ];
}

impl DocTypeRaw {
    /// Attach fields and enrichment, producing the immutable domain object.
    pub fn into_doc_type(
        self,
        fields: Vec<DocField>,
        additional_info: Option<DocTypeInfo>,
    ) -> DocType {
        DocType {
            name: self.name,
            module: self.module,
            is_table: self.istable,
            is_single: self.issingle,
            is_submittable: self.is_submittable,
            is_custom: self.custom,
            description: self.description,
            title_field: self.title_field,
            fields,
            additional_info,
        }
    }
}

/// Row of the `DocField` collection (standard fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFieldRaw {
    pub name: String,
    pub parent: String,
    pub fieldname: String,
    pub fieldtype: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub reqd: bool,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub hidden: bool,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub read_only: bool,
    #[serde(default)]
    pub idx: i64,
}

impl ResourceRecord for DocFieldRaw {
    const RESOURCE: &'static str = DOCFIELD_RESOURCE;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "parent",
        "fieldname",
        "fieldtype",
        "label",
        "options",
        "reqd",
        "hidden",
        "read_only",
        "idx",
    ];
}

/// Row of the `Custom Field` collection. The owning doc type is `dt`
/// on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocCustomFieldRaw {
    pub name: String,
    #[serde(rename = "dt")]
    pub parent: String,
    pub fieldname: String,
    pub fieldtype: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub reqd: bool,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub hidden: bool,
    #[serde(default, deserialize_with = "frappe_flag")]
    pub read_only: bool,
    #[serde(default)]
    pub idx: i64,
    #[serde(default)]
    pub insert_after: Option<String>,
}

impl ResourceRecord for DocCustomFieldRaw {
    const RESOURCE: &'static str = CUSTOM_FIELD_RESOURCE;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "dt",
        "fieldname",
        "fieldtype",
        "label",
        "options",
        "reqd",
        "hidden",
        "read_only",
        "idx",
        "insert_after",
    ];
}

/// Field of a doc type, standard or custom.
///
/// Ordering follows `idx` first so that a `BTreeSet<DocField>` lists fields
/// in form order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocField {
    pub idx: i64,
    pub fieldname: String,
    pub name: String,
    pub fieldtype: String,
    pub label: Option<String>,
    pub options: Option<String>,
    pub required: bool,
    pub hidden: bool,
    pub read_only: bool,
    pub is_custom: bool,
    pub insert_after: Option<String>,
}

/// Records that belong to a parent doc type and can be viewed as a
/// [`DocField`].
pub trait ParentedField {
    fn parent(&self) -> &str;
    fn into_doc_field(self) -> DocField;
}

impl ParentedField for DocFieldRaw {
    fn parent(&self) -> &str {
        &self.parent
    }

    fn into_doc_field(self) -> DocField {
        DocField {
            idx: self.idx,
            fieldname: self.fieldname,
            name: self.name,
            fieldtype: self.fieldtype,
            label: self.label,
            options: self.options,
            required: self.reqd,
            hidden: self.hidden,
            read_only: self.read_only,
            is_custom: false,
            insert_after: None,
        }
    }
}

impl ParentedField for DocCustomFieldRaw {
    fn parent(&self) -> &str {
        &self.parent
    }

    fn into_doc_field(self) -> DocField {
        DocField {
            idx: self.idx,
            fieldname: self.fieldname,
            name: self.name,
            fieldtype: self.fieldtype,
            label: self.label,
            options: self.options,
            required: self.reqd,
            hidden: self.hidden,
            read_only: self.read_only,
            is_custom: true,
            insert_after: self.insert_after,
        }
    }
}

/// Caller-supplied enrichment for a doc type, matched on `name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocTypeInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl DocTypeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A doc type with its fields and optional enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocType {
    pub name: String,
    pub module: Option<String>,
    pub is_table: bool,
    pub is_single: bool,
    pub is_submittable: bool,
    pub is_custom: bool,
    pub description: Option<String>,
    pub title_field: Option<String>,
    /// Sorted, no duplicates.
    pub fields: Vec<DocField>,
    pub additional_info: Option<DocTypeInfo>,
}

impl DocType {
    pub fn field(&self, fieldname: &str) -> Option<&DocField> {
        self.fields.iter().find(|field| field.fieldname == fieldname)
    }

    pub fn custom_fields(&self) -> impl Iterator<Item = &DocField> {
        self.fields.iter().filter(|field| field.is_custom)
    }
}

// Frappe stores check boxes as 0/1 integers; older sites sometimes send
// strings or null.
fn frappe_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => false,
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        Some(Flag::Text(value)) => value == "1" || value.eq_ignore_ascii_case("true"),
    })
}
