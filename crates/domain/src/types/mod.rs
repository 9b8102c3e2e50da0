//! Domain types and models

pub mod doctype;
pub mod resource;
pub mod token;

pub use doctype::{
    DocCustomFieldRaw, DocField, DocFieldRaw, DocType, DocTypeInfo, DocTypeRaw, ParentedField,
    ResourceRecord,
};
pub use resource::{RawRecord, RecordSet, ResourceType};
pub use token::SiteToken;
