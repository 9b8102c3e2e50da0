//! Grouping and join steps of the doc type merge

use std::collections::{BTreeSet, HashMap};

use fraplin_domain::{
    DocField, DocType, DocTypeInfo, DocTypeRaw, DuplicateInfoPolicy, FraplinError, ParentedField,
    Result,
};

/// Fields grouped by the name of the doc type that owns them.
pub type FieldGroups = HashMap<String, BTreeSet<DocField>>;

/// Index enrichment entries by name.
///
/// # Errors
/// Returns `FraplinError::InvalidInput` for a repeated name under
/// [`DuplicateInfoPolicy::Reject`].
pub fn index_additional_info<I>(
    additional_info: I,
    policy: DuplicateInfoPolicy,
) -> Result<HashMap<String, DocTypeInfo>>
where
    I: IntoIterator<Item = DocTypeInfo>,
{
    let mut index = HashMap::new();
    for info in additional_info {
        if !index.contains_key(&info.name) {
            index.insert(info.name.clone(), info);
            continue;
        }
        match policy {
            DuplicateInfoPolicy::LastWins => {
                index.insert(info.name.clone(), info);
            }
            DuplicateInfoPolicy::FirstWins => {}
            DuplicateInfoPolicy::Reject => {
                return Err(FraplinError::InvalidInput(format!(
                    "duplicate additional info for doc type '{}'",
                    info.name
                )));
            }
        }
    }
    Ok(index)
}

/// Add `fields` to `groups`, keyed by parent.
pub fn group_fields<F, I>(groups: &mut FieldGroups, fields: I)
where
    F: ParentedField,
    I: IntoIterator<Item = F>,
{
    for field in fields {
        let parent = field.parent().to_string();
        groups.entry(parent).or_default().insert(field.into_doc_field());
    }
}

/// Join each primary record with its field group and enrichment.
///
/// Doc types with no fields get an empty list; doc types with no matching
/// enrichment get `None`. Groups whose parent is not among `doc_types` are
/// dropped.
pub fn assemble(
    doc_types: Vec<DocTypeRaw>,
    mut groups: FieldGroups,
    additional_info: &HashMap<String, DocTypeInfo>,
) -> Vec<DocType> {
    doc_types
        .into_iter()
        .map(|raw| {
            let fields = groups.remove(&raw.name).map(Vec::from_iter).unwrap_or_default();
            let info = additional_info.get(&raw.name).cloned();
            raw.into_doc_type(fields, info)
        })
        .collect()
}
