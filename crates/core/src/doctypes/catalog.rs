//! Result collection of a doc type fetch

use fraplin_domain::DocType;
use futures::stream::{self, Stream};

/// Assembled doc types in the order the site listed them.
///
/// Iterate it as often as needed with [`iter`](Self::iter), consume it with
/// `into_iter`, or hand it to async consumers with
/// [`into_stream`](Self::into_stream).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTypeCatalog {
    doc_types: Vec<DocType>,
}

impl DocTypeCatalog {
    pub fn new(doc_types: Vec<DocType>) -> Self {
        Self { doc_types }
    }

    pub fn len(&self) -> usize {
        self.doc_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_types.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocType> {
        self.doc_types.iter()
    }

    pub fn get(&self, name: &str) -> Option<&DocType> {
        self.doc_types.iter().find(|doc_type| doc_type.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.doc_types.iter().map(|doc_type| doc_type.name.as_str())
    }

    pub fn into_stream(self) -> impl Stream<Item = DocType> {
        stream::iter(self.doc_types)
    }

    pub fn into_vec(self) -> Vec<DocType> {
        self.doc_types
    }
}

impl IntoIterator for DocTypeCatalog {
    type Item = DocType;
    type IntoIter = std::vec::IntoIter<DocType>;

    fn into_iter(self) -> Self::IntoIter {
        self.doc_types.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocTypeCatalog {
    type Item = &'a DocType;
    type IntoIter = std::slice::Iter<'a, DocType>;

    fn into_iter(self) -> Self::IntoIter {
        self.doc_types.iter()
    }
}
