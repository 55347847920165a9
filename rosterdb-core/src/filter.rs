//! Filters selecting documents by identifier.
//!
//! A filter picks out at most one document by its `_id`, optionally narrowing
//! further to one element of an array-of-documents field. [`Filter::All`] is
//! the empty filter and only makes sense for listing a collection.
//!
//! ```ignore
//! use rosterdb::filter::Filter;
//!
//! let club = Filter::by_id("Chess Club");
//! let practice = Filter::by_element("Chess Club", "sub_activities", "id", "chess_practice");
//! ```

use bson::Bson;

use crate::error::DocumentStoreError;

/// Locates one element inside an array-of-documents field by a field's value.
///
/// The first element whose `field` equals `value` wins; arrays are never
/// assumed to be sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSelector {
    /// Name of the top-level array field to scan.
    pub array: String,
    /// Field inside each element that is compared against `value`.
    pub field: String,
    /// Expected value of `field`.
    pub value: Bson,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    /// Matches the document with this identifier.
    ById(String),
    /// Matches the document with this identifier, provided one of its array
    /// elements satisfies the selector. That element becomes the target of
    /// [`FieldPath::NestedInMatchedElement`](crate::update::FieldPath) updates.
    ByIdAndElement { id: String, selector: ElementSelector },
}

impl Filter {
    pub fn all() -> Self {
        Filter::All
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Filter::ById(id.into())
    }

    pub fn by_element(
        id: impl Into<String>,
        array: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Bson>,
    ) -> Self {
        Filter::ByIdAndElement {
            id: id.into(),
            selector: ElementSelector {
                array: array.into(),
                field: field.into(),
                value: value.into(),
            },
        }
    }

    /// The identifier clause, if the filter has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Filter::All => None,
            Filter::ById(id) | Filter::ByIdAndElement { id, .. } => Some(id),
        }
    }

    /// The element selector clause, if the filter has one.
    pub fn selector(&self) -> Option<&ElementSelector> {
        match self {
            Filter::ByIdAndElement { selector, .. } => Some(selector),
            _ => None,
        }
    }
}

/// Interprets a [`Filter`] for a particular backend.
///
/// The in-memory backend evaluates filters against stored documents while the
/// MongoDB backend translates them into query documents.
pub trait FilterVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_all(&mut self) -> Result<Self::Output, Self::Error>;
    fn visit_id(&mut self, id: &str) -> Result<Self::Output, Self::Error>;
    fn visit_element(
        &mut self,
        id: &str,
        selector: &ElementSelector,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_filter(&mut self, filter: &Filter) -> Result<Self::Output, Self::Error> {
        match filter {
            Filter::All => self.visit_all(),
            Filter::ById(id) => self.visit_id(id),
            Filter::ByIdAndElement { id, selector } => self.visit_element(id, selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clauses() {
        assert_eq!(Filter::all().id(), None);
        assert_eq!(Filter::by_id("Art Club").id(), Some("Art Club"));
        assert!(Filter::by_id("Art Club").selector().is_none());

        let filter = Filter::by_element("Drama Club", "sub_activities", "id", "drama_auditions");
        assert_eq!(filter.id(), Some("Drama Club"));

        let selector = filter.selector().unwrap();
        assert_eq!(selector.array, "sub_activities");
        assert_eq!(selector.field, "id");
        assert_eq!(selector.value, Bson::String("drama_auditions".into()));
    }
}
