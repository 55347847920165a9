//! Filter evaluation for in-memory documents.
//!
//! Decides whether a stored document is selected by a [`Filter`] and, for
//! element filters, which array element the filter points at.

use std::collections::HashMap;
use bson::{Bson, Document, datetime::DateTime};

use rosterdb_core::{
    document::ID_FIELD,
    error::{DocumentStoreError, DocumentStoreResult},
    filter::{ElementSelector, Filter, FilterVisitor},
};


/// Type-erased, comparable representation of BSON values.
///
/// Integers and doubles are normalized to f64 so that `1_i32`, `1_i64` and
/// `1.0` compare equal. Types without a dedicated variant fall back to plain
/// BSON equality.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

/// Equality used for filter matching and for locating values to remove.
pub(crate) fn values_equal(left: &Bson, right: &Bson) -> bool {
    Comparable::from(left) == Comparable::from(right)
}


/// What a filter selected inside one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    /// The document as a whole.
    Document,
    /// The document, plus the element at `index` of its `array` field.
    ///
    /// The index is only meaningful while the collection's write guard taken
    /// for the evaluation is still held; the update must run under that guard.
    Element { array: String, index: usize },
}

pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Returns what the filter selects in this document, or `None` if the
    /// document is not selected.
    pub fn evaluate(&mut self, filter: &Filter) -> DocumentStoreResult<Option<Selection>> {
        self.visit_filter(filter)
    }

    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Document>,
        filter: &Filter,
    ) -> DocumentStoreResult<Vec<Document>> {
        let mut selected = Vec::new();

        for document in documents {
            if DocumentEvaluator::new(document).evaluate(filter)?.is_some() {
                selected.push(document.clone());
            }
        }

        Ok(selected)
    }

    fn has_id(&self, id: &str) -> bool {
        matches!(self.document.get(ID_FIELD), Some(Bson::String(value)) if value == id)
    }

    /// Index of the first element of the selector's array whose selector
    /// field equals the expected value.
    fn find_element(&self, selector: &ElementSelector) -> Option<usize> {
        let elements = match self.document.get(&selector.array) {
            Some(Bson::Array(elements)) => elements,
            _ => return None,
        };

        elements
            .iter()
            .position(|element| match element {
                Bson::Document(element) => element
                    .get(&selector.field)
                    .is_some_and(|value| values_equal(value, &selector.value)),
                _ => false,
            })
    }
}

impl<'a> FilterVisitor for DocumentEvaluator<'a> {
    type Output = Option<Selection>;
    type Error = DocumentStoreError;

    fn visit_all(&mut self) -> Result<Self::Output, Self::Error> {
        Ok(Some(Selection::Document))
    }

    fn visit_id(&mut self, id: &str) -> Result<Self::Output, Self::Error> {
        Ok(self.has_id(id).then_some(Selection::Document))
    }

    fn visit_element(&mut self, id: &str, selector: &ElementSelector) -> Result<Self::Output, Self::Error> {
        if !self.has_id(id) {
            return Ok(None);
        }

        Ok(
            self.find_element(selector)
                .map(|index| Selection::Element {
                    array: selector.array.clone(),
                    index,
                })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn drama_club() -> Document {
        doc! {
            "_id": "Drama Club",
            "participants": ["ella@mergington.edu"],
            "sub_activities": [
                { "id": "drama_auditions", "participants": [] },
                "not a sub-document",
                { "id": "drama_rehearsals", "participants": [] },
                { "id": "drama_rehearsals", "participants": ["duplicate@mergington.edu"] },
            ],
        }
    }

    #[test]
    fn selects_by_id() {
        let document = drama_club();
        let mut evaluator = DocumentEvaluator::new(&document);

        assert_eq!(evaluator.evaluate(&Filter::by_id("Drama Club")).unwrap(), Some(Selection::Document));
        assert_eq!(evaluator.evaluate(&Filter::by_id("Art Club")).unwrap(), None);
        assert_eq!(evaluator.evaluate(&Filter::all()).unwrap(), Some(Selection::Document));
    }

    #[test]
    fn first_matching_element_wins() {
        let document = drama_club();
        let filter = Filter::by_element("Drama Club", "sub_activities", "id", "drama_rehearsals");

        assert_eq!(
            DocumentEvaluator::new(&document).evaluate(&filter).unwrap(),
            Some(Selection::Element { array: "sub_activities".into(), index: 2 }),
        );
    }

    #[test]
    fn element_filter_without_match_selects_nothing() {
        let document = drama_club();
        let mut evaluator = DocumentEvaluator::new(&document);

        let missing_element = Filter::by_element("Drama Club", "sub_activities", "id", "drama_tryouts");
        let missing_array = Filter::by_element("Drama Club", "workshops", "id", "drama_auditions");
        let wrong_document = Filter::by_element("Chess Club", "sub_activities", "id", "drama_auditions");

        assert_eq!(evaluator.evaluate(&missing_element).unwrap(), None);
        assert_eq!(evaluator.evaluate(&missing_array).unwrap(), None);
        assert_eq!(evaluator.evaluate(&wrong_document).unwrap(), None);
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&Bson::Int32(12), &Bson::Int64(12)));
        assert!(values_equal(&Bson::Int64(12), &Bson::Double(12.0)));
        assert!(!values_equal(&Bson::Int32(12), &Bson::String("12".into())));
        assert!(values_equal(
            &Bson::Document(doc! { "a": 1, "b": [true] }),
            &Bson::Document(doc! { "b": [true], "a": 1_i64 }),
        ));
    }

    #[test]
    fn filter_documents_keeps_order() {
        let documents = vec![
            doc! { "_id": "Math Club" },
            doc! { "_id": "Art Club" },
            doc! { "_id": "Debate Team" },
        ];

        let all = DocumentEvaluator::filter_documents(documents.iter(), &Filter::all()).unwrap();
        assert_eq!(all, documents);

        let one = DocumentEvaluator::filter_documents(documents.iter(), &Filter::by_id("Art Club")).unwrap();
        assert_eq!(one, vec![doc! { "_id": "Art Club" }]);
    }
}
