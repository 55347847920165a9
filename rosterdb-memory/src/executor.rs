//! Array update execution for in-memory documents.
//!
//! An [`UpdateExecutor`] applies one [`Update`] to a document that a filter
//! has already selected. Top-level paths address the document itself; paths
//! nested in the matched element address the array element the filter
//! located, and are a no-op when the filter located none.

use bson::{Bson, Document};
use tracing::warn;

use rosterdb_core::update::{FieldPath, Update, UpdateResult};

use crate::evaluator::{Selection, values_equal};


pub(crate) struct UpdateExecutor<'s> {
    selection: &'s Selection,
}

impl<'s> UpdateExecutor<'s> {
    pub fn new(selection: &'s Selection) -> Self {
        Self { selection }
    }

    /// Applies the update, returning whether an array was changed.
    ///
    /// Never changes more than one array and never touches anything outside
    /// the target array.
    pub fn execute(&self, document: &mut Document, update: &Update) -> UpdateResult {
        let Some(target) = self.target(document, update.path()) else {
            return UpdateResult::UNMODIFIED;
        };

        match update {
            Update::Append(path, value) => append(target, path.name(), value),
            Update::Remove(path, value) => remove(target, path.name(), value),
        }
    }

    /// The document holding the array the path names.
    fn target<'d>(&self, document: &'d mut Document, path: &FieldPath) -> Option<&'d mut Document> {
        match (path, self.selection) {
            (FieldPath::TopLevelField(_), _) => Some(document),
            (FieldPath::NestedInMatchedElement(_), Selection::Element { array, index }) => {
                match document.get_mut(array) {
                    Some(Bson::Array(elements)) => match elements.get_mut(*index) {
                        Some(Bson::Document(element)) => Some(element),
                        _ => None,
                    },
                    _ => None,
                }
            },
            (FieldPath::NestedInMatchedElement(_), Selection::Document) => None,
        }
    }
}

fn append(target: &mut Document, field: &str, value: &Bson) -> UpdateResult {
    match target.get_mut(field) {
        Some(Bson::Array(array)) => {
            array.push(value.clone());
            UpdateResult::MODIFIED
        },
        Some(other) => {
            warn!(field, element_type = ?other.element_type(), "append target is not an array");
            UpdateResult::UNMODIFIED
        },
        None => {
            target.insert(field, Bson::Array(vec![value.clone()]));
            UpdateResult::MODIFIED
        },
    }
}

fn remove(target: &mut Document, field: &str, value: &Bson) -> UpdateResult {
    match target.get_mut(field) {
        Some(Bson::Array(array)) => match array.iter().position(|item| values_equal(item, value)) {
            Some(index) => {
                array.remove(index);
                UpdateResult::MODIFIED
            },
            None => UpdateResult::UNMODIFIED,
        },
        Some(other) => {
            warn!(field, element_type = ?other.element_type(), "remove target is not an array");
            UpdateResult::UNMODIFIED
        },
        None => UpdateResult::UNMODIFIED,
    }
}
