//! Array update operators.
//!
//! Appending to and removing from arrays are the only mutations a collection
//! supports. Whether an update addresses a top-level field or a field of the
//! element selected by the filter is part of the [`FieldPath`] type rather
//! than being inferred from the field name.

use bson::Bson;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    /// An array field of the matched document itself.
    TopLevelField(String),
    /// An array field inside the element selected by
    /// [`Filter::ByIdAndElement`](crate::filter::Filter::ByIdAndElement).
    NestedInMatchedElement(String),
}

impl FieldPath {
    pub fn top_level(name: impl Into<String>) -> Self {
        FieldPath::TopLevelField(name.into())
    }

    pub fn matched_element(name: impl Into<String>) -> Self {
        FieldPath::NestedInMatchedElement(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            FieldPath::TopLevelField(name) | FieldPath::NestedInMatchedElement(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Append the value to the target array, creating the array if absent.
    Append(FieldPath, Bson),
    /// Remove the first occurrence of the value from the target array.
    Remove(FieldPath, Bson),
}

impl Update {
    pub fn append(path: FieldPath, value: impl Into<Bson>) -> Self {
        Update::Append(path, value.into())
    }

    pub fn remove(path: FieldPath, value: impl Into<Bson>) -> Self {
        Update::Remove(path, value.into())
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            Update::Append(path, _) | Update::Remove(path, _) => path,
        }
    }

    pub fn value(&self) -> &Bson {
        match self {
            Update::Append(_, value) | Update::Remove(_, value) => value,
        }
    }
}

/// Outcome of a single-document update.
///
/// `modified_count` is 1 when an array was changed and 0 otherwise, including
/// when the filter matched nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateResult {
    pub modified_count: u64,
}

impl UpdateResult {
    pub const UNMODIFIED: UpdateResult = UpdateResult { modified_count: 0 };
    pub const MODIFIED: UpdateResult = UpdateResult { modified_count: 1 };

    pub fn is_modified(&self) -> bool {
        self.modified_count > 0
    }
}
