//! Core traits for document representation and serialization.
//!
//! Stored documents are plain [`bson::Document`] values carrying a string
//! `_id`. Typed documents implement [`Document`] and are converted to and from
//! BSON through [`DocumentExt`] on their way in and out of a collection.

use bson::{Bson, de::deserialize_from_document, ser::serialize_to_document};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the identifier field every stored document carries.
pub const ID_FIELD: &str = "_id";

/// Core trait that all typed documents stored in a document store must implement.
///
/// Identifiers are supplied by the caller and are never generated by the store.
/// Whatever `id()` returns is written to the `_id` field on insert, so the
/// struct itself does not need to name that field.
///
/// # Example
///
/// ```ignore
/// use rosterdb::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Account {
///     pub username: String,
///     pub display_name: String,
/// }
///
/// impl Document for Account {
///     fn id(&self) -> &str {
///         &self.username
///     }
///
///     fn collection_name() -> &'static str {
///         "teachers"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this document's identifier.
    fn id(&self) -> &str;

    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing serialization/deserialization utilities for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON document with `_id` set from [`Document::id`].
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the type does not serialize to a map.
    fn to_bson_document(&self) -> DocumentStoreResult<bson::Document>;

    /// Creates a document from a stored BSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson_document(document: bson::Document) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson_document(&self) -> DocumentStoreResult<bson::Document> {
        let mut document = serialize_to_document(self)?;
        document.insert(ID_FIELD, self.id());

        Ok(document)
    }

    fn from_bson_document(document: bson::Document) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_document(document)?)
    }
}

/// Reads the string identifier of a stored document.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidDocument`] if `_id` is missing or is not a string.
pub fn document_id(document: &bson::Document) -> DocumentStoreResult<&str> {
    match document.get(ID_FIELD) {
        Some(Bson::String(id)) => Ok(id),
        Some(other) => Err(DocumentStoreError::InvalidDocument(format!(
            "`{ID_FIELD}` must be a string, found {:?}",
            other.element_type()
        ))),
        None => Err(DocumentStoreError::InvalidDocument(format!(
            "document has no `{ID_FIELD}` field"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Account {
        username: String,
        role: String,
    }

    impl Document for Account {
        fn id(&self) -> &str {
            &self.username
        }

        fn collection_name() -> &'static str {
            "teachers"
        }
    }

    #[test]
    fn to_bson_document_writes_id() {
        let account = Account { username: "mchen".into(), role: "teacher".into() };
        let document = account.to_bson_document().unwrap();

        assert_eq!(document.get_str(ID_FIELD).unwrap(), "mchen");
        assert_eq!(document.get_str("role").unwrap(), "teacher");
        assert_eq!(Account::from_bson_document(document).unwrap(), account);
    }

    #[test]
    fn document_id_requires_string() {
        assert_eq!(document_id(&doc! { "_id": "Chess Club" }).unwrap(), "Chess Club");
        assert!(matches!(
            document_id(&doc! { "_id": 7 }),
            Err(DocumentStoreError::InvalidDocument(_))
        ));
        assert!(matches!(
            document_id(&doc! { "name": "no id" }),
            Err(DocumentStoreError::InvalidDocument(_))
        ));
    }
}
