//! Translation of filters and updates into MongoDB syntax.
//!
//! Filters become query documents and updates become `$push` / `$pull`
//! modifier documents. Updates addressing the matched element use MongoDB's
//! positional `$` operator, which resolves to the first array element the
//! query's element clause matched.

use bson::{Document, doc};

use rosterdb_core::{
    document::ID_FIELD,
    error::DocumentStoreError,
    filter::{ElementSelector, Filter, FilterVisitor},
    update::{FieldPath, Update},
};


/// Translates filters into MongoDB query documents.
pub(crate) struct MongoFilterTranslator;

impl MongoFilterTranslator {
    pub fn translate(filter: &Filter) -> Result<Document, DocumentStoreError> {
        MongoFilterTranslator.visit_filter(filter)
    }
}

impl FilterVisitor for MongoFilterTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_all(&mut self) -> Result<Self::Output, Self::Error> {
        Ok(doc! {})
    }

    fn visit_id(&mut self, id: &str) -> Result<Self::Output, Self::Error> {
        Ok(doc! { ID_FIELD: id })
    }

    fn visit_element(&mut self, id: &str, selector: &ElementSelector) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            ID_FIELD: id,
            format!("{}.{}", selector.array, selector.field): selector.value.clone(),
        })
    }
}


/// Builds the modifier document for an update applied under a filter.
///
/// Returns `None` when the update addresses the matched element but the
/// filter selects no element, in which case nothing may be modified.
///
/// Removal uses `$pull`, which drops every occurrence of the value, whereas
/// the in-memory store drops only the first. The two agree for arrays that
/// never hold the same value twice, such as participant rosters.
pub(crate) fn translate_update(filter: &Filter, update: &Update) -> Option<Document> {
    let path = match update.path() {
        FieldPath::TopLevelField(field) => field.clone(),
        FieldPath::NestedInMatchedElement(field) => {
            format!("{}.$.{}", filter.selector()?.array, field)
        },
    };

    Some(match update {
        Update::Append(_, value) => doc! { "$push": { path: value.clone() } },
        Update::Remove(_, value) => doc! { "$pull": { path: value.clone() } },
    })
}

/// Pipeline producing one `{ _id: <value> }` document per distinct string
/// found at `field`, sorted ascending.
pub(crate) fn distinct_pipeline(field: &str) -> Vec<Document> {
    let reference = format!("${field}");

    vec![
        doc! { "$unwind": reference.clone() },
        doc! { "$match": { field: { "$type": "string" } } },
        doc! { "$group": { ID_FIELD: reference } },
        doc! { "$sort": { ID_FIELD: 1 } },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters() {
        assert_eq!(MongoFilterTranslator::translate(&Filter::all()).unwrap(), doc! {});
        assert_eq!(
            MongoFilterTranslator::translate(&Filter::by_id("Chess Club")).unwrap(),
            doc! { "_id": "Chess Club" },
        );
        assert_eq!(
            MongoFilterTranslator::translate(
                &Filter::by_element("Chess Club", "sub_activities", "id", "chess_practice")
            ).unwrap(),
            doc! { "_id": "Chess Club", "sub_activities.id": "chess_practice" },
        );
    }

    #[test]
    fn updates() {
        let club = Filter::by_id("Chess Club");
        let practice = Filter::by_element("Chess Club", "sub_activities", "id", "chess_practice");

        assert_eq!(
            translate_update(&club, &Update::append(FieldPath::top_level("participants"), "a@x.edu")),
            Some(doc! { "$push": { "participants": "a@x.edu" } }),
        );
        assert_eq!(
            translate_update(&club, &Update::remove(FieldPath::top_level("participants"), "a@x.edu")),
            Some(doc! { "$pull": { "participants": "a@x.edu" } }),
        );
        assert_eq!(
            translate_update(&practice, &Update::remove(FieldPath::matched_element("participants"), "a@x.edu")),
            Some(doc! { "$pull": { "sub_activities.$.participants": "a@x.edu" } }),
        );
        assert_eq!(
            translate_update(&club, &Update::append(FieldPath::matched_element("participants"), "a@x.edu")),
            None,
        );
    }

    #[test]
    fn distinct_days() {
        assert_eq!(
            distinct_pipeline("schedule_details.days"),
            vec![
                doc! { "$unwind": "$schedule_details.days" },
                doc! { "$match": { "schedule_details.days": { "$type": "string" } } },
                doc! { "$group": { "_id": "$schedule_details.days" } },
                doc! { "$sort": { "_id": 1 } },
            ],
        );
    }
}
