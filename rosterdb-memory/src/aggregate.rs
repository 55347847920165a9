//! Distinct-value aggregation over in-memory documents.

use std::collections::BTreeSet;
use bson::{Bson, Document};


/// Collects the distinct string values found at a dotted field path.
///
/// Intermediate segments must name sub-documents. The value at the end of the
/// path contributes its string elements if it is an array, or itself if it is
/// a string. Anything else, including a missing path, contributes nothing.
pub(crate) struct DistinctAggregator<'p> {
    path: Vec<&'p str>,
    values: BTreeSet<String>,
}

impl<'p> DistinctAggregator<'p> {
    pub fn new(field: &'p str) -> Self {
        Self {
            path: field.split('.').collect(),
            values: BTreeSet::new(),
        }
    }

    pub fn accumulate(&mut self, document: &Document) {
        match lookup(document, &self.path) {
            Some(Bson::Array(items)) => {
                for item in items {
                    if let Bson::String(value) = item {
                        self.values.insert(value.clone());
                    }
                }
            },
            Some(Bson::String(value)) => {
                self.values.insert(value.clone());
            },
            _ => {},
        }
    }

    /// The collected values in ascending order.
    pub fn finish(self) -> Vec<String> {
        self.values.into_iter().collect()
    }

    pub fn aggregate<'d>(field: &'p str, documents: impl IntoIterator<Item = &'d Document>) -> Vec<String> {
        let mut aggregator = DistinctAggregator::new(field);

        for document in documents {
            aggregator.accumulate(document);
        }

        aggregator.finish()
    }
}

fn lookup<'d>(document: &'d Document, path: &[&str]) -> Option<&'d Bson> {
    let (last, parents) = path.split_last()?;
    let mut current = document;

    for segment in parents {
        match current.get(segment) {
            Some(Bson::Document(inner)) => current = inner,
            _ => return None,
        }
    }

    current.get(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn sorted_and_deduplicated() {
        let documents = vec![
            doc! { "_id": "Chess Club", "schedule_details": { "days": ["Monday", "Friday"] } },
            doc! { "_id": "Weekend", "schedule_details": { "days": ["Friday", "Monday", "Saturday"] } },
        ];

        assert_eq!(
            DistinctAggregator::aggregate("schedule_details.days", &documents),
            vec!["Friday", "Monday", "Saturday"],
        );
    }

    #[test]
    fn documents_without_the_path_contribute_nothing() {
        let documents = vec![
            doc! { "_id": "No schedule" },
            doc! { "_id": "Flat schedule", "schedule_details": "Mondays" },
            doc! { "_id": "No days", "schedule_details": { "start_time": "15:15" } },
            doc! { "_id": "Odd days", "schedule_details": { "days": [1, null, "Sunday"] } },
            doc! { "_id": "Single day", "schedule_details": { "days": "Tuesday" } },
        ];

        assert_eq!(
            DistinctAggregator::aggregate("schedule_details.days", &documents),
            vec!["Sunday", "Tuesday"],
        );
    }

    #[test]
    fn empty_collection() {
        assert!(DistinctAggregator::aggregate("schedule_details.days", &Vec::<Document>::new()).is_empty());
    }
}
