use bson::{Bson, doc};
use rosterdb::{
    config::StoreConfig,
    memory::InMemoryStore,
    prelude::*,
    seed::{
        Account, Activity, PARTICIPANTS_FIELD, Role, SUB_ACTIVITIES_FIELD, SUB_ACTIVITY_ID_FIELD, Seeded,
        TEACHERS_COLLECTION, ACTIVITIES_COLLECTION, init_database,
    },
};

fn fake_hash(password: &str) -> String {
    format!("hashed:{password}")
}

async fn seeded_store() -> DynDocumentStore {
    let (store, seeded) = rosterdb::open_seeded(&StoreConfig::in_memory(), fake_hash)
        .await
        .unwrap();

    assert_eq!(seeded, Seeded { activities: 12, teachers: 3 });

    store
}

fn sub_activity_filter(activity: &str, sub_activity: &str) -> Filter {
    Filter::by_element(activity, SUB_ACTIVITIES_FIELD, SUB_ACTIVITY_ID_FIELD, sub_activity)
}

#[tokio::test]
async fn in_memory_config_opens_the_fallback() {
    let store = rosterdb::open(&StoreConfig::in_memory()).await.unwrap();

    assert!(rosterdb::is_in_memory(&store));
    assert_eq!(store.collection(ACTIVITIES_COLLECTION).count().await.unwrap(), 0);

    store.shutdown().await.unwrap();
}

#[cfg(not(feature = "mongodb"))]
#[tokio::test]
async fn configured_uri_without_mongodb_support_falls_back() {
    let store = rosterdb::open(&StoreConfig::default()).await.unwrap();

    assert!(rosterdb::is_in_memory(&store));
}

#[tokio::test]
async fn seeding_only_fills_empty_collections() {
    let store = seeded_store().await;

    assert_eq!(store.collection(ACTIVITIES_COLLECTION).count().await.unwrap(), 12);
    assert_eq!(store.collection(TEACHERS_COLLECTION).count().await.unwrap(), 3);

    let again = init_database(&store, fake_hash).await.unwrap();
    assert_eq!(again, Seeded::default());
    assert_eq!(store.collection(ACTIVITIES_COLLECTION).count().await.unwrap(), 12);
}

#[tokio::test]
async fn seeding_can_be_disabled() {
    let (store, seeded) = rosterdb::open_seeded(&StoreConfig::in_memory().with_seed(false), fake_hash)
        .await
        .unwrap();

    assert_eq!(seeded, Seeded::default());
    assert_eq!(store.collection(ACTIVITIES_COLLECTION).count().await.unwrap(), 0);
}

#[tokio::test]
async fn seeding_skips_a_collection_that_already_has_documents() {
    let store = DocumentStore::new(InMemoryStore::new());
    store
        .collection(TEACHERS_COLLECTION)
        .insert(doc! { "_id": "substitute", "username": "substitute" })
        .await
        .unwrap();

    let seeded = init_database(&store, fake_hash).await.unwrap();

    assert_eq!(seeded, Seeded { activities: 12, teachers: 0 });
    assert_eq!(store.collection(TEACHERS_COLLECTION).count().await.unwrap(), 1);
}

#[tokio::test]
async fn lists_activities_in_catalogue_order() {
    let store = seeded_store().await;

    let names = store
        .typed_collection::<Activity>()
        .find_many(&Filter::all())
        .await
        .unwrap()
        .into_iter()
        .map(|activity| activity.name)
        .collect::<Vec<_>>();

    assert_eq!(names.first().map(String::as_str), Some("Chess Club"));
    assert_eq!(names.last().map(String::as_str), Some("Sunday Chess Tournament"));
    assert_eq!(names.len(), 12);
}

#[tokio::test]
async fn distinct_days_cover_the_whole_week() {
    let store = seeded_store().await;

    let days = store
        .collection(ACTIVITIES_COLLECTION)
        .aggregate_distinct_days()
        .await
        .unwrap();

    assert_eq!(
        days,
        vec!["Friday", "Monday", "Saturday", "Sunday", "Thursday", "Tuesday", "Wednesday"],
    );
}

#[tokio::test]
async fn signing_up_for_a_sub_activity() {
    let store = seeded_store().await;
    let activities = store.collection(ACTIVITIES_COLLECTION);

    let result = activities
        .update_one(
            &sub_activity_filter("Chess Club", "chess_practice"),
            &Update::append(FieldPath::matched_element(PARTICIPANTS_FIELD), "a@x.edu"),
        )
        .await
        .unwrap();
    assert_eq!(result.modified_count, 1);

    let chess_club = store
        .typed_collection::<Activity>()
        .find_one("Chess Club")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(chess_club.participants, vec!["michael@mergington.edu", "daniel@mergington.edu"]);
    assert_eq!(
        chess_club.sub_activities[0].participants,
        vec!["michael@mergington.edu", "a@x.edu"],
    );
    assert_eq!(chess_club.sub_activities[1].participants, vec!["daniel@mergington.edu"]);
}

#[tokio::test]
async fn unknown_sub_activity_changes_nothing() {
    let store = seeded_store().await;
    let activities = store.collection(ACTIVITIES_COLLECTION);
    let before = activities.find_many(&Filter::all()).await.unwrap();

    let filter = sub_activity_filter("Chess Club", "chess_blitz");
    let result = activities
        .update_one(&filter, &Update::append(FieldPath::matched_element(PARTICIPANTS_FIELD), "a@x.edu"))
        .await
        .unwrap();

    assert_eq!(result, UpdateResult::UNMODIFIED);
    assert_eq!(activities.find_one(&filter).await.unwrap(), None);
    assert_eq!(activities.find_many(&Filter::all()).await.unwrap(), before);
}

#[tokio::test]
async fn unregistering_twice() {
    let store = seeded_store().await;
    let activities = store.collection(ACTIVITIES_COLLECTION);
    let filter = Filter::by_id("Art Club");
    let remove = Update::remove(FieldPath::top_level(PARTICIPANTS_FIELD), "amelia@mergington.edu");

    assert!(activities.update_one(&filter, &remove).await.unwrap().is_modified());
    assert!(!activities.update_one(&filter, &remove).await.unwrap().is_modified());

    let art_club = activities.find_one(&filter).await.unwrap().unwrap();
    assert_eq!(
        art_club.get_array(PARTICIPANTS_FIELD).unwrap(),
        &vec![Bson::from("harper@mergington.edu")],
    );
}

#[tokio::test]
async fn duplicate_activity_is_rejected() {
    let store = seeded_store().await;

    let result = store
        .collection(ACTIVITIES_COLLECTION)
        .insert(doc! { "_id": "Chess Club", "participants": [] })
        .await;

    assert!(matches!(result, Err(DocumentStoreError::DocumentAlreadyExists(..))));

    let chess_club = store
        .typed_collection::<Activity>()
        .find_one("Chess Club")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(chess_club.sub_activities.len(), 2);
}

#[tokio::test]
async fn accounts_are_keyed_by_username() {
    let store = seeded_store().await;
    let teachers = store.typed_collection::<Account>();

    let principal = teachers.find_one("principal").await.unwrap().unwrap();
    assert_eq!(principal.display_name, "Principal Martinez");
    assert_eq!(principal.password, "hashed:admin789");
    assert_eq!(principal.role, Role::Admin);

    assert!(teachers.find_one("mchen").await.unwrap().is_some());
    assert!(teachers.find_one("nobody").await.unwrap().is_none());
}
