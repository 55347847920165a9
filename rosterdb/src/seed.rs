//! Typed activity and account documents, and the initial data set.
//!
//! [`init_database`] fills the `activities` and `teachers` collections the
//! first time a store is used. Each collection is seeded only while it is
//! empty, so calling it on every start is safe.

use serde::{Deserialize, Serialize};
use tracing::info;

use rosterdb_core::{
    backend::StoreBackend,
    document::Document,
    error::DocumentStoreResult,
    store::DocumentStore,
};

pub const ACTIVITIES_COLLECTION: &str = "activities";
pub const TEACHERS_COLLECTION: &str = "teachers";

/// Name of the array holding an activity's sub-activities.
pub const SUB_ACTIVITIES_FIELD: &str = "sub_activities";
/// Name of the array holding participant emails, on activities and sub-activities alike.
pub const PARTICIPANTS_FIELD: &str = "participants";
/// Field identifying a sub-activity within its activity.
pub const SUB_ACTIVITY_ID_FIELD: &str = "id";


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDetails {
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubActivity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub schedule_details: ScheduleDetails,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// An extracurricular activity, keyed by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "_id")]
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub schedule_details: ScheduleDetails,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_activities: Vec<SubActivity>,
}

impl Document for Activity {
    fn id(&self) -> &str {
        &self.name
    }

    fn collection_name() -> &'static str {
        ACTIVITIES_COLLECTION
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Admin,
}

/// A staff account, keyed by username. `password` holds a hash, never the
/// plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
}

impl Document for Account {
    fn id(&self) -> &str {
        &self.username
    }

    fn collection_name() -> &'static str {
        TEACHERS_COLLECTION
    }
}

/// How many documents [`init_database`] inserted into each collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seeded {
    pub activities: usize,
    pub teachers: usize,
}

/// Seeds whichever of the two collections is still empty.
///
/// `hash_password` turns each initial account's plain-text password into the
/// stored hash.
pub async fn init_database<B: StoreBackend>(
    store: &DocumentStore<B>,
    hash_password: impl Fn(&str) -> String,
) -> DocumentStoreResult<Seeded> {
    let mut seeded = Seeded::default();

    let activities = store.typed_collection::<Activity>();
    if activities.count().await? == 0 {
        let initial = initial_activities();
        seeded.activities = initial.len();
        activities.insert(initial).await?;
    }

    let teachers = store.typed_collection::<Account>();
    if teachers.count().await? == 0 {
        let initial = initial_teachers(hash_password);
        seeded.teachers = initial.len();
        teachers.insert(initial).await?;
    }

    info!(activities = seeded.activities, teachers = seeded.teachers, "seeded empty collections");

    Ok(seeded)
}

fn schedule(days: &[&str], start_time: &str, end_time: &str) -> ScheduleDetails {
    ScheduleDetails {
        days: strings(days),
        start_time: start_time.to_string(),
        end_time: end_time.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn activity(
    name: &str,
    description: &str,
    schedule_text: &str,
    schedule_details: ScheduleDetails,
    max_participants: u32,
    participants: &[&str],
) -> Activity {
    Activity {
        name: name.to_string(),
        description: description.to_string(),
        schedule: schedule_text.to_string(),
        schedule_details,
        max_participants,
        participants: strings(participants),
        sub_activities: vec![],
    }
}

fn sub_activity(
    id: &str,
    name: &str,
    description: &str,
    schedule_text: &str,
    schedule_details: ScheduleDetails,
    max_participants: u32,
    participants: &[&str],
) -> SubActivity {
    SubActivity {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        schedule: schedule_text.to_string(),
        schedule_details,
        max_participants,
        participants: strings(participants),
    }
}

/// The activity catalogue a fresh store starts with.
pub fn initial_activities() -> Vec<Activity> {
    let mut chess_club = activity(
        "Chess Club",
        "Learn strategies and compete in chess tournaments",
        "Mondays and Fridays, 3:15 PM - 4:45 PM",
        schedule(&["Monday", "Friday"], "15:15", "16:45"),
        12,
        &["michael@mergington.edu", "daniel@mergington.edu"],
    );
    chess_club.sub_activities = vec![
        sub_activity(
            "chess_practice",
            "Chess Practice",
            "Regular practice sessions for all skill levels",
            "Mondays, 3:15 PM - 4:45 PM",
            schedule(&["Monday"], "15:15", "16:45"),
            12,
            &["michael@mergington.edu"],
        ),
        sub_activity(
            "chess_tournament",
            "Chess Tournament",
            "Competitive chess matches",
            "Fridays, 3:15 PM - 4:45 PM",
            schedule(&["Friday"], "15:15", "16:45"),
            8,
            &["daniel@mergington.edu"],
        ),
    ];

    let mut drama_club = activity(
        "Drama Club",
        "Act, direct, and produce plays and performances",
        "Mondays and Wednesdays, 3:30 PM - 5:30 PM",
        schedule(&["Monday", "Wednesday"], "15:30", "17:30"),
        20,
        &["ella@mergington.edu", "scarlett@mergington.edu"],
    );
    drama_club.sub_activities = vec![
        sub_activity(
            "drama_auditions",
            "Auditions",
            "Try out for our upcoming spring play",
            "Mondays, 3:30 PM - 5:30 PM",
            schedule(&["Monday"], "15:30", "17:30"),
            20,
            &["ella@mergington.edu"],
        ),
        sub_activity(
            "drama_rehearsals",
            "Rehearsals",
            "Practice for the spring play performance",
            "Wednesdays, 3:30 PM - 5:30 PM",
            schedule(&["Wednesday"], "15:30", "17:30"),
            15,
            &["scarlett@mergington.edu"],
        ),
    ];

    vec![
        chess_club,
        activity(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 7:00 AM - 8:00 AM",
            schedule(&["Tuesday", "Thursday"], "07:00", "08:00"),
            20,
            &["emma@mergington.edu", "sophia@mergington.edu"],
        ),
        activity(
            "Morning Fitness",
            "Early morning physical training and exercises",
            "Mondays, Wednesdays, Fridays, 6:30 AM - 7:45 AM",
            schedule(&["Monday", "Wednesday", "Friday"], "06:30", "07:45"),
            30,
            &["john@mergington.edu", "olivia@mergington.edu"],
        ),
        activity(
            "Soccer Team",
            "Join the school soccer team and compete in matches",
            "Tuesdays and Thursdays, 3:30 PM - 5:30 PM",
            schedule(&["Tuesday", "Thursday"], "15:30", "17:30"),
            22,
            &["liam@mergington.edu", "noah@mergington.edu"],
        ),
        activity(
            "Basketball Team",
            "Practice and compete in basketball tournaments",
            "Wednesdays and Fridays, 3:15 PM - 5:00 PM",
            schedule(&["Wednesday", "Friday"], "15:15", "17:00"),
            15,
            &["ava@mergington.edu", "mia@mergington.edu"],
        ),
        activity(
            "Art Club",
            "Explore various art techniques and create masterpieces",
            "Thursdays, 3:15 PM - 5:00 PM",
            schedule(&["Thursday"], "15:15", "17:00"),
            15,
            &["amelia@mergington.edu", "harper@mergington.edu"],
        ),
        drama_club,
        activity(
            "Math Club",
            "Solve challenging problems and prepare for math competitions",
            "Tuesdays, 7:15 AM - 8:00 AM",
            schedule(&["Tuesday"], "07:15", "08:00"),
            10,
            &["james@mergington.edu", "benjamin@mergington.edu"],
        ),
        activity(
            "Debate Team",
            "Develop public speaking and argumentation skills",
            "Fridays, 3:30 PM - 5:30 PM",
            schedule(&["Friday"], "15:30", "17:30"),
            12,
            &["charlotte@mergington.edu", "amelia@mergington.edu"],
        ),
        activity(
            "Weekend Robotics Workshop",
            "Build and program robots in our state-of-the-art workshop",
            "Saturdays, 10:00 AM - 2:00 PM",
            schedule(&["Saturday"], "10:00", "14:00"),
            15,
            &["ethan@mergington.edu", "oliver@mergington.edu"],
        ),
        activity(
            "Science Olympiad",
            "Weekend science competition preparation for regional and state events",
            "Saturdays, 1:00 PM - 4:00 PM",
            schedule(&["Saturday"], "13:00", "16:00"),
            18,
            &["isabella@mergington.edu", "lucas@mergington.edu"],
        ),
        activity(
            "Sunday Chess Tournament",
            "Weekly tournament for serious chess players with rankings",
            "Sundays, 2:00 PM - 5:00 PM",
            schedule(&["Sunday"], "14:00", "17:00"),
            16,
            &["william@mergington.edu", "jacob@mergington.edu"],
        ),
    ]
}

/// The staff accounts a fresh store starts with, passwords run through
/// `hash_password`.
pub fn initial_teachers(hash_password: impl Fn(&str) -> String) -> Vec<Account> {
    [
        ("mrodriguez", "Ms. Rodriguez", "art123", Role::Teacher),
        ("mchen", "Mr. Chen", "chess456", Role::Teacher),
        ("principal", "Principal Martinez", "admin789", Role::Admin),
    ]
        .into_iter()
        .map(|(username, display_name, password, role)| Account {
            username: username.to_string(),
            display_name: display_name.to_string(),
            password: hash_password(password),
            role,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosterdb_core::document::DocumentExt;

    #[test]
    fn activity_documents_are_keyed_by_name() {
        let chess_club = initial_activities().remove(0);
        let document = chess_club.to_bson_document().unwrap();

        assert_eq!(document.get_str("_id").unwrap(), "Chess Club");
        assert!(document.get("name").is_none());
        assert_eq!(document.get_array("sub_activities").unwrap().len(), 2);
        assert_eq!(Activity::from_bson_document(document).unwrap(), chess_club);
    }

    #[test]
    fn activities_without_sub_activities_omit_the_field() {
        let math_club = initial_activities()
            .into_iter()
            .find(|activity| activity.name == "Math Club")
            .unwrap();
        let document = math_club.to_bson_document().unwrap();

        assert!(document.get("sub_activities").is_none());
        assert_eq!(Activity::from_bson_document(document).unwrap(), math_club);
    }

    #[test]
    fn account_documents_carry_username_and_id() {
        let accounts = initial_teachers(|password| format!("hashed:{password}"));
        let document = accounts[2].to_bson_document().unwrap();

        assert_eq!(document.get_str("_id").unwrap(), "principal");
        assert_eq!(document.get_str("username").unwrap(), "principal");
        assert_eq!(document.get_str("password").unwrap(), "hashed:admin789");
        assert_eq!(document.get_str("role").unwrap(), "admin");
    }
}
