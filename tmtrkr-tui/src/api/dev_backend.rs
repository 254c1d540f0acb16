use crate::api::{ApiError, RecordInput};
use crate::types::{derive_duration, Record, RecordList, RecordQuery, User};
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};
use crate::format::unix_now;

const LIMIT_MAX: usize = 1000;
const DEV_USER: &str = "dev";

/// In-memory stand-in for tmtrkr-api, applying the server's validation rules.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug)]
struct DevStore {
    records: Vec<Record>,
    users: Vec<User>,
}

impl DevStore {
    fn next_record_id(&self) -> i64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    fn user_id(&mut self, name: &str) -> i64 {
        if let Some(user) = self.users.iter().find(|u| u.name == name) {
            return user.id;
        }
        let id = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        self.users.push(User {
            id,
            name: name.to_string(),
        });
        id
    }
}

impl DevBackend {
    pub fn new() -> Self {
        Self::with_records(seed_dev_records(unix_now()))
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            store: Arc::new(Mutex::new(DevStore {
                records,
                users: vec![User {
                    id: 1,
                    name: DEV_USER.to_string(),
                }],
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DevStore> {
        self.store.lock().expect("dev store lock poisoned")
    }

    pub fn list_records(&self, query: RecordQuery) -> RecordList {
        let now = unix_now();
        let store = self.lock();
        let mut records: Vec<Record> = store
            .records
            .iter()
            .filter(|r| r.is_deleted != Some(true))
            .filter(|r| match (query.start_min, r.start) {
                (Some(min), Some(start)) => start >= min,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .filter(|r| match (query.start_max, r.start) {
                (Some(max), Some(start)) => start <= max,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .cloned()
            .map(|r| with_duration(r, now))
            .collect();
        records.sort_by(|a, b| b.start.cmp(&a.start));
        records.truncate(LIMIT_MAX);

        let starts = records.iter().filter_map(|r| r.start);
        let ends = records.iter().filter_map(|r| r.end);
        RecordList {
            count: records.len(),
            duration: Some(records.iter().filter_map(|r| r.duration).sum()),
            start_min: starts.clone().min(),
            start_max: starts.max(),
            end_min: ends.clone().min(),
            end_max: ends.max(),
            query_start_min: query.start_min,
            query_start_max: query.start_max,
            user: store.users.first().cloned(),
            records,
        }
    }

    pub fn create_record(&self, input: &RecordInput) -> Result<Record, ApiError> {
        let input = validate(input)?;
        let mut store = self.lock();
        let user_id = store.user_id(DEV_USER);
        let record = Record {
            id: store.next_record_id(),
            name: input.name,
            tags: Some(input.tags),
            start: Some(input.start),
            end: input.end,
            duration: None,
            is_deleted: Some(false),
            user_id: Some(user_id),
        };
        store.records.push(record.clone());
        Ok(with_duration(record, unix_now()))
    }

    pub fn update_record(&self, id: i64, input: &RecordInput) -> Result<Record, ApiError> {
        let input = validate(input)?;
        let mut store = self.lock();
        let record = store
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(not_found)?;
        record.name = input.name;
        record.tags = Some(input.tags);
        record.start = Some(input.start);
        record.end = input.end;
        Ok(with_duration(record.clone(), unix_now()))
    }

    /// Soft delete, like the server.
    pub fn delete_record(&self, id: i64) -> Result<Record, ApiError> {
        let mut store = self.lock();
        let record = store
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(not_found)?;
        record.is_deleted = Some(true);
        Ok(with_duration(record.clone(), unix_now()))
    }

    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn issue_token(&self, username: &str) -> Result<String, ApiError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ApiError::Unauthorized("Empty user name".to_string()));
        }
        self.lock().user_id(username);
        Ok(format!("dev-token-{}", username))
    }
}

fn with_duration(mut record: Record, now: i64) -> Record {
    record.duration = record
        .start
        .and_then(|start| derive_duration(start, record.end, now))
        .map(|d| d as f64);
    record
}

fn unprocessable(detail: &str) -> ApiError {
    ApiError::Status {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        body: serde_json::json!({ "detail": detail }).to_string(),
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: StatusCode::NOT_FOUND,
        body: serde_json::json!({ "detail": "Not Found" }).to_string(),
    }
}

fn validate(input: &RecordInput) -> Result<RecordInput, ApiError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(unprocessable("Empty name"));
    }
    if input.start == 0 {
        return Err(unprocessable("Empty start"));
    }
    if input.end.is_some_and(|end| end < input.start) {
        return Err(unprocessable("End < Start"));
    }
    Ok(RecordInput {
        start: input.start,
        end: input.end,
        name: name.to_string(),
        tags: clean_tags(&input.tags),
    })
}

/// Lower-case alphanumeric words separated by single spaces.
fn clean_tags(tags: &str) -> String {
    let cleaned: String = tags
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A handful of records over the last two days.
fn seed_dev_records(now: i64) -> Vec<Record> {
    let today = now - now.rem_euclid(86_400);
    let yesterday = today - 86_400;
    let hour = 3600;

    let record = |id: i64, start: i64, end: Option<i64>, name: &str, tags: &str| Record {
        id,
        name: name.to_string(),
        tags: Some(tags.to_string()),
        start: Some(start),
        end,
        duration: None,
        is_deleted: Some(false),
        user_id: Some(1),
    };

    vec![
        record(1, yesterday + 8 * hour, Some(yesterday + 10 * hour), "Planning", "meeting"),
        record(2, yesterday + 10 * hour, Some(yesterday + 12 * hour + 1800), "API refactor", "dev backend"),
        record(3, yesterday + 13 * hour, Some(yesterday + 17 * hour), "Code review", "dev review"),
        record(4, today + 8 * hour, Some(today + 9 * hour + 900), "Standup and triage", "meeting"),
        record(5, today + 9 * hour + 900, None, "Record editor", "dev tui"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, start: i64, end: Option<i64>, tags: &str) -> RecordInput {
        RecordInput {
            start,
            end,
            name: name.to_string(),
            tags: tags.to_string(),
        }
    }

    #[test]
    fn create_cleans_name_and_tags() {
        let backend = DevBackend::with_records(vec![]);
        let created = backend
            .create_record(&input("  Writing  ", 100, Some(200), "  Dev, TUI!!  docs "))
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Writing");
        assert_eq!(created.tags.as_deref(), Some("dev tui docs"));
        assert_eq!(created.duration, Some(100.0));
    }

    #[test]
    fn create_rejects_invalid_input() {
        let backend = DevBackend::with_records(vec![]);
        let empty_name = backend.create_record(&input(" ", 100, None, "")).unwrap_err();
        assert_eq!(empty_name.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert!(empty_name.to_string().contains("Empty name"));

        let reversed = backend
            .create_record(&input("x", 200, Some(100), ""))
            .unwrap_err();
        assert!(reversed.to_string().contains("End < Start"));
        assert!(backend.list_records(RecordQuery::default()).records.is_empty());
    }

    #[test]
    fn listing_is_newest_first_within_bounds_and_skips_deleted() {
        let backend = DevBackend::with_records(vec![]);
        for start in [100, 300, 200, 400] {
            backend
                .create_record(&input("x", start, Some(start + 10), ""))
                .unwrap();
        }
        backend.delete_record(4).unwrap();

        let list = backend.list_records(RecordQuery {
            start_min: Some(150),
            start_max: Some(350),
        });
        assert_eq!(list.records.iter().filter_map(|r| r.start).collect::<Vec<_>>(), vec![300, 200]);
        assert_eq!(list.count, 2);
        assert_eq!(list.duration, Some(20.0));
        assert_eq!(list.start_min, Some(200));
        assert_eq!(list.end_max, Some(310));
        assert_eq!(list.query_start_min, Some(150));
    }

    #[test]
    fn update_and_delete_unknown_ids_are_not_found() {
        let backend = DevBackend::with_records(vec![]);
        let err = backend.update_record(42, &input("x", 1, None, "")).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(backend.delete_record(42).is_err());
    }

    #[test]
    fn token_registers_unknown_users() {
        let backend = DevBackend::with_records(vec![]);
        assert_eq!(backend.issue_token("alice").unwrap(), "dev-token-alice");
        let names: Vec<String> = backend.users().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["dev".to_string(), "alice".to_string()]);
        assert!(backend.issue_token("  ").is_err());
    }
}
