use crate::api::{ApiClient, ApiError};
use crate::app::App;
use crate::format::unix_now;
use tracing::{info, warn};

use super::action_queue::Action;

pub(super) async fn run_action(action: Action, app: &mut App, client: &ApiClient) {
    app.is_loading = true;
    match action {
        Action::RefreshRecords => refresh_records(app, client).await,
        Action::SaveRecord => save_record(app, client, false).await,
        Action::SaveAsNewRecord => save_record(app, client, true).await,
        Action::DeleteConfirmedRecord => delete_confirmed_record(app, client).await,
    }
    app.is_loading = false;
}

/// Re-fetch the listing for the current filter. On failure the previous
/// listing stays and the error goes to the status line.
pub(crate) async fn refresh_records(app: &mut App, client: &ApiClient) {
    match client.list_records(&app.filter, app.zone).await {
        Ok(list) => {
            info!(count = list.count, "records loaded");
            app.set_records(list);
        }
        Err(e) => {
            warn!(error = %e, "could not load records");
            app.set_status(load_error_message(&e));
        }
    }
}

fn load_error_message(e: &ApiError) -> String {
    match e {
        ApiError::Unauthorized(msg) => msg.clone(),
        other => format!("Could not load records: {}", other),
    }
}

async fn save_record(app: &mut App, client: &ApiClient, as_new: bool) {
    let Some((id, input)) = app.prepare_save(as_new, unix_now()) else {
        return;
    };

    match client.save_record(id, &input).await {
        Ok(record) => {
            info!(id = record.id, created = id.is_none(), "record saved");
            app.close_active_record();
            app.set_status(format!("Saved \"{}\"", record.name));
            refresh_records(app, client).await;
        }
        Err(e) => {
            warn!(status = ?e.status(), error = %e, "save failed");
            app.active_record_failed(e.to_string());
        }
    }
}

async fn delete_confirmed_record(app: &mut App, client: &ApiClient) {
    let Some(id) = app.pending_delete_id() else {
        return;
    };

    match client.delete_record(id).await {
        Ok(record) => {
            info!(id, "record deleted");
            app.close_active_record();
            app.set_status(format!("Deleted \"{}\"", record.name));
            refresh_records(app, client).await;
        }
        Err(e) => {
            warn!(id, status = ?e.status(), error = %e, "delete failed");
            app.active_record_failed(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dev_backend::DevBackend;
    use crate::app::test_support::{record, test_app};
    use crate::app::{EditField, View};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dev_client(records: Vec<crate::types::Record>) -> ApiClient {
        ApiClient::with_dev_backend(DevBackend::with_records(records)).unwrap()
    }

    #[tokio::test]
    async fn refresh_replaces_listing() {
        let client = dev_client(vec![
            record(1, "older", 1_000, Some(2_000)),
            record(2, "newer", 5_000, Some(6_000)),
        ]);
        let mut app = test_app(Vec::new());
        run_action(Action::RefreshRecords, &mut app, &client).await;
        let ids: Vec<i64> = app.data.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(app.focused_index, Some(0));
        assert!(!app.is_loading);
    }

    #[tokio::test]
    async fn saving_new_record_creates_closes_and_refetches() {
        let client = dev_client(Vec::new());
        let mut app = test_app(Vec::new());
        app.create_record(unix_now());
        app.active_record_input_char('x', unix_now());

        run_action(Action::SaveRecord, &mut app, &client).await;

        assert!(app.active_record.is_none());
        assert_eq!(app.data.records.len(), 1);
        assert_eq!(app.data.records[0].name, "x");
    }

    #[tokio::test]
    async fn save_as_new_keeps_the_original() {
        let now = unix_now();
        let client = dev_client(vec![record(1, "orig", now - 600, Some(now - 60))]);
        let mut app = test_app(Vec::new());
        refresh_records(&mut app, &client).await;
        app.edit_record(now);
        app.active_record_input_char('2', now);

        run_action(Action::SaveAsNewRecord, &mut app, &client).await;

        let mut names: Vec<&str> = app.data.records.iter().map(|r| r.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["orig", "orig2"]);
    }

    #[tokio::test]
    async fn rejected_save_keeps_form_open_with_server_error() {
        let client = dev_client(Vec::new());
        let mut app = test_app(Vec::new());
        app.create_record(unix_now());

        run_action(Action::SaveRecord, &mut app, &client).await;

        let active = app.active_record.as_ref().unwrap();
        let errors = active.errors.as_deref().unwrap();
        assert!(errors.starts_with("422 Unprocessable Entity"), "{errors}");
        assert!(errors.contains("Empty name"));
        assert_eq!(active.focused_field, EditField::Name);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_record() {
        let now = unix_now();
        let client = dev_client(vec![record(3, "gone", now - 120, Some(now - 60))]);
        let mut app = test_app(Vec::new());
        refresh_records(&mut app, &client).await;
        app.edit_record(now);

        run_action(Action::DeleteConfirmedRecord, &mut app, &client).await;
        assert_eq!(app.data.records.len(), 1, "delete needs confirmation");

        app.delete_record();
        assert_eq!(app.current_view(), View::ConfirmDelete);
        run_action(Action::DeleteConfirmedRecord, &mut app, &client).await;

        assert!(app.active_record.is_none());
        assert!(app.data.records.is_empty());
        assert_eq!(app.current_view(), View::Records);
    }

    #[tokio::test]
    async fn failed_delete_returns_to_form_with_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/records/3"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"detail":"Not Found"}"#))
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Some("t".to_string())).unwrap();
        let mut app = test_app(vec![record(3, "x", 0, Some(60))]);
        app.edit_record(100);
        app.delete_record();

        run_action(Action::DeleteConfirmedRecord, &mut app, &client).await;

        assert_eq!(app.current_view(), View::EditRecord);
        assert_eq!(
            app.active_record.as_ref().unwrap().errors.as_deref(),
            Some(r#"404 Not Found: {"detail":"Not Found"}"#)
        );
    }

    #[tokio::test]
    async fn failed_refresh_keeps_listing_and_reports() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/records/"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), None).unwrap();
        let mut app = test_app(vec![record(1, "kept", 0, Some(60))]);

        refresh_records(&mut app, &client).await;

        assert_eq!(app.data.records.len(), 1);
        assert!(app.status_message.as_deref().unwrap().contains("login"));
    }
}
