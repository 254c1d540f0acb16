use crate::api::ApiClient;
use crate::app::App;
use crate::runtime::refresh_records;

pub async fn initialize_app_state(app: &mut App, client: &ApiClient) {
    app.is_loading = true;
    refresh_records(app, client).await;
    if app.status_message.is_none() {
        let count = app.data.count;
        app.set_status(format!("Loaded {} record{}", count, if count == 1 { "" } else { "s" }));
    }
    app.is_loading = false;
}
