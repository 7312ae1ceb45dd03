use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::debug;

pub struct NotificationRoutes;

impl NotificationRoutes {
    pub fn routes(app_state: AppState) -> Router {
        Router::new().route("/", get(notifications_handler)).with_state(app_state)
    }
}

async fn notifications_handler(State(app_state): State<AppState>) -> Html<String> {
    debug!("GET /notifications");

    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><meta http-equiv=\"refresh\" content=\"{}\"><title>SES {} notifications</title></head>\
         <body><div id=\"{}\">{}</div></body></html>",
        app_state.refresh_in_seconds(),
        app_state.settings.notification_type,
        app_state.settings.node_id,
        app_state.markup.current()
    ))
}
