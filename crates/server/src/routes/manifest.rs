//! Web app manifest route handler.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::db::Store;
use crate::state::AppState;

/// Serve the web app manifest that makes the front-end installable.
pub async fn webmanifest<S: Store>(State(state): State<AppState<S>>) -> Response {
    let manifest = serde_json::json!({
        "name": state.app_name(),
        "short_name": state.app_name(),
        "start_url": "/",
        "scope": "/",
        "display": "standalone",
        "theme_color": "#1f4e79",
        "background_color": "#ffffff",
        "icons": [
            {
                "src": "/icon.svg",
                "sizes": "any",
                "type": "image/svg+xml"
            }
        ]
    });

    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        manifest.to_string(),
    )
        .into_response()
}
