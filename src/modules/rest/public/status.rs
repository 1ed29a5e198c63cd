use crate::mailclerk_version;
use poem::{handler, web::Json, IntoResponse};

#[handler]
pub async fn get_status() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "running",
        "version": mailclerk_version!(),
    }))
}
