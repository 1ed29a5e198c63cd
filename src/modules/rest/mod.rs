use crate::modules::common::auth::ApiGuard;
use crate::modules::common::error::ErrorCapture;
use crate::modules::common::log::Tracing;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::MailClerkResult;
use crate::modules::rest::public::status::get_status;
use crate::modules::{settings::cli::SETTINGS, utils::shutdown::shutdown_signal};
use crate::raise_error;

use super::error::ApiErrorResponse;
use api::create_openapi_service;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::{EndpointExt, Route, Server};
use std::time::Duration;

pub mod api;
pub mod public;
pub mod response;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

const DESCRIPTION: &str = r#"
    MailClerk is a small self-hosted automation for IMAP mailbox housekeeping.

    - Files messages into folders and applies flags through a simple REST API.
    - Extracts PDF attachments (nested messages included) into a single zip archive.
    - One request, one IMAP session: no queues, no persisted state.
"#;

pub async fn start_http_server() -> MailClerkResult<()> {
    let listener = TcpListener::bind((
        SETTINGS
            .mailclerk_bind_ip
            .clone()
            .unwrap_or("0.0.0.0".into()),
        SETTINGS.mailclerk_http_port as u16,
    ));

    let api_service = create_openapi_service()
        .description(DESCRIPTION)
        .summary("HTTP-triggered IMAP mailbox housekeeping");

    let swagger = api_service.swagger_ui();
    let redoc = api_service.redoc();
    let spec_json = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();

    let open_api_route = Route::new()
        .nest_no_strip("/api/v1", api_service)
        .with(ApiGuard)
        .with(ErrorCapture)
        .with(Tracing);

    let mut cors_origins = SETTINGS.mailclerk_cors_origins.clone();
    if cors_origins.is_empty() {
        cors_origins = ["*".to_string()].into_iter().collect();
    }

    let cors = Cors::new()
        .allow_origins(cors_origins)
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "OPTIONS", "HEAD"])
        .allow_headers(vec!["Content-Type", "Authorization"])
        .expose_headers(vec!["Accept"])
        .max_age(SETTINGS.mailclerk_cors_max_age);

    let route = Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/redoc", redoc)
        .nest("/api-docs/spec.json", spec_json)
        .nest("/api-docs/spec.yaml", spec_yaml)
        .nest("/api/status", get(get_status))
        .nest_no_strip("/api/v1", open_api_route)
        .with(cors)
        .with_if(
            SETTINGS.mailclerk_http_compression_enabled,
            Compression::new(),
        )
        .with(CatchPanic::new());

    let server = Server::new(listener)
        .name("MailClerk API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            shutdown_signal(),
            Some(Duration::from_secs(5)),
        );
    println!(
        "MailClerk API Service is now running on port {}.",
        SETTINGS.mailclerk_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
