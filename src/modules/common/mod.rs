use super::error::code::ErrorCode;
use super::error::MailClerkError;
use poem::error::ResponseError;
use poem::{http::StatusCode, Body, Error, Response};
use tracing::error;

pub mod auth;
pub mod error;
pub mod log;
pub mod rustls;

#[inline]
fn create_mailclerk_error(message: &str, code: ErrorCode) -> MailClerkError {
    MailClerkError::Generic {
        message: message.into(),
        location: snafu::Location::default(),
        code,
    }
}

#[inline]
pub fn create_api_error_response(message: &str, code: ErrorCode) -> Error {
    let mailclerk_error = create_mailclerk_error(message, code);
    mailclerk_error.into()
}

impl ResponseError for MailClerkError {
    fn status(&self) -> StatusCode {
        match self {
            MailClerkError::Generic {
                message: _,
                location: _,
                code,
            } => code.status(),
        }
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        match self {
            MailClerkError::Generic {
                message,
                location,
                code,
            } => {
                error!(
                    error_code = *code as u32,
                    error_message = %message,
                    error_location = ?location
                );

                let body = Body::from_json(serde_json::json!({
                    "code": *code as u32,
                    "message": message.to_string(),
                }))
                .unwrap();

                Response::builder().status(self.status()).body(body)
            }
        }
    }
}
