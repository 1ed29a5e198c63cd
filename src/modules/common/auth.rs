use crate::modules::{error::code::ErrorCode, settings::cli::SETTINGS};
use poem::{
    web::headers::{authorization::Bearer, Authorization, HeaderMapExt},
    Endpoint, Middleware, Request, Result,
};

use super::create_api_error_response;

/// Rejects any request that does not carry the configured API token as a
/// bearer credential, before any mailbox work happens.
pub struct ApiGuard;

pub struct ApiGuardEndpoint<E> {
    ep: E,
}

impl<E: Endpoint> Middleware<E> for ApiGuard {
    type Output = ApiGuardEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ApiGuardEndpoint { ep }
    }
}

impl<E: Endpoint> Endpoint for ApiGuardEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let bearer = req
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.0.token().to_string());

        match bearer {
            Some(token) if token == SETTINGS.mailclerk_api_token => self.ep.call(req).await,
            Some(_) => Err(create_api_error_response(
                "Invalid API token",
                ErrorCode::PermissionDenied,
            )),
            None => Err(create_api_error_response(
                "Missing bearer token",
                ErrorCode::PermissionDenied,
            )),
        }
    }
}
