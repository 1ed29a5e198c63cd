use crate::modules::error::{code::ErrorCode, ApiError, ApiErrorResponse, MailClerkError};
use poem::IntoResponse;
use poem_openapi::payload::Json;

/// Translates poem-level failures into the JSON error envelope. Domain errors
/// already carry their own envelope and pass through untouched.
pub async fn error_handler(error: poem::Error) -> impl poem::IntoResponse {
    if error.is::<MailClerkError>() {
        return error.into_response();
    }

    // Only the error types this surface can produce: unmatched routes,
    // wrong methods, and rejected request payloads or query parameters.
    let code = if error.is::<poem::error::NotFoundError>() {
        Some(ErrorCode::ResourceNotFound)
    } else if error.is::<poem::error::MethodNotAllowedError>() {
        Some(ErrorCode::MethodNotAllowed)
    } else if error.is::<poem::error::ParseJsonError>()
        || error.is::<poem_openapi::error::ParseRequestPayloadError>()
        || error.is::<poem_openapi::error::ContentTypeError>()
        || error.is::<poem_openapi::error::ParseParamError>()
    {
        Some(ErrorCode::InvalidParameter)
    } else {
        None
    };

    if let Some(code) = code {
        let api_error = ApiError::new_with_error_code(error.to_string(), code as u32);
        let mut response = ApiErrorResponse::Generic(code.status(), Json(api_error)).into_response();
        response.set_status(error.status());
        return response;
    }

    if error.has_source() {
        let api_error =
            ApiError::new_with_error_code(error.to_string(), ErrorCode::UnhandledPoemError as u32);
        let mut response =
            ApiErrorResponse::Generic(ErrorCode::UnhandledPoemError.status(), Json(api_error))
                .into_response();
        response.set_status(error.status());
        response
    } else {
        error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::create_api_error_response;
    use poem::error::NotFoundError;
    use poem::http::StatusCode;

    #[tokio::test]
    async fn domain_errors_pass_through_with_their_own_status() {
        let error = create_api_error_response("no such message", ErrorCode::ResourceNotFound);
        let response = error_handler(error).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn routing_errors_are_wrapped_in_the_json_envelope() {
        let error = poem::Error::new(NotFoundError, StatusCode::NOT_FOUND);
        let response = error_handler(error).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response
            .into_body()
            .into_json::<serde_json::Value>()
            .await
            .unwrap();
        assert_eq!(
            body["code"].as_u64(),
            Some(ErrorCode::ResourceNotFound as u32 as u64)
        );
    }
}
