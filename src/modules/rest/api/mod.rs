use message::MessageApi;
use poem_openapi::{OpenApiService, Tags};

use crate::mailclerk_version;

pub mod message;

#[derive(Tags)]
pub enum ApiTags {
    Message,
}

type MailClerkOpenApi = MessageApi;

pub fn create_openapi_service() -> OpenApiService<MailClerkOpenApi, ()> {
    OpenApiService::new(MessageApi, "MailClerkApi", mailclerk_version!())
}
