use crate::modules::message::attachment::extract_pdf_archive;
use crate::modules::message::flag::{modify_flags, FlagMessageRequest};
use crate::modules::message::transfer::{
    transfer_message, MessageTransfer, MessageTransferRequest,
};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::response::{NoAttachmentsResult, OperationResult};
use crate::modules::rest::ApiResult;
use poem_openapi::param::Query;
use poem_openapi::payload::{Attachment, AttachmentType, Json};
use poem_openapi::{ApiResponse, OpenApi};

pub struct MessageApi;

#[derive(ApiResponse)]
pub enum PdfArchiveResponse {
    /// Zip archive bundling every PDF attachment of the message, named
    /// `pdf_attachments_<uid>.zip` in the disposition header.
    #[oai(status = 200, content_type = "application/zip")]
    Archive(Attachment<Vec<u8>>),
    /// The traversal finished without finding a single PDF part.
    #[oai(status = 404)]
    NoAttachments(Json<NoAttachmentsResult>),
}

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::Message")]
impl MessageApi {
    /// Copies a message into another mailbox, creating the target when it
    /// does not exist yet. The original stays where it is.
    #[oai(
        path = "/copy-message",
        method = "post",
        operation_id = "copy_message"
    )]
    async fn copy_message(
        &self,
        /// specifying the message and the target mailbox.
        payload: Json<MessageTransferRequest>,
    ) -> ApiResult<Json<OperationResult>> {
        let filed = transfer_message(&payload.0, MessageTransfer::Copy).await?;
        Ok(Json(OperationResult {
            status: "copied".into(),
            uid: filed.uid,
            target_mailbox: Some(filed.target_mailbox),
        }))
    }

    /// Moves a message into another mailbox, creating the target when it
    /// does not exist yet.
    #[oai(
        path = "/move-message",
        method = "post",
        operation_id = "move_message"
    )]
    async fn move_message(
        &self,
        /// specifying the message and the target mailbox.
        payload: Json<MessageTransferRequest>,
    ) -> ApiResult<Json<OperationResult>> {
        let filed = transfer_message(&payload.0, MessageTransfer::Move).await?;
        Ok(Json(OperationResult {
            status: "moved".into(),
            uid: filed.uid,
            target_mailbox: Some(filed.target_mailbox),
        }))
    }

    /// Updates flags or keywords on a single message.
    #[oai(
        path = "/flag-message",
        method = "post",
        operation_id = "flag_message"
    )]
    async fn flag_message(
        &self,
        /// specifying the message and the flags to modify.
        payload: Json<FlagMessageRequest>,
    ) -> ApiResult<Json<OperationResult>> {
        let uid = modify_flags(payload.0).await?;
        Ok(Json(OperationResult {
            status: "flagged".into(),
            uid,
            target_mailbox: None,
        }))
    }

    /// Extracts every PDF attachment of a message, nested messages included,
    /// into a single zip archive.
    #[oai(
        path = "/message-pdf-archive",
        method = "get",
        operation_id = "fetch_message_pdf_archive"
    )]
    async fn fetch_message_pdf_archive(
        &self,
        /// The UID of the message, as a numeric string.
        uid: Query<String>,
    ) -> ApiResult<PdfArchiveResponse> {
        let id = uid.0.trim().to_string();
        match extract_pdf_archive(&id).await? {
            Some(archive) => {
                let attachment = Attachment::new(archive.content)
                    .attachment_type(AttachmentType::Attachment)
                    .filename(archive.filename);
                Ok(PdfArchiveResponse::Archive(attachment))
            }
            None => Ok(PdfArchiveResponse::NoAttachments(Json(
                NoAttachmentsResult {
                    status: "no_attachments_found".into(),
                    uid: id,
                },
            ))),
        }
    }
}
