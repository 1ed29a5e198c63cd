use crate::{
    modules::{
        error::{code::ErrorCode, MailClerkResult},
        imap::executor::MailSession,
        settings::cli::SETTINGS,
        utils::parse_uid,
    },
    encode_mailbox_name, raise_error,
};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct MessageTransferRequest {
    /// The UID of the message, as a numeric string. Exactly one of `uid` and
    /// `message_id` must be set.
    pub uid: Option<String>,
    /// Full Message-ID header value including angle brackets, resolved to a
    /// UID with a server-side header search.
    pub message_id: Option<String>,
    /// The target mailbox; defaults to the configured archive mailbox.
    /// Created on the server when it does not exist yet.
    pub target_mailbox: Option<String>,
}

impl MessageTransferRequest {
    pub fn validate(&self) -> MailClerkResult<()> {
        match (&self.uid, &self.message_id) {
            (Some(_), Some(_)) => Err(raise_error!(
                "Provide either `uid` or `message_id`, not both".into(),
                ErrorCode::InvalidParameter
            )),
            (None, None) => Err(raise_error!(
                "Either `uid` or `message_id` must be provided".into(),
                ErrorCode::InvalidParameter
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Default, Debug)]
pub enum MessageTransfer {
    #[default]
    Move,
    Copy,
}

/// The resolved outcome of a filing operation.
pub struct FiledMessage {
    pub uid: u32,
    pub target_mailbox: String,
}

pub async fn transfer_message(
    request: &MessageTransferRequest,
    transfer: MessageTransfer,
) -> MailClerkResult<FiledMessage> {
    request.validate()?;

    let source = encode_mailbox_name!(&SETTINGS.mailclerk_mailbox);
    let target_name = request
        .target_mailbox
        .clone()
        .unwrap_or_else(|| SETTINGS.mailclerk_archive_mailbox.clone());
    let target = encode_mailbox_name!(&target_name);

    let mut session = MailSession::connect().await?;
    let result = run_transfer(&mut session, request, &source, &target, &transfer).await;
    session.logout().await;

    let uid = result?;
    Ok(FiledMessage {
        uid,
        target_mailbox: target_name,
    })
}

async fn run_transfer(
    session: &mut MailSession,
    request: &MessageTransferRequest,
    source: &str,
    target: &str,
    transfer: &MessageTransfer,
) -> MailClerkResult<u32> {
    session.select_mailbox(source).await?;
    let uid = resolve_uid(session, request).await?;
    session.create_mailbox_if_missing(target).await?;
    match transfer {
        MessageTransfer::Copy => session.uid_copy(uid, target).await?,
        MessageTransfer::Move => session.uid_move(uid, target).await?,
    }
    Ok(uid)
}

async fn resolve_uid(
    session: &mut MailSession,
    request: &MessageTransferRequest,
) -> MailClerkResult<u32> {
    if let Some(id) = &request.uid {
        return parse_uid(id);
    }
    let message_id = request.message_id.as_deref().ok_or_else(|| {
        raise_error!(
            "Either `uid` or `message_id` must be provided".into(),
            ErrorCode::InvalidParameter
        )
    })?;
    session
        .uid_search_message_id(message_id)
        .await?
        .ok_or_else(|| {
            raise_error!(
                format!("No message found with Message-ID {}", message_id),
                ErrorCode::ResourceNotFound
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_exactly_one_identifier() {
        let empty = MessageTransferRequest::default();
        assert!(empty.validate().is_err());

        let both = MessageTransferRequest {
            uid: Some("12".into()),
            message_id: Some("<a@b>".into()),
            target_mailbox: None,
        };
        assert!(both.validate().is_err());

        let uid_only = MessageTransferRequest {
            uid: Some("12".into()),
            ..Default::default()
        };
        assert!(uid_only.validate().is_ok());

        let message_id_only = MessageTransferRequest {
            message_id: Some("<a@b>".into()),
            ..Default::default()
        };
        assert!(message_id_only.validate().is_ok());
    }
}
