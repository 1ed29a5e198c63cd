use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailClerkResult;
use crate::modules::imap::client::Client;
use crate::modules::imap::session::SessionStream;
use crate::modules::settings::cli::SETTINGS;
use crate::raise_error;
use async_imap::types::Fetch;
use async_imap::Session;
use futures::TryStreamExt;
use tracing::{debug, warn};

/// The IMAP query fetching the complete raw message without touching flags.
const BODY_FETCH_COMMAND: &str = "(BODY.PEEK[])";

/// One IMAP session for one request: connect, run the commands the operation
/// needs, then `logout`. There is no pooling and no state shared between
/// requests.
pub struct MailSession {
    session: Session<Box<dyn SessionStream>>,
}

impl MailSession {
    pub async fn connect() -> MailClerkResult<Self> {
        let client = Client::connection(
            &SETTINGS.mailclerk_imap_host,
            SETTINGS.mailclerk_imap_encryption,
            SETTINGS.mailclerk_imap_port,
        )
        .await?;
        let session = client
            .login(
                &SETTINGS.mailclerk_imap_email,
                &SETTINGS.mailclerk_imap_password,
            )
            .await?;
        Ok(Self { session })
    }

    pub async fn select_mailbox(&mut self, mailbox_name: &str) -> MailClerkResult<()> {
        self.session
            .select(mailbox_name)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    /// Read-only variant of select, used on the fetch path.
    pub async fn examine_mailbox(&mut self, mailbox_name: &str) -> MailClerkResult<()> {
        self.session
            .examine(mailbox_name)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    /// CREATE fails on most servers when the mailbox already exists, which is
    /// fine for the filing flow.
    pub async fn create_mailbox_if_missing(&mut self, mailbox_name: &str) -> MailClerkResult<()> {
        if let Err(e) = self.session.create(mailbox_name).await {
            debug!(
                "CREATE {} returned {:#?}, assuming the mailbox exists",
                mailbox_name, e
            );
        }
        Ok(())
    }

    /// Resolves a Message-ID header value to a UID. Returns the lowest UID
    /// when several messages carry the same header.
    pub async fn uid_search_message_id(
        &mut self,
        message_id: &str,
    ) -> MailClerkResult<Option<u32>> {
        let query = format!("HEADER Message-ID \"{}\"", message_id);
        let result = self
            .session
            .uid_search(&query)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(result.into_iter().min())
    }

    pub async fn uid_fetch_full_message(&mut self, uid: u32) -> MailClerkResult<Option<Fetch>> {
        let mut stream = self
            .session
            .uid_fetch(&uid.to_string(), BODY_FETCH_COMMAND)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let fetch = stream
            .try_next()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(fetch)
    }

    pub async fn uid_copy(&mut self, uid: u32, target_mailbox: &str) -> MailClerkResult<()> {
        self.session
            .uid_copy(&uid.to_string(), target_mailbox)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    pub async fn uid_move(&mut self, uid: u32, target_mailbox: &str) -> MailClerkResult<()> {
        self.session
            .uid_mv(&uid.to_string(), target_mailbox)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    /// Runs one UID STORE command, e.g. `+FLAGS (\Seen Filed)`.
    pub async fn uid_flag_store(&mut self, uid_set: &str, query: &str) -> MailClerkResult<()> {
        let list = self
            .session
            .uid_store(uid_set, query)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        let _ = list
            .try_collect::<Vec<Fetch>>()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    pub async fn expunge(&mut self) -> MailClerkResult<()> {
        let _ = self
            .session
            .expunge()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;
        Ok(())
    }

    /// Best-effort release of the server connection; every request path calls
    /// this exactly once, whether the operation succeeded or not.
    pub async fn logout(mut self) {
        if let Err(e) = self.session.logout().await {
            warn!("IMAP logout failed: {:#?}", e);
        }
    }
}
