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
pub struct FlagMessageRequest {
    /// The UID of the message to be flagged, as a numeric string.
    pub uid: String,

    /// The action to be performed on the message flags.
    pub action: FlagAction,

    /// Permanently removes messages flagged `\Deleted` from the mailbox
    /// afterwards.
    pub expunge: Option<bool>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct FlagAction {
    /// Flags or keywords to be added to the message, e.g. `\Seen` or `Filed`.
    pub add: Option<Vec<String>>,

    /// Flags or keywords to be removed from the message.
    pub remove: Option<Vec<String>>,

    /// Flags to overwrite the existing flags on the message.
    pub overwrite: Option<Vec<String>>,
}

impl FlagAction {
    pub fn validate(&self) -> MailClerkResult<()> {
        if self.add.is_none() && self.remove.is_none() && self.overwrite.is_none() {
            return Err(raise_error!(
                "At least one of 'add', 'remove', or 'overwrite' must be set.".into(),
                ErrorCode::InvalidParameter
            ));
        }

        let validate_field = |flags: &Option<Vec<String>>| -> MailClerkResult<()> {
            if let Some(flags) = flags {
                if flags.is_empty() {
                    return Err(raise_error!(
                        "Flag list cannot be empty".into(),
                        ErrorCode::InvalidParameter
                    ));
                }
                for flag in flags {
                    validate_flag(flag)?;
                }
            }
            Ok(())
        };

        validate_field(&self.add)?;
        validate_field(&self.remove)?;
        validate_field(&self.overwrite)?;
        Ok(())
    }

    /// The STORE commands this action expands to, in apply order.
    fn store_queries(&self) -> Vec<String> {
        let mut queries = Vec::new();
        if let Some(flags) = &self.add {
            queries.push(format!("+FLAGS ({})", flags.join(" ")));
        }
        if let Some(flags) = &self.remove {
            queries.push(format!("-FLAGS ({})", flags.join(" ")));
        }
        if let Some(flags) = &self.overwrite {
            queries.push(format!("FLAGS ({})", flags.join(" ")));
        }
        queries
    }
}

/// System flags start with a backslash; keywords are plain IMAP atoms.
fn validate_flag(flag: &str) -> MailClerkResult<()> {
    let body = flag.strip_prefix('\\').unwrap_or(flag);
    let valid = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '$'));
    if !valid {
        return Err(raise_error!(
            format!("Invalid flag or keyword: '{}'", flag),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}

pub async fn modify_flags(request: FlagMessageRequest) -> MailClerkResult<u32> {
    request.action.validate()?;
    let uid = parse_uid(&request.uid)?;

    let mut session = MailSession::connect().await?;
    let result = run_store(&mut session, uid, &request).await;
    session.logout().await;

    result?;
    Ok(uid)
}

async fn run_store(
    session: &mut MailSession,
    uid: u32,
    request: &FlagMessageRequest,
) -> MailClerkResult<()> {
    session
        .select_mailbox(&encode_mailbox_name!(&SETTINGS.mailclerk_mailbox))
        .await?;
    for query in request.action.store_queries() {
        session.uid_flag_store(&uid.to_string(), &query).await?;
    }
    if request.expunge.unwrap_or(false) {
        session.expunge().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_action() {
        assert!(FlagAction::default().validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_flags() {
        let action = FlagAction {
            add: Some(vec!["has space".into()]),
            ..Default::default()
        };
        assert!(action.validate().is_err());

        let action = FlagAction {
            add: Some(vec!["(paren)".into()]),
            ..Default::default()
        };
        assert!(action.validate().is_err());
    }

    #[test]
    fn store_queries_follow_apply_order() {
        let action = FlagAction {
            add: Some(vec!["\\Seen".into(), "Filed".into()]),
            remove: Some(vec!["\\Flagged".into()]),
            overwrite: None,
        };
        assert!(action.validate().is_ok());
        assert_eq!(
            action.store_queries(),
            vec![
                "+FLAGS (\\Seen Filed)".to_string(),
                "-FLAGS (\\Flagged)".to_string()
            ]
        );
    }
}
