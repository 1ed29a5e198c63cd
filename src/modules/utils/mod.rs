use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailClerkResult;

pub mod net;
pub mod shutdown;
pub mod tls;

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::MailClerkError::Generic {
            message: $msg,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}

#[macro_export]
macro_rules! encode_mailbox_name {
    ($name:expr) => {{
        utf7_imap::encode_utf7_imap($name.to_string())
    }};
}

#[macro_export]
macro_rules! mailclerk_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

/// Parses a mailbox UID supplied as a request parameter.
pub fn parse_uid(input: &str) -> MailClerkResult<u32> {
    let trimmed = input.trim();
    trimmed.parse::<u32>().map_err(|_| {
        raise_error!(
            format!("Invalid IMAP UID: '{}', must be a numeric string", trimmed),
            ErrorCode::InvalidParameter
        )
    })
}
