use clap::{builder::ValueParser, Parser, ValueEnum};
use std::{collections::HashSet, path::PathBuf, sync::LazyLock};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

/// How the IMAP connection is secured.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum Encryption {
    /// Implicit TLS (IMAPS, usually port 993).
    Ssl,
    /// Plaintext connection; local testing only.
    None,
}

#[derive(Debug, Parser)]
#[clap(
    name = "mailclerk",
    about = "An HTTP-triggered automation for IMAP mailbox housekeeping:
    file messages into folders, apply flags, and extract PDF attachments as a zip archive.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// mailclerk log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for mailclerk"
    )]
    pub mailclerk_log_level: String,

    /// Enable ANSI logs (default: false)
    #[clap(long, default_value = "false", env, help = "Enable ANSI formatted logs")]
    pub mailclerk_ansi_logs: bool,

    /// Log to file instead of stdout (default: false)
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub mailclerk_log_to_file: bool,

    /// Directory for rolling log files
    #[clap(
        long,
        default_value = "./logs",
        env,
        help = "Set the directory for rolling log files"
    )]
    pub mailclerk_log_dir: PathBuf,

    /// Maximum number of rotated log files to keep (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of rotated log files to keep"
    )]
    pub mailclerk_max_log_files: usize,

    /// The IP address the HTTP server binds to, in IPv4 format (e.g., 192.168.1.1).
    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IP address the HTTP server binds to, in IPv4 format (e.g., 192.168.1.1)",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub mailclerk_bind_ip: Option<String>,

    /// mailclerk HTTP port (default: 15700)
    #[clap(
        long,
        default_value = "15700",
        env,
        help = "Set the HTTP port for mailclerk"
    )]
    pub mailclerk_http_port: i32,

    /// Shared secret required as a bearer token on every /api/v1 request.
    #[clap(
        long,
        env,
        help = "Set the API token that callers must present as a bearer token"
    )]
    pub mailclerk_api_token: String,

    /// CORS allowed origins (default: "*")
    #[clap(
        long,
        default_value = "*",
        env,
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\")",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub mailclerk_cors_origins: HashSet<String>,

    /// CORS max age in seconds (default: 86400)
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the CORS max age in seconds"
    )]
    pub mailclerk_cors_max_age: i32,

    /// Enable HTTP response compression (default: true)
    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable HTTP response compression"
    )]
    pub mailclerk_http_compression_enabled: bool,

    /// Hostname of the IMAP server (e.g., imap.gmail.com)
    #[clap(long, env, help = "Set the hostname of the IMAP server")]
    pub mailclerk_imap_host: String,

    /// IMAP port (default: 993)
    #[clap(long, default_value = "993", env, help = "Set the IMAP port")]
    pub mailclerk_imap_port: u16,

    /// IMAP connection encryption (default: ssl)
    #[clap(
        long,
        value_enum,
        default_value = "ssl",
        env,
        help = "Set the IMAP connection encryption"
    )]
    pub mailclerk_imap_encryption: Encryption,

    /// Login name for the IMAP account
    #[clap(long, env, help = "Set the login name for the IMAP account")]
    pub mailclerk_imap_email: String,

    /// Password for the IMAP account
    #[clap(long, env, help = "Set the password for the IMAP account")]
    pub mailclerk_imap_password: String,

    /// The mailbox operations run against (default: INBOX)
    #[clap(
        long,
        default_value = "INBOX",
        env,
        help = "Set the mailbox that operations run against"
    )]
    pub mailclerk_mailbox: String,

    /// Default target folder for filing messages (default: Archive)
    #[clap(
        long,
        default_value = "Archive",
        env,
        help = "Set the default target folder for filing messages"
    )]
    pub mailclerk_archive_mailbox: String,

    /// Maximum size in bytes of a message fetched for attachment extraction (default: 55 MB)
    #[clap(
        long,
        default_value = "57671680",
        env,
        help = "Set the maximum size in bytes of a fetched message"
    )]
    pub mailclerk_max_message_size: u32,
}

impl Settings {
    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            mailclerk_log_level: "info".to_string(),
            mailclerk_ansi_logs: false,
            mailclerk_log_to_file: false,
            mailclerk_log_dir: "./logs".into(),
            mailclerk_max_log_files: 5,
            mailclerk_bind_ip: Default::default(),
            mailclerk_http_port: 15700,
            mailclerk_api_token: "test-api-token".to_string(),
            mailclerk_cors_origins: Default::default(),
            mailclerk_cors_max_age: 86400,
            mailclerk_http_compression_enabled: true,
            mailclerk_imap_host: "localhost".to_string(),
            mailclerk_imap_port: 143,
            mailclerk_imap_encryption: Encryption::None,
            mailclerk_imap_email: "clerk@example.com".to_string(),
            mailclerk_imap_password: "secret".to_string(),
            mailclerk_mailbox: "INBOX".to_string(),
            mailclerk_archive_mailbox: "Archive".to_string(),
            mailclerk_max_message_size: 57_671_680,
        }
    }
}
