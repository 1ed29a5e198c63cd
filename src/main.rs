use mimalloc::MiMalloc;
use modules::{
    common::rustls::install_crypto_provider, error::MailClerkResult, logger,
    rest::start_http_server, settings::cli::SETTINGS,
};
use tracing::info;

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
  __  __       _ _  ____ _           _
 |  \/  | __ _(_) |/ ___| | ___ _ __| | __
 | |\/| |/ _` | | | |   | |/ _ \ '__| |/ /
 | |  | | (_| | | | |___| |  __/ |  |   <
 |_|  |_|\__,_|_|_|\____|_|\___|_|  |_|\_\

"#;

#[tokio::main]
async fn main() -> MailClerkResult<()> {
    logger::initialize_logging();
    info!("{}", LOGO);
    info!("Starting mailclerk");
    info!("Version:  {}", mailclerk_version!());
    info!(
        "Watching mailbox '{}' on {}:{}",
        SETTINGS.mailclerk_mailbox, SETTINGS.mailclerk_imap_host, SETTINGS.mailclerk_imap_port
    );

    if let Err(error) = install_crypto_provider() {
        eprintln!("{:?}", error);
        return Err(error);
    }

    start_http_server().await
}
