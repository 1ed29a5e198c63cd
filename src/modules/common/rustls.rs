use crate::{
    modules::error::{code::ErrorCode, MailClerkResult},
    raise_error,
};

pub fn install_crypto_provider() -> MailClerkResult<()> {
    rustls::crypto::CryptoProvider::install_default(rustls::crypto::ring::default_provider())
        .map_err(|_| {
            raise_error!(
                "failed to set crypto provider".into(),
                ErrorCode::InternalError
            )
        })
}
