//! One-shot session bootstrap.
//!
//! Runs before the poll loop: mints a device id if none is stored, then
//! either resumes the stored token or performs a fresh login. The caller
//! persists the updated config before polling starts so a crash afterwards
//! does not lose the credential.

use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::app::Result;
use crate::config::AppConfig;
use crate::feed::{FeedClient, HttpFeedClient};

/// Random device identifier in the 64-hex-char form the backend expects.
pub fn generate_device_uid() -> String {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut seed);
    hex::encode(Sha256::digest(seed))
}

/// Build an authenticated client, updating `config` with any newly minted
/// device id or token.
pub async fn establish(config: &mut AppConfig) -> Result<HttpFeedClient> {
    let device_uid = match &config.device_uid {
        Some(uid) => uid.clone(),
        None => {
            let uid = generate_device_uid();
            info!("Generated new device id");
            config.device_uid = Some(uid.clone());
            uid
        }
    };

    let mut client = HttpFeedClient::new(device_uid, config.key_config.clone());
    authenticate(&mut client, config).await?;
    Ok(client)
}

async fn authenticate(client: &mut impl FeedClient, config: &mut AppConfig) -> Result<()> {
    match config.access_token.clone() {
        Some(token) => {
            info!("Logging in with stored token");
            client.login_with_token(&token).await?;
        }
        None => {
            info!("No stored token, requesting a new one");
            let token = client.login(&config.location).await?;
            config.access_token = Some(token);
            info!("Got new token");
        }
    }
    Ok(())
}
