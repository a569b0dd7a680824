//! Recurring background jobs. `spawn_all` is called once at startup and
//! detaches every job with `tokio::spawn`.

use crate::services::AuthService;
use std::time::Duration;

const RESET_CODE_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

pub fn spawn_all(auth_service: AuthService) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RESET_CODE_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match auth_service.purge_stale_reset_codes().await {
                Ok(n) if n > 0 => log::info!("Purged {n} stale password reset codes"),
                Ok(_) => {}
                Err(e) => log::error!("Failed to purge password reset codes: {e:?}"),
            }
        }
    });
}
