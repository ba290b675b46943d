use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

use crate::core::Result;
use crate::modules::fees::repositories::FeeRepository;

/// Background sweep that transitions pending fee records past their due
/// date to overdue. Spawned as a tokio task in main.
pub struct OverdueChecker {
    repo: Arc<dyn FeeRepository>,
    period: Duration,
}

impl OverdueChecker {
    pub fn new(repo: Arc<dyn FeeRepository>, period: Duration) -> Self {
        Self { repo, period }
    }

    pub async fn start(self: Arc<Self>) {
        info!(period_secs = self.period.as_secs(), "Starting overdue sweep");

        let mut ticker = interval(self.period);

        loop {
            ticker.tick().await;

            match self.check_once().await {
                Ok(count) => {
                    if count > 0 {
                        info!(marked_overdue = count, "Overdue records processed");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Overdue sweep failed");
                }
            }
        }
    }

    /// One sweep pass; separated out so it can be driven directly in tests.
    pub async fn check_once(&self) -> Result<u64> {
        let today = chrono::Utc::now().date_naive();
        self.repo.mark_overdue(today).await
    }
}
