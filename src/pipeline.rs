use crate::dedup::dedup;
use crate::models::{ProfileRecord, RunReport};
use crate::navigator::Navigator;
use crate::persist::Persistence;
use crate::search::SearchDriver;
use chrono::Utc;
use std::future::Future;
use std::io;
use tracing::{error, info, warn};

/// Resolves when `signal` reports a user interrupt. If the signal could not
/// be set up, logs the error and never resolves, so the run goes on.
pub async fn user_interrupt<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("interrupt received"),
        Err(e) => {
            error!(error = %e, "could not listen for interrupts, running to completion");
            std::future::pending::<()>().await
        }
    }
}

/// Query driver, deduplicator and persistence wired in sequence.
pub struct Harvester {
    driver: SearchDriver,
    persistence: Persistence,
}

impl Harvester {
    pub fn new(driver: SearchDriver, persistence: Persistence) -> Self {
        Self {
            driver,
            persistence,
        }
    }

    pub async fn run(&self, navigator: &dyn Navigator) -> RunReport {
        self.run_until(navigator, std::future::pending::<()>()).await
    }

    /// Collects until all queries finish or `interrupt` resolves. Whatever
    /// was collected is deduplicated and saved either way.
    pub async fn run_until<F>(&self, navigator: &dyn Navigator, interrupt: F) -> RunReport
    where
        F: Future,
    {
        let started_at = Utc::now();
        let mut collected: Vec<ProfileRecord> = Vec::new();

        // Interrupt is polled first so a pending Ctrl-C is never starved.
        let interrupted = tokio::select! {
            biased;
            _ = interrupt => {
                warn!("interrupted, saving partial results");
                true
            }
            _ = self.driver.run_all(navigator, &mut collected) => false,
        };

        let total = collected.len();
        let unique = dedup(collected);
        let with_profile_url = unique.iter().filter(|r| r.has_profile_url()).count();
        info!(
            collected = total,
            unique = unique.len(),
            with_profile_url,
            "deduplicated profiles"
        );

        let outcome = self.persistence.save(&unique).await;

        RunReport {
            collected: total,
            unique: unique.len(),
            with_profile_url,
            remote_saved: outcome.remote_saved,
            csv_path: outcome.csv_path,
            interrupted,
            started_at,
            finished_at: Utc::now(),
            records: unique,
        }
    }
}
