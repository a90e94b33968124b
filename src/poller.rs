//! Reconciliation loop - fetch, filter, dedup-check, publish, record.
//!
//! The [`Poller`] owns the fetcher, the publisher, and the ledger, and drives
//! one reconciliation pass at a time. Passes never overlap: a single task
//! awaits each pass to completion before the next timer tick is consumed.
//!
//! Failure policy per pass: a fetch failure ends the pass (retried on the
//! next tick); a publish failure for one repository is logged and the pass
//! moves on, leaving that repository unpublished so a later pass retries it.
//! Nothing that happens after startup terminates the process.

use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::time::{interval, sleep};
use tracing::{debug, error, info, warn};

use crate::github::GitHubClient;
use crate::message::format_message;
use crate::store::PublishedStore;
use crate::telegram::TelegramPublisher;

// Breather between consecutive publishes so a burst of new repositories
// does not trip the channel rate limit head-on.
const PUBLISH_PAUSE: Duration = Duration::from_secs(1);

/// Outcome counts for one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct PassSummary {
    pub fetched: usize,
    pub skipped_no_description: usize,
    pub already_published: usize,
    pub published: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// The polling loop: periodically reconciles the GitHub repository list
/// against the published-repository ledger.
pub struct Poller {
    channel_id: String,
    check_interval: Duration,
    github: GitHubClient,
    telegram: TelegramPublisher,
    store: PublishedStore,
    publish_pause: Duration,
}

impl Poller {
    pub fn new(
        channel_id: impl Into<String>,
        check_interval: Duration,
        github: GitHubClient,
        telegram: TelegramPublisher,
        store: PublishedStore,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            check_interval,
            github,
            telegram,
            store,
            publish_pause: PUBLISH_PAUSE,
        }
    }

    /// Override the pause between consecutive publishes.
    pub fn with_publish_pause(mut self, pause: Duration) -> Self {
        self.publish_pause = pause;
        self
    }

    /// Access the underlying ledger.
    pub fn store(&self) -> &PublishedStore {
        &self.store
    }

    /// Run the loop until a shutdown signal arrives.
    ///
    /// The first pass runs immediately; subsequent passes follow the
    /// configured interval. A pass in flight is never interrupted by the
    /// timer - ticks that fire during a long pass are consumed afterwards.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Poller started, checking every {}s",
            self.check_interval.as_secs()
        );

        let mut timer = interval(self.check_interval);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping poller");
                    break;
                }

                // First tick completes immediately
                _ = timer.tick() => {
                    match self.run_once().await {
                        Ok(summary) => log_pass(&summary),
                        Err(e) => error!("Reconciliation pass failed: {:#}", e),
                    }
                }
            }
        }

        Ok(())
    }

    /// Execute exactly one reconciliation pass.
    ///
    /// Public so callers (and tests) can drive passes deterministically
    /// without waiting on a real timer.
    pub async fn run_once(&mut self) -> Result<PassSummary> {
        let start = Instant::now();
        debug!("Starting reconciliation pass");

        let mut repos = self.github.list_repositories().await?;

        // Newest first; the fetcher itself guarantees no order.
        repos.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut summary = PassSummary {
            fetched: repos.len(),
            ..Default::default()
        };

        for repo in &repos {
            if !repo.has_description() {
                summary.skipped_no_description += 1;
                continue;
            }

            if self.store.exists(repo.id)? {
                summary.already_published += 1;
                continue;
            }

            let body = format_message(repo);
            match self.telegram.send_message(&self.channel_id, &body).await {
                Ok(()) => {
                    // Record immediately after the confirmed send. A crash
                    // between the two causes a duplicate announcement on the
                    // next pass, never a lost one.
                    self.store.record(repo.id, &repo.name, &repo.created_at)?;
                    info!("Published new repository: {} (id {})", repo.name, repo.id);
                    summary.published += 1;

                    sleep(self.publish_pause).await;
                }
                Err(e) => {
                    // Left unrecorded on purpose: the next pass retries it.
                    warn!("Failed to publish {}: {}", repo.name, e);
                    summary.failed += 1;
                }
            }
        }

        summary.duration = start.elapsed();
        Ok(summary)
    }
}

fn log_pass(summary: &PassSummary) {
    info!(
        "Pass completed in {:.2}s: {} fetched, {} published, {} already published, {} without description, {} failed",
        summary.duration.as_secs_f64(),
        summary.fetched,
        summary.published,
        summary.already_published,
        summary.skipped_no_description,
        summary.failed
    );
}
