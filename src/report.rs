use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::models::Outcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemIssue {
    pub url: String,
    pub reason: String,
}

impl ItemIssue {
    fn new(outcome: &Outcome, reason: &str) -> Self {
        Self {
            url: outcome.url().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Per-run counts plus enough detail to retry any single skipped or failed item.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub discovered: usize,
    pub cancelled: bool,
    pub successes: usize,
    pub skips: Vec<ItemIssue>,
    pub failures: Vec<ItemIssue>,
}

impl RunSummary {
    pub fn from_outcomes(
        outcomes: &[Outcome],
        discovered: usize,
        cancelled: bool,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut summary = RunSummary {
            started_at,
            finished_at: Utc::now(),
            discovered,
            cancelled,
            successes: 0,
            skips: Vec::new(),
            failures: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Success(_) => summary.successes += 1,
                Outcome::Skip { reason, .. } => summary.skips.push(ItemIssue::new(outcome, reason)),
                Outcome::Failure { error, .. } => {
                    summary.failures.push(ItemIssue::new(outcome, error))
                }
            }
        }
        summary
    }

    pub fn attempted(&self) -> usize {
        self.successes + self.skips.len() + self.failures.len()
    }

    pub fn log(&self) {
        let elapsed = self.finished_at - self.started_at;
        info!(
            "Run finished in {}s: {} ok, {} skipped, {} failed ({} of {} attempted)",
            elapsed.num_seconds(),
            self.successes,
            self.skips.len(),
            self.failures.len(),
            self.attempted(),
            self.discovered
        );
        if self.cancelled {
            warn!(
                "Run was interrupted; {} items were never dispatched",
                self.discovered.saturating_sub(self.attempted())
            );
        }
        for skip in &self.skips {
            info!("  skipped {}: {}", skip.url, skip.reason);
        }
        for failure in &self.failures {
            warn!("  failed {}: {}", failure.url, failure.reason);
        }
    }
}
