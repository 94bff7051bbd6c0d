use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::unbounded;
use log::{Level, log, warn};

use crate::detail;
use crate::fetcher::Fetch;
use crate::models::{ListingItem, Outcome};

/// Run-level stop signal. Stops workers from taking new items; in-flight fetches finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Skip,
    Failure,
}

impl From<&Outcome> for OutcomeKind {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::Skip { .. } => OutcomeKind::Skip,
            Outcome::Failure { .. } => OutcomeKind::Failure,
        }
    }
}

pub struct Progress<'a> {
    pub completed: usize,
    pub total: usize,
    pub kind: OutcomeKind,
    pub outcome: &'a Outcome,
}

/// Runs every item through the detail fetcher on `parallelism` worker threads.
///
/// Outcomes are returned in completion order. `on_progress` runs on the calling
/// thread once per completed item, so it never holds up a worker. Items not yet
/// taken when `cancel` fires are left out of the result.
pub fn run_all<P>(
    fetcher: &dyn Fetch,
    items: &[ListingItem],
    parallelism: usize,
    cancel: &CancelToken,
    mut on_progress: P,
) -> Vec<Outcome>
where
    P: FnMut(&Progress<'_>),
{
    let total = items.len();
    let workers = parallelism.clamp(1, total.max(1));

    let (job_tx, job_rx) = unbounded::<&ListingItem>();
    for item in items {
        if job_tx.send(item).is_err() {
            break;
        }
    }
    drop(job_tx);

    let (out_tx, out_rx) = unbounded::<Outcome>();

    thread::scope(|s| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let out_tx = out_tx.clone();
            s.spawn(move || {
                while !cancel.is_cancelled() {
                    let Ok(item) = job_rx.recv() else { break };
                    if out_tx.send(run_one(fetcher, item)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(out_tx);

        let mut outcomes = Vec::with_capacity(total);
        for outcome in out_rx.iter() {
            on_progress(&Progress {
                completed: outcomes.len() + 1,
                total,
                kind: OutcomeKind::from(&outcome),
                outcome: &outcome,
            });
            outcomes.push(outcome);
        }

        if outcomes.len() < total {
            warn!("run cancelled: {} of {} items not attempted", total - outcomes.len(), total);
        }
        outcomes
    })
}

fn run_one(fetcher: &dyn Fetch, item: &ListingItem) -> Outcome {
    panic::catch_unwind(AssertUnwindSafe(|| detail::fetch_and_extract(fetcher, item)))
        .unwrap_or_else(|_| Outcome::Failure {
            url: item.url.clone(),
            error: "worker panicked during extraction".to_string(),
        })
}

pub fn log_progress(progress: &Progress<'_>) {
    let &Progress {
        completed,
        total,
        kind,
        outcome,
    } = progress;
    let level = match kind {
        OutcomeKind::Success | OutcomeKind::Skip => Level::Info,
        OutcomeKind::Failure => Level::Error,
    };
    match outcome {
        Outcome::Success(record) => {
            log!(level, "[{completed}/{total}] OK: {} ({})", record.name, record.category)
        }
        Outcome::Skip { url, .. } => log!(level, "[{completed}/{total}] SKIP: {url}"),
        Outcome::Failure { url, error } => {
            log!(level, "[{completed}/{total}] ERROR processing {url}: {error}")
        }
    }
}

/// Cancels `token` on Ctrl-C. Only one handler can be installed per process.
pub fn cancel_on_interrupt(token: &CancelToken) -> Result<(), ctrlc::Error> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        warn!("Interrupted: finishing in-flight items, no new items will start");
        token.cancel();
    })
}
