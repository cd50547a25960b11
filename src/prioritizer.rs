//! # Prioritizer
//!
//! Vote-and-rank utility: every candidate is scored, candidates whose score is
//! not strictly positive are dropped, and the survivors come back ordered by
//! descending score. Equal scores keep their input order.
//!
//! Scoring is isolated per candidate. A scorer that returns an error or panics
//! counts as a score of zero, so one misbehaving candidate can neither fail
//! the whole ranking nor delay it beyond its own completion.
//!
//! ```rust
//! use opener_core::prioritizer::prioritize_all;
//!
//! # tokio_test::block_on(async {
//! let ranked = prioritize_all(vec!["a", "bb", "", "ccc"], |candidate| {
//!     let len = candidate.len() as f64;
//!     async move { Ok::<_, std::convert::Infallible>(len) }
//! })
//! .await;
//!
//! let order: Vec<_> = ranked.into_iter().map(|p| p.value).collect();
//! assert_eq!(order, vec!["ccc", "bb", "a"]);
//! # });
//! ```

use futures::future::join_all;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{trace, warn};

/// A candidate paired with the score it received.
#[derive(Debug, Clone, PartialEq)]
pub struct Prioritized<T> {
    pub value: T,
    pub priority: f64,
}

impl<T> Prioritized<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

/// The single acceptance threshold: strictly positive. NaN is rejected.
pub fn is_valid_priority(priority: f64) -> bool {
    priority > 0.0
}

/// Stable sort by descending priority.
pub fn sort_prioritized<T>(items: &mut [Prioritized<T>]) {
    items.sort_by(|a, b| b.priority.total_cmp(&a.priority));
}

/// Score all candidates concurrently and rank the survivors.
///
/// The scoring futures are polled together on the calling task; none of them
/// waits for another to finish. The returned future resolves once every
/// scorer has settled.
pub async fn prioritize_all<T, F, Fut, E>(candidates: Vec<T>, score: F) -> Vec<Prioritized<T>>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<f64, E>>,
    E: fmt::Display,
{
    let scoring = candidates
        .iter()
        .map(|candidate| AssertUnwindSafe(score(candidate)).catch_unwind());
    let outcomes = join_all(scoring).await;

    let scored = candidates
        .into_iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (value, outcome))| {
            let priority = match outcome {
                Ok(Ok(priority)) => priority,
                Ok(Err(error)) => {
                    warn!(candidate = index, error = %error, "Scoring failed, treating as no match");
                    0.0
                }
                Err(_) => {
                    warn!(candidate = index, "Scoring panicked, treating as no match");
                    0.0
                }
            };
            Prioritized { value, priority }
        });

    rank(scored)
}

/// Synchronous counterpart of [`prioritize_all`] with the same contract.
pub fn prioritize_all_sync<T, F, E>(candidates: Vec<T>, score: F) -> Vec<Prioritized<T>>
where
    F: Fn(&T) -> Result<f64, E>,
    E: fmt::Display,
{
    let scored = candidates
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let priority = match catch_unwind(AssertUnwindSafe(|| score(&value))) {
                Ok(Ok(priority)) => priority,
                Ok(Err(error)) => {
                    warn!(candidate = index, error = %error, "Scoring failed, treating as no match");
                    0.0
                }
                Err(_) => {
                    warn!(candidate = index, "Scoring panicked, treating as no match");
                    0.0
                }
            };
            Prioritized { value, priority }
        })
        .collect::<Vec<_>>();

    rank(scored)
}

fn rank<T>(scored: impl IntoIterator<Item = Prioritized<T>>) -> Vec<Prioritized<T>> {
    let mut ranked: Vec<Prioritized<T>> = scored
        .into_iter()
        .filter(|candidate| is_valid_priority(candidate.priority))
        .collect();
    sort_prioritized(&mut ranked);
    trace!(survivors = ranked.len(), "Ranking complete");
    ranked
}
