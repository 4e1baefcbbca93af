//! Review-then-send bracket order workflow.

use crate::store::{HighlightMemory, KeyValueStore};
use backend_api::{ApiError, BracketResult, MarginBackend};
use model::BracketIntent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::info;

/// Errors from the submission workflow.
#[derive(Debug, Error)]
pub enum BracketError {
    /// A submission is already in flight; the second confirm is rejected
    /// before any network call.
    #[error("a submission is already in flight")]
    Busy,

    /// `confirm` was called with no staged intent.
    #[error("no intent staged for confirmation")]
    NothingStaged,

    /// The backend rejected or failed the submission. Partial multi-leg
    /// failures arrive this way; no compensating action is attempted here.
    #[error("submission failed: {0}")]
    Submission(#[from] ApiError),
}

/// Two-phase bracket submission: `propose` stages an intent locally,
/// `confirm` sends it. The split mirrors the UI's review dialog and keeps a
/// live trade one deliberate step away from a click.
///
/// There is exactly one caller, so in-flight protection is a busy flag, not
/// a lock: a `confirm` racing an outstanding one fails fast with
/// [`BracketError::Busy`].
pub struct BracketWorkflow<B: MarginBackend> {
    backend: Arc<B>,
    store: Arc<dyn KeyValueStore>,
    staged: Mutex<Option<BracketIntent>>,
    last_result: Mutex<Option<BracketResult>>,
    last_error: Mutex<Option<String>>,
    in_flight: AtomicBool,
}

/// Clears the busy flag on every exit path out of `confirm`.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: MarginBackend> BracketWorkflow<B> {
    pub fn new(backend: Arc<B>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            store,
            staged: Mutex::new(None),
            last_result: Mutex::new(None),
            last_error: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Stage an intent for review. No network call; replaces any prior
    /// staged intent.
    pub fn propose(&self, intent: BracketIntent) {
        *lock(&self.staged) = Some(intent);
    }

    /// The currently staged intent, if any.
    pub fn staged(&self) -> Option<BracketIntent> {
        lock(&self.staged).clone()
    }

    /// Result of the most recent successful submission.
    pub fn last_result(&self) -> Option<BracketResult> {
        lock(&self.last_result).clone()
    }

    /// Message from the most recent failed submission, cleared on success.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }

    /// True while a confirm is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the staged intent.
    ///
    /// On success the created bracket's identifiers are written into the
    /// store as a pair, overwriting whatever an earlier submission left
    /// there; the open-order board picks them up on its next load.
    pub async fn confirm(&self) -> Result<BracketResult, BracketError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BracketError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let intent = match lock(&self.staged).clone() {
            Some(intent) => intent,
            None => return Err(BracketError::NothingStaged),
        };

        match self.backend.create_bracket_order(&intent).await {
            Ok(result) => {
                *lock(&self.last_error) = None;

                if let Some(oco) = &result.oco_order {
                    let memory = HighlightMemory {
                        list_id: Some(oco.order_id.to_string()),
                        list_client_order_id: oco.client_order_id.clone(),
                    };
                    memory.store(&*self.store);

                    info!(
                        oco_order_id = oco.order_id,
                        oco_client_order_id = oco.client_order_id.as_deref(),
                        "Remembered created bracket for highlighting"
                    );
                }

                *lock(&self.last_result) = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                *lock(&self.last_error) = Some(e.to_string());
                Err(BracketError::Submission(e))
            }
        }
    }
}
