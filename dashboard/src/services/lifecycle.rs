//! Simulated processing backend
//!
//! Stands in for an external job queue: every processing audience gets a
//! one-shot activation timer, and a recurring ticker bumps the reach of a
//! random active audience. Timers are keyed by audience id and cancelled on
//! delete or teardown, so nothing mutates the store after shutdown.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use shared::{AudienceEvent, AudienceId, AudiencePatch, ProcessId, process_debug, process_info};

use crate::config::LifecycleTiming;
use crate::state::DashboardState;

type PendingMap = HashMap<AudienceId, CancellationToken>;
type PendingTimers = Arc<Mutex<PendingMap>>;

/// Timer-driven status and reach updates
#[derive(Clone)]
pub struct LifecycleDriver {
    state: Arc<DashboardState>,
    timing: LifecycleTiming,
    shutdown: CancellationToken,
    pending: PendingTimers,
    live_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Timers never panic while holding the lock; recover the data regardless
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Take ownership of the pending entry for `id` on behalf of a fired timer.
///
/// Returns false when `token` was cancelled or replaced by a newer schedule,
/// in which case the entry (if any) belongs to someone else and stays.
pub(crate) fn claim_pending(pending: &Mutex<PendingMap>, id: AudienceId, token: &CancellationToken) -> bool {
    let mut pending = lock(pending);
    if token.is_cancelled() {
        return false;
    }
    pending.remove(&id);
    true
}

impl LifecycleDriver {
    pub fn new(state: Arc<DashboardState>, timing: LifecycleTiming) -> Self {
        Self {
            state,
            timing,
            shutdown: CancellationToken::new(),
            pending: Arc::new(Mutex::new(HashMap::new())),
            live_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Schedule activation of every audience that is still processing
    pub async fn schedule_processing(&self) -> usize {
        let ids = self.state.processing_ids().await;
        for id in &ids {
            self.schedule_activation(*id);
        }
        ids.len()
    }

    /// Flip `id` to active with a random reach after a random delay.
    ///
    /// The transition is a no-op if the audience is gone by then.
    pub fn schedule_activation(&self, id: AudienceId) {
        if self.shutdown.is_cancelled() {
            return;
        }

        let token = self.shutdown.child_token();
        {
            // Replace and cancel under one lock so a firing timer sees either
            // its own live entry or a cancelled token
            let mut pending = lock(&self.pending);
            if let Some(previous) = pending.insert(id, token.clone()) {
                previous.cancel();
            }
        }

        let delay = Duration::from_millis(rand::thread_rng().gen_range(self.timing.activation_delay_ms()));
        let reach_range = self.timing.activation_reach();
        let state = self.state.clone();
        let pending = self.pending.clone();

        process_debug!(ProcessId::current(), "⏳ Audience {} activates in {:?}", id, delay);

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    // Whoever cancelled already removed the entry
                    process_debug!(ProcessId::current(), "Activation of audience {} cancelled", id);
                }
                _ = tokio::time::sleep(delay) => {
                    if !claim_pending(&pending, id, &token) {
                        process_debug!(ProcessId::current(), "Activation of audience {} superseded", id);
                        return;
                    }
                    let reach = rand::thread_rng().gen_range(reach_range);
                    match state.apply_live_patch(id, &AudiencePatch::activate(reach)).await {
                        Some(_) => process_info!(ProcessId::current(), "✅ Audience {} is now active (reach {})", id, reach),
                        None => process_debug!(ProcessId::current(), "Audience {} no longer awaits activation", id),
                    }
                }
            }
        });
    }

    /// Cancel the pending activation of `id`. Returns whether one existed.
    pub fn cancel(&self, id: AudienceId) -> bool {
        let mut pending = lock(&self.pending);
        match pending.remove(&id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_pending(&self, id: AudienceId) -> bool {
        lock(&self.pending).contains_key(&id)
    }

    /// Start the recurring reach perturbation loop. Idempotent.
    pub fn start_live_updates(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }

        let mut live_task = lock(&self.live_task);
        if live_task.is_some() {
            return;
        }

        self.state.set_live(true);
        let driver = self.clone();
        let period = self.timing.perturb_interval();
        let probability = self.timing.perturb_probability;

        process_info!(
            ProcessId::current(),
            "🔄 Live updates every {:?} (probability {})",
            period,
            probability
        );

        *live_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    biased;
                    _ = driver.shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let fire = rand::thread_rng().gen_bool(probability);
                        if fire {
                            driver.perturb_once().await;
                        }
                    }
                }
            }
            driver.state.set_live(false);
        }));
    }

    /// Add a random delta to the reach of one random active audience
    pub async fn perturb_once(&self) -> Option<AudienceEvent> {
        let active = self.state.active_ids().await;
        let (id, delta) = {
            let mut rng = rand::thread_rng();
            let id = *active.choose(&mut rng)?;
            (id, rng.gen_range(0..=self.timing.perturb_delta_max))
        };

        let event = self.state.bump_reach(id, delta).await;
        if event.is_some() {
            process_debug!(ProcessId::current(), "📈 Audience {} reach +{}", id, delta);
        }
        event
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled() && self.state.is_live()
    }

    /// Cancel every pending activation and stop the perturbation loop
    pub async fn shutdown(&self) {
        self.shutdown.cancel();

        let cancelled: Vec<CancellationToken> = lock(&self.pending).drain().map(|(_, token)| token).collect();
        for token in &cancelled {
            token.cancel();
        }

        let live_task = lock(&self.live_task).take();
        if let Some(handle) = live_task {
            let _ = handle.await;
        }
        self.state.set_live(false);

        process_info!(
            ProcessId::current(),
            "🛑 Lifecycle driver stopped ({} pending activations cancelled)",
            cancelled.len()
        );
    }
}
