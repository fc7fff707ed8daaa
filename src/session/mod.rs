//! Tracking session: wires the claim pipeline to the collision schedule
//!
//! One session owns one claim attempt end to end. The claim pipeline runs
//! per pushed fix; the collision engine runs on a fixed interval against a
//! frozen copy of the same path. Both terminal faults (speed violation,
//! territory collision) abort the session atomically: the collision task
//! stops, the path is discarded, and nothing survives into the next
//! session.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::claim::{ClaimEvent, ClaimPhase, ClaimTracker, ValidationOutcome};
use crate::collision::{CollisionEngine, CollisionResult, CollisionSignal, CollisionViolation};
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::{GeoFix, PlayerId, TerritoryId};
use crate::geo;
use crate::territory::{Territory, TerritorySnapshot};

/// Everything the outer layers observe while a session runs
///
/// The engine never talks to the UI or the store directly; it emits these
/// and the session owner decides what to render, upload, or tear down.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    FixAccepted { version: u64, walked_m: f64 },
    FixDropped { distance_m: f64 },
    /// Soft speed cap exceeded; informational only
    SpeedAdvisory { speed_kmh: f64 },
    /// Hard speed cap exceeded; the session has already been aborted
    SpeedViolation { speed_kmh: f64 },
    /// Periodic proximity report from the collision task
    Collision(CollisionSignal),
    /// A collision violation aborted the session
    CollisionAbort(CollisionViolation),
    /// Closure fired and validation ran. On a valid claim the ready-to-
    /// store territory is attached for the persistence collaborator.
    ClaimCompleted {
        outcome: ValidationOutcome,
        territory: Option<Territory>,
    },
    Stopped,
}

/// Refusal or acceptance of a session start
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartOutcome {
    Started,
    /// Standing inside a competitor territory; no session was started
    Blocked(CollisionViolation),
}

struct SessionShared {
    tracker: Mutex<ClaimTracker>,
    snapshot: RwLock<TerritorySnapshot>,
    engine: CollisionEngine,
    self_id: PlayerId,
    events: mpsc::UnboundedSender<SessionEvent>,
}

/// One player's tracking session
///
/// Explicitly constructed with its config, owner id, and territory
/// snapshot; holds no global state. Dropping the session (or calling
/// [`TrackingSession::stop`]) cancels the collision task.
pub struct TrackingSession {
    config: EngineConfig,
    shared: Arc<SessionShared>,
    cancel: Option<watch::Sender<bool>>,
    collision_task: Option<JoinHandle<()>>,
}

impl TrackingSession {
    /// Build a session and hand back the event stream
    pub fn new(
        config: EngineConfig,
        self_id: PlayerId,
        snapshot: TerritorySnapshot,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(SessionShared {
            tracker: Mutex::new(ClaimTracker::new(config.clone())),
            snapshot: RwLock::new(snapshot),
            engine: CollisionEngine::new(config.clone()),
            self_id,
            events,
        });
        let session = Self {
            config,
            shared,
            cancel: None,
            collision_task: None,
        };
        (session, events_rx)
    }

    /// Begin tracking from `origin`
    ///
    /// The start point is checked against the snapshot first; standing
    /// inside a competitor territory refuses the session outright. On
    /// success the origin fix seeds the path and the collision task
    /// starts ticking.
    pub async fn start_at(&mut self, origin: GeoFix) -> Result<StartOutcome> {
        {
            let snapshot = self.shared.snapshot.read().await;
            if let Some(violation) = self.shared.engine.check_start_point(
                origin.point(),
                &snapshot,
                &self.shared.self_id,
            ) {
                info!(?violation, "session start blocked");
                return Ok(StartOutcome::Blocked(violation));
            }
        }

        {
            let mut tracker = self.shared.tracker.lock().await;
            tracker.start()?;
            tracker.ingest(origin);
        }

        self.spawn_collision_task();
        info!(player = ?self.shared.self_id, "tracking session started");
        Ok(StartOutcome::Started)
    }

    /// Feed one raw fix through the claim pipeline
    ///
    /// Fatal pipeline outcomes abort the session before this returns.
    pub async fn push_fix(&mut self, fix: GeoFix) {
        let event = {
            let mut tracker = self.shared.tracker.lock().await;
            tracker.ingest(fix)
        };

        match event {
            ClaimEvent::Accepted { version, advisory } => {
                if let Some(a) = advisory {
                    self.emit(SessionEvent::SpeedAdvisory { speed_kmh: a.speed_kmh });
                }
                let walked_m = self.shared.tracker.lock().await.walked_m();
                self.emit(SessionEvent::FixAccepted { version, walked_m });
            }
            ClaimEvent::Dropped { distance_m } => {
                self.emit(SessionEvent::FixDropped { distance_m });
            }
            ClaimEvent::Aborted { speed_kmh } => {
                // the tracker has already discarded the path
                self.cancel_collision_task().await;
                self.emit(SessionEvent::SpeedViolation { speed_kmh });
            }
            ClaimEvent::Completed(outcome) => {
                let territory = match &outcome {
                    ValidationOutcome::Valid { area_m2, .. } => {
                        self.build_claimed_territory(*area_m2).await
                    }
                    ValidationOutcome::Invalid { .. } => None,
                };
                // claim decided either way; the interval check has nothing
                // left to guard
                self.cancel_collision_task().await;
                self.emit(SessionEvent::ClaimCompleted { outcome, territory });
            }
            ClaimEvent::Ignored => {}
        }
    }

    /// Swap in a freshly fetched territory snapshot
    pub async fn refresh_snapshot(&self, snapshot: TerritorySnapshot) {
        *self.shared.snapshot.write().await = snapshot;
        debug!("territory snapshot refreshed");
    }

    /// Current claim phase
    pub async fn phase(&self) -> ClaimPhase {
        self.shared.tracker.lock().await.phase()
    }

    /// Run one collision pass immediately, outside the interval schedule
    ///
    /// Exposed for callers that tick cooperatively (and for tests); a
    /// violation aborts the session exactly as a scheduled pass would.
    pub async fn run_collision_check_once(&mut self) -> CollisionResult {
        let result = Self::collision_pass(&self.shared).await;
        if matches!(result, CollisionResult::Violation(_)) {
            self.cancel_collision_task().await;
        }
        result
    }

    /// Stop tracking and discard all in-progress state
    ///
    /// Idempotent; safe to call on an already-stopped session.
    pub async fn stop(&mut self) {
        self.cancel_collision_task().await;
        self.shared.tracker.lock().await.reset();
        self.emit(SessionEvent::Stopped);
        info!("tracking session stopped");
    }

    fn emit(&self, event: SessionEvent) {
        // the receiver half may be gone during teardown; that is fine
        let _ = self.shared.events.send(event);
    }

    /// Wrap the validated path into a territory owned by this player
    async fn build_claimed_territory(&self, area_m2: f64) -> Option<Territory> {
        let ring = self.shared.tracker.lock().await.path_snapshot();
        match Territory::new(
            TerritoryId::new(),
            self.shared.self_id.clone(),
            ring,
            area_m2,
        ) {
            Ok(territory) => Some(territory),
            Err(err) => {
                // cannot happen for a path that passed validation
                warn!(%err, "validated path failed territory construction");
                None
            }
        }
    }

    fn spawn_collision_task(&mut self) {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let shared = Arc::clone(&self.shared);
        let interval = self.config.collision_interval();

        self.collision_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the start check just ran; skip the interval's immediate tick
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let result = Self::collision_pass(&shared).await;
                        if matches!(result, CollisionResult::Violation(_)) {
                            break;
                        }
                    }
                    _ = cancel_rx.changed() => break,
                }
            }
        }));
        self.cancel = Some(cancel_tx);
    }

    /// One collision pass over a frozen copy of the live path
    ///
    /// On a violation the session is truncated back to idle here, so the
    /// pipeline stops accepting fixes even before the caller reacts.
    async fn collision_pass(shared: &SessionShared) -> CollisionResult {
        let frozen = shared.tracker.lock().await.path_snapshot();
        let result = {
            let snapshot = shared.snapshot.read().await;
            shared.engine.check_path(&frozen, &snapshot, &shared.self_id)
        };

        match result {
            CollisionResult::Clear { severity, nearest_m } => {
                let _ = shared
                    .events
                    .send(SessionEvent::Collision(CollisionSignal::clear(severity, nearest_m)));
            }
            CollisionResult::Violation(violation) => {
                warn!(?violation, "collision violation, aborting session");
                shared.tracker.lock().await.reset();
                let _ = shared.events.send(SessionEvent::CollisionAbort(violation));
            }
        }
        result
    }

    async fn cancel_collision_task(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
        if let Some(task) = self.collision_task.take() {
            let _ = task.await;
        }
    }

    /// Total walked distance of the in-progress claim
    pub async fn walked_m(&self) -> f64 {
        self.shared.tracker.lock().await.walked_m()
    }

    /// Straight-line closure gap from origin to the latest point, if a
    /// path exists
    pub async fn closure_gap_m(&self) -> Option<f64> {
        let tracker = self.shared.tracker.lock().await;
        let path = tracker.path_snapshot();
        match (path.first(), path.last()) {
            (Some(&first), Some(&last)) if path.len() > 1 => {
                Some(geo::distance_m(first, last))
            }
            _ => None,
        }
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
        if let Some(task) = self.collision_task.take() {
            task.abort();
        }
    }
}
