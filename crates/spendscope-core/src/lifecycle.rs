//! Request status per context lane, driving the loading indicator.
//!
//! Each [`ContextKind`] owns one lane. A lane moves `Idle -> Pending` when a
//! fetch or mutation starts, `Pending -> Succeeded | Failed` when it ends, and
//! back to `Idle` only when the consumer acknowledges the terminal state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use spendscope_domain::ContextKind;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Succeeded | RequestStatus::Failed)
    }
}

/// What a consumer observed when acknowledging a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
struct Lane {
    status: RequestStatus,
    in_flight: usize,
    failure: Option<String>,
}

impl Lane {
    fn begin(&mut self) {
        self.status = RequestStatus::Pending;
        self.in_flight += 1;
    }

    fn complete(
        &mut self,
        lane: ContextKind,
        failure: Option<String>,
    ) -> Result<RequestStatus, CoreError> {
        if self.status != RequestStatus::Pending {
            return Err(CoreError::InvalidTransition {
                lane,
                from: self.status,
                action: "complete",
            });
        }
        if failure.is_some() {
            self.failure = failure;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.status = if self.failure.is_some() {
                RequestStatus::Failed
            } else {
                RequestStatus::Succeeded
            };
        }
        Ok(self.status)
    }

    fn acknowledge(&mut self, lane: ContextKind) -> Result<RequestOutcome, CoreError> {
        let outcome = match self.status {
            RequestStatus::Succeeded => RequestOutcome::Succeeded,
            RequestStatus::Failed => {
                RequestOutcome::Failed(self.failure.take().unwrap_or_default())
            }
            from @ (RequestStatus::Idle | RequestStatus::Pending) => {
                return Err(CoreError::InvalidTransition {
                    lane,
                    from,
                    action: "acknowledge",
                })
            }
        };
        *self = Lane::default();
        Ok(outcome)
    }
}

#[derive(Debug, Default)]
struct LaneTable {
    group: Lane,
    period: Lane,
}

impl LaneTable {
    fn lane(&self, kind: ContextKind) -> &Lane {
        match kind {
            ContextKind::Group => &self.group,
            ContextKind::Period => &self.period,
        }
    }

    fn lane_mut(&mut self, kind: ContextKind) -> &mut Lane {
        match kind {
            ContextKind::Group => &mut self.group,
            ContextKind::Period => &mut self.period,
        }
    }
}

/// Shared handle over the lane table. Clones observe the same lanes.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    lanes: Arc<Mutex<LaneTable>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, LaneTable> {
        self.lanes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the start of a request on `lane`.
    ///
    /// Overlapping requests are counted and the lane stays pending until the
    /// last one completes. An unacknowledged failure is carried into the new
    /// request, so the lane still ends `Failed` and `acknowledge` reports it.
    pub fn begin(&self, lane: ContextKind) {
        let mut table = self.table();
        let entry = table.lane_mut(lane);
        if entry.status.is_terminal() {
            debug!(%lane, status = ?entry.status, "request started over an unacknowledged outcome");
            *entry = Lane {
                failure: entry.failure.take(),
                ..Lane::default()
            };
        }
        entry.begin();
        debug!(%lane, in_flight = entry.in_flight, "request pending");
    }

    pub fn succeed(&self, lane: ContextKind) -> Result<RequestStatus, CoreError> {
        self.table().lane_mut(lane).complete(lane, None)
    }

    pub fn fail(
        &self,
        lane: ContextKind,
        message: impl Into<String>,
    ) -> Result<RequestStatus, CoreError> {
        let message = message.into();
        warn!(%lane, error = %message, "request failed");
        self.table().lane_mut(lane).complete(lane, Some(message))
    }

    /// Completes the pending request on `lane` according to `result`.
    pub fn complete<T>(
        &self,
        lane: ContextKind,
        result: &Result<T, CoreError>,
    ) -> Result<RequestStatus, CoreError> {
        match result {
            Ok(_) => self.succeed(lane),
            Err(err) => self.fail(lane, err.to_string()),
        }
    }

    /// Returns a terminal lane to `Idle`, handing back what it ended with.
    pub fn acknowledge(&self, lane: ContextKind) -> Result<RequestOutcome, CoreError> {
        self.table().lane_mut(lane).acknowledge(lane)
    }

    /// Acknowledges every terminal lane and reports what each ended with.
    pub fn acknowledge_all(&self) -> Vec<(ContextKind, RequestOutcome)> {
        let mut table = self.table();
        ContextKind::ALL
            .into_iter()
            .filter_map(|lane| {
                let entry = table.lane_mut(lane);
                if entry.status.is_terminal() {
                    entry.acknowledge(lane).ok().map(|outcome| (lane, outcome))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn status(&self, lane: ContextKind) -> RequestStatus {
        self.table().lane(lane).status
    }

    /// Failure message held by a `Failed` lane until acknowledged.
    pub fn last_failure(&self, lane: ContextKind) -> Option<String> {
        self.table().lane(lane).failure.clone()
    }

    /// True while any lane has a request in flight.
    pub fn is_loading(&self) -> bool {
        let table = self.table();
        ContextKind::ALL
            .into_iter()
            .any(|lane| table.lane(lane).status == RequestStatus::Pending)
    }

    /// True when every lane is back to `Idle`.
    pub fn is_idle(&self) -> bool {
        let table = self.table();
        ContextKind::ALL
            .into_iter()
            .all(|lane| table.lane(lane).status == RequestStatus::Idle)
    }
}
