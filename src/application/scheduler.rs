use crate::domain::logging::LogComponent;
use crate::log_trace;
use std::cell::Cell;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter};

/// What asked for the pending recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, AsRefStr, EnumIter)]
pub enum UpdateReason {
    #[strum(serialize = "book-update")]
    BookUpdate,
    #[strum(serialize = "resize")]
    Resize,
    #[strum(serialize = "zoom")]
    Zoom,
    #[strum(serialize = "market-change")]
    MarketChange,
}

/// Recompute waiting for the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingUpdate {
    /// Reason of the latest request in the burst
    pub reason: UpdateReason,
    /// Market epoch the latest request was made under
    pub epoch: u64,
    /// Requests folded into this one
    pub coalesced: u32,
}

/// Trailing-edge coalescer: any number of requests between two frames
/// collapse into one pending update carrying the last request's reason.
///
/// Interior mutability lets feed callbacks request updates through a shared
/// `Rc` while the controller owns the scheduler.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    pending: Cell<Option<PendingUpdate>>,
    epoch: Cell<u64>,
    cancelled: Cell<bool>,
}

impl UpdateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a recompute for the next frame. Returns `true` when this
    /// request opened a new burst, `false` when it was folded into the
    /// pending one or the scheduler is cancelled.
    pub fn request(&self, reason: UpdateReason) -> bool {
        if self.cancelled.get() {
            return false;
        }
        let epoch = self.epoch.get();
        match self.pending.get() {
            Some(pending) => {
                self.pending.set(Some(PendingUpdate {
                    reason,
                    epoch,
                    coalesced: pending.coalesced.saturating_add(1),
                }));
                false
            }
            None => {
                self.pending.set(Some(PendingUpdate { reason, epoch, coalesced: 1 }));
                true
            }
        }
    }

    /// Take the pending update at a frame boundary
    pub fn take_due(&self) -> Option<PendingUpdate> {
        let due = self.pending.take();
        if let Some(update) = due {
            log_trace!(
                LogComponent::Application("UpdateScheduler"),
                "frame due: {} ({} coalesced)",
                update.reason,
                update.coalesced
            );
        }
        due
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Start a new market epoch. Work scheduled or started under an older
    /// epoch is stale from now on.
    pub fn invalidate(&self) -> u64 {
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        epoch
    }

    /// Drop any pending update and refuse further requests
    pub fn cancel(&self) {
        self.pending.set(None);
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
