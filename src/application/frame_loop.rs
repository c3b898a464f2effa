use super::controller::{ChartController, FrameOutcome};
use crate::domain::logging::LogComponent;
use crate::log_debug;
use futures::{Stream, StreamExt, pin_mut};
use std::cell::RefCell;

/// Tally of frame outcomes seen by [`run_frame_loop`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoopStats {
    pub frames: u64,
    pub committed: u64,
    pub discarded: u64,
    pub failed: u64,
    pub idle: u64,
}

impl FrameLoopStats {
    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames += 1;
        match outcome {
            FrameOutcome::Idle => self.idle += 1,
            FrameOutcome::Committed { .. } => self.committed += 1,
            FrameOutcome::Discarded { .. } => self.discarded += 1,
            FrameOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Drive `controller.on_frame()` once per item of `frames` until the stream
/// ends or the controller is destroyed.
///
/// The controller is only borrowed for the duration of each tick, so other
/// tasks on the same executor can feed input between frames.
pub async fn run_frame_loop<S>(controller: &RefCell<ChartController>, frames: S) -> FrameLoopStats
where
    S: Stream,
{
    pin_mut!(frames);
    let mut stats = FrameLoopStats::default();

    while frames.next().await.is_some() {
        let outcome = {
            let mut controller = controller.borrow_mut();
            if controller.is_destroyed() {
                break;
            }
            controller.on_frame()
        };
        stats.record(&outcome);
    }

    log_debug!(
        LogComponent::Application("FrameLoop"),
        "frame loop finished after {} frame(s), {} committed",
        stats.frames,
        stats.committed
    );
    stats
}
