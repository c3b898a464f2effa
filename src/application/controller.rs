use super::config::ChartConfig;
use super::scheduler::{UpdateReason, UpdateScheduler};
use crate::domain::chart::{ChartState, CrosshairReading, CrosshairResolver, PriceDomain, Viewport};
use crate::domain::errors::{AppError, DomainError, DomainResult};
use crate::domain::events::{ChartEvent, EventDispatcher, InMemoryEventDispatcher};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{
    DepthAggregator, DepthCurves, MarketDescriptor, OrderBookFeed, PriceLevelSource,
};
use crate::domain::subscription::Subscription;
use crate::{log_debug, log_error, log_info, log_trace, log_warn};
use rust_decimal::Decimal;
use std::rc::Rc;
use std::sync::Arc;

const COMPONENT: LogComponent = LogComponent::Application("ChartController");

/// Result of one frame tick
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Nothing was scheduled
    Idle,
    /// A new chart state was committed
    Committed { version: u64 },
    /// The scheduled work belonged to an older market and was dropped
    Discarded { epoch: u64 },
    /// The recompute failed; the previous state stays displayed
    Failed(DomainError),
}

enum Binding {
    Unbound,
    Bound {
        market: MarketDescriptor,
        feed: Rc<dyn OrderBookFeed>,
        subscription: Subscription,
    },
}

struct Recomputed {
    epoch: u64,
    mid: Decimal,
    curves: DepthCurves,
    viewport: Viewport,
}

/// Orchestrates one depth chart: market binding, scheduled recomputes,
/// zoom and resize input, and crosshair readouts.
///
/// Input mutates a working viewport and schedules a recompute. Readers only
/// ever see the last committed [`ChartState`], which is replaced as a whole.
pub struct ChartController {
    chart_id: String,
    config: ChartConfig,
    aggregator: DepthAggregator,
    resolver: CrosshairResolver,
    scheduler: Rc<UpdateScheduler>,
    events: InMemoryEventDispatcher,
    binding: Binding,
    viewport: Viewport,
    state: Arc<ChartState>,
    last_mid: Decimal,
    cursor: Option<f64>,
    last_reading: Option<CrosshairReading>,
    destroyed: bool,
}

impl ChartController {
    pub fn new(
        chart_id: impl Into<String>,
        config: ChartConfig,
        width: f64,
        height: f64,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let viewport = Viewport::new(width, height, config.axis_height, config.scale_extent)?;
        let chart_id = chart_id.into();
        log_debug!(COMPONENT, "creating chart {} ({}x{})", chart_id, width, height);

        Ok(Self {
            chart_id,
            config,
            aggregator: DepthAggregator::new(),
            resolver: CrosshairResolver::new(),
            scheduler: Rc::new(UpdateScheduler::new()),
            events: InMemoryEventDispatcher::new(),
            binding: Binding::Unbound,
            state: Arc::new(ChartState::unbound(viewport.clone())),
            viewport,
            last_mid: Decimal::ZERO,
            cursor: None,
            last_reading: None,
            destroyed: false,
        })
    }

    /// Attach a market. The previous subscription is disposed before the new
    /// one is created and any work scheduled for the old market goes stale.
    pub fn bind_market(&mut self, market: MarketDescriptor, feed: Rc<dyn OrderBookFeed>) {
        if self.destroyed {
            log_warn!(COMPONENT, "bind_market on destroyed chart {}", self.chart_id);
            return;
        }
        self.release_binding();
        let epoch = self.scheduler.invalidate();
        self.last_mid = Decimal::ZERO;
        self.viewport.clear_domain();

        let scheduler = Rc::clone(&self.scheduler);
        let subscription = feed.subscribe(Box::new(move || {
            scheduler.request(UpdateReason::BookUpdate);
        }));
        let symbol = market.symbol.clone();
        self.binding = Binding::Bound { market: market.clone(), feed, subscription };

        self.replace_state(ChartState {
            version: self.state.version + 1,
            epoch,
            market: Some(market),
            mid: None,
            curves: DepthCurves::empty(),
            viewport: self.viewport.clone(),
        });
        self.scheduler.request(UpdateReason::MarketChange);

        log_info!(COMPONENT, "chart {} bound to {} (epoch {})", self.chart_id, symbol, epoch);
        self.events.publish_chart_event(ChartEvent::MarketChanged {
            chart_id: self.chart_id.clone(),
            market: Some(symbol),
        });
    }

    /// Detach the current market, if any
    pub fn unbind(&mut self) {
        if !self.release_binding() {
            return;
        }
        let epoch = self.scheduler.invalidate();
        self.last_mid = Decimal::ZERO;
        self.viewport.clear_domain();
        let mut state = ChartState::unbound(self.viewport.clone());
        state.version = self.state.version + 1;
        state.epoch = epoch;
        self.replace_state(state);

        log_info!(COMPONENT, "chart {} unbound (epoch {})", self.chart_id, epoch);
        self.events.publish_chart_event(ChartEvent::MarketChanged {
            chart_id: self.chart_id.clone(),
            market: None,
        });
    }

    /// Run the pending recompute, if any. Hosts call this once per display
    /// frame.
    pub fn on_frame(&mut self) -> FrameOutcome {
        if self.destroyed {
            return FrameOutcome::Idle;
        }
        let Some(due) = self.scheduler.take_due() else {
            return FrameOutcome::Idle;
        };
        if !self.scheduler.is_current(due.epoch) {
            log_trace!(COMPONENT, "discarding stale {} from epoch {}", due.reason, due.epoch);
            return FrameOutcome::Discarded { epoch: due.epoch };
        }

        let (market, feed) = match &self.binding {
            Binding::Unbound => return self.commit_unbound(),
            Binding::Bound { market, feed, .. } => (market.clone(), Rc::clone(feed)),
        };
        match self.recompute(feed.as_ref(), due.epoch) {
            Some(Ok(recomputed)) => self.commit(market, recomputed),
            Some(Err(error)) => self.fail(error),
            None => {
                log_warn!(COMPONENT, "feed for {} returned no levels", market.symbol);
                FrameOutcome::Idle
            }
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) -> DomainResult<()> {
        if self.destroyed {
            return Ok(());
        }
        self.viewport.resize(width, height)?;
        self.scheduler.request(UpdateReason::Resize);
        self.events.publish_chart_event(ChartEvent::Resized {
            chart_id: self.chart_id.clone(),
            width,
            height,
        });
        Ok(())
    }

    /// Multiply the zoom scale. Inert while no market is bound.
    pub fn apply_zoom(&mut self, factor: f64) -> DomainResult<PriceDomain> {
        if !self.accepts_input() {
            return Ok(self.viewport.domain());
        }
        let domain = self.viewport.apply_zoom(factor)?;
        self.scheduler.request(UpdateReason::Zoom);
        Ok(domain)
    }

    /// Set an absolute zoom scale. Inert while no market is bound.
    pub fn zoom_to(&mut self, scale: f64) -> DomainResult<PriceDomain> {
        if !self.accepts_input() {
            return Ok(self.viewport.domain());
        }
        let domain = self.viewport.zoom_to(scale)?;
        self.scheduler.request(UpdateReason::Zoom);
        Ok(domain)
    }

    pub fn reset_zoom(&mut self) -> PriceDomain {
        if !self.accepts_input() {
            return self.viewport.domain();
        }
        let domain = self.viewport.reset_zoom();
        self.scheduler.request(UpdateReason::Zoom);
        domain
    }

    /// Resolve the crosshair against the committed state and remember the
    /// cursor so later commits refresh the reading.
    pub fn pointer_move(&mut self, cursor_x: f64) -> CrosshairReading {
        let reading = self.resolver.resolve(&self.state, cursor_x);
        self.cursor = Some(cursor_x);
        self.last_reading = Some(reading);
        reading
    }

    pub fn pointer_leave(&mut self) {
        self.cursor = None;
        self.last_reading = None;
    }

    /// Tear down: cancel pending work and dispose the book subscription.
    /// Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            log_trace!(COMPONENT, "chart {} already destroyed", self.chart_id);
            return;
        }
        self.destroyed = true;
        self.scheduler.cancel();
        self.release_binding();
        self.pointer_leave();

        log_info!(COMPONENT, "chart {} destroyed", self.chart_id);
        self.events.publish_chart_event(ChartEvent::Destroyed { chart_id: self.chart_id.clone() });
    }

    /// Register a lifecycle event handler; dispose the handle to remove it
    pub fn subscribe_events<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ChartEvent) + 'static,
    {
        self.events.subscribe_to_chart_events(handler)
    }

    pub fn chart_id(&self) -> &str {
        &self.chart_id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Last committed state
    pub fn state(&self) -> Arc<ChartState> {
        Arc::clone(&self.state)
    }

    /// Working viewport, including input not yet committed
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn market(&self) -> Option<&MarketDescriptor> {
        match &self.binding {
            Binding::Bound { market, .. } => Some(market),
            Binding::Unbound => None,
        }
    }

    pub fn cursor(&self) -> Option<f64> {
        self.cursor
    }

    pub fn last_reading(&self) -> Option<CrosshairReading> {
        self.last_reading
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound { .. })
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn has_pending_update(&self) -> bool {
        self.scheduler.is_pending()
    }

    fn accepts_input(&self) -> bool {
        !self.destroyed && self.is_bound()
    }

    /// Dispose the active subscription. Returns whether a market was bound.
    fn release_binding(&mut self) -> bool {
        match std::mem::replace(&mut self.binding, Binding::Unbound) {
            Binding::Bound { market, mut subscription, .. } => {
                subscription.dispose();
                log_debug!(COMPONENT, "released book subscription for {}", market.symbol);
                true
            }
            Binding::Unbound => false,
        }
    }

    fn recompute(
        &self,
        feed: &dyn OrderBookFeed,
        epoch: u64,
    ) -> Option<DomainResult<Recomputed>> {
        let mut result = None;
        feed.read_levels(&mut |source| result = Some(self.build(source, epoch)));
        result
    }

    fn build(&self, source: &dyn PriceLevelSource, epoch: u64) -> DomainResult<Recomputed> {
        let mid = self.aggregator.mid_price(source).unwrap_or(self.last_mid);
        let basis = PriceDomain::around(mid, self.config.tolerance)?;

        let mut viewport = self.viewport.clone();
        let domain = viewport.set_domain(basis.lo, basis.hi)?;
        let curves = self.aggregator.build_curves(source, mid, domain)?;
        viewport.set_volume_extent(curves.max_cumulative_base(), self.config.volume_headroom);

        Ok(Recomputed { epoch, mid, curves, viewport })
    }

    fn commit(&mut self, market: MarketDescriptor, recomputed: Recomputed) -> FrameOutcome {
        let Recomputed { epoch, mid, curves, viewport } = recomputed;
        let version = self.state.version + 1;
        let (bid_points, ask_points) = (curves.bids.len(), curves.asks.len());
        self.viewport = viewport.clone();
        self.last_mid = mid;
        self.replace_state(ChartState {
            version,
            epoch,
            market: Some(market),
            mid: Some(mid),
            curves,
            viewport,
        });

        log_debug!(
            COMPONENT,
            "chart {} committed v{} mid {} ({} bid / {} ask points)",
            self.chart_id,
            version,
            mid,
            bid_points,
            ask_points
        );
        self.events.publish_chart_event(ChartEvent::CurvesUpdated {
            chart_id: self.chart_id.clone(),
            version,
            bid_points,
            ask_points,
        });
        FrameOutcome::Committed { version }
    }

    fn commit_unbound(&mut self) -> FrameOutcome {
        let mut state = ChartState::unbound(self.viewport.clone());
        state.version = self.state.version + 1;
        state.epoch = self.scheduler.epoch();
        let version = state.version;
        self.replace_state(state);
        FrameOutcome::Committed { version }
    }

    fn fail(&mut self, error: DomainError) -> FrameOutcome {
        log_error!(COMPONENT, "recompute failed for chart {}: {}", self.chart_id, error);
        self.events.publish_chart_event(ChartEvent::RecomputeFailed {
            chart_id: self.chart_id.clone(),
            error: error.clone(),
        });
        FrameOutcome::Failed(error)
    }

    fn replace_state(&mut self, state: ChartState) {
        self.state = Arc::new(state);
        if let Some(cursor_x) = self.cursor {
            self.last_reading = Some(self.resolver.resolve(&self.state, cursor_x));
        }
    }
}

impl Drop for ChartController {
    fn drop(&mut self) {
        self.destroy();
    }
}
