use crate::domain::errors::DomainError;
use crate::domain::market_data::Symbol;
use crate::domain::subscription::Subscription;
use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::{Rc, Weak};

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// Chart lifecycle notifications. Fire-and-forget, at most once per
/// occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    CurvesUpdated {
        chart_id: String,
        version: u64,
        bid_points: usize,
        ask_points: usize,
    },
    MarketChanged {
        chart_id: String,
        market: Option<Symbol>,
    },
    Resized {
        chart_id: String,
        width: f64,
        height: f64,
    },
    Destroyed {
        chart_id: String,
    },
    RecomputeFailed {
        chart_id: String,
        error: DomainError,
    },
}

impl DomainEvent for ChartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ChartEvent::CurvesUpdated { .. } => "CurvesUpdated",
            ChartEvent::MarketChanged { .. } => "MarketChanged",
            ChartEvent::Resized { .. } => "Resized",
            ChartEvent::Destroyed { .. } => "Destroyed",
            ChartEvent::RecomputeFailed { .. } => "RecomputeFailed",
        }
    }
}

/// Event dispatcher for publishing events
pub trait EventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent);
}

type Handler = Rc<dyn Fn(&ChartEvent)>;
type HandlerList = RefCell<Vec<(u64, Handler)>>;

/// Simple in-memory event dispatcher. Handlers stay registered until their
/// subscription is disposed.
#[derive(Default)]
pub struct InMemoryEventDispatcher {
    handlers: Rc<HandlerList>,
    next_id: Cell<u64>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_to_chart_events<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ChartEvent) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));

        let handlers: Weak<HandlerList> = Rc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                handlers.borrow_mut().retain(|(handler_id, _)| *handler_id != id);
            }
        })
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish_chart_event(&self, event: ChartEvent) {
        // Snapshot so handlers may subscribe or dispose while being called.
        let handlers: Vec<Handler> =
            self.handlers.borrow().iter().map(|(_, handler)| handler.clone()).collect();
        for handler in handlers {
            handler(&event);
        }
    }
}
