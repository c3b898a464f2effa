use crate::domain::errors::DomainResult;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{BookUpdate, OrderBook, OrderBookFeed, PriceLevelSource, Symbol};
use crate::domain::subscription::Subscription;
use crate::log_trace;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;
type ListenerList = RefCell<Vec<(u64, Listener)>>;

/// Order book feed backed by an in-memory book. Every accepted snapshot or
/// update notifies the current subscribers.
pub struct InMemoryBookFeed {
    book: RefCell<OrderBook>,
    listeners: Rc<ListenerList>,
    next_id: Cell<u64>,
}

impl InMemoryBookFeed {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            book: RefCell::new(OrderBook::new(symbol)),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    pub fn replace_snapshot(&self, snapshot: BookUpdate) -> DomainResult<()> {
        self.book.borrow_mut().replace_snapshot(snapshot)?;
        self.notify();
        Ok(())
    }

    pub fn apply_update(&self, update: BookUpdate) -> DomainResult<()> {
        if update.is_empty() {
            return Ok(());
        }
        self.book.borrow_mut().apply_update(update)?;
        self.notify();
        Ok(())
    }

    pub fn clear(&self) {
        self.book.borrow_mut().clear();
        self.notify();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn with_book<R>(&self, read: impl FnOnce(&OrderBook) -> R) -> R {
        read(&self.book.borrow())
    }

    fn notify(&self) {
        // Snapshot so a listener may dispose its own subscription.
        let listeners: Vec<Listener> =
            self.listeners.borrow().iter().map(|(_, listener)| listener.clone()).collect();
        log_trace!(
            LogComponent::Infrastructure("BookFeed"),
            "notifying {} listener(s) for {}",
            listeners.len(),
            self.book.borrow().symbol
        );
        for listener in listeners {
            listener();
        }
    }
}

impl OrderBookFeed for InMemoryBookFeed {
    fn subscribe(&self, on_update: Box<dyn Fn()>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::from(on_update)));

        let listeners: Weak<ListenerList> = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    fn read_levels(&self, read: &mut dyn FnMut(&dyn PriceLevelSource)) {
        let book = self.book.borrow();
        read(&*book);
    }
}
