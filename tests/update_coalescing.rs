use market_depth_chart::{
    BookUpdate, ChartConfig, ChartController, ChartEvent, FrameOutcome, InMemoryBookFeed,
    MarketDescriptor, PriceLevel, Subscription, Symbol,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cell::RefCell;
use std::rc::Rc;

fn market(symbol: &str) -> MarketDescriptor {
    MarketDescriptor::new(Symbol::from(symbol), "BTC", "USD")
}

fn feed(symbol: &str) -> Rc<InMemoryBookFeed> {
    let feed = Rc::new(InMemoryBookFeed::new(Symbol::from(symbol)));
    feed.replace_snapshot(BookUpdate::new(
        vec![PriceLevel::new(dec!(100), dec!(2))],
        vec![PriceLevel::new(dec!(101), dec!(1))],
    ))
    .unwrap();
    feed
}

fn controller() -> ChartController {
    ChartController::new("depth", ChartConfig::default(), 800.0, 424.0).unwrap()
}

fn record_events(controller: &ChartController) -> (Rc<RefCell<Vec<ChartEvent>>>, Subscription) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let subscription = controller.subscribe_events(move |event| sink.borrow_mut().push(event.clone()));
    (events, subscription)
}

#[test]
fn burst_of_ticks_recomputes_once() {
    let feed = feed("TEST:BTC-USD");
    let mut controller = controller();
    controller.bind_market(market("TEST:BTC-USD"), feed.clone());
    controller.on_frame();
    let (events, _subscription) = record_events(&controller);

    for i in 1..=50 {
        feed.apply_update(BookUpdate::new(vec![PriceLevel::new(dec!(100), Decimal::from(i))], vec![]))
            .unwrap();
    }
    controller.resize(640.0, 300.0).unwrap();
    controller.apply_zoom(2.0).unwrap();

    assert!(matches!(controller.on_frame(), FrameOutcome::Committed { .. }));
    assert_eq!(controller.on_frame(), FrameOutcome::Idle);

    let updates = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, ChartEvent::CurvesUpdated { .. }))
        .count();
    assert_eq!(updates, 1);
    // The trailing state wins: the last tick's size is what got aggregated.
    assert_eq!(controller.state().curves.bids.total().base, dec!(50));
    assert_eq!(controller.state().viewport.width(), 640.0);
}

#[test]
fn pending_recompute_is_discarded_after_market_change() {
    let feed = feed("TEST:BTC-USD");
    let mut controller = controller();
    controller.bind_market(market("TEST:BTC-USD"), feed.clone());
    controller.on_frame();
    let committed = controller.state();

    feed.apply_update(BookUpdate::new(vec![PriceLevel::new(dec!(100), dec!(9))], vec![]))
        .unwrap();
    controller.unbind();

    assert!(matches!(controller.on_frame(), FrameOutcome::Discarded { .. }));
    assert!(!controller.state().is_bound());
    assert!(controller.state().version > committed.version);
    assert_eq!(feed.listener_count(), 0);
}

#[test]
fn rebinding_commits_only_the_new_market() {
    let first = feed("TEST:BTC-USD");
    let second = Rc::new(InMemoryBookFeed::new(Symbol::from("TEST:ETH-USD")));
    second
        .replace_snapshot(BookUpdate::new(
            vec![PriceLevel::new(dec!(2000), dec!(5))],
            vec![PriceLevel::new(dec!(2002), dec!(5))],
        ))
        .unwrap();
    let mut controller = controller();

    controller.bind_market(market("TEST:BTC-USD"), first.clone());
    first.apply_update(BookUpdate::new(vec![PriceLevel::new(dec!(99), dec!(1))], vec![]))
        .unwrap();
    controller.bind_market(market("TEST:ETH-USD"), second.clone());
    // Ticks from the old feed can no longer reach the controller.
    first.apply_update(BookUpdate::new(vec![PriceLevel::new(dec!(98), dec!(1))], vec![]))
        .unwrap();

    assert!(matches!(controller.on_frame(), FrameOutcome::Committed { .. }));
    let state = controller.state();
    assert_eq!(state.mid, Some(dec!(2001)));
    assert_eq!(state.market.as_ref().map(|m| m.identifier()), Some("TEST:ETH-USD"));
    assert_eq!(first.listener_count(), 0);
    assert_eq!(second.listener_count(), 1);
}

#[test]
fn teardown_cancels_pending_work() {
    let feed = feed("TEST:BTC-USD");
    let mut controller = controller();
    let (events, _subscription) = record_events(&controller);
    controller.bind_market(market("TEST:BTC-USD"), feed.clone());
    assert!(controller.has_pending_update());

    controller.destroy();
    controller.destroy();
    feed.apply_update(BookUpdate::new(vec![PriceLevel::new(dec!(99), dec!(1))], vec![]))
        .unwrap();

    assert_eq!(controller.on_frame(), FrameOutcome::Idle);
    assert!(!controller.has_pending_update());
    assert_eq!(feed.listener_count(), 0);
    let destroyed = events
        .borrow()
        .iter()
        .filter(|event| matches!(event, ChartEvent::Destroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
}

#[test]
fn disposing_twice_is_a_no_op() {
    let feed = feed("TEST:BTC-USD");
    let mut subscription = {
        use market_depth_chart::OrderBookFeed;
        feed.subscribe(Box::new(|| {}))
    };
    subscription.dispose();
    subscription.dispose();
    assert!(subscription.is_disposed());
    assert_eq!(feed.listener_count(), 0);
}
