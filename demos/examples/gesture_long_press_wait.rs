// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A long press that waits for a tap to fail.
//!
//! The long press declares `wait_for(tap)`. When its timer elapses while the tap
//! is still undecided it awaits; it is promoted once the finger drifts far enough
//! to fail the tap, or cancelled if the tap wins.
//!
//! Run:
//! - `RUST_LOG=understory_gesture=debug cargo run -p understory_demos --example gesture_long_press_wait`

use kurbo::Rect;
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_gesture::recognizers::{
    LongPressConfig, LongPressRecognizer, TapConfig, TapRecognizer,
};
use understory_gesture::{
    GestureEvent, Handler, HandlerId, Orchestrator, Relations, TouchAction, TouchFrame,
};
use understory_view_tree::{LocalNode, NodeId, Tree};

const TAP: HandlerId = HandlerId(1);
const LONG_PRESS: HandlerId = HandlerId(2);

fn drain(orch: &mut Orchestrator<NodeId>) {
    for event in orch.take_events() {
        if let GestureEvent::StateChange {
            handler,
            state,
            prev,
        } = event
        {
            let who = if handler == TAP { "tap" } else { "long press" };
            println!("  {who:<10} {prev:?} -> {state:?}");
        }
    }
}

fn setup() -> (Tree, Orchestrator<NodeId>) {
    let mut tree = Tree::new();
    let root = tree.insert(
        None,
        LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 200.0, 200.0),
            ..Default::default()
        },
    );
    let mut orch = Orchestrator::new(root);
    orch.register(Handler::new(
        TAP,
        TapRecognizer::new(TapConfig {
            max_distance: 10.0,
            ..Default::default()
        }),
    ))
    .expect("fresh id");
    orch.register(
        Handler::new(
            LONG_PRESS,
            LongPressRecognizer::new(LongPressConfig {
                min_duration_ms: 300,
                max_distance: 50.0,
            }),
        )
        .with_relations(Relations::default().wait_for(TAP)),
    )
    .expect("fresh id");
    orch.attach(TAP, root).expect("registered");
    orch.attach(LONG_PRESS, root).expect("registered");
    (tree, orch)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("== Hold, then drift ==");
    let (tree, mut orch) = setup();
    let touch = |orch: &mut Orchestrator<NodeId>, action, x, t| {
        if let Err(err) = orch.on_touch_event(&tree, &TouchFrame::single(action, x, 100.0, t)) {
            eprintln!("  dispatch error: {err}");
        }
    };
    touch(&mut orch, TouchAction::Down, 100.0, 0);
    orch.advance_time(&tree, 300);
    info!(awaiting = ?orch.awaiting(), "timer elapsed");
    drain(&mut orch);
    touch(&mut orch, TouchAction::Move, 125.0, 340);
    drain(&mut orch);
    touch(&mut orch, TouchAction::Up, 125.0, 400);
    drain(&mut orch);

    println!("== Hold, then lift in place ==");
    let (tree, mut orch) = setup();
    let touch = |orch: &mut Orchestrator<NodeId>, action, x, t| {
        if let Err(err) = orch.on_touch_event(&tree, &TouchFrame::single(action, x, 100.0, t)) {
            eprintln!("  dispatch error: {err}");
        }
    };
    touch(&mut orch, TouchAction::Down, 100.0, 0);
    orch.advance_time(&tree, 300);
    drain(&mut orch);
    touch(&mut orch, TouchAction::Up, 101.0, 350);
    drain(&mut orch);
}
