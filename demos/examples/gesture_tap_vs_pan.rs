// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap versus pan on one button.
//!
//! A tap and a pan share a button. A short press is recognized as a tap; a drag
//! fails the tap and runs the pan. Every notification is printed.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_tap_vs_pan`
//! - `RUST_LOG=understory_gesture=debug cargo run -p understory_demos --example gesture_tap_vs_pan`

use kurbo::{Affine, Rect, Vec2};
use tracing_subscriber::EnvFilter;
use understory_gesture::recognizers::{PanRecognizer, TapRecognizer};
use understory_gesture::{
    GestureEvent, Handler, HandlerId, Orchestrator, TouchAction, TouchFrame,
};
use understory_view_tree::{LocalNode, NodeId, Tree};

const TAP: HandlerId = HandlerId(1);
const PAN: HandlerId = HandlerId(2);

fn name(id: HandlerId) -> &'static str {
    match id {
        TAP => "tap",
        PAN => "pan",
        _ => "?",
    }
}

fn play(orch: &mut Orchestrator<NodeId>, tree: &Tree, frames: &[(TouchAction, f64, f64, u64)]) {
    for &(action, x, y, t) in frames {
        if let Err(err) = orch.on_touch_event(tree, &TouchFrame::single(action, x, y, t)) {
            eprintln!("  dispatch error: {err}");
        }
        for event in orch.take_events() {
            match event {
                GestureEvent::StateChange {
                    handler,
                    state,
                    prev,
                } => println!("  t={t:>4}  {:<4} {prev:?} -> {state:?}", name(handler)),
                GestureEvent::Update { handler, frame } => {
                    if let Some(pos) = frame.action_position() {
                        println!("  t={t:>4}  {:<4} at ({:.0}, {:.0})", name(handler), pos.x, pos.y);
                    }
                }
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new();
    let root = tree.insert(
        None,
        LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 320.0, 480.0),
            ..Default::default()
        },
    );
    let button = tree.insert(
        Some(root),
        LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 120.0, 48.0),
            local_transform: Affine::translate(Vec2::new(100.0, 200.0)),
            ..Default::default()
        },
    );

    let mut orch = Orchestrator::new(root);
    orch.register(Handler::new(PAN, PanRecognizer::default()))
        .expect("fresh id");
    orch.register(Handler::new(TAP, TapRecognizer::default()))
        .expect("fresh id");
    orch.attach(PAN, button).expect("registered");
    orch.attach(TAP, button).expect("registered");

    println!("== Short press ==");
    play(
        &mut orch,
        &tree,
        &[
            (TouchAction::Down, 130.0, 220.0, 0),
            (TouchAction::Move, 133.0, 221.0, 40),
            (TouchAction::Up, 133.0, 221.0, 80),
        ],
    );

    println!("== Drag ==");
    play(
        &mut orch,
        &tree,
        &[
            (TouchAction::Down, 130.0, 220.0, 1_000),
            (TouchAction::Move, 150.0, 222.0, 1_016),
            (TouchAction::Move, 180.0, 224.0, 1_032),
            (TouchAction::Up, 190.0, 224.0, 1_048),
        ],
    );
    assert!(orch.candidates().is_empty(), "both sequences completed");
}
