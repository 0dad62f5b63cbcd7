// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end arbitration scenarios over an Understory view tree.

use kurbo::{Affine, Rect, Vec2};
use understory_gesture::recognizers::{
    LongPressConfig, LongPressRecognizer, ManualRecognizer, PanRecognizer, TapConfig,
    TapRecognizer,
};
use understory_gesture::{
    GestureEvent, GestureState, Handler, HandlerId, Orchestrator, Pointer, PointerId, Relations,
    TouchAction, TouchFrame,
};
use understory_view_tree::{LocalNode, NodeFlags, NodeId, Tree};

const TAP: HandlerId = HandlerId(1);
const PAN: HandlerId = HandlerId(2);
const LONG_PRESS: HandlerId = HandlerId(3);

struct Scene {
    tree: Tree,
    root: NodeId,
    button: NodeId,
    orch: Orchestrator<NodeId>,
}

impl Scene {
    fn new() -> Self {
        let mut tree = Tree::new();
        let root = tree.insert(
            None,
            LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 300.0, 300.0),
                ..Default::default()
            },
        );
        let button = tree.insert(
            Some(root),
            LocalNode {
                local_bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
                local_transform: Affine::translate(Vec2::new(50.0, 50.0)),
                ..Default::default()
            },
        );
        Self {
            tree,
            root,
            button,
            orch: Orchestrator::new(root),
        }
    }

    fn add(&mut self, handler: Handler<NodeId>, view: NodeId) {
        let id = handler.id();
        self.orch.register(handler).unwrap();
        self.orch.attach(id, view).unwrap();
    }

    fn touch(&mut self, action: TouchAction, x: f64, y: f64, t: u64) -> bool {
        self.orch
            .on_touch_event(&self.tree, &TouchFrame::single(action, x, y, t))
            .unwrap()
    }

    fn changes(&mut self) -> Vec<(HandlerId, GestureState, GestureState)> {
        self.orch
            .take_events()
            .into_iter()
            .filter_map(|e| match e {
                GestureEvent::StateChange {
                    handler,
                    state,
                    prev,
                } => Some((handler, state, prev)),
                GestureEvent::Update { .. } => None,
            })
            .collect()
    }

    fn final_state(
        changes: &[(HandlerId, GestureState, GestureState)],
        id: HandlerId,
    ) -> Option<GestureState> {
        changes
            .iter()
            .rev()
            .find(|(h, _, _)| *h == id)
            .map(|(_, s, _)| *s)
    }
}

#[test]
fn lone_tap_activates_then_ends() {
    let mut s = Scene::new();
    s.add(Handler::new(TAP, TapRecognizer::default()), s.button);

    assert!(s.touch(TouchAction::Down, 60.0, 60.0, 0));
    assert_eq!(s.orch.candidates(), &[TAP]);
    assert!(s.touch(TouchAction::Up, 62.0, 61.0, 90));

    assert_eq!(
        s.changes(),
        vec![
            (TAP, GestureState::Began, GestureState::Undetermined),
            (TAP, GestureState::Active, GestureState::Began),
            (TAP, GestureState::End, GestureState::Active),
        ]
    );
    assert!(s.orch.candidates().is_empty());
    assert!(s.orch.awaiting().is_empty());
}

#[test]
fn short_fast_press_is_a_tap_not_a_pan() {
    let mut s = Scene::new();
    // The pan sees each frame first, so it fails on the up before the tap is promoted.
    s.add(Handler::new(PAN, PanRecognizer::default()), s.button);
    s.add(Handler::new(TAP, TapRecognizer::default()), s.button);

    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.touch(TouchAction::Move, 64.0, 60.0, 20);
    s.touch(TouchAction::Up, 64.0, 60.0, 60);

    let changes = s.changes();
    assert_eq!(Scene::final_state(&changes, PAN), Some(GestureState::Failed));
    assert!(changes.contains(&(TAP, GestureState::Active, GestureState::Began)));
    assert_eq!(Scene::final_state(&changes, TAP), Some(GestureState::End));
    assert!(s.orch.candidates().is_empty());
}

#[test]
fn short_press_cancels_a_pan_that_sees_frames_after_the_tap() {
    let mut s = Scene::new();
    // The tap is promoted on the up before the pan gets to fail.
    s.add(Handler::new(TAP, TapRecognizer::default()), s.button);
    s.add(Handler::new(PAN, PanRecognizer::default()), s.button);

    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.touch(TouchAction::Move, 64.0, 60.0, 20);
    s.touch(TouchAction::Up, 64.0, 60.0, 60);

    assert_eq!(
        s.changes(),
        vec![
            (TAP, GestureState::Began, GestureState::Undetermined),
            (PAN, GestureState::Began, GestureState::Undetermined),
            (PAN, GestureState::Cancelled, GestureState::Began),
            (TAP, GestureState::Active, GestureState::Began),
            (TAP, GestureState::End, GestureState::Active),
        ]
    );
    assert!(s.orch.candidates().is_empty());
}

#[test]
fn drag_fails_the_tap_and_runs_the_pan() {
    let mut s = Scene::new();
    s.add(Handler::new(TAP, TapRecognizer::default()), s.button);
    s.add(Handler::new(PAN, PanRecognizer::default()), s.button);

    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.touch(TouchAction::Move, 90.0, 60.0, 30);
    assert!(s.orch.handler(PAN).unwrap().is_active());
    s.touch(TouchAction::Up, 95.0, 60.0, 60);

    let changes = s.changes();
    assert_eq!(Scene::final_state(&changes, TAP), Some(GestureState::Failed));
    assert_eq!(Scene::final_state(&changes, PAN), Some(GestureState::End));
}

fn tap_and_long_press() -> Scene {
    let mut s = Scene::new();
    s.add(
        Handler::new(
            TAP,
            TapRecognizer::new(TapConfig {
                max_distance: 10.0,
                ..Default::default()
            }),
        ),
        s.button,
    );
    s.add(
        Handler::new(
            LONG_PRESS,
            LongPressRecognizer::new(LongPressConfig {
                min_duration_ms: 300,
                max_distance: 50.0,
            }),
        )
        .with_relations(Relations::default().wait_for(TAP)),
        s.button,
    );
    s
}

#[test]
fn long_press_promoted_the_moment_the_tap_fails() {
    let mut s = tap_and_long_press();
    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.orch.advance_time(&s.tree, 300);

    let lp = s.orch.handler(LONG_PRESS).unwrap();
    assert_eq!(lp.state(), GestureState::Active);
    assert!(lp.is_awaiting() && !lp.is_active(), "held back by the live tap");
    s.changes();

    // Too far for the tap, close enough for the long press.
    s.touch(TouchAction::Move, 80.0, 60.0, 350);
    assert_eq!(
        s.changes(),
        vec![
            (LONG_PRESS, GestureState::Active, GestureState::Began),
            (TAP, GestureState::Failed, GestureState::Began),
        ]
    );
    assert!(s.orch.handler(LONG_PRESS).unwrap().is_active());
    assert!(s.orch.awaiting().is_empty());
}

#[test]
fn long_press_activates_directly_once_tap_already_failed() {
    let mut s = tap_and_long_press();
    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.touch(TouchAction::Move, 80.0, 60.0, 100);
    assert_eq!(s.orch.candidates(), &[LONG_PRESS], "failed tap compacted");
    s.changes();

    s.orch.advance_time(&s.tree, 300);
    assert_eq!(
        s.changes(),
        vec![(LONG_PRESS, GestureState::Active, GestureState::Began)]
    );
    assert!(s.orch.handler(LONG_PRESS).unwrap().is_active());
}

#[test]
fn long_press_cancelled_when_tap_ends() {
    let mut s = tap_and_long_press();
    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.orch.advance_time(&s.tree, 300);
    s.changes();

    s.touch(TouchAction::Up, 60.0, 60.0, 320);
    let changes = s.changes();
    assert_eq!(
        changes,
        vec![
            (LONG_PRESS, GestureState::Cancelled, GestureState::Began),
            (TAP, GestureState::Active, GestureState::Began),
            (TAP, GestureState::End, GestureState::Active),
        ],
        "the long press already saw its up and reached END while waiting"
    );
    assert!(!changes.contains(&(LONG_PRESS, GestureState::Active, GestureState::Began)));
    assert!(s.orch.candidates().is_empty());
}

#[test]
fn cancel_all_clears_began_and_awaiting_handlers() {
    let mut s = tap_and_long_press();
    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.orch.advance_time(&s.tree, 300);
    assert_eq!(s.orch.awaiting(), &[LONG_PRESS]);
    assert_eq!(s.orch.handler(TAP).unwrap().state(), GestureState::Began);
    s.changes();

    s.touch(TouchAction::Cancel, 60.0, 60.0, 310);
    let changes = s.changes();
    assert_eq!(
        changes,
        vec![
            (LONG_PRESS, GestureState::Cancelled, GestureState::Began),
            (TAP, GestureState::Cancelled, GestureState::Began),
        ]
    );
    assert!(s.orch.candidates().is_empty());
    assert!(s.orch.awaiting().is_empty());
}

#[test]
fn scroll_container_claims_touch_on_overflowing_child() {
    let mut s = Scene::new();
    let scroller = s.tree.insert(
        Some(s.root),
        LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            local_transform: Affine::translate(Vec2::new(0.0, 150.0)),
            flags: NodeFlags::VISIBLE,
            ..Default::default()
        },
    );
    // Sticks out past the scroller's right edge.
    let card = s.tree.insert(
        Some(scroller),
        LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 150.0, 40.0),
            local_transform: Affine::translate(Vec2::new(20.0, 10.0)),
            ..Default::default()
        },
    );
    s.add(Handler::new(TAP, TapRecognizer::default()), card);
    s.add(Handler::new(PAN, PanRecognizer::default()), scroller);

    // x = 140 is inside the card but right of the scroller.
    s.touch(TouchAction::Down, 140.0, 170.0, 0);
    assert_eq!(s.orch.candidates(), &[TAP, PAN]);

    s.touch(TouchAction::Move, 140.0, 200.0, 20);
    assert!(s.orch.handler(PAN).unwrap().is_active());
    assert_eq!(s.orch.candidates(), &[PAN]);
}

#[test]
fn removed_view_cancels_its_handlers() {
    let mut s = Scene::new();
    s.add(Handler::new(PAN, PanRecognizer::default()), s.button);
    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    s.touch(TouchAction::Move, 90.0, 60.0, 20);
    s.changes();

    for removed in s.tree.remove(s.button) {
        s.orch.view_removed(removed);
    }
    assert_eq!(
        s.changes(),
        vec![(PAN, GestureState::Cancelled, GestureState::Active)]
    );
    assert!(!s.touch(TouchAction::Move, 95.0, 60.0, 40));
}

#[test]
fn detached_view_never_fires_its_timer() {
    const ROOT_HANDLER: HandlerId = HandlerId(4);
    let mut s = Scene::new();
    s.add(
        Handler::new(LONG_PRESS, LongPressRecognizer::default()),
        s.button,
    );
    s.add(Handler::new(ROOT_HANDLER, ManualRecognizer), s.root);
    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    assert_eq!(s.orch.candidates(), &[LONG_PRESS, ROOT_HANDLER]);
    s.changes();

    // The host drops the button without telling the orchestrator.
    s.tree.remove(s.button);
    s.orch.advance_time(&s.tree, 600);
    assert_eq!(
        s.changes(),
        vec![(LONG_PRESS, GestureState::Cancelled, GestureState::Began)]
    );
    assert_eq!(s.orch.candidates(), &[ROOT_HANDLER]);
    assert!(s.orch.handler(LONG_PRESS).unwrap().timer_deadline().is_none());

    s.touch(TouchAction::Move, 61.0, 60.0, 600);
    assert!(s.changes().is_empty());
    assert_eq!(
        s.orch.handler(ROOT_HANDLER).unwrap().state(),
        GestureState::Began
    );
}

#[test]
fn two_finger_pan_keeps_translation_across_finger_changes() {
    let mut s = Scene::new();
    s.add(
        Handler::new(
            PAN,
            PanRecognizer::new(understory_gesture::recognizers::PanConfig {
                min_distance: 10.0,
                min_pointers: 2,
            }),
        ),
        s.button,
    );
    let frame = |action, ap: u32, pts: &[(u32, f64, f64)], t| {
        TouchFrame::new(
            action,
            PointerId(ap),
            pts.iter().map(|&(id, x, y)| Pointer::new(id, x, y)).collect(),
            t,
        )
    };
    s.orch
        .on_touch_event(&s.tree, &frame(TouchAction::Down, 0, &[(0, 60.0, 60.0)], 0))
        .unwrap();
    // One finger travelling is not enough.
    s.orch
        .on_touch_event(&s.tree, &frame(TouchAction::Move, 0, &[(0, 90.0, 60.0)], 10))
        .unwrap();
    assert!(!s.orch.handler(PAN).unwrap().is_active());

    s.orch
        .on_touch_event(
            &s.tree,
            &frame(TouchAction::PointerDown, 1, &[(0, 90.0, 60.0), (1, 110.0, 60.0)], 20),
        )
        .unwrap();
    assert_eq!(
        s.orch.handler(PAN).unwrap().tracked_pointers(),
        &[PointerId(0), PointerId(1)]
    );
    assert!(
        s.orch.handler(PAN).unwrap().is_active(),
        "earlier travel counts once two fingers are down"
    );
}

#[test]
fn nested_pans_declared_simultaneous_both_run() {
    const OUTER: HandlerId = HandlerId(4);
    let mut s = Scene::new();
    s.add(Handler::new(PAN, PanRecognizer::default()), s.button);
    s.add(
        Handler::new(OUTER, PanRecognizer::default())
            .with_relations(Relations::default().simultaneous_with(PAN)),
        s.root,
    );

    s.touch(TouchAction::Down, 60.0, 60.0, 0);
    assert_eq!(s.orch.candidates(), &[PAN, OUTER], "innermost view first");
    s.touch(TouchAction::Move, 60.0, 90.0, 16);
    assert!(s.orch.handler(PAN).unwrap().is_active());
    assert!(s.orch.handler(OUTER).unwrap().is_active());

    s.orch.take_events();
    s.touch(TouchAction::Move, 60.0, 95.0, 32);
    let updated: Vec<HandlerId> = s
        .orch
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            GestureEvent::Update { handler, .. } => Some(handler),
            GestureEvent::StateChange { .. } => None,
        })
        .collect();
    assert_eq!(updated, vec![PAN, OUTER], "earliest promotion first");

    s.touch(TouchAction::Up, 60.0, 95.0, 48);
    let changes = s.changes();
    assert_eq!(
        changes,
        vec![
            (PAN, GestureState::End, GestureState::Active),
            (OUTER, GestureState::End, GestureState::Active),
        ]
    );
}
