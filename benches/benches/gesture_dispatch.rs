// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Point, Rect, Vec2};
use understory_gesture::hit_test;
use understory_gesture::recognizers::{LongPressRecognizer, PanRecognizer, TapRecognizer};
use understory_gesture::{Handler, HandlerId, Orchestrator, Relations, TouchAction, TouchFrame};
use understory_view_tree::{LocalNode, NodeId, Tree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn placed(x: f64, y: f64, w: f64, h: f64) -> LocalNode {
    LocalNode {
        local_bounds: Rect::new(0.0, 0.0, w, h),
        local_transform: Affine::translate(Vec2::new(x, y)),
        ..Default::default()
    }
}

/// `n` rows of `n` cells, with a tap and a pan on every cell and a pan on every row.
fn grid(n: usize, cell: f64) -> (Tree, Orchestrator<NodeId>) {
    let side = n as f64 * cell;
    let mut tree = Tree::new();
    let root = tree.insert(None, placed(0.0, 0.0, side, side));
    let mut orch = Orchestrator::new(root);
    let mut next = 0_u32;
    let mut id = || {
        next += 1;
        HandlerId(next)
    };
    for r in 0..n {
        let row = tree.insert(Some(root), placed(0.0, r as f64 * cell, side, cell));
        let row_pan = id();
        orch.register(Handler::new(row_pan, PanRecognizer::default()))
            .unwrap();
        orch.attach(row_pan, row).unwrap();
        for c in 0..n {
            let node = tree.insert(Some(row), placed(c as f64 * cell, 0.0, cell, cell));
            let (tap, pan) = (id(), id());
            orch.register(Handler::new(tap, TapRecognizer::default()))
                .unwrap();
            orch.register(
                Handler::new(pan, PanRecognizer::default())
                    .with_relations(Relations::default().wait_for(tap)),
            )
            .unwrap();
            orch.attach(tap, node).unwrap();
            orch.attach(pan, node).unwrap();
        }
    }
    (tree, orch)
}

/// A chain of `depth` nested views, each with a long press.
fn chain(depth: usize) -> (Tree, Orchestrator<NodeId>) {
    let mut tree = Tree::new();
    let root = tree.insert(None, placed(0.0, 0.0, 1000.0, 1000.0));
    let mut orch = Orchestrator::new(root);
    let mut parent = root;
    for d in 0..depth {
        let size = 1000.0 - d as f64 * 2.0;
        let node = tree.insert(Some(parent), placed(1.0, 1.0, size, size));
        let id = HandlerId(d as u32 + 1);
        orch.register(Handler::new(id, LongPressRecognizer::default()))
            .unwrap();
        orch.attach(id, node).unwrap();
        parent = node;
    }
    (tree, orch)
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    for &n in &[8usize, 32, 64] {
        let (tree, orch) = grid(n, 20.0);
        let mut rng = Rng::new(0xDEAD_BEEF_CAFE_F00D);
        let side = n as f64 * 20.0;
        let points: Vec<Point> = (0..256)
            .map(|_| Point::new(rng.next_f64() * side, rng.next_f64() * side))
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0;
                for &pt in &points {
                    total += hit_test::discover(&tree, orch.registry(), orch.root(), pt).len();
                }
                black_box(total);
            });
        });
    }
    for &depth in &[16usize, 64] {
        let (tree, orch) = chain(depth);
        group.bench_function(format!("chain_depth{}", depth), |b| {
            b.iter(|| {
                let found =
                    hit_test::discover(&tree, orch.registry(), orch.root(), Point::new(500.0, 500.0));
                black_box(found.len());
            });
        });
    }
    group.finish();
}

fn bench_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence");

    let (tree, mut orch) = grid(32, 20.0);
    let tap: Vec<TouchFrame> = vec![
        TouchFrame::single(TouchAction::Down, 105.0, 105.0, 0),
        TouchFrame::single(TouchAction::Move, 106.0, 105.0, 16),
        TouchFrame::single(TouchAction::Up, 106.0, 105.0, 32),
    ];
    group.bench_function("tap_grid_n32", |b| {
        b.iter(|| {
            for f in &tap {
                black_box(orch.on_touch_event(&tree, f).unwrap());
            }
            black_box(orch.take_events().len());
        });
    });

    let (tree, mut orch) = grid(32, 20.0);
    let mut drag = vec![TouchFrame::single(TouchAction::Down, 105.0, 105.0, 0)];
    for i in 1..=30 {
        drag.push(TouchFrame::single(
            TouchAction::Move,
            105.0 + i as f64 * 3.0,
            105.0,
            i * 8,
        ));
    }
    drag.push(TouchFrame::single(TouchAction::Up, 195.0, 105.0, 256));
    group.throughput(Throughput::Elements(drag.len() as u64));
    group.bench_function("drag_grid_n32", |b| {
        b.iter(|| {
            for f in &drag {
                black_box(orch.on_touch_event(&tree, f).unwrap());
            }
            black_box(orch.take_events().len());
        });
    });

    let (tree, mut orch) = chain(64);
    let hold = [
        TouchFrame::single(TouchAction::Down, 500.0, 500.0, 0),
        TouchFrame::single(TouchAction::Up, 500.0, 500.0, 600),
    ];
    group.bench_function("long_press_chain_depth64", |b| {
        b.iter(|| {
            black_box(orch.on_touch_event(&tree, &hold[0]).unwrap());
            orch.advance_time(&tree, 500);
            black_box(orch.on_touch_event(&tree, &hold[1]).unwrap());
            black_box(orch.take_events().len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_hit_test, bench_sequences);
criterion_main!(benches);
