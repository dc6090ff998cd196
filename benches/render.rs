// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipegraph::layout::{BoardSize, LayoutTracker};
use pipegraph::model::builtin_pipeline;
use pipegraph::render::{initialize_connectors, render_board, render_diagram_text};

// Benchmark identity (keep stable):
// - Group names in this file: `render.board`, `render.reroute`
// - Case IDs must remain stable across refactors so results stay comparable.
fn benches_render(c: &mut Criterion) {
    let diagram = builtin_pipeline().expect("builtin pipeline");

    let mut group = c.benchmark_group("render.board");
    for (id, size) in [
        ("min_board", BoardSize::default()),
        ("wide_terminal", BoardSize::new(300, 80)),
    ] {
        let diagram = diagram.clone();
        group.bench_function(id, move |b| {
            b.iter(|| {
                let board = render_diagram_text(black_box(&diagram), black_box(size))
                    .expect("render_diagram_text");
                black_box(board.rows().len())
            })
        });
    }
    group.finish();

    // One pane resize: layout recompute, connector reroute and board redraw.
    let mut group = c.benchmark_group("render.reroute");
    group.bench_function("panel_toggle", |b| {
        let mut tracker = LayoutTracker::new();
        let mut connectors = initialize_connectors(diagram.connectors());
        let sizes = [BoardSize::new(156, 50), BoardSize::new(132, 50)];
        let mut flip = 0usize;
        b.iter(|| {
            flip ^= 1;
            tracker.observe(diagram.anchors(), sizes[flip]);
            connectors.sync(&tracker);
            let layout = tracker.layout().expect("layout observed");
            let board =
                render_board(diagram.anchors(), layout, &connectors).expect("render_board");
            black_box(board.anchors().len())
        })
    });
    group.finish();
}

criterion_group!(benches, benches_render);
criterion_main!(benches);
