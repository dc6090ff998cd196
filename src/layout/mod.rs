// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Anchor placement and position observation.
//!
//! Anchors declare percentage offsets; this module turns them into cell rectangles for a given
//! board size and exposes the result through [`AnchorGeometry`], which connector rendering
//! queries instead of being told when things move.

use std::collections::BTreeMap;

use crate::model::{AnchorId, AnchorNode, AnchorRegistry};

/// Smallest board the diagram is laid out on; larger viewports stretch it, smaller ones pan.
pub const MIN_BOARD_WIDTH: usize = 132;
pub const MIN_BOARD_HEIGHT: usize = 50;

/// Labels wrap at this many columns inside their box.
pub const MAX_LABEL_WIDTH: usize = 20;

const BOX_PADDING_X: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSize {
    pub width: usize,
    pub height: usize,
}

impl BoardSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Board size for a viewport of `width` x `height` cells, never below the minimum board.
    pub fn for_viewport(width: usize, height: usize) -> Self {
        Self::new(width.max(MIN_BOARD_WIDTH), height.max(MIN_BOARD_HEIGHT))
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::new(MIN_BOARD_WIDTH, MIN_BOARD_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPoint {
    pub x: usize,
    pub y: usize,
}

impl CellPoint {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle of cells. `width` and `height` are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> usize {
        self.x + self.width.saturating_sub(1)
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height.saturating_sub(1)
    }

    pub fn center_x(&self) -> usize {
        self.x + self.width / 2
    }

    pub fn center_y(&self) -> usize {
        self.y + self.height / 2
    }

    pub fn contains(&self, point: CellPoint) -> bool {
        (self.x..=self.right()).contains(&point.x) && (self.y..=self.bottom()).contains(&point.y)
    }
}

/// Live on-screen geometry of anchors.
///
/// `revision` changes whenever any anchor may have moved; consumers compare it with the revision
/// they last resolved against and re-query rectangles when it differs.
pub trait AnchorGeometry {
    fn revision(&self) -> u64;

    /// Current rectangle of `id`, or `None` when the anchor is not mounted.
    fn anchor_rect(&self, id: &AnchorId) -> Option<CellRect>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedAnchor {
    pub id: AnchorId,
    pub rect: CellRect,
    pub label_lines: Vec<String>,
}

/// Cell placement of every anchor that fits on a board of a given size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardLayout {
    size: BoardSize,
    placed: Vec<PlacedAnchor>,
    index: BTreeMap<AnchorId, usize>,
}

impl BoardLayout {
    pub fn compute(registry: &AnchorRegistry, size: BoardSize) -> Self {
        let mut placed = Vec::with_capacity(registry.len());
        let mut index = BTreeMap::new();
        for anchor in registry {
            let Some(placed_anchor) = place_anchor(anchor, size) else {
                tracing::debug!(
                    anchor = %anchor.id(),
                    width = size.width,
                    height = size.height,
                    "anchor does not fit on board; leaving it unmounted"
                );
                continue;
            };
            index.insert(placed_anchor.id.clone(), placed.len());
            placed.push(placed_anchor);
        }
        Self {
            size,
            placed,
            index,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn placed(&self) -> &[PlacedAnchor] {
        &self.placed
    }

    pub fn get(&self, id: &str) -> Option<&PlacedAnchor> {
        self.index.get(id).map(|&idx| &self.placed[idx])
    }
}

fn place_anchor(anchor: &AnchorNode, size: BoardSize) -> Option<PlacedAnchor> {
    let label_lines = wrap_label(anchor.label(), MAX_LABEL_WIDTH);
    let inner_width =
        label_lines.iter().map(|line| line.chars().count()).max().unwrap_or(0).max(1);
    let width = inner_width + 2 + (2 * BOX_PADDING_X);
    let height = label_lines.len().max(1) + 2;
    if width > size.width || height > size.height {
        return None;
    }

    let x = percent_to_cell(anchor.effective_left_percent(), size.width).min(size.width - width);
    let y = percent_to_cell(anchor.effective_top_percent(), size.height).min(size.height - height);
    Some(PlacedAnchor {
        id: anchor.id().clone(),
        rect: CellRect::new(x, y, width, height),
        label_lines,
    })
}

fn percent_to_cell(percent: f64, extent: usize) -> usize {
    let max = extent.saturating_sub(1) as f64;
    (percent / 100.0 * max).round().clamp(0.0, max) as usize
}

/// Greedy word wrap; words longer than `max_width` are split.
pub fn wrap_label(label: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::<String>::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in label.split_whitespace() {
        let mut word = word.chars().collect::<Vec<_>>();
        while word.len() > max_width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > max_width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Keeps the current [`BoardLayout`] in step with the board size it is observed at.
///
/// Layout is only recomputed when the observed size changes; each recomputation bumps the
/// revision reported through [`AnchorGeometry`].
#[derive(Debug, Clone, Default)]
pub struct LayoutTracker {
    layout: Option<BoardLayout>,
    revision: u64,
}

impl LayoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes the board at `size`; returns `true` when the layout changed.
    pub fn observe(&mut self, registry: &AnchorRegistry, size: BoardSize) -> bool {
        if self.layout.as_ref().is_some_and(|layout| layout.size() == size) {
            return false;
        }

        self.layout = Some(BoardLayout::compute(registry, size));
        self.revision = self.revision.wrapping_add(1);
        tracing::debug!(
            revision = self.revision,
            width = size.width,
            height = size.height,
            "board layout recomputed"
        );
        true
    }

    pub fn layout(&self) -> Option<&BoardLayout> {
        self.layout.as_ref()
    }
}

impl AnchorGeometry for LayoutTracker {
    fn revision(&self) -> u64 {
        self.revision
    }

    fn anchor_rect(&self, id: &AnchorId) -> Option<CellRect> {
        self.layout.as_ref()?.get(id.as_str()).map(|placed| placed.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        wrap_label, AnchorGeometry, BoardLayout, BoardSize, CellRect, LayoutTracker,
        MIN_BOARD_HEIGHT, MIN_BOARD_WIDTH,
    };
    use crate::model::fixtures::{anchor, two_anchor_diagram};
    use crate::model::{AnchorId, AnchorRegistry};

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_label("Data Association w/ Track Filtering", 20),
            vec!["Data Association w/", "Track Filtering"]
        );
        assert_eq!(wrap_label("Detector", 20), vec!["Detector"]);
    }

    #[test]
    fn splits_words_longer_than_the_limit() {
        assert_eq!(wrap_label("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn empty_label_keeps_one_line() {
        assert_eq!(wrap_label("   ", 10), vec![String::new()]);
    }

    #[test]
    fn viewport_never_shrinks_below_the_minimum_board() {
        assert_eq!(
            BoardSize::for_viewport(10, 10),
            BoardSize::new(MIN_BOARD_WIDTH, MIN_BOARD_HEIGHT)
        );
        assert_eq!(BoardSize::for_viewport(200, 80), BoardSize::new(200, 80));
    }

    #[test]
    fn places_anchors_by_percentage() {
        let registry = AnchorRegistry::new(vec![anchor("a", 0.0, 0.0), anchor("b", 50.0, 50.0)])
            .unwrap();
        let layout = BoardLayout::compute(&registry, BoardSize::new(101, 21));

        // "A" is one column wide: 1 + 2 borders + 2 padding.
        assert_eq!(layout.get("a").unwrap().rect, CellRect::new(0, 0, 5, 3));
        assert_eq!(layout.get("b").unwrap().rect, CellRect::new(50, 10, 5, 3));
    }

    #[test]
    fn clamps_anchors_at_the_far_edge_inside_the_board() {
        let registry = AnchorRegistry::new(vec![anchor("z", 100.0, 100.0)]).unwrap();
        let layout = BoardLayout::compute(&registry, BoardSize::new(40, 10));
        let rect = layout.get("z").unwrap().rect;
        assert_eq!(rect.right(), 39);
        assert_eq!(rect.bottom(), 9);
    }

    #[test]
    fn anchors_that_cannot_fit_are_unmounted() {
        let registry = AnchorRegistry::new(vec![anchor("wide_anchor_name", 0.0, 0.0)]).unwrap();
        let layout = BoardLayout::compute(&registry, BoardSize::new(8, 8));
        assert!(layout.placed().is_empty());
        assert!(layout.get("wide_anchor_name").is_none());
    }

    #[test]
    fn tracker_bumps_revision_only_when_size_changes() {
        let diagram = two_anchor_diagram();
        let mut tracker = LayoutTracker::new();
        assert_eq!(tracker.revision(), 0);

        assert!(tracker.observe(diagram.anchors(), BoardSize::new(140, 50)));
        assert_eq!(tracker.revision(), 1);
        assert!(!tracker.observe(diagram.anchors(), BoardSize::new(140, 50)));
        assert_eq!(tracker.revision(), 1);

        let before = tracker.anchor_rect(&AnchorId::new("B").unwrap()).unwrap();
        assert!(tracker.observe(diagram.anchors(), BoardSize::new(200, 50)));
        assert_eq!(tracker.revision(), 2);
        let after = tracker.anchor_rect(&AnchorId::new("B").unwrap()).unwrap();
        assert!(after.x > before.x);
    }

    #[test]
    fn unobserved_tracker_has_no_geometry() {
        let tracker = LayoutTracker::new();
        assert!(tracker.anchor_rect(&AnchorId::new("A").unwrap()).is_none());
    }
}
