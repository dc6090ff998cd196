// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::connector::{initialize, RenderedConnectorSet};
use super::{canvas_to_string_trimmed, Canvas, CanvasError};
use crate::layout::{BoardLayout, BoardSize, CellRect, LayoutTracker};
use crate::model::{AnchorId, AnchorRegistry, PipelineDiagram, Rgb};

/// Colour region of one mounted anchor box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorPaint {
    pub id: AnchorId,
    pub rect: CellRect,
    pub text_color: Rgb,
    pub background_color: Rgb,
}

/// A fully drawn board: one row of cells per line plus the anchor colour regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBoard {
    rows: Vec<String>,
    anchors: Vec<AnchorPaint>,
    trimmed: String,
}

impl RenderedBoard {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn anchors(&self) -> &[AnchorPaint] {
        &self.anchors
    }

    /// Board text without trailing blanks, suitable for printing.
    pub fn to_trimmed_string(&self) -> &str {
        &self.trimmed
    }

    /// The anchor whose box covers `(x, y)`, if any. Later anchors win on overlap.
    pub fn anchor_at(&self, x: usize, y: usize) -> Option<&AnchorPaint> {
        let point = crate::layout::CellPoint::new(x, y);
        self.anchors.iter().rev().find(|paint| paint.rect.contains(point))
    }
}

/// Draws the board for `layout`: connectors, then arrowheads, then anchor boxes on top.
///
/// Each route is finally joined to the border of its source box.
pub fn render_board(
    registry: &AnchorRegistry,
    layout: &BoardLayout,
    connectors: &RenderedConnectorSet,
) -> Result<RenderedBoard, BoardRenderError> {
    let size = layout.size();
    let mut canvas = Canvas::new(size.width, size.height)?;
    connectors.draw(&mut canvas);

    let mut anchors = Vec::with_capacity(layout.placed().len());
    for placed in layout.placed() {
        let Some(node) = registry.get(placed.id.as_str()) else {
            return Err(BoardRenderError::UnknownAnchor {
                anchor_id: placed.id.clone(),
            });
        };

        let rect = placed.rect;
        canvas.clear_rect(rect.x, rect.y, rect.right(), rect.bottom())?;
        canvas.draw_box(rect.x, rect.y, rect.right(), rect.bottom())?;
        let inner_width = rect.width.saturating_sub(2);
        for (row, line) in placed.label_lines.iter().enumerate() {
            let len = line.chars().count();
            let x = rect.x + 1 + inner_width.saturating_sub(len) / 2;
            canvas.write_str(x, rect.y + 1 + row, line)?;
        }

        anchors.push(AnchorPaint {
            id: placed.id.clone(),
            rect,
            text_color: node.text_color(),
            background_color: node.background_color(),
        });
    }

    connectors.draw_source_ports(&mut canvas);

    Ok(RenderedBoard {
        rows: canvas.rows(),
        anchors,
        trimmed: canvas_to_string_trimmed(&canvas),
    })
}

/// One-shot render of `diagram` on a board of `size`, for printing and snapshots.
pub fn render_diagram_text(
    diagram: &PipelineDiagram,
    size: BoardSize,
) -> Result<RenderedBoard, BoardRenderError> {
    let mut tracker = LayoutTracker::new();
    tracker.observe(diagram.anchors(), size);
    let mut connectors = initialize(diagram.connectors());
    connectors.sync(&tracker);

    let layout = tracker.layout().cloned().unwrap_or_default();
    render_board(diagram.anchors(), &layout, &connectors)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardRenderError {
    Canvas(CanvasError),
    UnknownAnchor { anchor_id: AnchorId },
}

impl fmt::Display for BoardRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canvas(err) => write!(f, "board canvas error: {err}"),
            Self::UnknownAnchor { anchor_id } => {
                write!(f, "layout places anchor {anchor_id} which is not in the registry")
            }
        }
    }
}

impl std::error::Error for BoardRenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Canvas(err) => Some(err),
            Self::UnknownAnchor { .. } => None,
        }
    }
}

impl From<CanvasError> for BoardRenderError {
    fn from(value: CanvasError) -> Self {
        Self::Canvas(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{render_board, render_diagram_text};
    use crate::layout::{BoardSize, LayoutTracker};
    use crate::model::builtin_pipeline;
    use crate::model::fixtures::{small_pipeline, two_anchor_diagram};
    use crate::render::initialize_connectors;

    #[test]
    fn two_anchor_board_draws_one_arrow_from_a_to_b() {
        let board = render_diagram_text(&two_anchor_diagram(), BoardSize::new(40, 7)).unwrap();
        assert_eq!(
            board.to_trimmed_string(),
            [
                "",
                "",
                "  ┌───┐                    ┌───┐",
                "  │ A ├───────────────────▶│ B │",
                "  └───┘                    └───┘",
            ]
            .join("\n")
        );
        assert_eq!(board.to_trimmed_string().matches('▶').count(), 1);
    }

    #[test]
    fn anchor_paint_uses_declared_colours() {
        let diagram = two_anchor_diagram();
        let board = render_diagram_text(&diagram, BoardSize::new(40, 7)).unwrap();
        let a = board.anchor_at(4, 3).expect("anchor A covers its label cell");
        assert_eq!(a.id.as_str(), "A");
        assert_eq!(a.background_color, diagram.anchors().get("A").unwrap().background_color());
        assert!(board.anchor_at(10, 3).is_none());
    }

    #[test]
    fn layout_change_moves_connectors_with_their_anchors() {
        let diagram = small_pipeline();
        let mut tracker = LayoutTracker::new();
        let mut connectors = initialize_connectors(diagram.connectors());

        tracker.observe(diagram.anchors(), BoardSize::new(60, 20));
        connectors.sync(&tracker);
        let narrow =
            render_board(diagram.anchors(), tracker.layout().unwrap(), &connectors).unwrap();

        tracker.observe(diagram.anchors(), BoardSize::new(90, 30));
        assert!(connectors.sync(&tracker));
        let wide = render_board(diagram.anchors(), tracker.layout().unwrap(), &connectors).unwrap();

        assert_ne!(narrow.to_trimmed_string(), wide.to_trimmed_string());
        assert_eq!(connectors.visible_count(), 3);
    }

    #[test]
    fn builtin_pipeline_renders_every_anchor_and_connector() {
        let diagram = builtin_pipeline().unwrap();
        let board = render_diagram_text(&diagram, BoardSize::default()).unwrap();
        assert_eq!(board.anchors().len(), diagram.anchors().len());
        for anchor in diagram.anchors() {
            let first_word = anchor.label().split_whitespace().next().unwrap();
            assert!(
                board.to_trimmed_string().contains(first_word),
                "missing label for {}",
                anchor.id()
            );
        }
    }
}
