// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Connector routing.
//!
//! A [`RenderedConnectorSet`] is created once per mount from the static connector list. It keeps
//! no positions of its own between revisions: [`RenderedConnectorSet::sync`] re-reads both
//! endpoints from an [`AnchorGeometry`] whenever the geometry revision moves on. Connectors whose
//! endpoints are not mounted are kept in the set without a route and are simply not drawn.

use smallvec::{smallvec, SmallVec};

use super::{Canvas, UNICODE_BOX_HORIZONTAL, UNICODE_BOX_VERTICAL};
use crate::layout::{AnchorGeometry, CellPoint, CellRect};
use crate::model::{Connector, ConnectorList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    Right,
    Left,
    Down,
    Up,
}

impl ArrowDirection {
    pub fn glyph(self) -> char {
        match self {
            Self::Right => '▶',
            Self::Left => '◀',
            Self::Down => '▼',
            Self::Up => '▲',
        }
    }

    pub fn is_arrow_glyph(ch: char) -> bool {
        matches!(ch, '▶' | '◀' | '▼' | '▲')
    }
}

/// Orthogonal polyline from the cell next to the source box to the cell next to the target box.
///
/// The last point carries the arrowhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorRoute {
    points: SmallVec<[CellPoint; 4]>,
    arrow: ArrowDirection,
    source_port: SourcePort,
}

/// Border cell of the source box the route leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourcePort {
    cell: CellPoint,
    horizontal: bool,
}

impl SourcePort {
    fn horizontal(x: usize, y: usize) -> Self {
        Self {
            cell: CellPoint::new(x, y),
            horizontal: true,
        }
    }

    fn vertical(x: usize, y: usize) -> Self {
        Self {
            cell: CellPoint::new(x, y),
            horizontal: false,
        }
    }
}

impl ConnectorRoute {
    pub fn points(&self) -> &[CellPoint] {
        &self.points
    }

    pub fn start(&self) -> CellPoint {
        self.points[0]
    }

    pub fn end(&self) -> CellPoint {
        self.points[self.points.len() - 1]
    }

    pub fn arrow(&self) -> ArrowDirection {
        self.arrow
    }
}

/// Routes a connector between two anchor boxes.
///
/// Side-by-side boxes are joined horizontally, stacked boxes vertically, each with at most one
/// dog-leg. Overlapping or touching boxes are joined by a detour lane right of both.
pub fn route_between(source: CellRect, target: CellRect) -> ConnectorRoute {
    if target.x >= source.right() + 2 {
        let start = CellPoint::new(source.right() + 1, source.center_y());
        let end = CellPoint::new(target.x - 1, target.center_y());
        let port = SourcePort::horizontal(source.right(), source.center_y());
        return horizontal_route(start, end, ArrowDirection::Right, port);
    }
    if source.x >= target.right() + 2 {
        let start = CellPoint::new(source.x - 1, source.center_y());
        let end = CellPoint::new(target.right() + 1, target.center_y());
        let port = SourcePort::horizontal(source.x, source.center_y());
        return horizontal_route(start, end, ArrowDirection::Left, port);
    }
    if target.y >= source.bottom() + 2 {
        let start = CellPoint::new(source.center_x(), source.bottom() + 1);
        let end = CellPoint::new(target.center_x(), target.y - 1);
        let port = SourcePort::vertical(source.center_x(), source.bottom());
        return vertical_route(start, end, ArrowDirection::Down, port);
    }
    if source.y >= target.bottom() + 2 {
        let start = CellPoint::new(source.center_x(), source.y - 1);
        let end = CellPoint::new(target.center_x(), target.bottom() + 1);
        let port = SourcePort::vertical(source.center_x(), source.y);
        return vertical_route(start, end, ArrowDirection::Up, port);
    }

    let lane_x = source.right().max(target.right()) + 2;
    let start = CellPoint::new(source.right() + 1, source.center_y());
    let end = CellPoint::new(target.right() + 1, target.center_y());
    ConnectorRoute {
        points: smallvec![
            start,
            CellPoint::new(lane_x, start.y),
            CellPoint::new(lane_x, end.y),
            end
        ],
        arrow: ArrowDirection::Left,
        source_port: SourcePort::horizontal(source.right(), source.center_y()),
    }
}

fn horizontal_route(
    start: CellPoint,
    end: CellPoint,
    arrow: ArrowDirection,
    source_port: SourcePort,
) -> ConnectorRoute {
    if start.y == end.y {
        return ConnectorRoute {
            points: smallvec![start, end],
            arrow,
            source_port,
        };
    }
    let mid_x = start.x.min(end.x) + start.x.abs_diff(end.x) / 2;
    ConnectorRoute {
        points: smallvec![
            start,
            CellPoint::new(mid_x, start.y),
            CellPoint::new(mid_x, end.y),
            end
        ],
        arrow,
        source_port,
    }
}

fn vertical_route(
    start: CellPoint,
    end: CellPoint,
    arrow: ArrowDirection,
    source_port: SourcePort,
) -> ConnectorRoute {
    if start.x == end.x {
        return ConnectorRoute {
            points: smallvec![start, end],
            arrow,
            source_port,
        };
    }
    let mid_y = start.y.min(end.y) + start.y.abs_diff(end.y) / 2;
    ConnectorRoute {
        points: smallvec![
            start,
            CellPoint::new(start.x, mid_y),
            CellPoint::new(end.x, mid_y),
            end
        ],
        arrow,
        source_port,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConnector {
    connector: Connector,
    route: Option<ConnectorRoute>,
}

impl RenderedConnector {
    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// `None` while either endpoint is not mounted.
    pub fn route(&self) -> Option<&ConnectorRoute> {
        self.route.as_ref()
    }
}

/// The connectors of one mounted board, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConnectorSet {
    connectors: Vec<RenderedConnector>,
    resolved_revision: Option<u64>,
}

/// Builds the connector set for a board mount. Routes are resolved by the first `sync`.
pub fn initialize(connectors: &ConnectorList) -> RenderedConnectorSet {
    RenderedConnectorSet {
        connectors: connectors
            .iter()
            .map(|connector| RenderedConnector {
                connector: connector.clone(),
                route: None,
            })
            .collect(),
        resolved_revision: None,
    }
}

impl RenderedConnectorSet {
    /// Re-resolves every route if `geometry` has changed since the last sync.
    ///
    /// Returns `true` when routes were recomputed.
    pub fn sync(&mut self, geometry: &impl AnchorGeometry) -> bool {
        let revision = geometry.revision();
        if self.resolved_revision == Some(revision) {
            return false;
        }

        for rendered in &mut self.connectors {
            let source = geometry.anchor_rect(rendered.connector.source());
            let target = geometry.anchor_rect(rendered.connector.target());
            rendered.route = match (source, target) {
                (Some(source), Some(target)) => Some(route_between(source, target)),
                _ => {
                    tracing::debug!(
                        connector = %rendered.connector,
                        source_mounted = source.is_some(),
                        target_mounted = target.is_some(),
                        "connector endpoint not mounted; omitting connector"
                    );
                    None
                }
            };
        }
        self.resolved_revision = Some(revision);
        true
    }

    pub fn resolved_revision(&self) -> Option<u64> {
        self.resolved_revision
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderedConnector> {
        self.connectors.iter()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Connectors that currently have a route, in declaration order.
    pub fn visible(&self) -> impl Iterator<Item = (&Connector, &ConnectorRoute)> {
        self.connectors
            .iter()
            .filter_map(|rendered| rendered.route.as_ref().map(|route| (&rendered.connector, route)))
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// Draws every visible route onto `canvas`, clipping at its edges.
    ///
    /// Arrowheads are placed after all lines so a later line cannot merge into them.
    pub fn draw(&self, canvas: &mut Canvas) {
        for (_, route) in self.visible() {
            for segment in route.points().windows(2) {
                draw_segment_clipped(canvas, segment[0], segment[1]);
            }
        }
        for (_, route) in self.visible() {
            let end = route.end();
            if canvas.in_bounds(end.x, end.y) {
                let _ = canvas.set(end.x, end.y, route.arrow().glyph());
            }
        }
    }

    /// Joins each visible route to the border of its source box (`├`, `┤`, `┬`, `┴`).
    ///
    /// Call after the anchor boxes have been drawn over the connectors.
    pub fn draw_source_ports(&self, canvas: &mut Canvas) {
        for (_, route) in self.visible() {
            let port = route.source_port;
            let glyph = if port.horizontal {
                UNICODE_BOX_HORIZONTAL
            } else {
                UNICODE_BOX_VERTICAL
            };
            if canvas.in_bounds(port.cell.x, port.cell.y) {
                let _ = canvas.set(port.cell.x, port.cell.y, glyph);
            }
        }
    }
}

fn draw_segment_clipped(canvas: &mut Canvas, a: CellPoint, b: CellPoint) {
    let (width, height) = (canvas.width(), canvas.height());
    if width == 0 || height == 0 {
        return;
    }

    if a.y == b.y {
        if a.y >= height || a.x.min(b.x) >= width {
            return;
        }
        let x1 = a.x.max(b.x).min(width - 1);
        let _ = canvas.draw_hline(a.x.min(b.x), x1, a.y);
    } else if a.x == b.x {
        if a.x >= width || a.y.min(b.y) >= height {
            return;
        }
        let y1 = a.y.max(b.y).min(height - 1);
        let _ = canvas.draw_vline(a.x, a.y.min(b.y), y1);
    }
}
