// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![cfg(test)]

use super::{
    AnchorId, AnchorNode, AnchorRegistry, Connector, ConnectorList, PipelineDiagram, Rgb,
};

pub(crate) fn anchor(id: &str, top: f64, left: f64) -> AnchorNode {
    AnchorNode::new(
        AnchorId::new(id).expect("anchor id"),
        id.to_uppercase(),
        Rgb::WHITE,
        Rgb::new(0x1f, 0x4e, 0x79),
        top,
        left,
    )
    .expect("anchor")
}

pub(crate) fn connector(source: &str, target: &str) -> Connector {
    Connector::new(
        AnchorId::new(source).expect("source id"),
        AnchorId::new(target).expect("target id"),
    )
}

/// `A` on the left, `B` on the right, one connector `A -> B`.
pub(crate) fn two_anchor_diagram() -> PipelineDiagram {
    let anchors =
        AnchorRegistry::new(vec![anchor("A", 40.0, 5.0), anchor("B", 40.0, 70.0)]).expect("anchors");
    PipelineDiagram::new(anchors, ConnectorList::new(vec![connector("A", "B")])).expect("diagram")
}

/// Three anchors laid out left to right, top to bottom, plus a back edge.
pub(crate) fn small_pipeline() -> PipelineDiagram {
    let anchors = AnchorRegistry::new(vec![
        anchor("load", 10.0, 5.0),
        anchor("detect", 10.0, 60.0),
        anchor("match", 70.0, 60.0),
    ])
    .expect("anchors");
    let connectors = ConnectorList::new(vec![
        connector("load", "detect"),
        connector("detect", "match"),
        connector("match", "load"),
    ]);
    PipelineDiagram::new(anchors, connectors).expect("diagram")
}
