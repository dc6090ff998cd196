// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in diagram of the structure-from-motion pipeline.
//!
//! Stages are grouped into columns: inputs, image loading, feature extraction, two-view
//! estimation, multi-view optimization and outputs. Each group shares a colour scheme.

use super::{
    AnchorId, AnchorNode, AnchorRegistry, Connector, ConnectorList, DiagramConfigError,
    PipelineDiagram, Rgb,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Input,
    Loader,
    Features,
    TwoView,
    MultiView,
    Output,
}

impl Stage {
    fn colors(self) -> (Rgb, Rgb) {
        match self {
            Self::Input => (Rgb::WHITE, Rgb::new(0x55, 0x55, 0x55)),
            Self::Loader => (Rgb::WHITE, Rgb::new(0x3c, 0x6e, 0x47)),
            Self::Features => (Rgb::WHITE, Rgb::new(0x1f, 0x4e, 0x79)),
            Self::TwoView => (Rgb::WHITE, Rgb::new(0x6a, 0x3d, 0x8f)),
            Self::MultiView => (Rgb::WHITE, Rgb::new(0xb3, 0x59, 0x00)),
            Self::Output => (Rgb::BLACK, Rgb::new(0xe0, 0xe0, 0xe0)),
        }
    }
}

// (id, label, stage, top %, left %)
const ANCHORS: &[(&str, &str, Stage, f64, f64)] = &[
    ("scene_images", "Scene Image Directories", Stage::Input, 2.0, 2.0),
    ("data_loader", "DataLoader + Filter Invalid Edges", Stage::Loader, 16.0, 2.0),
    ("image_i", "Image i", Stage::Loader, 30.0, 2.0),
    ("intrinsics", "Camera Intrinsics", Stage::Loader, 44.0, 2.0),
    ("image_pairs", "Image Pair Indices (i1, i2)", Stage::Loader, 58.0, 2.0),
    ("detector", "Detector", Stage::Features, 16.0, 22.0),
    ("keypoints", "Keypoints", Stage::Features, 30.0, 22.0),
    ("descriptor", "Descriptor", Stage::Features, 44.0, 22.0),
    ("descriptors", "Descriptors", Stage::Features, 58.0, 22.0),
    ("matcher", "Matcher", Stage::TwoView, 16.0, 42.0),
    ("putative", "Putative Correspondences", Stage::TwoView, 30.0, 42.0),
    ("verifier", "DegeneracyCheck + Verifier", Stage::TwoView, 44.0, 42.0),
    ("relative_rotation", "Relative Rotation (i2Ri1)", Stage::TwoView, 58.0, 42.0),
    ("relative_translation", "Relative Translation (i2Ui1)", Stage::TwoView, 72.0, 42.0),
    ("verified_corr", "Verified Correspondences", Stage::TwoView, 86.0, 42.0),
    ("view_graph", "Largest Connected Component", Stage::MultiView, 16.0, 62.0),
    ("rotation_averaging", "Rotation Averaging", Stage::MultiView, 30.0, 62.0),
    ("translation_averaging", "Translation Averaging", Stage::MultiView, 44.0, 62.0),
    ("data_association", "Data Association w/ Track Filtering", Stage::MultiView, 58.0, 62.0),
    ("bundle_adjustment", "Bundle Adjustment", Stage::MultiView, 72.0, 62.0),
    ("optimized_poses", "Optimized Camera Poses", Stage::Output, 30.0, 81.0),
    ("sparse_tracks", "Optimized 3D Tracks", Stage::Output, 44.0, 81.0),
    ("dense_mvs", "Dense MVS (PatchmatchNet)", Stage::Output, 58.0, 81.0),
    ("dense_cloud", "Dense Point Cloud", Stage::Output, 72.0, 81.0),
    ("metrics_report", "Metrics Report (JSON)", Stage::Output, 86.0, 81.0),
];

const CONNECTORS: &[(&str, &str)] = &[
    ("scene_images", "data_loader"),
    ("data_loader", "image_i"),
    ("data_loader", "intrinsics"),
    ("data_loader", "image_pairs"),
    ("image_i", "detector"),
    ("detector", "keypoints"),
    ("keypoints", "descriptor"),
    ("descriptor", "descriptors"),
    ("descriptors", "matcher"),
    ("image_pairs", "matcher"),
    ("matcher", "putative"),
    ("putative", "verifier"),
    ("keypoints", "verifier"),
    ("intrinsics", "verifier"),
    ("verifier", "relative_rotation"),
    ("verifier", "relative_translation"),
    ("verifier", "verified_corr"),
    ("relative_rotation", "view_graph"),
    ("relative_translation", "view_graph"),
    ("view_graph", "rotation_averaging"),
    ("rotation_averaging", "translation_averaging"),
    ("translation_averaging", "data_association"),
    ("verified_corr", "data_association"),
    ("data_association", "bundle_adjustment"),
    ("bundle_adjustment", "optimized_poses"),
    ("bundle_adjustment", "sparse_tracks"),
    ("sparse_tracks", "dense_mvs"),
    ("dense_mvs", "dense_cloud"),
    ("bundle_adjustment", "metrics_report"),
];

/// Builds the compiled-in pipeline diagram.
///
/// The tables above are static, so an error here is a programming mistake; callers still treat
/// it as a fatal configuration error instead of panicking.
pub fn builtin_pipeline() -> Result<PipelineDiagram, DiagramConfigError> {
    let anchors = ANCHORS
        .iter()
        .map(|&(id, label, stage, top, left)| {
            let (text, background) = stage.colors();
            AnchorNode::new(parse_id("anchor id", id)?, label, text, background, top, left)
                .map_err(DiagramConfigError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let connectors = CONNECTORS
        .iter()
        .map(|&(source, target)| {
            Ok(Connector::new(
                parse_id("connector source", source)?,
                parse_id("connector target", target)?,
            ))
        })
        .collect::<Result<Vec<_>, DiagramConfigError>>()?;

    PipelineDiagram::new(AnchorRegistry::new(anchors)?, ConnectorList::new(connectors))
}

fn parse_id(field: &'static str, value: &str) -> Result<AnchorId, DiagramConfigError> {
    AnchorId::new(value).map_err(|source| DiagramConfigError::InvalidId {
        field,
        value: value.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{builtin_pipeline, ANCHORS, CONNECTORS};

    #[test]
    fn builtin_pipeline_validates() {
        let diagram = builtin_pipeline().expect("builtin pipeline must validate");
        assert_eq!(diagram.anchors().len(), ANCHORS.len());
        assert_eq!(diagram.connectors().len(), CONNECTORS.len());
    }

    #[test]
    fn every_builtin_anchor_is_connected() {
        let diagram = builtin_pipeline().unwrap();
        let touched = diagram
            .connectors()
            .iter()
            .flat_map(|c| [c.source().as_str(), c.target().as_str()])
            .collect::<BTreeSet<_>>();
        for anchor in diagram.anchors() {
            assert!(touched.contains(anchor.id().as_str()), "{} is isolated", anchor.id());
        }
    }

    #[test]
    fn builtin_connectors_are_not_duplicated() {
        let unique = CONNECTORS.iter().collect::<BTreeSet<_>>();
        assert_eq!(unique.len(), CONNECTORS.len());
    }
}
