// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::{AnchorError, AnchorId, AnchorNode, ColorError, Connector, IdError};

/// Ordered, read-only collection of the diagram's anchor nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnchorRegistry {
    anchors: Vec<AnchorNode>,
    index: BTreeMap<AnchorId, usize>,
}

impl AnchorRegistry {
    pub fn new(anchors: Vec<AnchorNode>) -> Result<Self, DiagramConfigError> {
        let mut index = BTreeMap::new();
        for (idx, anchor) in anchors.iter().enumerate() {
            if index.insert(anchor.id().clone(), idx).is_some() {
                return Err(DiagramConfigError::DuplicateAnchor {
                    anchor_id: anchor.id().clone(),
                });
            }
        }
        Ok(Self { anchors, index })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnchorNode> {
        self.anchors.iter()
    }

    pub fn as_slice(&self) -> &[AnchorNode] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AnchorNode> {
        self.index.get(id).map(|&idx| &self.anchors[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }
}

impl<'a> IntoIterator for &'a AnchorRegistry {
    type Item = &'a AnchorNode;
    type IntoIter = std::slice::Iter<'a, AnchorNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ordered, read-only collection of directed connectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectorList {
    connectors: Vec<Connector>,
}

impl ConnectorList {
    pub fn new(connectors: Vec<Connector>) -> Self {
        Self { connectors }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connector> {
        self.connectors.iter()
    }

    pub fn as_slice(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Checks that every connector endpoint names an anchor in `registry`.
    ///
    /// The first unresolved endpoint (in declaration order, source before target) is reported.
    pub fn validate_against(&self, registry: &AnchorRegistry) -> Result<(), DiagramConfigError> {
        for (connector_index, connector) in self.connectors.iter().enumerate() {
            for endpoint in [connector.source(), connector.target()] {
                if !registry.contains(endpoint.as_str()) {
                    return Err(DiagramConfigError::UnknownAnchor {
                        connector_index,
                        connector: connector.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ConnectorList {
    type Item = &'a Connector;
    type IntoIter = std::slice::Iter<'a, Connector>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A validated pair of anchor registry and connector list.
///
/// Construction is the startup check: a diagram whose connectors reference unknown anchors is
/// never built.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDiagram {
    anchors: AnchorRegistry,
    connectors: ConnectorList,
}

impl PipelineDiagram {
    pub fn new(
        anchors: AnchorRegistry,
        connectors: ConnectorList,
    ) -> Result<Self, DiagramConfigError> {
        connectors.validate_against(&anchors)?;
        Ok(Self {
            anchors,
            connectors,
        })
    }

    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn connectors(&self) -> &ConnectorList {
        &self.connectors
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagramConfigError {
    DuplicateAnchor {
        anchor_id: AnchorId,
    },
    UnknownAnchor {
        connector_index: usize,
        connector: Connector,
        missing: AnchorId,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    InvalidColor {
        anchor_id: AnchorId,
        field: &'static str,
        source: ColorError,
    },
    InvalidAnchor(AnchorError),
}

impl fmt::Display for DiagramConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAnchor { anchor_id } => write!(f, "duplicate anchor id {anchor_id}"),
            Self::UnknownAnchor {
                connector_index,
                connector,
                missing,
            } => write!(
                f,
                "connector #{connector_index} ({connector}) references unknown anchor {missing}"
            ),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid {field} {value:?}: {source}"),
            Self::InvalidColor {
                anchor_id,
                field,
                source,
            } => write!(f, "anchor {anchor_id}: invalid {field}: {source}"),
            Self::InvalidAnchor(source) => source.fmt(f),
        }
    }
}

impl std::error::Error for DiagramConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidColor { source, .. } => Some(source),
            Self::InvalidAnchor(source) => Some(source),
            Self::DuplicateAnchor { .. } | Self::UnknownAnchor { .. } => None,
        }
    }
}

impl From<AnchorError> for DiagramConfigError {
    fn from(value: AnchorError) -> Self {
        Self::InvalidAnchor(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AnchorRegistry, ConnectorList, DiagramConfigError, PipelineDiagram};
    use crate::model::fixtures::{anchor, connector};

    #[test]
    fn registry_keeps_declaration_order() {
        let registry =
            AnchorRegistry::new(vec![anchor("c", 0.0, 0.0), anchor("a", 10.0, 10.0)]).unwrap();
        let ids = registry.iter().map(|a| a.id().as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(registry.get("a").map(|a| a.label()), Some("A"));
    }

    #[test]
    fn registry_rejects_duplicate_ids() {
        let err = AnchorRegistry::new(vec![anchor("a", 0.0, 0.0), anchor("a", 50.0, 50.0)])
            .unwrap_err();
        assert!(matches!(err, DiagramConfigError::DuplicateAnchor { anchor_id } if anchor_id.as_str() == "a"));
    }

    #[test]
    fn two_anchor_diagram_accepts_single_connector() {
        let anchors =
            AnchorRegistry::new(vec![anchor("A", 10.0, 10.0), anchor("B", 10.0, 60.0)]).unwrap();
        let diagram = PipelineDiagram::new(anchors, ConnectorList::new(vec![connector("A", "B")]))
            .expect("valid diagram");
        assert_eq!(diagram.connectors().len(), 1);
        let only = &diagram.connectors().as_slice()[0];
        assert_eq!((only.source().as_str(), only.target().as_str()), ("A", "B"));
    }

    #[test]
    fn removing_a_referenced_anchor_is_rejected_at_startup() {
        let anchors = AnchorRegistry::new(vec![anchor("B", 10.0, 60.0)]).unwrap();
        let err = PipelineDiagram::new(anchors, ConnectorList::new(vec![connector("A", "B")]))
            .unwrap_err();
        match err {
            DiagramConfigError::UnknownAnchor {
                connector_index,
                missing,
                ..
            } => {
                assert_eq!(connector_index, 0);
                assert_eq!(missing.as_str(), "A");
            }
            other => panic!("expected UnknownAnchor, got {other:?}"),
        }
    }

    #[test]
    fn unknown_target_is_reported_with_its_connector() {
        let anchors = AnchorRegistry::new(vec![anchor("A", 10.0, 10.0)]).unwrap();
        let connectors = ConnectorList::new(vec![connector("A", "A"), connector("A", "Z")]);
        let err = connectors.validate_against(&anchors).unwrap_err();
        assert_eq!(
            err.to_string(),
            "connector #1 (A -> Z) references unknown anchor Z"
        );
    }
}
