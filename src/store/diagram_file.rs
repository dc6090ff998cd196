// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    AnchorId, AnchorNode, AnchorRegistry, Connector, ConnectorList, DiagramConfigError,
    PipelineDiagram, Rgb,
};

/// On-disk form of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DiagramFile {
    /// Anchor nodes in drawing order.
    pub anchors: Vec<AnchorRecord>,
    /// Directed connectors; each endpoint must name an anchor id.
    #[serde(default)]
    pub connectors: Vec<ConnectorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AnchorRecord {
    /// Unique, whitespace-free identifier.
    pub id: String,
    pub label: String,
    /// `#rrggbb`, `#rgb`, `black` or `white`.
    pub text_color: String,
    /// `#rrggbb`, `#rgb`, `black` or `white`.
    pub background_color: String,
    /// Offset from the top edge of the board, in percent (0-100).
    pub top: f64,
    /// Offset from the left edge of the board, in percent (0-100).
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConnectorRecord {
    pub source: String,
    pub target: String,
}

impl DiagramFile {
    pub fn from_diagram(diagram: &PipelineDiagram) -> Self {
        Self {
            anchors: diagram
                .anchors()
                .iter()
                .map(|anchor| AnchorRecord {
                    id: anchor.id().to_string(),
                    label: anchor.label().to_owned(),
                    text_color: anchor.text_color().to_string(),
                    background_color: anchor.background_color().to_string(),
                    top: anchor.top_percent(),
                    left: anchor.left_percent(),
                })
                .collect(),
            connectors: diagram
                .connectors()
                .iter()
                .map(|connector| ConnectorRecord {
                    source: connector.source().to_string(),
                    target: connector.target().to_string(),
                })
                .collect(),
        }
    }

    /// Validates every record and builds the diagram.
    pub fn into_diagram(self) -> Result<PipelineDiagram, DiagramConfigError> {
        let mut anchors = Vec::with_capacity(self.anchors.len());
        for record in self.anchors {
            let id = parse_id("anchor id", &record.id)?;
            let text_color = parse_color(&id, "text_color", &record.text_color)?;
            let background_color = parse_color(&id, "background_color", &record.background_color)?;
            anchors.push(AnchorNode::new(
                id,
                record.label,
                text_color,
                background_color,
                record.top,
                record.left,
            )?);
        }

        let connectors = self
            .connectors
            .into_iter()
            .map(|record| {
                Ok(Connector::new(
                    parse_id("connector source", &record.source)?,
                    parse_id("connector target", &record.target)?,
                ))
            })
            .collect::<Result<Vec<_>, DiagramConfigError>>()?;

        PipelineDiagram::new(AnchorRegistry::new(anchors)?, ConnectorList::new(connectors))
    }
}

fn parse_id(field: &'static str, value: &str) -> Result<AnchorId, DiagramConfigError> {
    AnchorId::new(value).map_err(|source| DiagramConfigError::InvalidId {
        field,
        value: value.to_owned(),
        source,
    })
}

fn parse_color(
    anchor_id: &AnchorId,
    field: &'static str,
    value: &str,
) -> Result<Rgb, DiagramConfigError> {
    Rgb::parse(value).map_err(|source| DiagramConfigError::InvalidColor {
        anchor_id: anchor_id.clone(),
        field,
        source,
    })
}

/// Reads and validates the diagram file at `path`.
pub fn load_diagram(path: impl AsRef<Path>) -> Result<PipelineDiagram, StoreError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: DiagramFile = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let diagram = file.into_diagram().map_err(|source| StoreError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        anchors = diagram.anchors().len(),
        connectors = diagram.connectors().len(),
        "diagram file loaded"
    );
    Ok(diagram)
}

/// JSON schema of [`DiagramFile`], pretty-printed.
pub fn diagram_file_schema() -> String {
    let schema = schemars::schema_for!(DiagramFile);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_owned())
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Config {
        path: PathBuf,
        source: DiagramConfigError,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Config { path, source } => write!(f, "invalid diagram in {path:?}: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Config { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests;
