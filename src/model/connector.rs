// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::AnchorId;

/// A directed edge between two anchors; the arrowhead sits at `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connector {
    source: AnchorId,
    target: AnchorId,
}

impl Connector {
    pub fn new(source: AnchorId, target: AnchorId) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &AnchorId {
        &self.source
    }

    pub fn target(&self) -> &AnchorId {
        &self.target
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
