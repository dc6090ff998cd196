// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram data model.
//!
//! A diagram is an ordered anchor registry plus an ordered list of directed connectors between
//! anchor ids. Both are immutable after startup.

pub mod anchor;
pub mod connector;
pub(crate) mod fixtures;
pub mod ids;
pub mod pipeline;
pub mod registry;

pub use anchor::{AnchorError, AnchorNode, ColorError, OffsetAxis, Rgb, LEFT_SHIFT, TOP_SHIFT};
pub use connector::Connector;
pub use ids::{AnchorId, IdError};
pub use pipeline::builtin_pipeline;
pub use registry::{AnchorRegistry, ConnectorList, DiagramConfigError, PipelineDiagram};
