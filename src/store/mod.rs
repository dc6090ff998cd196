// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Declarative diagram files.
//!
//! A diagram file lists anchor records and connector id pairs as JSON. It replaces the built-in
//! pipeline when passed on the command line and is validated in full before anything is drawn.

pub mod diagram_file;

pub use diagram_file::{
    diagram_file_schema, load_diagram, AnchorRecord, ConnectorRecord, DiagramFile, StoreError,
};
