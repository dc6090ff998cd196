// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pipegraph — pipeline diagram TUI with JSON summary overlays.
//!
//! A fixed set of anchor boxes is laid out on a board, joined by arrow connectors that follow the
//! anchors whenever the board moves. Two overlay panels show JSON summaries loaded from files.

pub mod ingest;
pub mod layout;
pub mod logging;
pub mod model;
pub mod overlay;
pub mod render;
pub mod store;
pub mod tui;

#[cfg(test)]
mod test_support;
