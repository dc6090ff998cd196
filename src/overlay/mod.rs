// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Overlay state: one visibility flag and one payload slot per overlay category.
//!
//! [`OverlayController`] is the only owner of that state. Payloads arrive solely through
//! ingest completions; panels can hide themselves without losing their payload.

use std::fmt;

use serde_json::Value;

use crate::ingest::{IngestCompletion, IngestTicket};

mod panel;

pub use panel::{panel_lines, MAX_ARRAY_ITEMS, NO_DATA_PLACEHOLDER, NULL_PLACEHOLDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverlayCategory {
    FrontendSummary,
    OptimizerSummary,
}

impl OverlayCategory {
    pub const ALL: [Self; 2] = [Self::FrontendSummary, Self::OptimizerSummary];

    pub fn title(self) -> &'static str {
        match self {
            Self::FrontendSummary => "Frontend summary",
            Self::OptimizerSummary => "MVO metrics",
        }
    }

    /// Key that toggles the panel.
    pub fn toggle_key(self) -> char {
        match self {
            Self::FrontendSummary => '1',
            Self::OptimizerSummary => '2',
        }
    }

    /// Key that opens the file prompt for this category.
    pub fn pick_key(self) -> char {
        match self {
            Self::FrontendSummary => 'f',
            Self::OptimizerSummary => 'm',
        }
    }

    fn index(self) -> usize {
        match self {
            Self::FrontendSummary => 0,
            Self::OptimizerSummary => 1,
        }
    }
}

impl fmt::Display for OverlayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Visibility and last loaded payload of one category. Starts hidden and empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayState {
    visible: bool,
    payload: Option<Value>,
}

impl OverlayState {
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// The payload was replaced and the panel shown.
    Applied,
    /// The read or parse failed; state is unchanged apart from the recorded error.
    Failed { message: String },
    /// A newer ingest for the same category was issued; the completion was ignored.
    Stale,
}

#[derive(Debug, Clone, Default)]
struct OverlaySlot {
    state: OverlayState,
    latest_ticket: Option<IngestTicket>,
    last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayController {
    slots: [OverlaySlot; 2],
    issued: u64,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, category: OverlayCategory) -> &OverlayState {
        &self.slots[category.index()].state
    }

    pub fn last_error(&self, category: OverlayCategory) -> Option<&str> {
        self.slots[category.index()].last_error.as_deref()
    }

    /// Issues the ticket for a new ingest into `category`, superseding any in flight.
    pub fn begin_ingest(&mut self, category: OverlayCategory) -> IngestTicket {
        self.issued += 1;
        let ticket = IngestTicket::new(self.issued);
        self.slots[category.index()].latest_ticket = Some(ticket);
        ticket
    }

    /// Applies an ingest result. Only the most recently issued ticket of a category counts.
    pub fn apply_completion(&mut self, completion: IngestCompletion) -> CompletionOutcome {
        let IngestCompletion {
            ticket,
            category,
            path,
            result,
        } = completion;

        let slot = &mut self.slots[category.index()];
        if slot.latest_ticket.is_some_and(|latest| ticket < latest) {
            tracing::info!(
                %category,
                %ticket,
                path = %path.display(),
                "ignoring stale ingest completion"
            );
            return CompletionOutcome::Stale;
        }

        match result {
            Ok(value) => {
                tracing::info!(%category, %ticket, path = %path.display(), "ingest applied");
                self.on_ingest_complete(category, value);
                CompletionOutcome::Applied
            }
            Err(err) => {
                let file = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                );
                let message = format!("Failed to load {file}: {err}");
                tracing::warn!(%category, %ticket, error = %err, "ingest failed");
                slot.last_error = Some(message.clone());
                CompletionOutcome::Failed { message }
            }
        }
    }

    /// Replaces the payload of `category` in full and shows its panel.
    pub fn on_ingest_complete(&mut self, category: OverlayCategory, payload: Value) {
        let slot = &mut self.slots[category.index()];
        slot.state.payload = Some(payload);
        slot.state.visible = true;
        slot.last_error = None;
    }

    /// Shows or hides the panel; the payload is kept either way.
    pub fn set_visible(&mut self, category: OverlayCategory, visible: bool) {
        let slot = &mut self.slots[category.index()];
        if slot.state.visible != visible {
            tracing::debug!(%category, visible, "overlay visibility changed");
        }
        slot.state.visible = visible;
    }

    /// Flips visibility and returns the new value.
    pub fn toggle(&mut self, category: OverlayCategory) -> bool {
        let visible = !self.state(category).visible;
        self.set_visible(category, visible);
        visible
    }

    /// Panels to mount, in category order, each with its current payload (possibly none).
    pub fn mounted_panels(&self) -> impl Iterator<Item = (OverlayCategory, Option<&Value>)> + '_ {
        OverlayCategory::ALL.into_iter().filter_map(move |category| {
            let state = self.state(category);
            state.visible.then(|| (category, state.payload()))
        })
    }

    pub fn any_mounted(&self) -> bool {
        self.mounted_panels().next().is_some()
    }
}
