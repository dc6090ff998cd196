// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! File logging.
//!
//! The TUI owns the terminal, so log output only ever goes to a file. Without a log file no
//! subscriber is installed and `tracing` macros are no-ops.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives, e.g. `pipegraph=debug`.
pub const LOG_ENV_VAR: &str = "PIPEGRAPH_LOG";

const DEFAULT_FILTER: &str = "info";

/// Filter from [`LOG_ENV_VAR`], or `info` when it is unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Appends formatted events to `path` for the rest of the process.
///
/// Fails if the file cannot be opened or a global subscriber is already set.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()?;
    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::open_log_file;
    use crate::test_support::TempDir;

    #[test]
    fn log_file_is_created_with_missing_parents() {
        let tmp = TempDir::new("logging");
        let path = tmp.path().join("nested/dir/pipegraph.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn log_file_is_appended_to() {
        use std::io::Write;

        let tmp = TempDir::new("logging-append");
        let path = tmp.write("pipegraph.log", "first\n");
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
