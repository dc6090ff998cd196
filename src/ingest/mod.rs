// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pipegraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Asynchronous JSON file ingestion.
//!
//! Reads run as tasks on a tokio runtime; their results come back as [`IngestCompletion`] values
//! on a channel that the UI loop drains from its own thread, so overlay state is only ever
//! mutated in one place.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use crate::overlay::OverlayCategory;

/// Identifies one ingest request. Tickets issued later compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngestTicket(u64);

impl IngestTicket {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for IngestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.get())
    }
}

/// Result of one ingest request, delivered exactly once per [`IngestService::ingest`] call.
#[derive(Debug)]
pub struct IngestCompletion {
    pub ticket: IngestTicket,
    pub category: OverlayCategory,
    pub path: PathBuf,
    pub result: Result<Value, IngestError>,
}

#[derive(Debug)]
pub enum IngestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    TimedOut {
        path: PathBuf,
        after: Duration,
    },
}

impl IngestError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::TimedOut { path, .. } => path,
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "{} is not valid JSON: {source}", path.display())
            }
            Self::TimedOut { path, after } => {
                write!(f, "reading {} timed out after {}ms", path.display(), after.as_millis())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::TimedOut { .. } => None,
        }
    }
}

/// Reads `path` as UTF-8 text and parses it as one JSON value.
///
/// No size or content-type checks are made; the value is returned opaquely.
pub async fn read_json_file(path: impl AsRef<Path>) -> Result<Value, IngestError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_with_timeout(path: &Path, timeout: Option<Duration>) -> Result<Value, IngestError> {
    let Some(after) = timeout else {
        return read_json_file(path).await;
    };
    match tokio::time::timeout(after, read_json_file(path)).await {
        Ok(result) => result,
        Err(_) => Err(IngestError::TimedOut {
            path: path.to_path_buf(),
            after,
        }),
    }
}

/// Spawns file reads on a runtime and hands their completions back to the caller's thread.
#[derive(Debug)]
pub struct IngestService {
    handle: Handle,
    timeout: Option<Duration>,
    sender: UnboundedSender<IngestCompletion>,
    receiver: UnboundedReceiver<IngestCompletion>,
}

impl IngestService {
    pub fn new(handle: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            handle,
            timeout: None,
            sender,
            receiver,
        }
    }

    /// Fails reads that take longer than `timeout`. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Starts reading `path`. Returns immediately; the completion arrives later through
    /// [`Self::poll_completions`] or [`Self::next_completion`].
    pub fn ingest(&self, category: OverlayCategory, ticket: IngestTicket, path: impl Into<PathBuf>) {
        let path = path.into();
        let sender = self.sender.clone();
        let timeout = self.timeout;
        tracing::info!(%category, %ticket, path = %path.display(), "ingest started");

        self.handle.spawn(async move {
            let result = read_with_timeout(&path, timeout).await;
            let completion = IngestCompletion {
                ticket,
                category,
                path,
                result,
            };
            // The receiver lives as long as the service; a closed channel means the UI is gone.
            let _ = sender.send(completion);
        });
    }

    /// Drains every completion that has arrived so far without waiting.
    pub fn poll_completions(&mut self) -> Vec<IngestCompletion> {
        let mut out = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Waits for the next completion.
    pub async fn next_completion(&mut self) -> Option<IngestCompletion> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::{read_json_file, IngestError, IngestService, IngestTicket};
    use crate::overlay::OverlayCategory;
    use crate::test_support::TempDir;

    #[tokio::test]
    async fn reads_and_parses_a_json_object() {
        let tmp = TempDir::new("ingest-ok");
        let path = tmp.write("summary.json", r#"{"a":1,"b":[2,3]}"#);

        let value = read_json_file(&path).await.unwrap();
        assert_eq!(value, json!({"a": 1, "b": [2, 3]}));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let tmp = TempDir::new("ingest-bad");
        let path = tmp.write("broken.json", "{not json");

        let err = read_json_file(&path).await.unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }), "{err:?}");
        assert_eq!(err.path(), path.as_path());
        assert!(err.to_string().contains("is not valid JSON"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let tmp = TempDir::new("ingest-missing");
        let err = read_json_file(tmp.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn non_utf8_file_is_an_io_error() {
        let tmp = TempDir::new("ingest-binary");
        let path = tmp.path().join("blob.json");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_json_file(&path).await.unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn service_delivers_one_completion_per_request() {
        let tmp = TempDir::new("ingest-service");
        let frontend = tmp.write("frontend.json", r#"{"frames": 120}"#);
        let mvo = tmp.write("mvo.json", "[1, 2, 3]");

        let mut service = IngestService::new(tokio::runtime::Handle::current());
        service.ingest(OverlayCategory::FrontendSummary, IngestTicket::new(1), &frontend);
        service.ingest(OverlayCategory::OptimizerSummary, IngestTicket::new(2), &mvo);

        let mut completions = vec![
            service.next_completion().await.unwrap(),
            service.next_completion().await.unwrap(),
        ];
        completions.sort_by_key(|completion| completion.ticket);

        assert_eq!(completions[0].category, OverlayCategory::FrontendSummary);
        assert_eq!(completions[0].path, frontend);
        assert_eq!(completions[0].result.as_ref().unwrap(), &json!({"frames": 120}));
        assert_eq!(completions[1].category, OverlayCategory::OptimizerSummary);
        assert_eq!(completions[1].result.as_ref().unwrap(), &json!([1, 2, 3]));
        assert!(service.poll_completions().is_empty());
    }

    #[tokio::test]
    async fn poll_returns_nothing_before_work_is_done() {
        let mut service = IngestService::new(tokio::runtime::Handle::current())
            .with_timeout(Some(Duration::from_secs(5)));
        assert!(service.poll_completions().is_empty());
        assert_eq!(service.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn tickets_order_by_issue() {
        assert!(IngestTicket::new(2) > IngestTicket::new(1));
        assert_eq!(IngestTicket::new(7).to_string(), "#7");
    }
}
