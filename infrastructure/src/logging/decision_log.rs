//! JSONL file writer for orchestration events.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use crate::config::FileLoggingConfig;
use chorus_application::{ConversationEvent, ConversationLogger, NoConversationLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Decision log that writes one JSON object per line.
///
/// Appends to an existing file so that restarts keep the audit trail.
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlDecisionLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlDecisionLog {
    /// Open (or create) the log at the given path.
    ///
    /// Creates parent directories if needed. Returns `None` if the file
    /// cannot be opened; callers fall back to `NoConversationLogger`.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create decision log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open decision log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Logger for the `[logging]` section: the JSONL log when `decision_log` is
/// set and can be opened, otherwise a no-op.
pub fn decision_logger(config: &FileLoggingConfig) -> Arc<dyn ConversationLogger> {
    match config.decision_log_path().and_then(JsonlDecisionLog::open) {
        Some(log) => Arc::new(log),
        None => Arc::new(NoConversationLogger),
    }
}

impl ConversationLogger for JsonlDecisionLog {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Merge payload with type + timestamp
        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!("Writing decision log {} failed: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlDecisionLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_domain::{
        ConversationId, DecisionSource, PersonaId, StopReason, TurnDecision, TurnFactors,
    };

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("decisions.jsonl");
        let log = JsonlDecisionLog::open(&path).unwrap();
        let id = ConversationId::new("c-1");

        let decision = TurnDecision::new(
            PersonaId::new("alice"),
            "Most relevant to the question",
            0.82,
            TurnFactors::default(),
            DecisionSource::Weighted,
        );
        log.log(ConversationEvent::turn_decision(&id, &decision));
        log.log(ConversationEvent::auto_run_stopped(
            &id,
            7,
            3,
            &StopReason::CeilingReached,
        ));
        drop(log);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("timestamp").is_some());
            assert_eq!(record["conversation_id"], "c-1");
        }

        assert_eq!(records[0]["type"], "turn_decision");
        assert_eq!(records[0]["persona_id"], "alice");
        assert_eq!(records[0]["source"], "weighted");

        assert_eq!(records[1]["type"], "auto_run_stopped");
        assert_eq!(records[1]["run_id"], 7);
        assert_eq!(records[1]["stop_reason"]["kind"], "ceiling_reached");
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let log = JsonlDecisionLog::open(&path).unwrap();

        log.log(ConversationEvent::new(
            "custom",
            serde_json::json!("just a string"),
        ));
        drop(log);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "custom");
        assert_eq!(records[0]["data"], "just a string");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.jsonl");
        let id = ConversationId::new("c-1");

        for run_id in 1..=2 {
            let log = JsonlDecisionLog::open(&path).unwrap();
            log.log(ConversationEvent::auto_run_started(&id, run_id));
        }

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["run_id"], 2);
    }

    #[test]
    fn test_logger_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("from-config.jsonl");
        let config = FileLoggingConfig {
            verbosity: 0,
            decision_log: Some(path.clone()),
        };

        let logger = decision_logger(&config);
        logger.log(ConversationEvent::auto_run_started(&ConversationId::new("c-9"), 1));
        drop(logger);

        assert_eq!(read_lines(&path)[0]["conversation_id"], "c-9");
    }

    #[test]
    fn test_directory_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlDecisionLog::open(dir.path()).is_none());
    }
}
