//! Loading input snapshots.
//!
//! A snapshot comes from a JSON file, from stdin, or is explicitly absent
//! (the "before" of a creation or the "after" of a deletion).

use std::io::Read;
use std::path::PathBuf;

use arbor_types::Node;
use serde_json::Value;
use tracing::debug;

use crate::error::{ReconcileError, ReconcileResult};

/// Argument spelling for a missing snapshot.
pub const ABSENT_ARG: &str = ":absent";

/// Where a snapshot is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentSource {
    /// No document: the snapshot is [`Node::Absent`].
    Absent,
    /// JSON read from standard input.
    Stdin,
    /// JSON read from a file.
    File(PathBuf),
}

impl DocumentSource {
    /// Interpret a command-line argument: `-` is stdin, `:absent` is no
    /// document, anything else a file.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "-" => Self::Stdin,
            ABSENT_ARG => Self::Absent,
            _ => Self::File(PathBuf::from(arg)),
        }
    }

    /// Human-readable origin used in error messages.
    pub fn origin(&self) -> String {
        match self {
            Self::Absent => "<absent>".to_string(),
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    fn read_text(&self) -> ReconcileResult<Option<String>> {
        let io_err = |source| ReconcileError::Io {
            origin: self.origin(),
            source,
        };
        match self {
            Self::Absent => Ok(None),
            Self::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text).map_err(io_err)?;
                Ok(Some(text))
            }
            Self::File(path) => std::fs::read_to_string(path).map(Some).map_err(io_err),
        }
    }

    /// Read and parse the document without materializing it.
    pub fn load_value(&self) -> ReconcileResult<Value> {
        let Some(text) = self.read_text()? else {
            return Ok(Value::Null);
        };
        let value: Value = serde_json::from_str(&text).map_err(|e| ReconcileError::Parse {
            origin: self.origin(),
            source: e.into(),
        })?;
        debug!(origin = %self.origin(), bytes = text.len(), "loaded document");
        Ok(value)
    }

    /// Read, parse, and materialize the document as a [`Node`].
    pub fn load(&self) -> ReconcileResult<Node> {
        self.load_value().map(|value| Node::from_json(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "arbor-document-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn dash_is_stdin() {
        assert!(DocumentSource::from_arg("-").is_stdin());
        assert_eq!(DocumentSource::from_arg(":absent"), DocumentSource::Absent);
        assert_eq!(
            DocumentSource::from_arg("old.json"),
            DocumentSource::File(PathBuf::from("old.json"))
        );
    }

    #[test]
    fn absent_loads_as_absent() {
        assert!(DocumentSource::Absent.load().unwrap().is_absent());
        assert_eq!(DocumentSource::Absent.load_value().unwrap(), Value::Null);
    }

    #[test]
    fn loads_file() {
        let path = temp_file("valid", r#"{"value":"fake","list":[1,2]}"#);
        let node = DocumentSource::File(path.clone()).load().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(node, Node::from_json(&json!({ "value": "fake", "list": [1, 2] })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = DocumentSource::File(PathBuf::from("/nonexistent/arbor/missing.json"));
        match source.load() {
            Err(ReconcileError::Io { origin, .. }) => assert!(origin.contains("missing.json")),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let path = temp_file("invalid", "{ not json");
        let result = DocumentSource::File(path.clone()).load();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ReconcileError::Parse { .. })));
    }
}
