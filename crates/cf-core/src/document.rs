//! Versioned project document: the single flat file a canvas is saved to.
//!
//! Decoding fails closed. The top-level shape is checked field by field,
//! then every node and edge record is decoded; the first problem aborts the
//! whole document so callers never see a partial result.

use crate::model::{Edge, Node, Scene};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Format version stamped on every saved document.
pub const FORMAT_VERSION: &str = "1.0.0";

/// The persisted form of a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub format_version: String,
    pub saved_at_epoch_ms: i64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ProjectDocument {
    /// Split into the `(nodes, edges)` scene, dropping the envelope.
    pub fn into_scene(self) -> Scene {
        Scene::new(self.nodes, self.edges)
    }
}

/// A document that does not have the expected structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("not valid JSON: {0}")]
    Syntax(String),
    #[error("document root must be an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("{field}[{index}] is not a valid record: {reason}")]
    InvalidRecord {
        field: &'static str,
        index: usize,
        reason: String,
    },
    #[error("failed to encode document: {0}")]
    Encode(String),
}

// ─── Encode ──────────────────────────────────────────────────────────────

/// Wrap a scene in a document stamped with the current wall-clock time.
#[must_use]
pub fn encode(scene: &Scene) -> ProjectDocument {
    encode_at(scene, Utc::now())
}

/// Wrap a scene in a document stamped with `saved_at`.
#[must_use]
pub fn encode_at(scene: &Scene, saved_at: DateTime<Utc>) -> ProjectDocument {
    ProjectDocument {
        format_version: FORMAT_VERSION.to_string(),
        saved_at_epoch_ms: saved_at.timestamp_millis(),
        nodes: scene.nodes.clone(),
        edges: scene.edges.clone(),
    }
}

/// Render a document as pretty-printed JSON (two-space indent).
pub fn to_json(doc: &ProjectDocument) -> Result<String, ValidationError> {
    serde_json::to_string_pretty(doc).map_err(|e| ValidationError::Encode(e.to_string()))
}

// ─── Decode ──────────────────────────────────────────────────────────────

/// Parse and validate a saved document.
///
/// # Errors
/// Any syntax error, missing or mistyped top-level field, or undecodable
/// node/edge record.
pub fn decode(bytes: &[u8]) -> Result<ProjectDocument, ValidationError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ValidationError::Syntax(e.to_string()))?;
    let Value::Object(root) = value else {
        return Err(ValidationError::NotAnObject);
    };

    let format_version = match require(&root, "formatVersion")? {
        Value::String(s) => s.clone(),
        _ => {
            return Err(ValidationError::WrongType {
                field: "formatVersion",
                expected: "a string",
            });
        }
    };

    let saved_at_epoch_ms = match require(&root, "savedAtEpochMs")? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .ok_or(ValidationError::WrongType {
                field: "savedAtEpochMs",
                expected: "a number",
            })?,
        _ => {
            return Err(ValidationError::WrongType {
                field: "savedAtEpochMs",
                expected: "a number",
            });
        }
    };

    let nodes = records(&root, "nodes")?;
    let edges = records(&root, "edges")?;

    if format_version != FORMAT_VERSION {
        log::debug!("decoding document with format version {format_version}");
    }

    Ok(ProjectDocument {
        format_version,
        saved_at_epoch_ms,
        nodes,
        edges,
    })
}

fn require<'a>(root: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    root.get(field).ok_or(ValidationError::MissingField(field))
}

/// Decode an array field whose elements must all be objects of type `T`.
fn records<T>(root: &Map<String, Value>, field: &'static str) -> Result<Vec<T>, ValidationError>
where
    T: for<'de> Deserialize<'de>,
{
    let Value::Array(items) = require(root, field)? else {
        return Err(ValidationError::WrongType {
            field,
            expected: "an array",
        });
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(ValidationError::InvalidRecord {
                    field,
                    index,
                    reason: "expected an object".into(),
                });
            }
            T::deserialize(item).map_err(|e| ValidationError::InvalidRecord {
                field,
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::{NodeData, NodeKind, Point};
    use pretty_assertions::assert_eq;

    fn sample_scene() -> Scene {
        let group = Node::new(NodeId::intern("doc_group"), NodeKind::Group, Point::new(0.0, 0.0))
            .with_data(NodeData::labeled("Sprint"));
        let card = Node::new(NodeId::intern("doc_card"), NodeKind::Generic, Point::ORIGIN)
            .with_data(NodeData::default_for(NodeKind::Generic))
            .inside(group.id, Point::new(20.0, 30.5));
        let edge = Edge::new(NodeId::intern("doc_edge"), group.id, card.id);
        Scene::new(vec![group, card], vec![edge])
    }

    #[test]
    fn encode_stamps_envelope() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let doc = encode_at(&sample_scene(), at);
        assert_eq!(doc.format_version, "1.0.0");
        assert_eq!(doc.saved_at_epoch_ms, 1_700_000_000_123);
    }

    #[test]
    fn json_roundtrip() {
        let scene = sample_scene();
        let doc = encode(&scene);
        let text = to_json(&doc).unwrap();
        assert!(text.contains("\"formatVersion\": \"1.0.0\""));

        let back = decode(text.as_bytes()).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.into_scene(), scene);
    }

    #[test]
    fn fractional_timestamp_is_accepted() {
        let text = r#"{"formatVersion":"1.0.0","savedAtEpochMs":12.9,"nodes":[],"edges":[]}"#;
        assert_eq!(decode(text.as_bytes()).unwrap().saved_at_epoch_ms, 12);
    }

    #[test]
    fn rejects_bad_shapes() {
        let cases: &[(&str, ValidationError)] = &[
            ("[]", ValidationError::NotAnObject),
            (
                r#"{"savedAtEpochMs":1,"nodes":[],"edges":[]}"#,
                ValidationError::MissingField("formatVersion"),
            ),
            (
                r#"{"formatVersion":1,"savedAtEpochMs":1,"nodes":[],"edges":[]}"#,
                ValidationError::WrongType {
                    field: "formatVersion",
                    expected: "a string",
                },
            ),
            (
                r#"{"formatVersion":"1.0.0","savedAtEpochMs":"now","nodes":[],"edges":[]}"#,
                ValidationError::WrongType {
                    field: "savedAtEpochMs",
                    expected: "a number",
                },
            ),
            (
                r#"{"formatVersion":"1.0.0","savedAtEpochMs":1,"nodes":{},"edges":[]}"#,
                ValidationError::WrongType {
                    field: "nodes",
                    expected: "an array",
                },
            ),
            (
                r#"{"formatVersion":"1.0.0","savedAtEpochMs":1,"nodes":[],"edges":[3]}"#,
                ValidationError::InvalidRecord {
                    field: "edges",
                    index: 0,
                    reason: "expected an object".into(),
                },
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(&decode(input.as_bytes()).unwrap_err(), expected, "input: {input}");
        }
    }

    #[test]
    fn rejects_malformed_node_record() {
        let text = r#"{"formatVersion":"1.0.0","savedAtEpochMs":1,
            "nodes":[{"id":"n1","kind":"spaceship","position":{"x":0,"y":0},"data":{"label":""}}],
            "edges":[]}"#;
        match decode(text.as_bytes()) {
            Err(ValidationError::InvalidRecord { field, index, .. }) => {
                assert_eq!(field, "nodes");
                assert_eq!(index, 0);
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            decode(b"{not json"),
            Err(ValidationError::Syntax(_))
        ));
    }
}
