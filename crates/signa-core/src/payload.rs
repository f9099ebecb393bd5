//! Animation payload parsing
//!
//! The translation service returns its frames either as structured JSON or
//! as a JSON-encoded string. This is the single place where that loosely
//! shaped blob becomes a validated `KeyframeSequence` or a `PayloadError`.
//!
//! Accepted shapes:
//! - `[{"time": 0.0, "joints": {"wrist": [0, 0, 0]}}, ...]`
//! - `{"frames": [...]}`
//! - a string containing either of the above
//! - `null` (no animation)

use serde_json::{Map, Value};

use crate::{Keyframe, KeyframeSequence, PayloadError, Position3D};

/// Result of a successful parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFrames {
    pub sequence: KeyframeSequence,
    /// Joint entries dropped because their position was malformed
    pub skipped_joints: usize,
}

/// Parse a frames payload as found in a translation response.
pub fn parse_frames(value: &Value) -> Result<ParsedFrames, PayloadError> {
    match value {
        Value::String(text) => {
            let decoded: Value = serde_json::from_str(text)
                .map_err(|e| PayloadError::InvalidJson(e.to_string()))?;
            if decoded.is_string() {
                return Err(PayloadError::UnexpectedShape {
                    expected: "frame list",
                    found: "string",
                });
            }
            parse_structured(&decoded)
        }
        other => parse_structured(other),
    }
}

/// Parse raw payload text.
pub fn parse_frames_str(text: &str) -> Result<ParsedFrames, PayloadError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;
    parse_frames(&value)
}

fn parse_structured(value: &Value) -> Result<ParsedFrames, PayloadError> {
    match value {
        Value::Null => Ok(ParsedFrames::default()),
        Value::Array(items) => parse_frame_list(items),
        Value::Object(map) => match map.get("frames") {
            Some(Value::Array(items)) => parse_frame_list(items),
            Some(other) => Err(PayloadError::UnexpectedShape {
                expected: "frame list",
                found: value_kind(other),
            }),
            None => Err(PayloadError::UnexpectedShape {
                expected: "frame list",
                found: "object without frames",
            }),
        },
        other => Err(PayloadError::UnexpectedShape {
            expected: "frame list",
            found: value_kind(other),
        }),
    }
}

fn parse_frame_list(items: &[Value]) -> Result<ParsedFrames, PayloadError> {
    let mut frames = Vec::with_capacity(items.len());
    let mut skipped_joints = 0;

    for (index, item) in items.iter().enumerate() {
        let (frame, skipped) = parse_frame(index, item)?;
        skipped_joints += skipped;
        frames.push(frame);
    }

    Ok(ParsedFrames {
        sequence: KeyframeSequence::new(frames)?,
        skipped_joints,
    })
}

fn parse_frame(index: usize, value: &Value) -> Result<(Keyframe, usize), PayloadError> {
    let map = value
        .as_object()
        .ok_or(PayloadError::InvalidFrame { index })?;

    let time = match map.get("time") {
        None | Some(Value::Null) => return Err(PayloadError::MissingTime { index }),
        Some(t) => t.as_f64().ok_or(PayloadError::InvalidTime { index })?,
    };

    let mut frame = Keyframe::new(time);
    let skipped = match map.get("joints") {
        None | Some(Value::Null) => 0,
        Some(Value::Object(joints)) => parse_joints(index, joints, &mut frame),
        Some(_) => return Err(PayloadError::InvalidFrame { index }),
    };

    Ok((frame, skipped))
}

fn parse_joints(index: usize, joints: &Map<String, Value>, frame: &mut Keyframe) -> usize {
    let mut skipped = 0;
    for (name, raw) in joints {
        match parse_position(raw) {
            Some(position) => {
                frame.joints.insert(name.clone(), position);
            }
            None => {
                tracing::warn!(frame = index, joint = %name, "Skipping malformed joint position");
                skipped += 1;
            }
        }
    }
    skipped
}

fn parse_position(value: &Value) -> Option<Position3D> {
    let components = value.as_array()?;
    if components.len() != 3 {
        return None;
    }

    let mut xyz = [0.0f32; 3];
    for (slot, component) in xyz.iter_mut().zip(components) {
        let v = component.as_f64()? as f32;
        if !v.is_finite() {
            return None;
        }
        *slot = v;
    }
    Some(Position3D::from(xyz))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_array_payload() {
        let value = json!([
            {"time": 0.0, "joints": {"wrist": [0.0, 0.0, 0.0]}},
            {"time": 1.0, "joints": {"wrist": [1.0, 0.0, 0.0]}}
        ]);

        let parsed = parse_frames(&value).unwrap();
        assert_eq!(parsed.sequence.len(), 2);
        assert_eq!(parsed.skipped_joints, 0);
        assert_eq!(
            parsed.sequence.last().unwrap().joint("wrist"),
            Some(&Position3D::new(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_parse_encoded_string_payload() {
        let value = json!(r#"{"frames": [{"time": 0.25, "joints": {"elbow": [0, 1, 2]}}]}"#);

        let parsed = parse_frames(&value).unwrap();
        assert_eq!(parsed.sequence.len(), 1);
        assert_eq!(parsed.sequence.first().unwrap().time, 0.25);
    }

    #[test]
    fn test_parse_bad_json_string() {
        let value = json!("{bad json");
        assert!(matches!(
            parse_frames(&value),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_doubly_encoded_string_rejected() {
        let inner = serde_json::to_string("[]").unwrap();
        let value = Value::String(inner);
        assert_eq!(
            parse_frames(&value),
            Err(PayloadError::UnexpectedShape {
                expected: "frame list",
                found: "string"
            })
        );
    }

    #[test]
    fn test_null_is_empty() {
        let parsed = parse_frames(&Value::Null).unwrap();
        assert!(parsed.sequence.is_empty());
    }

    #[test]
    fn test_malformed_joint_skipped() {
        let value = json!([
            {"time": 0.0, "joints": {
                "wrist": [1.0, 2.0],
                "elbow": "up",
                "shoulder": [0.0, 1.0, 0.0]
            }}
        ]);

        let parsed = parse_frames(&value).unwrap();
        let frame = parsed.sequence.first().unwrap();
        assert_eq!(parsed.skipped_joints, 2);
        assert_eq!(frame.joints.len(), 1);
        assert!(frame.joint("shoulder").is_some());
    }

    #[test]
    fn test_missing_time() {
        let value = json!([{"joints": {}}]);
        assert_eq!(
            parse_frames(&value),
            Err(PayloadError::MissingTime { index: 0 })
        );
    }

    #[test]
    fn test_missing_joints_is_empty_frame() {
        let parsed = parse_frames(&json!([{"time": 2}])).unwrap();
        assert!(parsed.sequence.first().unwrap().joints.is_empty());
    }

    #[test]
    fn test_unordered_frames_rejected() {
        let value = json!([{"time": 1.0}, {"time": 0.0}]);
        assert!(matches!(
            parse_frames(&value),
            Err(PayloadError::OutOfOrder { index: 1, .. })
        ));
    }

    #[test]
    fn test_object_without_frames() {
        assert!(matches!(
            parse_frames(&json!({"movements": []})),
            Err(PayloadError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_parse_frames_str() {
        let parsed = parse_frames_str(r#"[{"time": 0.5, "joints": {"neck": [0, 0, 1]}}]"#).unwrap();
        assert_eq!(parsed.sequence.duration(), 0.5);
        assert!(parse_frames_str("not json").is_err());
    }
}
