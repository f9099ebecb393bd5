//! Classifier output types
//!
//! Field aliases accept the camelCase names used by common vision SDKs
//! (`categoryName`, `score`), so recordings can be replayed unchanged.

use serde::{Deserialize, Serialize};

/// One ranked prediction for one hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    #[serde(alias = "categoryName")]
    pub category: String,
    /// In [0, 1]
    #[serde(alias = "score", default)]
    pub confidence: f32,
}

impl GestureEvent {
    pub fn new(category: impl Into<String>, confidence: f32) -> Self {
        Self {
            category: category.into(),
            confidence,
        }
    }
}

/// Normalized image coordinates of one hand landmark
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// Landmarks and ranked gestures for one detected hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    /// Highest confidence first
    #[serde(default)]
    pub gestures: Vec<GestureEvent>,
}

/// Everything the classifier found in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    #[serde(default)]
    pub hands: Vec<HandResult>,
}

impl Recognition {
    /// Frame with no hands
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single hand with a single prediction
    pub fn single(category: impl Into<String>, confidence: f32) -> Self {
        Self {
            hands: vec![HandResult {
                landmarks: Vec::new(),
                gestures: vec![GestureEvent::new(category, confidence)],
            }],
        }
    }

    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }

    /// Top prediction of the first hand; other hands are not consulted
    pub fn top_gesture(&self) -> Option<&GestureEvent> {
        self.hands.first()?.gestures.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_gesture_first_hand_only() {
        let rec = Recognition {
            hands: vec![
                HandResult {
                    landmarks: vec![],
                    gestures: vec![
                        GestureEvent::new("Victory", 0.9),
                        GestureEvent::new("Open_Palm", 0.05),
                    ],
                },
                HandResult {
                    landmarks: vec![],
                    gestures: vec![GestureEvent::new("Thumbs_Up", 0.99)],
                },
            ],
        };
        assert_eq!(rec.top_gesture().unwrap().category, "Victory");
    }

    #[test]
    fn test_hand_without_gestures() {
        let rec = Recognition {
            hands: vec![HandResult::default()],
        };
        assert!(rec.has_hands());
        assert!(rec.top_gesture().is_none());
        assert!(Recognition::empty().top_gesture().is_none());
    }

    #[test]
    fn test_sdk_field_names() {
        let rec: Recognition = serde_json::from_str(
            r#"{"hands": [{"gestures": [{"categoryName": "Thumb_Up", "score": 0.83}]}]}"#,
        )
        .unwrap();
        let top = rec.top_gesture().unwrap();
        assert_eq!(top.category, "Thumb_Up");
        assert!((top.confidence - 0.83).abs() < 1e-6);
    }
}
