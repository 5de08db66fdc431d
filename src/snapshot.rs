//! Flat persisted state of an indicator.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Field-by-field record saved and restored by
/// [`crate::CircleProgress::save_state`] and
/// [`crate::CircleProgress::restore_state`].
///
/// Colors are packed `0xAARRGGBB`. Drawable slots hold a resource id, or
/// `-1` for none. The `unfinished_drawable` slot is written with the
/// unfinished color, and the unfinished drawable id itself is never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub text_color: u32,
    pub text_size: f32,
    #[serde(rename = "finished_stroke_color")]
    pub finished_color: u32,
    #[serde(rename = "unfinished_stroke_color")]
    pub unfinished_color: u32,
    pub finished_drawable: i32,
    pub unfinished_drawable: i32,
    pub max: i32,
    pub progress: i32,
    #[serde(rename = "suffix")]
    pub suffix_text: String,
    #[serde(rename = "prefix")]
    pub prefix_text: String,
}

impl ProgressSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> ProgressSnapshot {
        ProgressSnapshot {
            text_color: 0xffffffff,
            text_size: 18.0,
            finished_color: 0xff4291f1,
            unfinished_color: 0xffcccccc,
            finished_drawable: -1,
            unfinished_drawable: 0xffccccccu32 as i32,
            max: 100,
            progress: 42,
            suffix_text: "%".to_string(),
            prefix_text: String::new(),
        }
    }

    #[test]
    fn uses_the_persisted_key_names() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "finished_drawable",
                "finished_stroke_color",
                "max",
                "prefix",
                "progress",
                "suffix",
                "text_color",
                "text_size",
                "unfinished_drawable",
                "unfinished_stroke_color",
            ]
        );
        assert_eq!(value["finished_stroke_color"], 0xff4291f1u32);
    }

    #[test]
    fn json_round_trip() {
        let snapshot = sample();
        let restored = ProgressSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = ProgressSnapshot::from_json(r#"{"max": 100}"#).unwrap_err();
        assert!(matches!(err, Error::Snapshot(_)));
    }
}
