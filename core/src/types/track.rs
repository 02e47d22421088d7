//! Track definitions — the globally defined, colored numeric categories.

use serde::{Deserialize, Serialize};


/// Whether a track carries an ordinary quantity or a limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TrackKind {
    #[default]
    #[serde(rename = "track")]
    Regular,
    #[serde(rename = "limit")]
    Limit,
}


impl TrackKind {
    /// Legend glyph shown next to the track name.
    pub fn glyph(self) -> &'static str {
        match self {
            TrackKind::Regular => "●",
            TrackKind::Limit => "⚡",
        }
    }

    /// Parse the wire name (`track` / `limit`). `regular` is accepted too.
    pub fn parse(s: &str) -> Option<TrackKind> {
        match s {
            "track" | "regular" => Some(TrackKind::Regular),
            "limit" => Some(TrackKind::Limit),
            _ => None,
        }
    }
}


/// A registry entry. Identity is `id`; the rest is display data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
}


impl Track {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>, kind: TrackKind) -> Track {
        Track {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            kind,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_uses_wire_names() {
        let t = Track::new("a", "Budget", "#ff0000", TrackKind::Limit);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"type\":\"limit\""));
        let regular = serde_json::to_string(&TrackKind::Regular).unwrap();
        assert_eq!(regular, "\"track\"");
    }

    #[test]
    fn parse_kind() {
        assert_eq!(TrackKind::parse("track"), Some(TrackKind::Regular));
        assert_eq!(TrackKind::parse("regular"), Some(TrackKind::Regular));
        assert_eq!(TrackKind::parse("limit"), Some(TrackKind::Limit));
        assert_eq!(TrackKind::parse("other"), None);
    }

    #[test]
    fn unknown_kind_rejected() {
        let raw = r##"{"id":"a","name":"A","color":"#000","type":"budget"}"##;
        assert!(serde_json::from_str::<Track>(raw).is_err());
    }
}
