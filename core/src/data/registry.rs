//! Track registry — the flat, ordered catalog of track definitions.
//!
//! Order is insertion order and only matters for the legend. Deleting a track
//! here is half of an operation: the session pairs it with
//! [`delete_track_everywhere`](crate::data::tree::delete_track_everywhere) so
//! no node is left referencing a track the registry no longer knows.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::types::track::Track;


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
}


impl TrackRegistry {
    pub fn new() -> TrackRegistry {
        TrackRegistry::default()
    }

    /// Build a registry from tracks, rejecting duplicate ids.
    pub fn from_tracks(tracks: Vec<Track>) -> Result<TrackRegistry> {
        let mut reg = TrackRegistry::new();
        for track in tracks {
            reg.add(track)?;
        }
        Ok(reg)
    }

    /// Build a registry without checking ids. Used for trusted imports.
    pub fn from_tracks_unchecked(tracks: Vec<Track>) -> TrackRegistry {
        TrackRegistry { tracks }
    }

    /// Append a track. Fails if the id is already registered.
    pub fn add(&mut self, track: Track) -> Result<()> {
        if self.contains(&track.id) {
            return Err(TreeError::DuplicateId { id: track.id });
        }
        self.tracks.push(track);
        Ok(())
    }

    /// Remove a track by id and return it.
    pub fn remove(&mut self, id: &str) -> Result<Track> {
        let pos = self
            .tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TreeError::UnknownTrack { id: id.to_string() })?;
        Ok(self.tracks.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Tracks in display order.
    pub fn list(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Legend view for the rendering surface.
    pub fn to_json(&self) -> String {
        serde_json::Value::Array(
            self.tracks
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id,
                        "name": t.name,
                        "color": t.color,
                        "type": t.kind,
                        "glyph": t.kind.glyph(),
                    })
                })
                .collect(),
        )
        .to_string()
    }
}
