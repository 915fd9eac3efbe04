use serde::{Deserialize, Serialize};

/// The current now-playing record.
///
/// A track with an empty `song_name` is the idle state, nothing is playing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub song_name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub current_timestamp: String,
    #[serde(default)]
    pub end_timestamp: String,
    #[serde(default)]
    pub current_seconds: Option<u64>,
    #[serde(default)]
    pub end_seconds: Option<u64>,
    #[serde(default)]
    pub album_art_url: String,
    /// Version of the cached art at the time this snapshot was taken.
    /// Ignored on ingest, stamped by the store on read.
    #[serde(default)]
    pub album_art_version: u64,
}

impl Track {
    /// Whether the record carries the fields needed to replace the current one
    pub fn is_complete(&self) -> bool {
        !self.song_name.is_empty() && !self.artist.is_empty()
    }

    /// playback progress in percent, 0 when the duration is unknown
    pub fn progress_pct(&self) -> f64 {
        match (self.current_seconds, self.end_seconds) {
            (Some(cur), Some(end)) if end > 0 => (cur as f64 / end as f64 * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        }
    }
}

/// Formats seconds as `m:ss`, the label format the player pushes.
pub fn format_clock(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
