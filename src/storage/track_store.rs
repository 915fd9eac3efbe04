use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{art::ArtImage, track::Track};

/// Server-side copy of the last successfully fetched album art.
#[derive(Debug, Default)]
struct ArtCache {
    source_url: String,
    bytes: Option<Arc<[u8]>>,
    content_type: String,
    version: u64,
}

#[derive(Debug, Default)]
struct State {
    track: Track,
    art: ArtCache,
    /// art url handed out for fetching and not yet committed or abandoned
    art_in_flight: String,
}

/// Result of [`TrackStore::set_track`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackUpdate {
    /// the track replaced the current one
    pub accepted: bool,
    /// a new, non-empty art url arrived and should be fetched
    pub art_changed: bool,
    /// source url of the art cached before this call
    pub previous_art_url: String,
}

/// Holds the current track and its cached album art.
///
/// The track and the art cache sit behind one lock, so a reader always gets
/// a track stamped with the art version that was current at the same instant.
/// No I/O happens while the lock is held.
#[derive(Debug, Default)]
pub struct TrackStore {
    state: RwLock<State>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers replace values whole, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the current track.
    ///
    /// Updates without a song name or artist are dropped and reported as not accepted.
    /// The art counts as changed when its url is non-empty and differs from the cached
    /// art's source. A url already being fetched is not reported again until that fetch
    /// is committed or abandoned.
    pub fn set_track(&self, mut track: Track) -> TrackUpdate {
        let mut state = self.write();
        let previous_art_url = state.art.source_url.clone();

        if !track.is_complete() {
            return TrackUpdate {
                accepted: false,
                art_changed: false,
                previous_art_url,
            };
        }

        let url = &track.album_art_url;
        let art_changed =
            !url.is_empty() && *url != state.art.source_url && *url != state.art_in_flight;
        if art_changed {
            state.art_in_flight = url.clone();
        }

        track.album_art_version = 0;
        state.track = track;

        TrackUpdate {
            accepted: true,
            art_changed,
            previous_art_url,
        }
    }

    /// Snapshot of the current track, stamped with the current art version
    pub fn get_track(&self) -> Track {
        let state = self.read();
        let mut track = state.track.clone();
        track.album_art_version = state.art.version;
        track
    }

    /// Cached art, `None` until the first successful fetch
    pub fn get_art(&self) -> Option<ArtImage> {
        let state = self.read();
        let bytes = state.art.bytes.clone()?;
        Some(ArtImage {
            bytes,
            content_type: state.art.content_type.clone(),
            version: state.art.version,
        })
    }

    /// Replaces the cached art and bumps its version. Returns the new version.
    pub fn commit_art(&self, source_url: String, bytes: Vec<u8>, content_type: String) -> u64 {
        let bytes: Arc<[u8]> = bytes.into();

        let mut state = self.write();
        if state.art_in_flight == source_url {
            state.art_in_flight.clear();
        }
        state.art.source_url = source_url;
        state.art.bytes = Some(bytes);
        state.art.content_type = content_type;
        state.art.version += 1;
        state.art.version
    }

    /// Gives up on fetching `source_url`, so the next push of it is reported as changed again
    pub fn abandon_art(&self, source_url: &str) {
        let mut state = self.write();
        if state.art_in_flight == source_url {
            state.art_in_flight.clear();
        }
    }
}
