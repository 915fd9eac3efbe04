//! Test client that keeps pushing random tracks to a running server

use std::{thread, time::Duration};

use log::{info, warn};
use rand::Rng;

use crate::{
    config::MockConfig,
    domain::track::{Track, format_clock},
};

const SONGS: &[&str] = &[
    "Bohemian Rhapsody",
    "Stairway to Heaven",
    "Imagine",
    "Smells Like Teen Spirit",
    "Billie Jean",
];
const ARTISTS: &[&str] = &[
    "Queen",
    "Led Zeppelin",
    "John Lennon",
    "Nirvana",
    "Michael Jackson",
];
const ART: &[&str] = &["https://i.imgur.com/SGP2XjL.jpeg"];

pub fn random_track<R: Rng>(rng: &mut R) -> Track {
    let end_seconds = rng.random_range(60..360);
    let current_seconds = rng.random_range(0..end_seconds);

    Track {
        song_name: SONGS[rng.random_range(0..SONGS.len())].to_string(),
        artist: ARTISTS[rng.random_range(0..ARTISTS.len())].to_string(),
        current_timestamp: format_clock(current_seconds),
        end_timestamp: format_clock(end_seconds),
        current_seconds: Some(current_seconds),
        end_seconds: Some(end_seconds),
        album_art_url: ART[rng.random_range(0..ART.len())].to_string(),
        album_art_version: 0,
    }
}

fn send(agent: &ureq::Agent, url: &str, track: &Track) -> Result<(), ureq::Error> {
    agent.post(url).send_json(track)?;
    Ok(())
}

/// Posts a random track every `interval_ms`, forever
pub fn run(config: &MockConfig) {
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(5))
        .build();
    let mut rng = rand::rng();

    loop {
        let track = random_track(&mut rng);
        match send(&agent, &config.webhook_url, &track) {
            Ok(()) => info!(
                "Sent: {} by {} ({}) [art={}]",
                track.song_name, track.artist, track.current_timestamp, track.album_art_url
            ),
            Err(e) => warn!("Failed to send track: {e}"),
        }
        thread::sleep(Duration::from_millis(config.interval_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_tracks_are_complete_and_consistent() {
        let mut rng = rand::rng();

        for _ in 0..100 {
            let track = random_track(&mut rng);

            assert!(track.is_complete());
            let (cur, end) = (track.current_seconds.unwrap(), track.end_seconds.unwrap());
            assert!((60..360).contains(&end));
            assert!(cur < end);
            assert_eq!(track.current_timestamp, format_clock(cur));
            assert_eq!(track.end_timestamp, format_clock(end));
            assert!(!track.album_art_url.is_empty());
        }
    }
}
