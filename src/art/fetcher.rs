use std::{sync::Arc, thread};

use log::{debug, info, warn};

use crate::{
    art::{
        normalize::resize,
        source::{FetchedImage, ImageSource},
    },
    config::ArtConfig,
    storage::track_store::TrackStore,
};

/// Downloads album art in the background and commits it to the [`TrackStore`].
///
/// Each trigger runs on its own thread and is never cancelled. When several
/// fetches overlap, the one that commits last wins.
#[derive(Clone)]
pub struct ArtFetcher {
    store: Arc<TrackStore>,
    source: Arc<dyn ImageSource>,
    host_suffix: String,
    sizes: Vec<u32>,
}

impl ArtFetcher {
    pub fn new(store: Arc<TrackStore>, source: Arc<dyn ImageSource>, config: &ArtConfig) -> Self {
        Self {
            store,
            source,
            host_suffix: config.host_suffix.clone(),
            sizes: config.sizes.clone(),
        }
    }

    /// Urls to try, best first: every configured size, then the url as it came in.
    pub fn candidates(&self, url: &str) -> Vec<String> {
        let mut candidates: Vec<String> = self
            .sizes
            .iter()
            .map(|size| resize(url, &self.host_suffix, *size))
            .collect();
        candidates.push(url.to_string());
        candidates.dedup();
        candidates
    }

    /// Starts fetching `url` on a background thread and returns immediately
    pub fn trigger(&self, url: String) {
        let fetcher = self.clone();
        let fetch_url = url.clone();
        let spawned = thread::Builder::new()
            .name("art-fetch".into())
            .spawn(move || {
                fetcher.fetch(&fetch_url);
            });

        if let Err(e) = spawned {
            warn!("could not start art fetch: {e}");
            self.store.abandon_art(&url);
        }
    }

    /// Tries every candidate for `url` in order and commits the first usable image.
    ///
    /// Returns the new art version, or `None` if every candidate failed, in which
    /// case the store is told to report `url` as changed on its next push.
    pub fn fetch(&self, url: &str) -> Option<u64> {
        for candidate in self.candidates(url) {
            match self.source.get(&candidate) {
                Ok(FetchedImage {
                    bytes,
                    content_type,
                }) if !bytes.is_empty() => {
                    let content_type = content_type.unwrap_or_else(|| guess_content_type(&candidate));
                    let size = bytes.len();
                    let version = self.store.commit_art(url.to_string(), bytes, content_type);
                    info!("album art v{version} cached from {candidate} ({size} bytes)");
                    return Some(version);
                }
                Ok(_) => debug!("art candidate {candidate}: empty body"),
                Err(e) => debug!("art candidate {candidate}: {e}"),
            }
        }

        warn!("no album art could be fetched for {url}");
        self.store.abandon_art(url);
        None
    }
}

/// content type from the url's file extension, empty if unknown
fn guess_content_type(url: &str) -> String {
    let path = url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();

    mime_guess::from_path(path)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .map(|m| m.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{art::error::FetchError, config::ArtConfig, domain::track::Track};
    use std::{collections::HashMap, sync::Mutex};

    /// In-memory [`ImageSource`] answering from a fixed table and recording every request
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        responses: HashMap<String, FetchedImage>,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl ScriptedSource {
        pub(crate) fn with(mut self, url: &str, bytes: &[u8], content_type: Option<&str>) -> Self {
            self.responses.insert(
                url.to_string(),
                FetchedImage {
                    bytes: bytes.to_vec(),
                    content_type: content_type.map(str::to_string),
                },
            );
            self
        }

        pub(crate) fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ImageSource for ScriptedSource {
        fn get(&self, url: &str) -> Result<FetchedImage, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses.get(url).cloned().ok_or(FetchError::Status(404))
        }
    }

    const ART: &str = "https://x.googleusercontent.com/abc=w100-h100";

    fn fetcher(source: ScriptedSource) -> (ArtFetcher, Arc<TrackStore>, Arc<ScriptedSource>) {
        let store = Arc::new(TrackStore::new());
        let source = Arc::new(source);
        let fetcher = ArtFetcher::new(Arc::clone(&store), source.clone(), &ArtConfig::default());
        (fetcher, store, source)
    }

    #[test]
    fn candidates_for_cdn_host() {
        let (fetcher, _, _) = fetcher(ScriptedSource::default());

        assert_eq!(
            fetcher.candidates(ART),
            vec![
                "https://x.googleusercontent.com/abc=w800-h800",
                "https://x.googleusercontent.com/abc=w544-h544",
                ART,
            ]
        );
    }

    #[test]
    fn candidates_for_other_host_are_not_repeated() {
        let (fetcher, _, _) = fetcher(ScriptedSource::default());
        let url = "https://i.imgur.com/SGP2XjL.jpeg";

        assert_eq!(fetcher.candidates(url), vec![url]);
    }

    #[test]
    fn first_success_is_committed_under_ingested_url() {
        let source = ScriptedSource::default().with(
            "https://x.googleusercontent.com/abc=w800-h800",
            b"big",
            Some("image/webp"),
        );
        let (fetcher, store, source) = fetcher(source);
        store.set_track(Track {
            song_name: "A".into(),
            artist: "B".into(),
            album_art_url: ART.into(),
            ..Default::default()
        });

        assert_eq!(fetcher.fetch(ART), Some(1));

        let art = store.get_art().unwrap();
        assert_eq!(&*art.bytes, b"big");
        assert_eq!(art.content_type, "image/webp");
        assert_eq!(store.get_track().album_art_version, 1);
        assert_eq!(source.requested().len(), 1);

        // the cached source is the url as ingested, so re-pushing it is not a change
        assert!(
            !store
                .set_track(Track {
                    song_name: "C".into(),
                    artist: "D".into(),
                    album_art_url: ART.into(),
                    ..Default::default()
                })
                .art_changed
        );
    }

    #[test]
    fn falls_back_to_smaller_sizes() {
        let source = ScriptedSource::default().with(
            "https://x.googleusercontent.com/abc=w544-h544",
            b"small",
            Some("image/jpeg"),
        );
        let (fetcher, store, source) = fetcher(source);

        assert_eq!(fetcher.fetch(ART), Some(1));
        assert_eq!(&*store.get_art().unwrap().bytes, b"small");
        assert_eq!(
            source.requested(),
            vec![
                "https://x.googleusercontent.com/abc=w800-h800",
                "https://x.googleusercontent.com/abc=w544-h544",
            ]
        );
    }

    #[test]
    fn empty_body_counts_as_failure() {
        let source = ScriptedSource::default()
            .with("https://x.googleusercontent.com/abc=w800-h800", b"", Some("image/jpeg"))
            .with(ART, b"orig", None);
        let (fetcher, store, _) = fetcher(source);

        assert_eq!(fetcher.fetch(ART), Some(1));
        assert_eq!(&*store.get_art().unwrap().bytes, b"orig");
    }

    #[test]
    fn all_failures_keep_previous_art() {
        let (fetcher, store, source) = fetcher(ScriptedSource::default());

        assert_eq!(fetcher.fetch(ART), None);
        assert!(store.get_art().is_none());
        assert_eq!(source.requested().len(), 3);

        store.commit_art("https://a/old.png".into(), vec![9], "image/png".into());
        assert_eq!(fetcher.fetch(ART), None);

        let art = store.get_art().unwrap();
        assert_eq!(&*art.bytes, &[9]);
        assert_eq!(art.version, 1);
    }

    #[test]
    fn failed_fetch_lets_next_push_retry() {
        let (fetcher, store, _) = fetcher(ScriptedSource::default());
        let track = Track {
            song_name: "A".into(),
            artist: "B".into(),
            album_art_url: ART.into(),
            ..Default::default()
        };

        assert!(store.set_track(track.clone()).art_changed);
        assert!(!store.set_track(track.clone()).art_changed);

        assert_eq!(fetcher.fetch(ART), None);

        assert!(store.set_track(track).art_changed);
    }

    #[test]
    fn content_type_guessed_from_extension() {
        let url = "https://i.imgur.com/SGP2XjL.png";
        let (fetcher, store, _) = fetcher(ScriptedSource::default().with(url, b"png", None));

        fetcher.fetch(url);

        assert_eq!(store.get_art().unwrap().content_type, "image/png");
    }

    #[test]
    fn content_type_left_empty_when_unknown() {
        let (fetcher, store, _) = fetcher(ScriptedSource::default().with(ART, b"img", None));

        fetcher.fetch(ART);

        assert_eq!(store.get_art().unwrap().content_type, "");
    }
}
