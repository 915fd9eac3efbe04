use log::{debug, info};
use rouille::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    art::fetcher::ArtFetcher,
    config::HttpConfig,
    domain::track::Track,
    http::error::ApiError,
    storage::track_store::TrackStore,
};

const DEFAULT_ART_CONTENT_TYPE: &str = "image/jpeg";

pub struct HttpServer {
    store: Arc<TrackStore>,
    fetcher: ArtFetcher,
    pub config: HttpConfig,
}

impl HttpServer {
    pub fn new(store: Arc<TrackStore>, fetcher: ArtFetcher, config: HttpConfig) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let response = rouille::router!(request,
            (GET) (/) => {
                Self::handle_index()
            },
            (POST) (/webhook) => {
                self.handle_webhook(request)
            },
            (GET) (/track) => {
                self.handle_get_track()
            },
            (GET) (/art) => {
                self.handle_get_art()
            },
            _ => {
                if request.url() == "/webhook" {
                    ApiError::MethodNotAllowed.into_response()
                } else {
                    Response::empty_404()
                }
            }
        );

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.url());
    }

    fn handle_index() -> Response {
        Response::html(include_str!("../../html/index.html"))
    }

    fn handle_webhook(&self, request: &Request) -> Response {
        match self.ingest(request) {
            Ok(outcome) => Response::json(&outcome),
            Err(e) => e.into_response(),
        }
    }

    /// stores the pushed track and starts an art fetch if its art is new
    fn ingest(&self, request: &Request) -> Result<IngestResponse, ApiError> {
        let track: Track = rouille::input::json_input(request)?;
        let art_url = track.album_art_url.clone();

        let update = self.store.set_track(track);
        if !update.accepted {
            debug!("ignoring track update without song name or artist");
        }

        if update.art_changed {
            debug!(
                "album art changed from {:?} to {:?}",
                update.previous_art_url, art_url
            );
            self.fetcher.trigger(art_url);
        }

        Ok(IngestResponse {
            accepted: update.accepted,
            art_fetch: update.art_changed,
        })
    }

    fn handle_get_track(&self) -> Response {
        Response::json(&NowPlayingResponse::from_domain(self.store.get_track()))
    }

    fn handle_get_art(&self) -> Response {
        let Some(art) = self.store.get_art() else {
            return ApiError::NotFound("no album art cached yet".into()).into_response();
        };

        let content_type = if art.content_type.is_empty() {
            DEFAULT_ART_CONTENT_TYPE.to_string()
        } else {
            art.content_type
        };

        // the page adds ?v=<version> itself, so the bytes must never be cached
        Response::from_data(content_type, art.bytes.to_vec())
            .with_unique_header("Cache-Control", "no-store, no-cache, must-revalidate")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct IngestResponse {
    accepted: bool,
    art_fetch: bool,
}

#[derive(Serialize, Deserialize)]
struct NowPlayingResponse {
    #[serde(flatten)]
    track: Track,
    progress_pct: f64,
}

impl NowPlayingResponse {
    fn from_domain(track: Track) -> Self {
        Self {
            progress_pct: track.progress_pct(),
            track,
        }
    }
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}
