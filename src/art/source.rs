use std::{io::Read, time::Duration};

use crate::{art::error::FetchError, config::ArtConfig};

const ACCEPT_IMAGES: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// A downloaded image body
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// `Content-Type` of the response, if it sent a specific one
    pub content_type: Option<String>,
}

/// Something that can download an image by url
pub trait ImageSource: Send + Sync {
    fn get(&self, url: &str) -> Result<FetchedImage, FetchError>;
}

/// [`ImageSource`] over HTTP.
///
/// The art CDN turns away requests that do not look like they come from a browser
/// on the player's page, so every request carries a browser user agent and referer.
pub struct HttpImageSource {
    agent: ureq::Agent,
    user_agent: String,
    referer: String,
    max_bytes: u64,
}

impl HttpImageSource {
    pub fn new(config: &ArtConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        Self {
            agent,
            user_agent: config.user_agent.clone(),
            referer: config.referer.clone(),
            max_bytes: config.max_bytes,
        }
    }
}

/// `Ok(None)` when the response does not say what it is,
/// an error when it says it is something other than an image
fn image_content_type(header: Option<&str>) -> Result<Option<String>, FetchError> {
    let Some(ct) = header.map(str::trim).filter(|ct| !ct.is_empty()) else {
        return Ok(None);
    };

    let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if essence == "application/octet-stream" {
        return Ok(None);
    }
    if !essence.starts_with("image/") {
        return Err(FetchError::NotAnImage(ct.to_string()));
    }
    Ok(Some(ct.to_string()))
}

impl ImageSource for HttpImageSource {
    fn get(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let response = self
            .agent
            .get(url)
            .set("User-Agent", &self.user_agent)
            .set("Referer", &self.referer)
            .set("Accept", ACCEPT_IMAGES)
            .call()?;

        if response.status() != 200 {
            return Err(FetchError::Status(response.status()));
        }

        let content_type = image_content_type(response.header("Content-Type"))?;

        // one byte past the limit tells a body that fits from one that was cut
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)?;

        if bytes.len() as u64 > self.max_bytes {
            return Err(FetchError::TooLarge {
                limit: self.max_bytes,
            });
        }
        if bytes.is_empty() {
            return Err(FetchError::Empty);
        }

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}
