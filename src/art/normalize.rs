//! Size rewriting for album art hosted on Google's image CDN.
//!
//! Art urls from that host end in a sizing suffix after the last `=`,
//! e.g. `https://lh3.googleusercontent.com/abc=w60-h60-l90-rj`.
//! Only the leading `w<n>-h<n>` pair is rewritten; any other url is returned as is.

use url::Url;

pub const DEFAULT_HOST_SUFFIX: &str = "googleusercontent.com";
pub const DEFAULT_SIZE: u32 = 800;

/// Requests [`DEFAULT_SIZE`] art from the default host.
pub fn normalize(url: &str) -> String {
    resize(url, DEFAULT_HOST_SUFFIX, DEFAULT_SIZE)
}

/// Rewrites the `w<n>-h<n>` sizing tokens of `url` to `size` if its host ends with `host_suffix`.
pub fn resize(url: &str, host_suffix: &str, size: u32) -> String {
    if !host_matches(url, host_suffix) {
        return url.to_string();
    }

    let Some((prefix, params)) = url.rsplit_once('=') else {
        return url.to_string();
    };

    let mut tokens: Vec<String> = params.split('-').map(str::to_string).collect();
    if tokens.len() < 2 || !is_dimension(&tokens[0], 'w') || !is_dimension(&tokens[1], 'h') {
        return url.to_string();
    }

    tokens[0] = format!("w{size}");
    tokens[1] = format!("h{size}");
    format!("{prefix}={}", tokens.join("-"))
}

fn host_matches(url: &str, suffix: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    match parsed.host_str() {
        Some(host) => host == suffix || host.ends_with(&format!(".{suffix}")),
        None => false,
    }
}

fn is_dimension(token: &str, prefix: char) -> bool {
    token
        .strip_prefix(prefix)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}
