//! Album art: url size rewriting and the background fetch into the track store

pub mod error;
pub mod fetcher;
pub mod normalize;
pub mod source;
