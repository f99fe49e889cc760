//! Poster generation: the request client and the image materializer.
//!
//! A poster is produced in two steps. [`PosterClient::submit`] posts the brand
//! name and offer to the generation endpoint and returns the raw image bytes,
//! then [`ImageMaterializer::store`] writes them into the cache directory and
//! returns a [`PosterResult`] pointing at the file.

mod client;
mod error;
mod materializer;
mod request;

pub use client::{HealthStatus, PosterClient, FIELD_OFFER, FIELD_SALON_NAME};
pub use error::PosterError;
pub use materializer::{
    default_cache_dir, ImageMaterializer, PosterResult, POSTER_EXTENSION, POSTER_PREFIX,
};
pub use request::PosterRequest;
