//! # geoplaces
//!
//! Place lookup and geocoding facade over the Google Maps API
//! with cache-aside caching of raw provider responses.
//!
//! This crate only re-exports the workspace members.

pub use geoplaces_core as core;
pub use geoplaces_entities as entities;
pub use geoplaces_gateways as gateways;
