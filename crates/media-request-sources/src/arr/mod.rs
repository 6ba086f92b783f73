//! Sonarr (series) and Radarr (films) share the same v3 API shape.

pub mod api;
pub mod client;

pub use client::{ArrClient, ArrKind};
