//! Tubex - Video Platform Data Client
//!
//! This library provides the data-loading core for clients of a video
//! platform: a generic async resource loader plus the platform's data
//! models and a thin HTTP retrieval layer.
//!
//! ## Architecture
//!
//! Views own a [`loader::ResourceLoader`] per remote resource and render
//! whatever [`loader::ResourceState`] it currently publishes. The loader
//! never decides how an error looks on screen; it only guarantees that the
//! `{data, loading, error}` triple is coherent across refetches, slow
//! responses arriving out of order, and view teardown.
//!
//! The [`api::ApiClient`] supplies ready-made retrieval operations for the
//! platform endpoints, but any zero-argument async closure works.

// Fetch lifecycle core
pub mod loader;

// Platform data models (serde, shared with the wire)
pub mod types;

// HTTP retrieval layer
pub mod api;
pub mod net;

// Layered configuration (CLI > env > defaults)
pub mod config;
