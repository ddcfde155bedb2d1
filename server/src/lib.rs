//! Composition root of the catalog service: configuration, wiring of the
//! repositories, caches and broker, and the HTTP application.

pub mod app;
pub mod config;
