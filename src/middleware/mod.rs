//! Extractor middleware for the HTTP boundary.

pub mod auth;
