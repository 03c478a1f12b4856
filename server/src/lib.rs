//! Filterkit server library
//!
//! `filters` holds the filter/sort specification compiler and resolver;
//! `api` binds it to axum; `core` carries configuration and process plumbing.

mod app;

pub mod api;
pub mod core;
pub mod filters;
