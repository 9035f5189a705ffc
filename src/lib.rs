//! Terminal client for a self-hosted RSS aggregation service.
//!
//! The backend owns ingestion and storage; this crate is the reading surface:
//! it queries the article list with a mutable set of filters, renders pages of
//! cards in the terminal, and relays user actions (mark read, bookmark,
//! source management) back over HTTP.

pub mod api;
pub mod app;
pub mod config;
pub mod filter;
pub mod tags;
pub mod ui;
