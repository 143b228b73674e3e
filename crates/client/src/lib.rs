//! Client side of resman.
//!
//! Provides the typed HTTP client for the `/resources` API, the wire
//! models it exchanges, and the list/filter controller that keeps a
//! debounced, reconciled view of the collection.

pub mod api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod models;
