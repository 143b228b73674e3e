//! Domain types and rules shared by the resman server and client.

pub mod error;
pub mod resource;
pub mod types;
