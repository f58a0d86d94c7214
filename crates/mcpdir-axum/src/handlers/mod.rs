//! HTTP handlers.

pub mod servers;
