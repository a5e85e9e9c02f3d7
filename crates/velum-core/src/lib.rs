//! Velum Core
//!
//! This crate contains the platform-independent utility layer for the
//! velum widget toolkit: collections, handle arenas and geometry types.

pub mod alloc;
pub mod geometry;
pub mod logging;
