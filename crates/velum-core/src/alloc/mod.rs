//! Optimized allocation and collection types for velum.
//!
//! This module provides:
//! - Re-exports of optimized hash collections using AHash
//! - A generational arena for stable widget handles

pub mod arena;

// Re-export optimized hash collections
pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

pub use arena::{Arena, Slot};
