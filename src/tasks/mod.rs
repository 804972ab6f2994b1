//! Background Tasks Module
//!
//! Contains the long-lived worker spawned alongside the cache.
//!
//! # Tasks
//! - Reclaimer: removes keys that the read path flagged as expired

mod reclaim;

pub use reclaim::spawn_reclaimer;
