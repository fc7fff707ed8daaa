//! Landgrab - Territory Claiming & Collision Geometry Engine
//!
//! Turns a raw stream of GPS fixes into an accept/reject decision for a
//! walked territory claim, and checks the live path against every other
//! player's territory while the walk is in progress. Rendering, storage,
//! and authentication live outside this crate; territory snapshots and
//! validated claims cross the boundary as plain values.

pub mod claim;
pub mod collision;
pub mod core;
pub mod geo;
pub mod session;
pub mod territory;
