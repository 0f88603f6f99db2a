//! # Crown Rules
//!
//! The "hard system" crate - characters, the world state, and the consequence engine that
//! turns structured player actions into state mutations.
//! This crate is the single source of truth for game state and does not contain any AI logic.

pub mod entities;
pub mod error;
pub mod mechanics;
pub mod world_state;

pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use world_state::*;
