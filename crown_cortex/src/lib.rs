//! # Crown Cortex
//!
//! The deterministic layer around the narrative model. This crate reads `crown_rules`,
//! decides which vignette fires, assembles the context handed to the language model, and
//! drives the turn loop without ever calling a model itself.
//!
//! ## Core Components
//!
//! - **vignettes**: Priority/cooldown/invalidation-aware selection of scripted events
//! - **context_assembler**: Scene casting and per-character context packets
//! - **intake**: Turning raw classifier output into structured actions
//! - **config**: Scenario and vignette catalogues in TOML
//! - **session**: One player's turn loop with injected classifier and narrative backend
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Same state in, same decision out, whatever the model says
//! - **Fail-soft**: A bad action or a broken condition degrades to a no-op, never a crash
//! - **Injected I/O**: Model-backed collaborators are traits handed in by the host

pub mod config;
pub mod context_assembler;
pub mod error;
pub mod intake;
pub mod session;
pub mod vignettes;

pub use config::*;
pub use context_assembler::*;
pub use error::*;
pub use intake::*;
pub use session::*;
pub use vignettes::*;
