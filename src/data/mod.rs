//! Data retrieval, settings and output
//!
//! Handles:
//! - GexBot API snapshots
//! - TOML settings and the API key
//! - CSV level tables and history feeds

pub mod gexbot;
pub mod settings;
pub mod writer;

pub use gexbot::*;
pub use settings::*;
pub use writer::*;
