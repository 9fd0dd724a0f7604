//! `settlebridge-engine`: settlement-to-ERP conversion engine.
//!
//! Pure engine crate: receives pre-loaded cell grids, returns ERP output rows.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod grid;
pub mod join;
pub mod model;
pub mod normalize;
pub mod output;
pub mod price;

pub use config::ConvertProfile;
pub use engine::run;
pub use error::EngineError;
pub use grid::{Grid, Table};
pub use model::{ConvertResult, OutputRow};
