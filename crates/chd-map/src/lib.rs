//! Column-to-field mapping state and persisted mapping plans.
//!
//! [`MappingState`] tracks which source column feeds which catalog
//! field, plus the special-field overrides; [`MappingPlan`] is its TOML
//! form on disk.

pub mod error;
pub mod plan;
pub mod special;
pub mod state;

pub use error::MappingError;
pub use plan::{MappingPlan, ValidationToggles};
pub use special::SpecialState;
pub use state::MappingState;
