//! Shared CLI infrastructure for the `chd` binary.

pub mod logging;
