//! Core math modules.

pub mod weight;
pub mod pmf;
pub mod suite;
pub mod mixture;
pub mod hierarchy;
