//! Runbook configuration model
//!
//! - [`entities`]: tools, steps and secret references as parsed from YAML
//! - [`parameters`]: ordered parameter schema and caller binding
//! - [`validation`]: checks the YAML shape cannot express

pub mod entities;
pub mod parameters;
pub mod validation;
