//! Tests for the scatterstat front end
//!
//! - `config` - YAML run configuration loading
//! - `report` - Artifact building and report writing

mod config;
mod report;
