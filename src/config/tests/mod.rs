//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `once_loading`: Parsing `--once` through the derived CLI
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, URL, and template resolution tests
//! - `validation`: Rejection of invalid settings

mod helpers;
mod once_loading;
