//! Unit tests for the seller SDK
//!
//! This module contains tests for the pipeline and its components.

pub mod support;

pub mod client_mock_tests;
pub mod config_tests;
