//! Test Module
//!
//! Cross-module test suite for the VibeCurator core.
//!
//! ## Test Categories
//! - `mocks`: In-memory catalog and model doubles
//! - `brain_tests`: Interpretation and generation properties
//! - `supervisor_tests`: Full playlist requests through the supervisor
//! - `chaos_test`: Concurrency, ordering and outage behaviour


pub mod chaos_test;
