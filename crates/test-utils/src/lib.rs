// Copyright (c) 2025 SQLTools Team
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for SQLTools
//!
//! This crate provides common testing components including:
//! - Sample scripts per dialect
//! - YAML-driven split cases shared by the splitter and server tests
//! - Assertions over statement lists

pub mod assertions;
pub mod fixtures;
pub mod split_cases;

// Re-exports for convenience
pub use assertions::{assert_offsets_in_range, assert_statements};
pub use fixtures::SqlFixtures;
pub use split_cases::{CaseError, SplitCase, builtin_cases, parse_cases};
