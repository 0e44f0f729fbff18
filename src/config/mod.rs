// ABOUTME: Configuration module for the recipe cost server
// ABOUTME: Environment-only configuration with typed defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

/// Server configuration loaded from environment variables
pub mod environment;

pub use environment::ServerConfig;
