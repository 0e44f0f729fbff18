// ABOUTME: Re-export of the unified error system from recipe-core
// ABOUTME: Lets server modules and integration tests import crate::errors directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

//! Unified error handling, defined in `recipe_core::errors`

pub use recipe_core::errors::*;
