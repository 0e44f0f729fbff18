// ABOUTME: Shared benchmark utilities
// ABOUTME: Recipe graph fixtures for resolver benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

pub mod fixtures;
