// ABOUTME: Record Cache constants for snapshot lifetime and backend timeouts
// ABOUTME: Defaults mirror the five minute window used by the costing service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Cost Server Contributors

/// Default Record Cache time-to-live in seconds
pub const DEFAULT_RECORD_CACHE_TTL_SECS: u64 = 300; // 5 minutes

/// Default timeout for a single backend call in seconds
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
