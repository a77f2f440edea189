//! This module holds the per-adapter Generic Services context.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Adapter context: capabilities, identity and the issue/decode core.
pub mod adapter;
/// Command channel trait the embedding driver implements.
pub mod channel;
/// Error taxonomy for Generic Services exchanges.
pub mod error;
