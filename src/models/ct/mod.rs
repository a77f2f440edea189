//! Common Transport wire formats for the Generic Services families this
//! crate speaks: the shared preamble, the per-command request and response
//! payloads, and the scratch buffer they are staged in.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Command codes and request/response allocations.
pub mod command;
/// CT preamble and response header.
pub mod preamble;
/// Typed request payloads.
pub mod request;
/// Typed response payloads.
pub mod response;
/// Owned request/response staging buffer.
pub mod scratch;
