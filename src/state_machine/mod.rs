//! This module contains the multi-step fabric service flows.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Common structures and traits for state machines.
pub mod common;
/// State machine for Management Server (FDMI) registration.
pub mod fdmi_states;
