//! This crate provides a client-side implementation of the Fibre Channel
//! Generic Services protocols: Name Server queries, Fabric Configuration
//! Server lookups and FDMI registrations, spoken over whichever descriptor
//! interface the adapter generation provides.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Handles configuration and logging.
pub mod cfg;
/// Manages the per-adapter context, the command channel seam and errors.
pub mod fabric;
/// Contains one handler per Generic Services exchange family.
pub mod handlers;
/// Defines the wire structures for Generic Services exchanges.
pub mod models;
/// Contains the state machine driving FDMI registration.
pub mod state_machine;
/// Provides utility functions used throughout the crate.
pub mod utils;
