//! This module defines the wire structures for Generic Services exchanges.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Defines primitives shared by payload views and descriptors.
pub mod common;
/// Defines the Common Transport preamble, commands and payloads.
pub mod ct;
/// Defines core Fibre Channel identities: addresses, names, speeds.
pub mod fc;
/// Defines the FDMI attribute writer and catalogs.
pub mod fdmi;
/// Defines the transport descriptors handed to the firmware.
pub mod iocb;
