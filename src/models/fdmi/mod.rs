//! FDMI attribute encoding: the TLV writer plus the HBA and port attribute
//! catalogs a Management Server registration carries.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// TLV attribute writer.
pub mod attr;
/// HBA attribute catalog (RHBA).
pub mod hba;
/// Port attribute catalog (RPA and RPRT).
pub mod port;

/// Which attribute catalog a registration sends. Fabrics that reject the
/// richer catalogs still take the baseline one, so registrations walk these
/// from newest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrSet {
    /// Baseline FDMI-1 catalog.
    Fdmi1,
    /// Extended FDMI-2 catalog.
    Fdmi2,
    /// FDMI-2 catalog plus the Smart SAN vendor block.
    SmartSan,
}
