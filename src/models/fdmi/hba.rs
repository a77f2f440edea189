// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! HBA attribute catalog registered with RHBA.

use crate::models::{
    common::WireError,
    fc::Wwn,
    fdmi::{AttrSet, attr::AttrWriter},
};

pub const ATTR_NODE_NAME: u16 = 0x1;
pub const ATTR_MANUFACTURER: u16 = 0x2;
pub const ATTR_SERIAL_NUMBER: u16 = 0x3;
pub const ATTR_MODEL: u16 = 0x4;
pub const ATTR_MODEL_DESCRIPTION: u16 = 0x5;
pub const ATTR_HARDWARE_VERSION: u16 = 0x6;
pub const ATTR_DRIVER_VERSION: u16 = 0x7;
pub const ATTR_OPTION_ROM_VERSION: u16 = 0x8;
pub const ATTR_FIRMWARE_VERSION: u16 = 0x9;
pub const ATTR_OS_NAME_AND_VERSION: u16 = 0xa;
pub const ATTR_MAX_CT_PAYLOAD: u16 = 0xb;
pub const ATTR_SYMBOLIC_NAME: u16 = 0xc;
pub const ATTR_VENDOR_SPECIFIC_INFO: u16 = 0xd;
pub const ATTR_NUM_PORTS: u16 = 0xe;
pub const ATTR_FABRIC_NAME: u16 = 0xf;
pub const ATTR_BOOT_BIOS_NAME: u16 = 0x10;
pub const ATTR_VENDOR_IDENTIFIER: u16 = 0xe0;

/// Everything the HBA catalog reads, borrowed from the adapter identity.
#[derive(Debug, Clone)]
pub struct HbaAttrInputs<'a> {
    pub node_name: Wwn,
    pub manufacturer: &'a str,
    pub serial_number: &'a str,
    pub model: &'a str,
    pub model_description: &'a str,
    pub hardware_version: &'a str,
    pub driver_version: &'a str,
    pub option_rom_version: &'a str,
    pub firmware_version: &'a str,
    pub os_name_and_version: &'a str,
    /// Largest CT payload the port accepts, in bytes.
    pub max_ct_payload: u32,
    pub symbolic_name: &'a str,
    /// PCI vendor id, registered verbatim.
    pub vendor_specific: u32,
    pub num_ports: u32,
    pub fabric_name: Wwn,
    pub boot_bios_name: &'a str,
    pub vendor_identifier: &'a str,
}

/// Append the HBA catalog: nine baseline attributes, eight more for the
/// extended catalogs.
pub fn hba_attributes(
    inp: &HbaAttrInputs<'_>,
    set: AttrSet,
    w: &mut AttrWriter<'_>,
) -> Result<(), WireError> {
    w.wwn(ATTR_NODE_NAME, inp.node_name)?;
    w.string(ATTR_MANUFACTURER, inp.manufacturer)?;
    w.string(ATTR_SERIAL_NUMBER, inp.serial_number)?;
    w.string(ATTR_MODEL, inp.model)?;
    w.string(ATTR_MODEL_DESCRIPTION, inp.model_description)?;
    w.string(ATTR_HARDWARE_VERSION, inp.hardware_version)?;
    w.string(ATTR_DRIVER_VERSION, inp.driver_version)?;
    w.string(ATTR_OPTION_ROM_VERSION, inp.option_rom_version)?;
    w.string(ATTR_FIRMWARE_VERSION, inp.firmware_version)?;
    if set == AttrSet::Fdmi1 {
        return Ok(());
    }
    w.string(ATTR_OS_NAME_AND_VERSION, inp.os_name_and_version)?;
    w.u32(ATTR_MAX_CT_PAYLOAD, inp.max_ct_payload)?;
    w.string(ATTR_SYMBOLIC_NAME, inp.symbolic_name)?;
    w.u32(ATTR_VENDOR_SPECIFIC_INFO, inp.vendor_specific)?;
    w.u32(ATTR_NUM_PORTS, inp.num_ports)?;
    w.wwn(ATTR_FABRIC_NAME, inp.fabric_name)?;
    w.string(ATTR_BOOT_BIOS_NAME, inp.boot_bios_name)?;
    w.string(ATTR_VENDOR_IDENTIFIER, inp.vendor_identifier)?;
    Ok(())
}
