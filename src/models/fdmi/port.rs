// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Port attribute catalog registered with RPA and RPRT, plus the speed
//! bitmaps those attributes carry.

use bitflags::bitflags;

use crate::models::{
    common::WireError,
    fc::{PortSpeed, WWN_SIZE, Wwn},
    fdmi::{AttrSet, attr::AttrWriter},
};

pub const ATTR_FC4_TYPES: u16 = 0x1;
pub const ATTR_SUPPORT_SPEED: u16 = 0x2;
pub const ATTR_CURRENT_SPEED: u16 = 0x3;
pub const ATTR_MAX_FRAME_SIZE: u16 = 0x4;
pub const ATTR_OS_DEVICE_NAME: u16 = 0x5;
pub const ATTR_HOST_NAME: u16 = 0x6;
pub const ATTR_NODE_NAME: u16 = 0x7;
pub const ATTR_PORT_NAME: u16 = 0x8;
pub const ATTR_SYMBOLIC_NAME: u16 = 0x9;
pub const ATTR_PORT_TYPE: u16 = 0xa;
pub const ATTR_SUPPORTED_COS: u16 = 0xb;
pub const ATTR_FABRIC_NAME: u16 = 0xc;
pub const ATTR_ACTIVE_FC4_TYPE: u16 = 0xd;
pub const ATTR_PORT_STATE: u16 = 0x101;
pub const ATTR_PORT_COUNT: u16 = 0x102;
pub const ATTR_PORT_IDENTIFIER: u16 = 0x103;

pub const ATTR_SMARTSAN_SERVICE: u16 = 0xf100;
pub const ATTR_SMARTSAN_GUID: u16 = 0xf101;
pub const ATTR_SMARTSAN_VERSION: u16 = 0xf102;
pub const ATTR_SMARTSAN_PROD_NAME: u16 = 0xf103;
pub const ATTR_SMARTSAN_PORT_INFO: u16 = 0xf104;
pub const ATTR_SMARTSAN_QOS_SUPPORT: u16 = 0xf105;
pub const ATTR_SMARTSAN_SECURITY_SUPPORT: u16 = 0xf106;

/// Class 3 bit of the supported class-of-service word.
pub const COS_CLASS_3: u32 = 0x08;
/// Port state attribute value for an online port.
pub const PORT_STATE_ONLINE: u32 = 0x2;

pub const SMARTSAN_SERVICE_NAME: &str = "Smart SAN Initiator";
pub const SMARTSAN_VERSION_NAME: &str = "Smart SAN Version 1.0";

bitflags! {
    /// Speed bitmap registered by the supported- and current-speed
    /// attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FdmiSpeed: u32 {
        const GB1 = 0x0000_0001;
        const GB2 = 0x0000_0002;
        const GB10 = 0x0000_0004;
        const GB4 = 0x0000_0008;
        const GB8 = 0x0000_0010;
        const GB16 = 0x0000_0020;
        const GB32 = 0x0000_0040;
        /// Speed could not be established.
        const UNKNOWN = 0x0000_8000;
    }
}

/// Speeds the transceiver generation can train at. Converged adapters run
/// the fabric over 10 Gb Ethernet and advertise exactly that.
pub fn supported_speed_mask(converged: bool, top: PortSpeed) -> FdmiSpeed {
    if converged {
        return FdmiSpeed::GB10;
    }
    match top {
        PortSpeed::Gb32 => FdmiSpeed::GB32 | FdmiSpeed::GB16 | FdmiSpeed::GB8,
        PortSpeed::Gb16 => FdmiSpeed::GB16 | FdmiSpeed::GB8 | FdmiSpeed::GB4,
        PortSpeed::Gb8 => {
            FdmiSpeed::GB8 | FdmiSpeed::GB4 | FdmiSpeed::GB2 | FdmiSpeed::GB1
        },
        PortSpeed::Gb4 => FdmiSpeed::GB4 | FdmiSpeed::GB2 | FdmiSpeed::GB1,
        PortSpeed::Gb2 => FdmiSpeed::GB2 | FdmiSpeed::GB1,
        _ => FdmiSpeed::GB1,
    }
}

/// Bit for the rate the link actually trained at.
pub fn current_speed_mask(rate: PortSpeed) -> FdmiSpeed {
    match rate {
        PortSpeed::Gb1 => FdmiSpeed::GB1,
        PortSpeed::Gb2 => FdmiSpeed::GB2,
        PortSpeed::Gb4 => FdmiSpeed::GB4,
        PortSpeed::Gb8 => FdmiSpeed::GB8,
        PortSpeed::Gb10 => FdmiSpeed::GB10,
        PortSpeed::Gb16 => FdmiSpeed::GB16,
        PortSpeed::Gb32 => FdmiSpeed::GB32,
        PortSpeed::Unknown => FdmiSpeed::UNKNOWN,
    }
}

/// Smart SAN GUID: node name followed by port name.
pub fn smart_san_guid(node_name: Wwn, port_name: Wwn) -> [u8; 16] {
    let mut guid = [0u8; 16];
    guid[..WWN_SIZE].copy_from_slice(&node_name.0);
    guid[WWN_SIZE..].copy_from_slice(&port_name.0);
    guid
}

/// Everything the port catalog reads, borrowed from the adapter state.
#[derive(Debug, Clone)]
pub struct PortAttrInputs<'a> {
    pub supported_speeds: FdmiSpeed,
    pub current_speed: FdmiSpeed,
    /// Largest frame payload in bytes.
    pub frame_size: u32,
    pub os_device_name: &'a str,
    pub host_name: &'a str,
    pub node_name: Wwn,
    pub port_name: Wwn,
    pub symbolic_name: &'a str,
    pub port_type: u32,
    pub supported_cos: u32,
    pub fabric_name: Wwn,
    pub port_state: u32,
    pub discovered_ports: u32,
    /// 24-bit fabric address packed into the low bits.
    pub port_id: u32,
    pub smart_guid: [u8; 16],
    /// Product name, `ISP<device id>`.
    pub smart_model: &'a str,
    /// 1 for a physical port, 2 for a virtual one.
    pub smart_port_info: u32,
    pub smart_qos: u32,
    pub smart_security: u32,
}

/// Append the port catalog: six baseline attributes, ten more for the
/// extended catalog and another seven for Smart SAN.
pub fn port_attributes(
    inp: &PortAttrInputs<'_>,
    set: AttrSet,
    w: &mut AttrWriter<'_>,
) -> Result<(), WireError> {
    // FCP SCSI occupies word 0 bit 8 of the FC-4 types bitmap.
    let mut fc4_types = [0u8; 32];
    fc4_types[2] = 0x01;

    w.bytes(ATTR_FC4_TYPES, &fc4_types)?;
    w.u32(ATTR_SUPPORT_SPEED, inp.supported_speeds.bits())?;
    w.u32(ATTR_CURRENT_SPEED, inp.current_speed.bits())?;
    w.u32(ATTR_MAX_FRAME_SIZE, inp.frame_size)?;
    w.string(ATTR_OS_DEVICE_NAME, inp.os_device_name)?;
    w.string(ATTR_HOST_NAME, inp.host_name)?;
    if set == AttrSet::Fdmi1 {
        return Ok(());
    }
    w.wwn(ATTR_NODE_NAME, inp.node_name)?;
    w.wwn(ATTR_PORT_NAME, inp.port_name)?;
    w.string(ATTR_SYMBOLIC_NAME, inp.symbolic_name)?;
    w.u32(ATTR_PORT_TYPE, inp.port_type)?;
    w.u32(ATTR_SUPPORTED_COS, inp.supported_cos)?;
    w.wwn(ATTR_FABRIC_NAME, inp.fabric_name)?;
    w.bytes(ATTR_ACTIVE_FC4_TYPE, &fc4_types)?;
    w.u32(ATTR_PORT_STATE, inp.port_state)?;
    w.u32(ATTR_PORT_COUNT, inp.discovered_ports)?;
    w.u32(ATTR_PORT_IDENTIFIER, inp.port_id)?;
    if set != AttrSet::SmartSan {
        return Ok(());
    }
    w.string(ATTR_SMARTSAN_SERVICE, SMARTSAN_SERVICE_NAME)?;
    w.bytes(ATTR_SMARTSAN_GUID, &inp.smart_guid)?;
    w.string(ATTR_SMARTSAN_VERSION, SMARTSAN_VERSION_NAME)?;
    w.string(ATTR_SMARTSAN_PROD_NAME, inp.smart_model)?;
    w.u32(ATTR_SMARTSAN_PORT_INFO, inp.smart_port_info)?;
    w.u32(ATTR_SMARTSAN_QOS_SUPPORT, inp.smart_qos)?;
    w.u32(ATTR_SMARTSAN_SECURITY_SUPPORT, inp.smart_security)?;
    Ok(())
}
