// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Response payloads that follow the CT response header.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, U16},
};

use crate::models::fc::{PortId, PortSpeed, Wwn};

/// Offset of the FCP SCSI feature byte inside a GFF_ID feature block.
pub const GFF_FCP_SCSI_OFFSET: usize = 7;

/// GA_NXT: the full Name Server object of the next registered port.
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct GaNxtRsp {
    pub port_type: u8,
    pub port_id: PortId,
    pub port_name: Wwn,
    pub sym_port_name_len: u8,
    pub sym_port_name: [u8; 255],
    pub node_name: Wwn,
    pub sym_node_name_len: u8,
    pub sym_node_name: [u8; 255],
    pub init_proc_assoc: [u8; 8],
    pub node_ip_addr: [u8; 16],
    pub class_of_service: [u8; 4],
    pub fc4_types: [u8; 32],
    pub ip_address: [u8; 16],
    pub fab_port_name: Wwn,
    reserved: u8,
    pub hard_address: [u8; 3],
}

/// One GID_PT port list entry.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct GidPtEntry {
    pub control_byte: u8,
    pub port_id: PortId,
}

impl GidPtEntry {
    /// Top bit of the control byte marks the final entry of the list.
    pub const LAST_ENTRY: u8 = 0x80;

    #[inline]
    pub fn is_last(&self) -> bool {
        self.control_byte & Self::LAST_ENTRY != 0
    }
}

/// GPN_ID: port name of the queried port id.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct GpnIdRsp {
    pub port_name: Wwn,
}

/// GNN_ID: node name of the queried port id.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct GnnIdRsp {
    pub node_name: Wwn,
}

/// GFPN_ID: fabric port name of the queried port id.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct GfpnIdRsp {
    pub port_name: Wwn,
}

/// GFF_ID: the 128-byte FC-4 features block of the queried port id.
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct GffIdRsp {
    pub fc4_features: [u8; 128],
}

impl GffIdRsp {
    /// FCP SCSI feature nibble; nonzero means the port registered FCP
    /// features.
    #[inline]
    pub fn fcp_scsi_features(&self) -> u8 {
        self.fc4_features[GFF_FCP_SCSI_OFFSET] & 0x0f
    }
}

/// GPSC: speed capability words of the queried fabric port name.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct GpscRsp {
    pub speeds: U16<BigEndian>,
    pub speed: U16<BigEndian>,
}

impl GpscRsp {
    /// Decode the operating speed word. Values outside the table leave the
    /// caller's previous answer in place, hence `None`.
    pub fn operating_speed(&self) -> Option<PortSpeed> {
        match self.speed.get() {
            0x8000 => Some(PortSpeed::Gb1),
            0x4000 => Some(PortSpeed::Gb2),
            0x2000 => Some(PortSpeed::Gb4),
            0x1000 => Some(PortSpeed::Gb10),
            0x0800 => Some(PortSpeed::Gb8),
            0x0400 => Some(PortSpeed::Gb16),
            0x0100 => Some(PortSpeed::Gb32),
            _ => None,
        }
    }
}
