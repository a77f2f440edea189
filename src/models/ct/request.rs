// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Request payloads that follow the CT preamble, one struct per wire shape.
//! All of them are plain views over the scratch buffer, so field order and
//! padding match the octet layout exactly.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, U32},
};

use crate::models::fc::{PortId, Wwn};

/// RFF_ID feature bit claiming FCP initiator functionality.
pub const FC4_FEATURE_INITIATOR: u8 = 0x02;
/// RFF_ID feature bit claiming FCP target functionality.
pub const FC4_FEATURE_TARGET: u8 = 0x01;
/// FC-4 TYPE code of FCP SCSI.
pub const FC4_TYPE_FCP_SCSI: u8 = 0x08;

/// Single port id argument used by GA_NXT, GPN_ID, GNN_ID, GFF_ID and
/// GFPN_ID.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct PortIdPayload {
    reserved: u8,
    pub port_id: PortId,
}

/// GID_PT argument selecting which port type population to list.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct GidPtPayload {
    pub port_type: u8,
    pub domain: u8,
    pub area: u8,
    reserved: u8,
}

/// RFT_ID: register the FC-4 types bitmap for a port id.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct RftIdPayload {
    reserved: u8,
    pub port_id: PortId,
    pub fc4_types: [u8; 32],
}

impl RftIdPayload {
    /// Claim the FCP SCSI type (word 0, bit 8 of the bitmap).
    #[inline]
    pub fn set_fcp_scsi(&mut self) {
        self.fc4_types[2] = 0x01;
    }
}

/// RFF_ID: register FC-4 features for one type of a port id.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct RffIdPayload {
    reserved: u8,
    pub port_id: PortId,
    reserved2: [u8; 2],
    pub fc4_feature: u8,
    pub fc4_type: u8,
}

/// RNN_ID: register the node name of a port id.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct RnnIdPayload {
    reserved: u8,
    pub port_id: PortId,
    pub node_name: Wwn,
}

/// RSNN_NN: register a symbolic node name keyed by node name. The request
/// is truncated after the used part of `sym_node_name`.
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct RsnnNnPayload {
    pub node_name: Wwn,
    pub name_len: u8,
    pub sym_node_name: [u8; 255],
}

impl RsnnNnPayload {
    /// Copy `name` in (truncating to 255 bytes) and record its length.
    pub fn set_sym_node_name(&mut self, name: &str) {
        let used = name.len().min(self.sym_node_name.len());
        self.sym_node_name[..used].copy_from_slice(&name.as_bytes()[..used]);
        self.name_len = used as u8;
    }
}

/// GPSC: query the port speed capabilities of one fabric port name.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct GpscPayload {
    pub port_name: Wwn,
}

/// DHBA: deregister an HBA by port name.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct DhbaPayload {
    pub port_name: Wwn,
}

/// Fixed head of an RHBA request; the attribute block follows directly.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct RhbaHead {
    pub hba_identifier: Wwn,
    /// Number of registered port entries, always 1 here.
    pub entry_count: U32<BigEndian>,
    pub port_name: Wwn,
    pub attr_count: U32<BigEndian>,
}

/// Fixed head of an RPA request; the attribute block follows directly.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct RpaHead {
    pub port_name: Wwn,
    pub attr_count: U32<BigEndian>,
}

/// Fixed head of an RPRT request registering a virtual port under its
/// physical HBA; the attribute block follows directly.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct RprtHead {
    pub hba_identifier: Wwn,
    pub port_name: Wwn,
    pub attr_count: U32<BigEndian>,
}
