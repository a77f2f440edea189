// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Common Transport preamble and response header.
//!
//! Every Generic Services request starts with the 16-byte CT_IU preamble;
//! every response echoes the first 8 bytes and carries the accept/reject
//! verdict in the second half:
//!
//! ```text
//!  0        1..4     4        5           6        7
//! +--------+--------+--------+-----------+--------+--------+
//! | rev    | IN_ID  | GS_TYPE| GS_SUBTYPE| options| rsvd   |
//! +--------+--------+--------+-----------+--------+--------+
//!  8..10            10..12    12          13..16
//! +-----------------+--------+-----------+-----------------+
//! | command (BE)    | max rsp| fragment  | reserved        |
//! +-----------------+--------+-----------+-----------------+
//! ```
//!
//! The `max_rsp_size` field counts 32-bit words left for the payload after
//! the 16-byte header.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, U16},
};

/// CT_IU revision carried by every request this crate issues.
pub const CT_REVISION: u8 = 0x01;

/// GS_TYPE of the directory service.
pub const GS_TYPE_DIRECTORY_SERVER: u8 = 0xfc;
/// GS_SUBTYPE of the Name Server within the directory service.
pub const GS_SUBTYPE_NAME_SERVER: u8 = 0x02;
/// GS_TYPE of the management service.
pub const GS_TYPE_MANAGEMENT_SERVER: u8 = 0xfa;
/// GS_SUBTYPE of the Fabric Configuration Server.
pub const GS_SUBTYPE_FABRIC_CONFIG: u8 = 0x01;
/// GS_SUBTYPE of the HBA management service (FDMI).
pub const GS_SUBTYPE_FDMI_HBA: u8 = 0x10;

/// Accept response code.
pub const CT_ACCEPT_RESPONSE: u16 = 0x8002;
/// Reject response code.
pub const CT_REJECT_RESPONSE: u16 = 0x8001;

/// Reject reason: the command code is not recognized at all.
pub const CT_REASON_INVALID_COMMAND_CODE: u8 = 0x01;
/// Reject reason: the server understood the request but cannot perform it.
pub const CT_REASON_CANNOT_PERFORM: u8 = 0x09;
/// Reject reason: the command is recognized but not supported.
pub const CT_REASON_COMMAND_UNSUPPORTED: u8 = 0x0b;
/// Reject explanation qualifying `CT_REASON_CANNOT_PERFORM`: the object is
/// already registered.
pub const CT_EXPL_ALREADY_REGISTERED: u8 = 0x10;

/// 16-byte CT_IU preamble in wire order.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct CtPreamble {
    pub revision: u8,
    pub in_id: [u8; 3],
    pub gs_type: u8,
    pub gs_subtype: u8,
    pub options: u8,
    reserved: u8,
    pub command: U16<BigEndian>,
    pub max_rsp_size: U16<BigEndian>,
    pub fragment_id: u8,
    reserved2: [u8; 3],
}

/// Byte length of [`CtPreamble`].
pub const CT_PREAMBLE_SIZE: usize = size_of::<CtPreamble>();

impl CtPreamble {
    fn prepare(command: u16, rsp_size: u32, gs_type: u8, gs_subtype: u8) -> Self {
        CtPreamble {
            revision: CT_REVISION,
            gs_type,
            gs_subtype,
            command: U16::new(command),
            // 32-bit words available for the payload after the header
            max_rsp_size: U16::new(((rsp_size as usize - CT_PREAMBLE_SIZE) / 4) as u16),
            ..Default::default()
        }
    }

    /// Preamble of a Name Server request.
    pub fn name_server(command: u16, rsp_size: u32) -> Self {
        Self::prepare(
            command,
            rsp_size,
            GS_TYPE_DIRECTORY_SERVER,
            GS_SUBTYPE_NAME_SERVER,
        )
    }

    /// Preamble of a Fabric Configuration Server request.
    pub fn fabric_config(command: u16, rsp_size: u32) -> Self {
        Self::prepare(
            command,
            rsp_size,
            GS_TYPE_MANAGEMENT_SERVER,
            GS_SUBTYPE_FABRIC_CONFIG,
        )
    }

    /// Preamble of an FDMI request.
    pub fn fdmi(command: u16, rsp_size: u32) -> Self {
        Self::prepare(
            command,
            rsp_size,
            GS_TYPE_MANAGEMENT_SERVER,
            GS_SUBTYPE_FDMI_HBA,
        )
    }
}

/// 16-byte CT response header: echoed preamble half plus the verdict.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct CtRspHeader {
    pub revision: u8,
    pub in_id: [u8; 3],
    pub gs_type: u8,
    pub gs_subtype: u8,
    pub options: u8,
    reserved: u8,
    pub response: U16<BigEndian>,
    pub residual: U16<BigEndian>,
    pub fragment_id: u8,
    pub reason_code: u8,
    pub explanation_code: u8,
    pub vendor_unique: u8,
}

impl CtRspHeader {
    #[inline]
    pub fn is_accept(&self) -> bool {
        self.response.get() == CT_ACCEPT_RESPONSE
    }
}
