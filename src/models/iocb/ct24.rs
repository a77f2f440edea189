// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! CT pass-through entry, the 64-byte descriptor pass-through capable
//! firmware uses for fabric service exchanges. The service is addressed by
//! N_Port handle instead of loop id, and the completion status lives in the
//! entry itself.

use zerocopy::{
    FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16, U32},
};

use crate::models::iocb::{DescriptorOps, Dsd64, ENTRY_SIZE, MsExchangeArgs};

/// Wire image of one CT pass-through entry. All multi-byte fields are
/// little-endian.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct CtPassthru {
    pub entry_type: u8,
    pub entry_count: u8,
    pub sys_define: u8,
    pub entry_status: u8,
    pub handle: U32<LittleEndian>,
    pub comp_status: U16<LittleEndian>,
    pub nport_handle: U16<LittleEndian>,
    pub cmd_dsd_count: U16<LittleEndian>,
    pub vp_index: u8,
    reserved1: u8,
    pub timeout: U16<LittleEndian>,
    reserved2: U16<LittleEndian>,
    pub rsp_dsd_count: U16<LittleEndian>,
    reserved3: [u8; 10],
    pub rsp_byte_count: U32<LittleEndian>,
    pub cmd_byte_count: U32<LittleEndian>,
    /// Segment 0 carries the command, segment 1 the response.
    pub dsd: [Dsd64; 2],
}

impl CtPassthru {
    pub const ENTRY_TYPE: u8 = 0x25;

    /// Prepare a pass-through entry addressed to `nport_handle` for one CT
    /// exchange on virtual port `vp_index`.
    pub fn ms_request(nport_handle: u16, vp_index: u8, args: &MsExchangeArgs) -> Self {
        let mut entry = CtPassthru::new_zeroed();
        entry.entry_type = Self::ENTRY_TYPE;
        entry.entry_count = 1;
        entry.nport_handle = U16::new(nport_handle);
        entry.timeout = U16::new(args.timeout);
        entry.cmd_dsd_count = U16::new(1);
        entry.rsp_dsd_count = U16::new(1);
        entry.rsp_byte_count = U32::new(args.rsp_size);
        entry.cmd_byte_count = U32::new(args.req_size);
        entry.dsd[0].set(args.req_dma, args.req_size);
        entry.dsd[1].set(args.rsp_dma, args.rsp_size);
        entry.vp_index = vp_index;
        entry
    }
}

impl DescriptorOps for CtPassthru {
    fn to_wire(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    fn set_req_size(&mut self, req_bytes: u32) {
        self.cmd_byte_count = U32::new(req_bytes);
        self.dsd[0].length = self.cmd_byte_count;
    }

    fn req_size(&self) -> u32 {
        self.cmd_byte_count.get()
    }

    fn entry_status(&self) -> u8 {
        self.entry_status
    }

    fn comp_status(&self) -> u16 {
        self.comp_status.get()
    }
}

impl From<[u8; ENTRY_SIZE]> for CtPassthru {
    fn from(bytes: [u8; ENTRY_SIZE]) -> Self {
        zerocopy::transmute!(bytes)
    }
}
