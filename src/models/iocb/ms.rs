// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Management Server IOCB, the 64-byte entry pre-pass-through firmware uses
//! to exchange a CT request/response pair with a fabric service.

use bitflags::bitflags;
use zerocopy::{
    FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16, U32},
};

use crate::models::iocb::{DescriptorOps, Dsd64, ENTRY_SIZE, MsExchangeArgs};

bitflags! {
    /// MS IOCB control flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlFlags: u16 {
        const WRITE = 1 << 6;
        const READ = 1 << 5;
        const HEAD_TAG = 1 << 1;
    }
}

/// Wire image of one MS IOCB. All multi-byte fields are little-endian; the
/// addressed service is named by a 16-bit extended loop id.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct MsIocb {
    pub entry_type: u8,
    pub entry_count: u8,
    pub sys_define: u8,
    pub entry_status: u8,
    pub handle: U32<LittleEndian>,
    pub loop_id: U16<LittleEndian>,
    pub status: U16<LittleEndian>,
    pub control_flags: U16<LittleEndian>,
    reserved2: U16<LittleEndian>,
    pub timeout: U16<LittleEndian>,
    pub cmd_dsd_count: U16<LittleEndian>,
    pub total_dsd_count: U16<LittleEndian>,
    pub fc_type: u8,
    pub r_ctl: u8,
    pub rx_id: U16<LittleEndian>,
    reserved3: U16<LittleEndian>,
    pub handle2: U32<LittleEndian>,
    pub rsp_bytecount: U32<LittleEndian>,
    pub req_bytecount: U32<LittleEndian>,
    pub req_dsd: Dsd64,
    pub rsp_dsd: Dsd64,
}

impl MsIocb {
    pub const ENTRY_TYPE: u8 = 0x29;

    /// Prepare an MS IOCB addressed to `loop_id` for one CT exchange: a
    /// read of the response segment with head-of-queue tagging, one command
    /// segment and two segments total.
    pub fn ms_request(loop_id: u16, args: &MsExchangeArgs) -> Self {
        let mut iocb = MsIocb::new_zeroed();
        iocb.entry_type = Self::ENTRY_TYPE;
        iocb.entry_count = 1;
        iocb.loop_id = U16::new(loop_id);
        iocb.control_flags =
            U16::new((ControlFlags::READ | ControlFlags::HEAD_TAG).bits());
        iocb.timeout = U16::new(args.timeout);
        iocb.cmd_dsd_count = U16::new(1);
        iocb.total_dsd_count = U16::new(2);
        iocb.rsp_bytecount = U32::new(args.rsp_size);
        iocb.req_bytecount = U32::new(args.req_size);
        iocb.req_dsd.set(args.req_dma, args.req_size);
        iocb.rsp_dsd.set(args.rsp_dma, args.rsp_size);
        iocb
    }
}

impl DescriptorOps for MsIocb {
    fn to_wire(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }

    fn set_req_size(&mut self, req_bytes: u32) {
        self.req_bytecount = U32::new(req_bytes);
        self.req_dsd.length = self.req_bytecount;
    }

    fn req_size(&self) -> u32 {
        self.req_bytecount.get()
    }

    fn entry_status(&self) -> u8 {
        self.entry_status
    }

    fn comp_status(&self) -> u16 {
        self.status.get()
    }
}

impl From<[u8; ENTRY_SIZE]> for MsIocb {
    fn from(bytes: [u8; ENTRY_SIZE]) -> Self {
        zerocopy::transmute!(bytes)
    }
}
