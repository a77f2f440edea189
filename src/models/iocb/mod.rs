//! Transport descriptors: the 64-byte entries and mailbox packets handed to
//! the firmware to move a CT request and collect its response.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Pass-through CT entry used by later firmware interfaces.
pub mod ct24;
/// Managemenet Server IOCB used by earlier fabric-capable firmware.
pub mod ms;
/// Mailbox SNS packet used by the oldest firmware interface.
pub mod sns;

use enum_dispatch::enum_dispatch;
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U32, U64},
};

use crate::models::common::DmaAddr;
pub use crate::models::iocb::{ct24::CtPassthru, ms::MsIocb};

/// Every ring entry is exactly this long.
pub const ENTRY_SIZE: usize = 64;

/// Completion status: no transport error.
pub const CS_COMPLETE: u16 = 0x0;
/// Completion status: the response overran the allocation.
pub const CS_DATA_OVERRUN: u16 = 0x7;
/// Completion status: the response was shorter than the allocation.
pub const CS_DATA_UNDERRUN: u16 = 0x15;

/// 64-bit data segment descriptor: address plus length.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct Dsd64 {
    pub address: U64<LittleEndian>,
    pub length: U32<LittleEndian>,
}

impl Dsd64 {
    #[inline]
    pub fn set(&mut self, addr: DmaAddr, length: u32) {
        self.address = U64::new(addr.0);
        self.length = U32::new(length);
    }
}

/// Everything a descriptor needs to describe one CT exchange.
#[derive(Debug, Clone, Copy)]
pub struct MsExchangeArgs {
    pub req_size: u32,
    pub rsp_size: u32,
    pub req_dma: DmaAddr,
    pub rsp_dma: DmaAddr,
    /// Exchange timeout in seconds, derived from the fabric R_A_TOV.
    pub timeout: u16,
}

/// Operations every descriptor format provides, dispatched statically over
/// [`MsDescriptor`].
#[enum_dispatch]
pub trait DescriptorOps {
    /// 64-byte wire image handed to the transport.
    fn to_wire(&self) -> [u8; ENTRY_SIZE];

    /// Patch the request byte count after the payload grew in place.
    fn set_req_size(&mut self, req_bytes: u32);

    /// Request byte count currently described by the entry.
    fn req_size(&self) -> u32;

    /// Entry status of a completed descriptor; nonzero means the firmware
    /// faulted the entry itself.
    fn entry_status(&self) -> u8;

    /// Transport completion status of a completed descriptor.
    fn comp_status(&self) -> u16;
}

/// A prepared (or completed) Management Server exchange descriptor in
/// whichever format the adapter generation speaks.
#[enum_dispatch(DescriptorOps)]
#[derive(Debug, Clone)]
pub enum MsDescriptor {
    MsIocb,
    CtPassthru,
}
