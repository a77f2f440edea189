// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! SNS command packet for the mailbox-era firmware interface. The packet
//! header and the response share one buffer: the firmware consumes the
//! command from the front and then overwrites the whole buffer with the CT
//! response.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{LittleEndian, U16, U32, U64},
};

use crate::models::{
    common::{DmaAddr, WireError, view_at, view_at_mut},
    ct::preamble::{CT_PREAMBLE_SIZE, CtRspHeader},
};

/// SNS command header laid out at the front of the shared buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct SnsCmdHeader {
    /// Response allocation in 16-bit words.
    pub buffer_length: U16<LittleEndian>,
    reserved1: U16<LittleEndian>,
    pub buffer_address: U64<LittleEndian>,
    /// Request length past this header, in 16-bit words.
    pub subcommand_length: U16<LittleEndian>,
    reserved2: U16<LittleEndian>,
    pub subcommand: U16<LittleEndian>,
    /// Response payload allocation in 32-bit words, header excluded.
    pub size: U16<LittleEndian>,
    reserved3: U32<LittleEndian>,
    pub param: [u8; 36],
}

// `[u8; 36]` has no `Default` impl, so the derive cannot be used; this is
// what the derive would produce (every field zeroed).
impl Default for SnsCmdHeader {
    fn default() -> Self {
        zerocopy::FromZeros::new_zeroed()
    }
}

/// Owned SNS exchange buffer, sized for the largest mailbox-era response
/// (a full GID_PT port list).
pub struct SnsScratch {
    buf: Box<[u8]>,
    dma: DmaAddr,
}

impl SnsScratch {
    /// 512 four-byte GID_PT entries plus the CT header.
    pub const BUFFER_SIZE: usize = 512 * 4 + CT_PREAMBLE_SIZE;

    pub fn new(dma: DmaAddr) -> Self {
        Self {
            buf: vec![0u8; Self::BUFFER_SIZE].into_boxed_slice(),
            dma,
        }
    }

    #[inline]
    pub fn dma(&self) -> DmaAddr {
        self.dma
    }

    /// Zero the buffer and lay down a fresh command header: response
    /// allocation in 16-bit words, request length in 16-bit words, payload
    /// allocation in 32-bit words past the CT header.
    pub fn prep(
        &mut self,
        subcommand: u16,
        scmd_len: u16,
        data_size: u16,
    ) -> Result<&mut SnsCmdHeader, WireError> {
        self.buf.fill(0);
        let dma = self.dma;
        let header = view_at_mut::<SnsCmdHeader>(&mut self.buf, "sns command header")?;
        header.buffer_length = U16::new(data_size / 2);
        header.buffer_address = U64::new(dma.0);
        header.subcommand_length = U16::new(scmd_len);
        header.subcommand = U16::new(subcommand);
        header.size = U16::new((data_size - CT_PREAMBLE_SIZE as u16) / 4);
        Ok(header)
    }

    /// Whole buffer, for the transport to fill with the response.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// CT response header overlaying the front of the buffer.
    pub fn rsp_header(&self) -> Result<&CtRspHeader, WireError> {
        view_at::<CtRspHeader>(&self.buf, "sns response header")
    }

    /// Typed view of the response payload past the CT header.
    pub fn rsp_view<T>(&self, what: &'static str) -> Result<&T, WireError>
    where
        T: FromBytes + KnownLayout + Immutable + Unaligned,
    {
        view_at::<T>(&self.buf[CT_PREAMBLE_SIZE..], what)
    }

    /// Response payload as `count` consecutive entries.
    pub fn rsp_entries<T>(
        &self,
        count: usize,
        what: &'static str,
    ) -> Result<&[T], WireError>
    where
        T: FromBytes + KnownLayout + Immutable + Unaligned,
    {
        let window = &self.buf[CT_PREAMBLE_SIZE..];
        match <[T]>::ref_from_prefix_with_elems(window, count) {
            Ok((entries, _)) => Ok(entries),
            Err(_) => Err(WireError {
                what,
                need: count * size_of::<T>(),
                have: window.len(),
            }),
        }
    }
}
