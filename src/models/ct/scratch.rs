// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Owned CT exchange buffer. Requests are laid out at the front and the
//! transport overwrites the same bytes with the response, exactly like the
//! single DMA region the firmware interface shares between both directions.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::models::{
    common::{DmaAddr, WireError, view_at, view_at_mut},
    ct::{
        command::gid_pt_rsp_size,
        preamble::{CT_PREAMBLE_SIZE, CtPreamble, CtRspHeader},
    },
};

pub struct CtScratch {
    buf: Box<[u8]>,
    dma: DmaAddr,
}

impl CtScratch {
    /// Floor for the allocation so the largest fixed response always fits.
    pub const MIN_SIZE: usize = 8192;

    /// Allocate for up to `max_fibre_devices` GID_PT entries.
    pub fn new(max_fibre_devices: u32, dma: DmaAddr) -> Self {
        let len = (gid_pt_rsp_size(max_fibre_devices) as usize).max(Self::MIN_SIZE);
        Self {
            buf: vec![0u8; len].into_boxed_slice(),
            dma,
        }
    }

    #[inline]
    pub fn dma(&self) -> DmaAddr {
        self.dma
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Raw buffer contents, mostly for tracing a surprising response.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Zero the buffer and write `preamble` at the front; the request
    /// payload follows it.
    pub fn prep(&mut self, preamble: CtPreamble) -> Result<(), WireError> {
        self.buf.fill(0);
        let head = view_at_mut::<CtPreamble>(&mut self.buf, "ct preamble")?;
        *head = preamble;
        Ok(())
    }

    /// Exclusive typed view of the request payload after the preamble.
    pub fn req_view<T>(&mut self, what: &'static str) -> Result<&mut T, WireError>
    where
        T: FromBytes + IntoBytes + KnownLayout + Unaligned,
    {
        view_at_mut::<T>(&mut self.buf[CT_PREAMBLE_SIZE..], what)
    }

    /// Request payload bytes past the first `skip` payload bytes, for
    /// variable-length tails like FDMI attribute blocks.
    pub fn req_tail_mut(&mut self, skip: usize) -> Result<&mut [u8], WireError> {
        let start = CT_PREAMBLE_SIZE + skip;
        if start > self.buf.len() {
            return Err(WireError {
                what: "request tail",
                need: start,
                have: self.buf.len(),
            });
        }
        Ok(&mut self.buf[start..])
    }

    /// The first `req_size` bytes, ready to hand to the transport.
    pub fn request(&self, req_size: u32) -> Result<&[u8], WireError> {
        let len = req_size as usize;
        if len > self.buf.len() {
            return Err(WireError {
                what: "ct request",
                need: len,
                have: self.buf.len(),
            });
        }
        Ok(&self.buf[..len])
    }

    /// Whole buffer, for the transport to overwrite with the response.
    pub fn response_window(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// CT response header overlaying the front of the buffer.
    pub fn rsp_header(&self) -> Result<&CtRspHeader, WireError> {
        view_at::<CtRspHeader>(&self.buf, "ct response header")
    }

    /// Typed view of the response payload past the header.
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
