// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! TLV encoder for FDMI attribute blocks.
//!
//! Each attribute is a big-endian type, a big-endian length counting the
//! 4-byte header plus the value, then the value itself zero-padded to the
//! next 4-byte boundary:
//!
//! ```text
//!  0..2     2..4     4..
//! +--------+--------+------------------------+
//! | type   | length | value, zero padded /4  |
//! +--------+--------+------------------------+
//! ```

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::{BigEndian, U16},
};

use crate::models::{
    common::{WireError, view_at_mut},
    fc::Wwn,
};

/// Header every attribute starts with.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned,
)]
pub struct AttrHeader {
    pub attr_type: U16<BigEndian>,
    /// Header-inclusive length, always a multiple of four.
    pub len: U16<BigEndian>,
}

/// Byte length of [`AttrHeader`].
pub const ATTR_HEADER_SIZE: usize = size_of::<AttrHeader>();

/// Appends attributes into a request tail and keeps the running block size
/// and entry count the registration head needs.
pub struct AttrWriter<'a> {
    buf: &'a mut [u8],
    used: usize,
    count: u32,
}

impl<'a> AttrWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            used: 0,
            count: 0,
        }
    }

    /// Bytes appended so far.
    #[inline]
    pub fn size(&self) -> usize {
        self.used
    }

    /// Attributes appended so far.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    fn append(
        &mut self,
        attr_type: u16,
        value: &[u8],
        padded: usize,
    ) -> Result<(), WireError> {
        let need = ATTR_HEADER_SIZE + padded;
        let window = &mut self.buf[self.used..];
        if window.len() < need {
            return Err(WireError {
                what: "fdmi attribute",
                need,
                have: window.len(),
            });
        }
        let header = view_at_mut::<AttrHeader>(window, "fdmi attribute header")?;
        header.attr_type = U16::new(attr_type);
        header.len = U16::new(need as u16);
        let body = &mut window[ATTR_HEADER_SIZE..need];
        body[..value.len()].copy_from_slice(value);
        body[value.len()..].fill(0);
        self.used += need;
        self.count += 1;
        Ok(())
    }

    /// Fixed-size value whose length is already a multiple of four.
    pub fn bytes(&mut self, attr_type: u16, value: &[u8]) -> Result<(), WireError> {
        debug_assert_eq!(value.len() % 4, 0);
        self.append(attr_type, value, value.len())
    }

    /// Big-endian 32-bit value.
    pub fn u32(&mut self, attr_type: u16, value: u32) -> Result<(), WireError> {
        self.append(attr_type, &value.to_be_bytes(), 4)
    }

    /// World wide name value.
    pub fn wwn(&mut self, attr_type: u16, value: Wwn) -> Result<(), WireError> {
        self.append(attr_type, value.as_bytes(), size_of::<Wwn>())
    }

    /// Text value, zero padded up to the next 4-byte boundary.
    pub fn string(&mut self, attr_type: u16, value: &str) -> Result<(), WireError> {
        let raw = value.as_bytes();
        self.append(attr_type, raw, raw.len().div_ceil(4) * 4)
    }

    /// Final block size in bytes and the number of attributes written.
    pub fn finish(self) -> (usize, u32) {
        (self.used, self.count)
    }
}
