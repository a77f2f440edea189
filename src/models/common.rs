// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Wire-level primitives shared by the CT payload views and the transport
//! descriptors.

use thiserror::Error;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Bus address of a scratch region as the firmware would see it. The
/// library never dereferences one; addresses only travel inside
/// descriptors so completed entries can be checked against the buffers
/// they were built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DmaAddr(pub u64);

/// A typed view did not fit the scratch window it was cast over.
#[derive(Debug, Error)]
#[error("{what} does not fit its window: need {need} bytes, {have} available")]
pub struct WireError {
    pub what: &'static str,
    pub need: usize,
    pub have: usize,
}

/// Cast the front of `buf` as a shared `T`.
pub(crate) fn view_at<'a, T>(buf: &'a [u8], what: &'static str) -> Result<&'a T, WireError>
where
    T: FromBytes + KnownLayout + Immutable + Unaligned,
{
    match T::ref_from_prefix(buf) {
        Ok((view, _)) => Ok(view),
        Err(_) => Err(WireError {
            what,
            need: size_of::<T>(),
            have: buf.len(),
        }),
    }
}

/// Cast the front of `buf` as an exclusive `T`.
pub(crate) fn view_at_mut<'a, T>(
    buf: &'a mut [u8],
    what: &'static str,
) -> Result<&'a mut T, WireError>
where
    T: FromBytes + IntoBytes + KnownLayout + Unaligned,
{
    let have = buf.len();
    match T::mut_from_prefix(buf) {
        Ok((view, _)) => Ok(view),
        Err(_) => Err(WireError {
            what,
            need: size_of::<T>(),
            have,
        }),
    }
}
