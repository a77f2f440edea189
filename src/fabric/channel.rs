// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Seam between the Generic Services client and whatever can reach the
//! adapter: a live I/O core, or a scripted stand-in under test.

use bitflags::bitflags;
use thiserror::Error;

use crate::models::{common::DmaAddr, fc::PortId, iocb::ENTRY_SIZE};

/// Mailbox status word of a completed command.
pub const MBS_COMMAND_COMPLETE: u16 = 0x4000;

/// Status words a mailbox command hands back.
pub const MAILBOX_STATUS_WORDS: usize = 8;

bitflags! {
    /// Options of a fabric port login mailbox command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LoginFlags: u16 {
        /// Do not start a process login after the port login.
        const NO_PRLI = 1 << 0;
        /// Leave the firmware port database untouched.
        const NO_DB_UPDATE = 1 << 1;
    }
}

/// Failure raised by the channel itself, before any CT payload exists to
/// inspect.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("command timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("no request slot available")]
    Busy,
    #[error("link is offline")]
    Offline,
    #[error("mailbox command failed with status {0:#06x}")]
    Mailbox(u16),
}

/// What the embedding driver provides to move exchanges.
///
/// `issue_ms` mirrors the firmware contract: the request sits at the front
/// of `exchange`, the implementation consumes `req_len` bytes of it, then
/// overwrites the same window with the raw CT response before handing back
/// the completed 64-byte entry image.
pub trait CommandChannel: Send {
    /// Run one Management Server exchange described by a prepared entry.
    fn issue_ms(
        &mut self,
        entry: [u8; ENTRY_SIZE],
        exchange: &mut [u8],
        req_len: usize,
    ) -> impl Future<Output = Result<[u8; ENTRY_SIZE], ChannelError>> + Send;

    /// Run one Send SNS mailbox command. The packet sits at the front of
    /// `buffer` and the raw CT response overwrites the whole buffer.
    fn send_sns(
        &mut self,
        dma: DmaAddr,
        cmd_words: u16,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Port login to a well-known fabric address.
    fn fabric_login(
        &mut self,
        loop_id: u16,
        d_id: PortId,
        flags: LoginFlags,
    ) -> impl Future<Output = Result<[u16; MAILBOX_STATUS_WORDS], ChannelError>> + Send;
}
