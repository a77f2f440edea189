// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Error taxonomy for Generic Services exchanges. Three tiers matter to
//! callers: the transport never delivered a response, the server delivered
//! a reject, or the response arrived but could not be used.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::{
    fabric::channel::ChannelError,
    models::{
        common::WireError,
        ct::preamble::{
            CT_EXPL_ALREADY_REGISTERED, CT_REASON_CANNOT_PERFORM,
            CT_REASON_COMMAND_UNSUPPORTED, CT_REASON_INVALID_COMMAND_CODE,
        },
    },
};

#[derive(Debug, Error)]
pub enum GsError {
    /// The exchange never produced a CT response.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Firmware flagged the completed entry itself as malformed.
    #[error("{op}: entry error status {status:#04x}")]
    EntryStatus { op: &'static str, status: u8 },

    /// Completion status other than complete or a data under/overrun.
    #[error("{op}: completion status {status:#06x}")]
    Completion { op: &'static str, status: u16 },

    /// The server answered with a CT reject.
    #[error("{op}: rejected, reason {reason:#04x} explanation {explanation:#04x}")]
    Rejected {
        op: &'static str,
        reason: u8,
        explanation: u8,
    },

    /// A typed view did not fit the response window.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The port list filled to capacity with no end-of-list marker.
    #[error("port list overflowed before the last-entry marker")]
    ListOverflow,

    /// The operation is unavailable on this adapter, or was disabled for
    /// the rest of the session.
    #[error("{0} is not available on this adapter")]
    Unsupported(&'static str),

    /// Management Server login did not complete.
    #[error("management server login failed with status {status:#06x}")]
    ManagementLogin { status: u16 },

    /// An orchestration invariant broke.
    #[error("internal: {0}")]
    Internal(&'static str),
}

impl GsError {
    /// Reject meaning the object is already registered; FDMI registration
    /// recovers from this one by deregistering first.
    #[inline]
    pub fn is_already_registered(&self) -> bool {
        matches!(
            self,
            GsError::Rejected {
                reason: CT_REASON_CANNOT_PERFORM,
                explanation: CT_EXPL_ALREADY_REGISTERED,
                ..
            }
        )
    }

    /// Reject meaning the server will never take this command, as opposed
    /// to not taking it right now.
    #[inline]
    pub fn is_command_unsupported(&self) -> bool {
        matches!(
            self,
            GsError::Rejected {
                reason: CT_REASON_INVALID_COMMAND_CODE | CT_REASON_COMMAND_UNSUPPORTED,
                ..
            }
        )
    }
}

/// Reject reason texts (FC-GS-2 onwards), for the logs.
static REASON_TEXT: Lazy<HashMap<u8, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (0x01u8, "invalid command code"),
        (0x02, "invalid version level"),
        (0x03, "logical error"),
        (0x04, "invalid CT_IU size"),
        (0x05, "logical busy"),
        (0x07, "protocol error"),
        (0x09, "unable to perform command request"),
        (0x0b, "command not supported"),
        (0x0d, "server not available"),
        (0x0e, "session could not be established"),
        (0xff, "vendor specific"),
    ])
});

/// Human text for a CT reject reason code.
pub fn reject_reason_text(reason: u8) -> &'static str {
    REASON_TEXT.get(&reason).copied().unwrap_or("reserved")
}
