// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Generic Services command codes and the request/response allocations that
//! go with them. Sizes include the 16-byte CT preamble.

use crate::models::ct::preamble::CT_PREAMBLE_SIZE;

// Name Server queries.
pub const GA_NXT_CMD: u16 = 0x100;
pub const GA_NXT_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4) as u32;
pub const GA_NXT_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 620) as u32;

pub const GID_PT_CMD: u16 = 0x1a1;
pub const GID_PT_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4) as u32;

pub const GPN_ID_CMD: u16 = 0x112;
pub const GPN_ID_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4) as u32;
pub const GPN_ID_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 8) as u32;

pub const GNN_ID_CMD: u16 = 0x113;
pub const GNN_ID_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4) as u32;
pub const GNN_ID_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 8) as u32;

pub const GFF_ID_CMD: u16 = 0x11f;
pub const GFF_ID_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4) as u32;
pub const GFF_ID_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 128) as u32;

// Name Server registrations.
pub const RFT_ID_CMD: u16 = 0x217;
pub const RFT_ID_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4 + 32) as u32;
pub const RFT_ID_RSP_SIZE: u32 = CT_PREAMBLE_SIZE as u32;

pub const RFF_ID_CMD: u16 = 0x21f;
pub const RFF_ID_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4 + 2 + 1 + 1) as u32;
pub const RFF_ID_RSP_SIZE: u32 = CT_PREAMBLE_SIZE as u32;

pub const RNN_ID_CMD: u16 = 0x213;
pub const RNN_ID_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4 + 8) as u32;
pub const RNN_ID_RSP_SIZE: u32 = CT_PREAMBLE_SIZE as u32;

pub const RSNN_NN_CMD: u16 = 0x239;
pub const RSNN_NN_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 8 + 1 + 255) as u32;
pub const RSNN_NN_RSP_SIZE: u32 = CT_PREAMBLE_SIZE as u32;

// Fabric Configuration Server queries.
pub const GFPN_ID_CMD: u16 = 0x11c;
pub const GFPN_ID_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 4) as u32;
pub const GFPN_ID_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 8) as u32;

pub const GPSC_CMD: u16 = 0x127;
pub const GPSC_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 8) as u32;
pub const GPSC_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 2 + 2) as u32;

// FDMI registrations. Requests grow with the attribute block, so only the
// response allocations are fixed here.
pub const RHBA_CMD: u16 = 0x200;
pub const RHBA_RSP_SIZE: u32 = CT_PREAMBLE_SIZE as u32;

pub const RPA_CMD: u16 = 0x211;
pub const RPA_RSP_SIZE: u32 = CT_PREAMBLE_SIZE as u32;
/// A Smart SAN RPA accept carries an 8-byte payload after the header.
pub const SMARTSAN_RPA_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 8) as u32;

pub const RPRT_CMD: u16 = 0x210;
pub const RPRT_RSP_SIZE: u32 = (CT_PREAMBLE_SIZE + 8) as u32;

pub const DHBA_CMD: u16 = 0x300;
pub const DHBA_REQ_SIZE: u32 = (CT_PREAMBLE_SIZE + 8) as u32;
pub const DHBA_RSP_SIZE: u32 = CT_PREAMBLE_SIZE as u32;

/// GID_PT response allocation for a given device-table size: one 4-byte
/// entry per port after the header.
#[inline]
pub const fn gid_pt_rsp_size(max_fibre_devices: u32) -> u32 {
    CT_PREAMBLE_SIZE as u32 + max_fibre_devices * 4
}

// Mailbox-era SNS subcommand framing. The subcommand length counts 16-bit
// words of the request past the SNS header; data sizes cover the response
// buffer including its 16-byte CT header.
pub const GA_NXT_SNS_SCMD_LEN: u16 = 6;
pub const GA_NXT_SNS_CMD_SIZE: u16 = 28;
pub const GA_NXT_SNS_DATA_SIZE: u16 = 620 + 16;

pub const GID_PT_SNS_SCMD_LEN: u16 = 6;
pub const GID_PT_SNS_CMD_SIZE: u16 = 28;

pub const GPN_ID_SNS_SCMD_LEN: u16 = 6;
pub const GPN_ID_SNS_CMD_SIZE: u16 = 28;
pub const GPN_ID_SNS_DATA_SIZE: u16 = 8 + 16;

pub const GNN_ID_SNS_SCMD_LEN: u16 = 6;
pub const GNN_ID_SNS_CMD_SIZE: u16 = 28;
pub const GNN_ID_SNS_DATA_SIZE: u16 = 8 + 16;

pub const RFT_ID_SNS_SCMD_LEN: u16 = 22;
pub const RFT_ID_SNS_CMD_SIZE: u16 = 60;
pub const RFT_ID_SNS_DATA_SIZE: u16 = 16;

pub const RNN_ID_SNS_SCMD_LEN: u16 = 10;
pub const RNN_ID_SNS_CMD_SIZE: u16 = 36;
pub const RNN_ID_SNS_DATA_SIZE: u16 = 16;
