// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! GID_PT, get-port-identifiers-by-type: one request returns every Nx_Port
//! the fabric knows. The last entry carries a control-byte marker; a full
//! list without the marker means the fabric holds more ports than the
//! allocation and the caller falls back to a GA_NXT walk.

use tracing::debug;

use crate::{
    fabric::{adapter::Adapter, channel::CommandChannel, error::GsError},
    models::{
        ct::{
            command::{
                GID_PT_CMD, GID_PT_REQ_SIZE, GID_PT_SNS_CMD_SIZE, GID_PT_SNS_SCMD_LEN,
                gid_pt_rsp_size,
            },
            preamble::CtPreamble,
            request::GidPtPayload,
            response::GidPtEntry,
        },
        fc::{NS_NX_PORT_TYPE, PortEntry, PortSpeed, Wwn},
    },
};

/// Fill `list` with the fabric's Nx_Port addresses. Each written row is
/// reset to no fabric port name and unknown speed so the later GFPN_ID and
/// GPSC passes start clean.
pub async fn gid_pt<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        return sns_gid_pt(adapter, list).await;
    }

    let rsp_size = gid_pt_rsp_size(adapter.max_fibre_devices());
    let descriptor = adapter.prep_ms_iocb(GID_PT_REQ_SIZE, rsp_size);
    adapter
        .scratch
        .prep(CtPreamble::name_server(GID_PT_CMD, rsp_size))?;
    adapter
        .scratch
        .req_view::<GidPtPayload>("gid_pt request")?
        .port_type = NS_NX_PORT_TYPE;

    adapter.issue_ms("GID_PT", &descriptor).await?;

    let capacity = list.len().min(adapter.max_fibre_devices() as usize);
    let entries = adapter
        .scratch
        .rsp_entries::<GidPtEntry>(capacity, "gid_pt entries")?;
    fill(&mut list[..capacity], entries)
}

async fn sns_gid_pt<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    let data_size = gid_pt_rsp_size(adapter.max_fibre_devices()) as u16;
    let sns = adapter.sns_mut()?;
    let header = sns.prep(GID_PT_CMD, GID_PT_SNS_SCMD_LEN, data_size)?;
    header.param[0] = NS_NX_PORT_TYPE;

    adapter.issue_sns("GID_PT", GID_PT_SNS_CMD_SIZE / 2).await?;

    let capacity = list.len().min(adapter.max_fibre_devices() as usize);
    let entries = adapter
        .sns_mut()?
        .rsp_entries::<GidPtEntry>(capacity, "gid_pt entries")?;
    fill(&mut list[..capacity], entries)
}

/// Copy port ids until the end-of-list marker. Running out of rows first
/// means the switch reported more devices than one call can carry.
fn fill(list: &mut [PortEntry], entries: &[GidPtEntry]) -> Result<(), GsError> {
    for (slot, entry) in list.iter_mut().zip(entries) {
        slot.d_id = entry.port_id;
        slot.fabric_port_name = Wwn::ZERO;
        slot.fp_speed = PortSpeed::Unknown;
        slot.last = entry.is_last();

        if slot.last {
            debug!(last = %slot.d_id, "GID_PT list complete");
            return Ok(());
        }
    }
    Err(GsError::ListOverflow)
}
