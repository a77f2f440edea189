// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-port name queries walked over a GID_PT list: GPN_ID resolves port
//! names, GNN_ID node names and GFPN_ID the names of the switch ports the
//! devices hang off. Each query takes one round trip per row and stops at
//! the row carrying the end-of-list marker.

use tracing::debug;

use crate::{
    fabric::{adapter::Adapter, channel::CommandChannel, error::GsError},
    models::{
        ct::{
            command::{
                GFPN_ID_CMD, GFPN_ID_REQ_SIZE, GFPN_ID_RSP_SIZE, GNN_ID_CMD,
                GNN_ID_REQ_SIZE, GNN_ID_RSP_SIZE, GNN_ID_SNS_CMD_SIZE,
                GNN_ID_SNS_DATA_SIZE, GNN_ID_SNS_SCMD_LEN, GPN_ID_CMD,
                GPN_ID_REQ_SIZE, GPN_ID_RSP_SIZE, GPN_ID_SNS_CMD_SIZE,
                GPN_ID_SNS_DATA_SIZE, GPN_ID_SNS_SCMD_LEN,
            },
            preamble::CtPreamble,
            request::PortIdPayload,
            response::{GfpnIdRsp, GnnIdRsp, GpnIdRsp},
        },
        fc::{PortEntry, PortId},
    },
};

/// Resolve the port name of every listed device. The first failing row
/// aborts the walk; rows already resolved keep their names.
pub async fn gpn_id<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        return sns_gpn_id(adapter, list).await;
    }

    for entry in list.iter_mut() {
        issue_port_id_query(
            adapter,
            "GPN_ID",
            GPN_ID_CMD,
            GPN_ID_REQ_SIZE,
            GPN_ID_RSP_SIZE,
            entry.d_id,
        )
        .await?;
        entry.port_name = adapter
            .scratch
            .rsp_view::<GpnIdRsp>("gpn_id response")?
            .port_name;

        if entry.last {
            break;
        }
    }
    Ok(())
}

/// Resolve the node name of every listed device; same walk as [`gpn_id`].
pub async fn gnn_id<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        return sns_gnn_id(adapter, list).await;
    }

    for entry in list.iter_mut() {
        issue_port_id_query(
            adapter,
            "GNN_ID",
            GNN_ID_CMD,
            GNN_ID_REQ_SIZE,
            GNN_ID_RSP_SIZE,
            entry.d_id,
        )
        .await?;
        entry.node_name = adapter
            .scratch
            .rsp_view::<GnnIdRsp>("gnn_id response")?
            .node_name;

        debug!(
            node_name = %entry.node_name,
            port_name = %entry.port_name,
            port_id = %entry.d_id,
            "GNN_ID entry"
        );

        if entry.last {
            break;
        }
    }
    Ok(())
}

/// Resolve the fabric port name behind every listed device. Only adapters
/// that retrain per-target speeds care; everything else succeeds without
/// touching the wire.
pub async fn gfpn_id<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    if !adapter.supports_iidma() {
        return Ok(());
    }

    for entry in list.iter_mut() {
        issue_port_id_query(
            adapter,
            "GFPN_ID",
            GFPN_ID_CMD,
            GFPN_ID_REQ_SIZE,
            GFPN_ID_RSP_SIZE,
            entry.d_id,
        )
        .await?;
        entry.fabric_port_name = adapter
            .scratch
            .rsp_view::<GfpnIdRsp>("gfpn_id response")?
            .port_name;

        if entry.last {
            break;
        }
    }
    Ok(())
}

/// One port-id-keyed Name Server round trip; all three queries share the
/// same four-byte request shape.
async fn issue_port_id_query<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    op: &'static str,
    command: u16,
    req_size: u32,
    rsp_size: u32,
    port_id: PortId,
) -> Result<(), GsError> {
    let descriptor = adapter.prep_ms_iocb(req_size, rsp_size);
    adapter
        .scratch
        .prep(CtPreamble::name_server(command, rsp_size))?;
    adapter
        .scratch
        .req_view::<PortIdPayload>("port id request")?
        .port_id = port_id;

    adapter.issue_ms(op, &descriptor).await
}

/// Mailbox-era GPN_ID. A failing row is recorded and the walk moves on;
/// the last recorded outcome is what the caller sees.
async fn sns_gpn_id<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    let mut result = Ok(());
    for entry in list.iter_mut() {
        result = issue_sns_port_id_query(
            adapter,
            "GPN_ID",
            GPN_ID_CMD,
            GPN_ID_SNS_SCMD_LEN,
            GPN_ID_SNS_DATA_SIZE,
            GPN_ID_SNS_CMD_SIZE / 2,
            entry.d_id,
        )
        .await;
        if result.is_ok() {
            entry.port_name = adapter
                .sns_mut()?
                .rsp_view::<GpnIdRsp>("gpn_id response")?
                .port_name;
        }

        if entry.last {
            break;
        }
    }
    result
}

async fn sns_gnn_id<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    let mut result = Ok(());
    for entry in list.iter_mut() {
        result = issue_sns_port_id_query(
            adapter,
            "GNN_ID",
            GNN_ID_CMD,
            GNN_ID_SNS_SCMD_LEN,
            GNN_ID_SNS_DATA_SIZE,
            GNN_ID_SNS_CMD_SIZE / 2,
            entry.d_id,
        )
        .await;
        if result.is_ok() {
            entry.node_name = adapter
                .sns_mut()?
                .rsp_view::<GnnIdRsp>("gnn_id response")?
                .node_name;
        }

        if entry.last {
            break;
        }
    }
    result
}

async fn issue_sns_port_id_query<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    op: &'static str,
    command: u16,
    scmd_len: u16,
    data_size: u16,
    cmd_words: u16,
    port_id: PortId,
) -> Result<(), GsError> {
    let sns = adapter.sns_mut()?;
    let header = sns.prep(command, scmd_len, data_size)?;
    header.param[0] = port_id.al_pa;
    header.param[1] = port_id.area;
    header.param[2] = port_id.domain;

    adapter.issue_sns(op, cmd_words).await
}
