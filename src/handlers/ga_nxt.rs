// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! GA_NXT, get-all-next: walks the directory one port at a time. The
//! response describes the port with the next higher address than the one
//! asked about, so repeated calls enumerate the fabric even when GID_PT
//! overflowed.

use tracing::debug;

use crate::{
    fabric::{adapter::Adapter, channel::CommandChannel, error::GsError},
    models::{
        ct::{
            command::{
                GA_NXT_CMD, GA_NXT_REQ_SIZE, GA_NXT_RSP_SIZE, GA_NXT_SNS_CMD_SIZE,
                GA_NXT_SNS_DATA_SIZE, GA_NXT_SNS_SCMD_LEN,
            },
            preamble::CtPreamble,
            request::PortIdPayload,
            response::GaNxtRsp,
        },
        fc::{Fc4Type, FcPort, NS_N_PORT_TYPE, NS_NL_PORT_TYPE},
    },
};

/// Look up the port with the next address after `fcport.d_id` and rewrite
/// `fcport` with the answer.
pub async fn ga_nxt<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    fcport: &mut FcPort,
) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        return sns_ga_nxt(adapter, fcport).await;
    }

    let descriptor = adapter.prep_ms_iocb(GA_NXT_REQ_SIZE, GA_NXT_RSP_SIZE);
    adapter
        .scratch
        .prep(CtPreamble::name_server(GA_NXT_CMD, GA_NXT_RSP_SIZE))?;
    adapter
        .scratch
        .req_view::<PortIdPayload>("ga_nxt request")?
        .port_id = fcport.d_id;

    adapter.issue_ms("GA_NXT", &descriptor).await?;

    let rsp = adapter.scratch.rsp_view::<GaNxtRsp>("ga_nxt response")?;
    populate(fcport, rsp);
    Ok(())
}

async fn sns_ga_nxt<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    fcport: &mut FcPort,
) -> Result<(), GsError> {
    let d_id = fcport.d_id;
    let sns = adapter.sns_mut()?;
    let header = sns.prep(GA_NXT_CMD, GA_NXT_SNS_SCMD_LEN, GA_NXT_SNS_DATA_SIZE)?;
    header.param[0] = d_id.al_pa;
    header.param[1] = d_id.area;
    header.param[2] = d_id.domain;

    adapter.issue_sns("GA_NXT", GA_NXT_SNS_CMD_SIZE / 2).await?;

    let rsp = adapter
        .sns_mut()?
        .rsp_view::<GaNxtRsp>("ga_nxt response")?;
    populate(fcport, rsp);
    Ok(())
}

/// Copy the directory answer into the caller's row. Ports that are neither
/// N nor NL get their domain forced to F0h so address-ordered scan loops
/// step past them.
fn populate(fcport: &mut FcPort, rsp: &GaNxtRsp) {
    fcport.d_id = rsp.port_id;
    fcport.node_name = rsp.node_name;
    fcport.port_name = rsp.port_name;
    fcport.fc4_type = if rsp.fc4_types[2] & 0x01 != 0 {
        Fc4Type::FcpScsi
    } else {
        Fc4Type::Other
    };

    if rsp.port_type != NS_N_PORT_TYPE && rsp.port_type != NS_NL_PORT_TYPE {
        fcport.d_id.domain = 0xf0;
    }

    debug!(
        node_name = %fcport.node_name,
        port_name = %fcport.port_name,
        port_id = %fcport.d_id,
        "GA_NXT entry"
    );
}
