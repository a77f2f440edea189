// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! GFF_ID, get-FC-4-features: classifies each listed port as FCP SCSI or
//! not from the FC-4 feature bits the port registered. The answer only
//! steers which ports get a process login first, so this query degrades
//! instead of failing: whatever cannot be learned stays unknown.

use tracing::debug;

use crate::{
    fabric::{adapter::Adapter, channel::CommandChannel, error::GsError},
    models::{
        ct::{
            command::{GFF_ID_CMD, GFF_ID_REQ_SIZE, GFF_ID_RSP_SIZE},
            preamble::CtPreamble,
            request::PortIdPayload,
            response::GffIdRsp,
        },
        fc::{Fc4Type, PortEntry, PortId},
    },
};

/// Classify every listed port by its registered FCP SCSI features. Rows
/// that cannot be queried, on whatever grounds, are left unknown.
pub async fn gff_id<C: CommandChannel>(adapter: &mut Adapter<C>, list: &mut [PortEntry]) {
    for entry in list.iter_mut() {
        // Unknown means the port is still worth a process login attempt.
        entry.fc4_type = Fc4Type::Unknown;

        if !adapter.uses_passthru() {
            continue;
        }

        let outcome = issue(adapter, entry.d_id).await;
        match outcome {
            Ok(features) => {
                entry.fc4_type = if features != 0 {
                    Fc4Type::FcpScsi
                } else {
                    Fc4Type::Other
                };
            },
            Err(e) => {
                debug!(port_id = %entry.d_id, error = %e, "GFF_ID left entry unknown");
            },
        }

        if entry.last {
            break;
        }
    }
}

async fn issue<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    port_id: PortId,
) -> Result<u8, GsError> {
    let descriptor = adapter.prep_ms_iocb(GFF_ID_REQ_SIZE, GFF_ID_RSP_SIZE);
    adapter
        .scratch
        .prep(CtPreamble::name_server(GFF_ID_CMD, GFF_ID_RSP_SIZE))?;
    adapter
        .scratch
        .req_view::<PortIdPayload>("gff_id request")?
        .port_id = port_id;

    adapter.issue_ms("GFF_ID", &descriptor).await?;

    let rsp = adapter.scratch.rsp_view::<GffIdRsp>("gff_id response")?;
    Ok(rsp.fcp_scsi_features())
}
