// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! GPSC, get-port-speed-capabilities: asks the Fabric Config Server how
//! fast each switch port runs so per-target link retraining can pick the
//! right rate. Fabrics that predate the command reject it as unknown; one
//! such reject disables the query for the rest of the session.

use tracing::{debug, info};

use crate::{
    fabric::{adapter::Adapter, channel::CommandChannel, error::GsError},
    models::{
        ct::{
            command::{GPSC_CMD, GPSC_REQ_SIZE, GPSC_RSP_SIZE},
            preamble::CtPreamble,
            request::GpscPayload,
            response::GpscRsp,
        },
        fc::PortEntry,
    },
};

/// Refresh the fabric port speed of every listed device. A failing row is
/// recorded and the walk continues; the last recorded outcome is returned.
pub async fn gpsc<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    list: &mut [PortEntry],
) -> Result<(), GsError> {
    if !adapter.supports_iidma() {
        return Err(GsError::Unsupported("GPSC"));
    }
    if !adapter.gpsc_supported() {
        return Err(GsError::Unsupported("GPSC"));
    }

    adapter.management_login().await?;

    let mut result = Ok(());
    for entry in list.iter_mut() {
        let descriptor = adapter.prep_ms_mgmt_iocb(GPSC_REQ_SIZE, GPSC_RSP_SIZE);
        adapter
            .scratch
            .prep(CtPreamble::fabric_config(GPSC_CMD, GPSC_RSP_SIZE))?;
        adapter
            .scratch
            .req_view::<GpscPayload>("gpsc request")?
            .port_name = entry.fabric_port_name;

        result = adapter.issue_ms("GPSC", &descriptor).await;
        match &result {
            Err(e) if e.is_command_unsupported() => {
                info!("GPSC not understood by this fabric, disabling the query");
                adapter.disable_gpsc();
                break;
            },
            Err(e) => {
                debug!(port_id = %entry.d_id, error = %e, "GPSC entry failed");
            },
            Ok(()) => {
                let rsp = adapter.scratch.rsp_view::<GpscRsp>("gpsc response")?;
                if let Some(speed) = rsp.operating_speed() {
                    entry.fp_speed = speed;
                }
                debug!(
                    fabric_port_name = %entry.fabric_port_name,
                    speeds = rsp.speeds.get(),
                    speed = rsp.speed.get(),
                    "GPSC entry"
                );
            },
        }

        if entry.last {
            break;
        }
    }
    result
}
