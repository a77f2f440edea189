// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Name Server registrations a port performs after fabric login: the FC-4
//! types it speaks (RFT_ID), its FC-4 features (RFF_ID), its node name
//! (RNN_ID) and its symbolic node name (RSNN_NN).

use tracing::debug;

use crate::{
    fabric::{adapter::Adapter, channel::CommandChannel, error::GsError},
    models::{
        ct::{
            command::{
                RFF_ID_CMD, RFF_ID_REQ_SIZE, RFF_ID_RSP_SIZE, RFT_ID_CMD,
                RFT_ID_REQ_SIZE, RFT_ID_RSP_SIZE, RFT_ID_SNS_CMD_SIZE,
                RFT_ID_SNS_DATA_SIZE, RFT_ID_SNS_SCMD_LEN, RNN_ID_CMD,
                RNN_ID_REQ_SIZE, RNN_ID_RSP_SIZE, RNN_ID_SNS_CMD_SIZE,
                RNN_ID_SNS_DATA_SIZE, RNN_ID_SNS_SCMD_LEN, RSNN_NN_CMD,
                RSNN_NN_REQ_SIZE, RSNN_NN_RSP_SIZE,
            },
            preamble::{CT_PREAMBLE_SIZE, CtPreamble},
            request::{
                FC4_FEATURE_INITIATOR, FC4_TYPE_FCP_SCSI, RffIdPayload, RftIdPayload,
                RnnIdPayload, RsnnNnPayload,
            },
        },
        fc::WWN_SIZE,
        iocb::DescriptorOps,
    },
};

/// Register the FC-4 types this port speaks: FCP SCSI.
pub async fn rft_id<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        return sns_rft_id(adapter).await;
    }

    let d_id = adapter.d_id();
    let descriptor = adapter.prep_ms_iocb(RFT_ID_REQ_SIZE, RFT_ID_RSP_SIZE);
    adapter
        .scratch
        .prep(CtPreamble::name_server(RFT_ID_CMD, RFT_ID_RSP_SIZE))?;
    let payload = adapter.scratch.req_view::<RftIdPayload>("rft_id request")?;
    payload.port_id = d_id;
    payload.set_fcp_scsi();

    adapter.issue_ms("RFT_ID", &descriptor).await
}

/// Register this port's FC-4 features: an FCP SCSI initiator. Adapters on
/// the mailbox interface predate the command; for them this is a no-op.
pub async fn rff_id<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        debug!("RFF_ID not supported on this interface");
        return Ok(());
    }

    let d_id = adapter.d_id();
    let descriptor = adapter.prep_ms_iocb(RFF_ID_REQ_SIZE, RFF_ID_RSP_SIZE);
    adapter
        .scratch
        .prep(CtPreamble::name_server(RFF_ID_CMD, RFF_ID_RSP_SIZE))?;
    let payload = adapter.scratch.req_view::<RffIdPayload>("rff_id request")?;
    payload.port_id = d_id;
    payload.fc4_feature = FC4_FEATURE_INITIATOR;
    payload.fc4_type = FC4_TYPE_FCP_SCSI;

    adapter.issue_ms("RFF_ID", &descriptor).await
}

/// Register this port's node name against its address.
pub async fn rnn_id<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        return sns_rnn_id(adapter).await;
    }

    let d_id = adapter.d_id();
    let node_name = adapter.node_name();
    let descriptor = adapter.prep_ms_iocb(RNN_ID_REQ_SIZE, RNN_ID_RSP_SIZE);
    adapter
        .scratch
        .prep(CtPreamble::name_server(RNN_ID_CMD, RNN_ID_RSP_SIZE))?;
    let payload = adapter.scratch.req_view::<RnnIdPayload>("rnn_id request")?;
    payload.port_id = d_id;
    payload.node_name = node_name;

    adapter.issue_ms("RNN_ID", &descriptor).await
}

/// Register the symbolic node name. The request is trimmed to the actual
/// name length instead of the full 255-byte field.
pub async fn rsnn_nn<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    if adapter.uses_send_sns() {
        debug!("RSNN_NN not supported on this interface");
        return Ok(());
    }

    let node_name = adapter.node_name();
    let mut descriptor = adapter.prep_ms_iocb(RSNN_NN_REQ_SIZE, RSNN_NN_RSP_SIZE);
    adapter
        .scratch
        .prep(CtPreamble::name_server(RSNN_NN_CMD, RSNN_NN_RSP_SIZE))?;
    let payload = adapter
        .scratch
        .req_view::<RsnnNnPayload>("rsnn_nn request")?;
    payload.node_name = node_name;
    payload.set_sym_node_name(&adapter.strings.symbolic_name);
    let name_len = u32::from(payload.name_len);

    descriptor
        .set_req_size(CT_PREAMBLE_SIZE as u32 + WWN_SIZE as u32 + 1 + name_len);

    adapter.issue_ms("RSNN_NN", &descriptor).await
}

async fn sns_rft_id<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    let d_id = adapter.d_id();
    let sns = adapter.sns_mut()?;
    let header = sns.prep(RFT_ID_CMD, RFT_ID_SNS_SCMD_LEN, RFT_ID_SNS_DATA_SIZE)?;
    header.param[0] = d_id.al_pa;
    header.param[1] = d_id.area;
    header.param[2] = d_id.domain;
    // FCP SCSI bit of the FC-4 types bitmap.
    header.param[5] = 0x01;

    adapter.issue_sns("RFT_ID", RFT_ID_SNS_CMD_SIZE / 2).await
}

async fn sns_rnn_id<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    let d_id = adapter.d_id();
    let node_name = adapter.node_name();
    let sns = adapter.sns_mut()?;
    let header = sns.prep(RNN_ID_CMD, RNN_ID_SNS_SCMD_LEN, RNN_ID_SNS_DATA_SIZE)?;
    header.param[0] = d_id.al_pa;
    header.param[1] = d_id.area;
    header.param[2] = d_id.domain;
    for (i, byte) in node_name.0.iter().rev().enumerate() {
        header.param[4 + i] = *byte;
    }

    adapter.issue_sns("RNN_ID", RNN_ID_SNS_CMD_SIZE / 2).await
}
