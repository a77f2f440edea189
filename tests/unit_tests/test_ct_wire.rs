// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use fcgs_client_rs::models::{
    common::DmaAddr,
    ct::{
        command::{
            GID_PT_CMD, GPSC_CMD, GPSC_RSP_SIZE, RHBA_CMD, RHBA_RSP_SIZE, gid_pt_rsp_size,
        },
        preamble::{CT_PREAMBLE_SIZE, CtPreamble},
        request::{GidPtPayload, PortIdPayload, RftIdPayload, RsnnNnPayload},
        response::GidPtEntry,
        scratch::CtScratch,
    },
    fc::{NS_NX_PORT_TYPE, PortId},
};
use hex_literal::hex;
use zerocopy::{FromBytes, IntoBytes};

#[test]
fn name_server_preamble_wire_image() {
    let preamble = CtPreamble::name_server(GID_PT_CMD, gid_pt_rsp_size(2048));
    assert_eq!(
        preamble.as_bytes(),
        hex!("01000000fc02000001a1080000000000")
    );
}

#[test]
fn management_preamble_wire_images() {
    let rhba = CtPreamble::fdmi(RHBA_CMD, RHBA_RSP_SIZE);
    assert_eq!(rhba.as_bytes(), hex!("01000000fa1000000200000000000000"));

    let gpsc = CtPreamble::fabric_config(GPSC_CMD, GPSC_RSP_SIZE);
    assert_eq!(gpsc.as_bytes(), hex!("01000000fa0100000127000100000000"));
}

#[test]
fn port_id_payload_lands_after_the_preamble() -> Result<()> {
    let mut scratch = CtScratch::new(2048, DmaAddr(0x1000));
    scratch.prep(CtPreamble::name_server(0x112, 24))?;
    scratch.req_view::<PortIdPayload>("port id request")?.port_id =
        PortId::new(0x01, 0x02, 0x03);

    let req = scratch.request(20)?;
    assert_eq!(req[16], 0, "reserved byte");
    assert_eq!(&req[17..20], &[0x01, 0x02, 0x03]);
    Ok(())
}

#[test]
fn gid_pt_payload_selects_the_port_type() -> Result<()> {
    let mut scratch = CtScratch::new(2048, DmaAddr(0x1000));
    scratch.prep(CtPreamble::name_server(GID_PT_CMD, gid_pt_rsp_size(2048)))?;
    scratch
        .req_view::<GidPtPayload>("gid_pt request")?
        .port_type = NS_NX_PORT_TYPE;

    let req = scratch.request(20)?;
    assert_eq!(req[16], 0x7f);
    assert_eq!(&req[17..20], &[0, 0, 0]);
    Ok(())
}

#[test]
fn rft_id_payload_claims_fcp_scsi_only() -> Result<()> {
    let mut scratch = CtScratch::new(2048, DmaAddr(0x1000));
    scratch.prep(CtPreamble::name_server(0x217, CT_PREAMBLE_SIZE as u32))?;
    let payload = scratch.req_view::<RftIdPayload>("rft_id request")?;
    payload.port_id = PortId::new(0x01, 0x02, 0x03);
    payload.set_fcp_scsi();

    let req = scratch.request(52)?;
    assert_eq!(&req[20..22], &[0, 0]);
    assert_eq!(req[22], 0x01);
    assert!(req[23..52].iter().all(|&b| b == 0));
    Ok(())
}

#[test]
fn rsnn_payload_records_the_name_length() -> Result<()> {
    let mut scratch = CtScratch::new(2048, DmaAddr(0x1000));
    scratch.prep(CtPreamble::name_server(0x239, CT_PREAMBLE_SIZE as u32))?;
    let payload = scratch.req_view::<RsnnNnPayload>("rsnn_nn request")?;
    payload.node_name = "20:00:00:e0:8b:01:02:03".parse()?;
    payload.set_sym_node_name("EX2742 FW:v9.08.02");

    let used = CT_PREAMBLE_SIZE + 8 + 1 + 18;
    let req = scratch.request(used as u32)?;
    assert_eq!(req[16], 0x20);
    assert_eq!(req[24], 18);
    assert_eq!(&req[25..43], b"EX2742 FW:v9.08.02");
    Ok(())
}

#[test]
fn oversized_names_truncate_to_the_field() -> Result<()> {
    let mut scratch = CtScratch::new(2048, DmaAddr(0x1000));
    scratch.prep(CtPreamble::name_server(0x239, CT_PREAMBLE_SIZE as u32))?;
    let payload = scratch.req_view::<RsnnNnPayload>("rsnn_nn request")?;
    let long = "x".repeat(300);
    payload.set_sym_node_name(&long);
    assert_eq!(payload.name_len, 255);
    Ok(())
}

#[test]
fn port_id_packs_and_unpacks_in_wire_order() -> Result<()> {
    let id = PortId::new(0xab, 0xcd, 0xef);
    assert_eq!(id.as_bytes(), [0xab, 0xcd, 0xef]);
    assert_eq!(id.b24(), 0x00ab_cdef);

    let entry = GidPtEntry::ref_from_bytes(&[0x80, 0xab, 0xcd, 0xef])
        .map_err(|_| anyhow::anyhow!("entry view"))?;
    assert!(entry.is_last());
    assert_eq!(entry.port_id, id);

    let entry = GidPtEntry::ref_from_bytes(&[0x00, 0x01, 0x02, 0x03])
        .map_err(|_| anyhow::anyhow!("entry view"))?;
    assert!(!entry.is_last());
    Ok(())
}

#[test]
fn scratch_scales_with_the_device_table() {
    let small = CtScratch::new(16, DmaAddr(0));
    assert_eq!(small.len(), CtScratch::MIN_SIZE);

    let big = CtScratch::new(4096, DmaAddr(0));
    assert_eq!(big.len(), CT_PREAMBLE_SIZE + 4096 * 4);
}
