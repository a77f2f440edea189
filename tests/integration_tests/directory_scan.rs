// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use fcgs_client_rs::{
    cfg::logger::init_logger,
    fabric::error::GsError,
    handlers::{
        ga_nxt::ga_nxt,
        gff_id::gff_id,
        gid_pt::gid_pt,
        wwn_queries::{gfpn_id, gnn_id, gpn_id},
    },
    models::{
        ct::preamble::CT_REASON_CANNOT_PERFORM,
        fc::{Fc4Type, FcPort, PortEntry, PortId, PortSpeed, Wwn, NS_NX_PORT_TYPE},
        iocb::{CtPassthru, MsIocb},
    },
};

use crate::integration_tests::common::{
    MsReply, ga_nxt_payload, gff_payload, gid_pt_payload, load_config, ms_iocb_config,
    scan_list, scripted_adapter, test_path, wwn,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ga_nxt_walks_the_directory() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    let port_name = wwn("21:00:00:0e:1e:10:20:30");
    let node_name = wwn("20:00:00:0e:1e:10:20:30");
    script.push_ms(MsReply::accept(&ga_nxt_payload(
        0x01,
        PortId::new(0x01, 0x02, 0x04),
        port_name,
        node_name,
        true,
    )));

    let mut fcport = FcPort {
        d_id: PortId::new(0x01, 0x02, 0x03),
        ..FcPort::default()
    };
    ga_nxt(&mut adapter, &mut fcport).await?;

    assert_eq!(fcport.d_id, PortId::new(0x01, 0x02, 0x04));
    assert_eq!(fcport.port_name, port_name);
    assert_eq!(fcport.node_name, node_name);
    assert_eq!(fcport.fc4_type, Fc4Type::FcpScsi);

    let issued = script.ms_issued();
    assert_eq!(issued.len(), 1);
    let req = &issued[0].request;
    // Name Server preamble, GA_NXT command, then the port id asked about.
    assert_eq!(req.len(), 20);
    assert_eq!((req[4], req[5]), (0xfc, 0x02));
    assert_eq!(issued[0].command(), 0x100);
    assert_eq!(&req[17..20], &[0x01, 0x02, 0x03]);

    // Pass-through entry addressed to the Name Server handle, response
    // allocation sized for the full directory record.
    let entry = &issued[0].entry;
    assert_eq!(entry[0], CtPassthru::ENTRY_TYPE);
    assert_eq!(u16::from_le_bytes([entry[10], entry[11]]), 0x7fc);
    assert_eq!(u16::from_le_bytes([entry[16], entry[17]]), 20);
    assert_eq!(issued[0].rsp_bytes(), 636);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ga_nxt_steps_past_unknown_port_types() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::accept(&ga_nxt_payload(
        NS_NX_PORT_TYPE,
        PortId::new(0x01, 0x02, 0x05),
        wwn("21:00:00:0e:1e:10:20:31"),
        wwn("20:00:00:0e:1e:10:20:31"),
        false,
    )));

    let mut fcport = FcPort::default();
    ga_nxt(&mut adapter, &mut fcport).await?;

    // Not an N or NL port: the domain is forced so a scan loop walks on.
    assert_eq!(fcport.d_id.domain, 0xf0);
    assert_eq!(fcport.fc4_type, Fc4Type::Other);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gid_pt_fills_and_marks_the_list() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::accept(&gid_pt_payload(
        &[(0x01, 0x01, 0x01), (0x01, 0x02, 0x00), (0x01, 0x02, 0x03)],
        true,
    )));

    let mut list = vec![PortEntry::default(); 4];
    // Stale data from an earlier scan must not leak through.
    list[0].fabric_port_name = wwn("2f:ff:00:05:1e:00:00:01");
    list[0].fp_speed = PortSpeed::Gb8;

    gid_pt(&mut adapter, &mut list).await?;

    assert_eq!(list[0].d_id, PortId::new(0x01, 0x01, 0x01));
    assert_eq!(list[1].d_id, PortId::new(0x01, 0x02, 0x00));
    assert_eq!(list[2].d_id, PortId::new(0x01, 0x02, 0x03));
    assert!(list[2].last);
    assert!(!list[0].last && !list[1].last);
    assert_eq!(list[0].fabric_port_name, Wwn::ZERO);
    assert_eq!(list[0].fp_speed, PortSpeed::Unknown);
    // The row past the marker stays untouched.
    assert_eq!(list[3].d_id, PortId::default());

    let issued = script.ms_issued();
    assert_eq!(issued[0].command(), 0x1a1);
    let req = &issued[0].request;
    // Response allocation advertised in 32-bit words: the full directory.
    assert_eq!(u16::from_be_bytes([req[10], req[11]]), 2048);
    assert_eq!(req[16], NS_NX_PORT_TYPE);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gid_pt_overflows_without_the_marker() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::accept(&gid_pt_payload(
        &[(0x01, 0x01, 0x01), (0x01, 0x02, 0x00)],
        false,
    )));

    let mut list = vec![PortEntry::default(); 2];
    let err = gid_pt(&mut adapter, &mut list)
        .await
        .expect_err("full list without a marker must overflow");
    assert!(matches!(err, GsError::ListOverflow));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gpn_and_gnn_resolve_names_per_row() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    let mut list = scan_list(&[
        (0x01, 0x01, 0x01),
        (0x01, 0x02, 0x03),
    ]);

    let pn: [Wwn; 2] = [
        wwn("21:00:00:0e:1e:00:00:01"),
        wwn("21:00:00:0e:1e:00:00:02"),
    ];
    let nn: [Wwn; 2] = [
        wwn("20:00:00:0e:1e:00:00:01"),
        wwn("20:00:00:0e:1e:00:00:02"),
    ];
    script.push_ms(MsReply::accept(&pn[0].0));
    script.push_ms(MsReply::accept(&pn[1].0));
    script.push_ms(MsReply::accept(&nn[0].0));
    script.push_ms(MsReply::accept(&nn[1].0));

    gpn_id(&mut adapter, &mut list).await?;
    gnn_id(&mut adapter, &mut list).await?;

    assert_eq!(list[0].port_name, pn[0]);
    assert_eq!(list[1].port_name, pn[1]);
    assert_eq!(list[0].node_name, nn[0]);
    assert_eq!(list[1].node_name, nn[1]);
    assert_eq!(script.commands(), vec![0x112, 0x112, 0x113, 0x113]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gpn_id_aborts_on_the_first_failing_row() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    let mut list = scan_list(&[
        (0x01, 0x01, 0x01),
        (0x01, 0x02, 0x03),
    ]);
    script.push_ms(MsReply::reject(CT_REASON_CANNOT_PERFORM, 0x00));

    let err = gpn_id(&mut adapter, &mut list)
        .await
        .expect_err("reject on the first row must abort the walk");
    assert!(matches!(err, GsError::Rejected { .. }));
    assert_eq!(list[0].port_name, Wwn::ZERO);
    assert_eq!(script.ms_issued().len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gfpn_id_skips_without_iidma() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(ms_iocb_config()?);
    let mut list = scan_list(&[(0x01, 0x01, 0x01)]);

    gfpn_id(&mut adapter, &mut list).await?;

    assert_eq!(list[0].fabric_port_name, Wwn::ZERO);
    assert!(script.ms_issued().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gfpn_id_resolves_switch_port_names() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    let mut list = scan_list(&[(0x01, 0x02, 0x03)]);
    let fpn = wwn("2f:0a:00:05:1e:7a:7a:00");
    script.push_ms(MsReply::accept(&fpn.0));

    gfpn_id(&mut adapter, &mut list).await?;

    assert_eq!(list[0].fabric_port_name, fpn);
    assert_eq!(script.commands(), vec![0x11c]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gff_id_classifies_each_row_and_never_fails() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    let mut list = scan_list(&[
        (0x01, 0x01, 0x01),
        (0x01, 0x02, 0x00),
        (0x01, 0x02, 0x03),
    ]);
    script.push_ms(MsReply::accept(&gff_payload(0x08)));
    script.push_ms(MsReply::reject(CT_REASON_CANNOT_PERFORM, 0x00));
    script.push_ms(MsReply::accept(&gff_payload(0x00)));

    gff_id(&mut adapter, &mut list).await;

    assert_eq!(list[0].fc4_type, Fc4Type::FcpScsi);
    // The failing row stays worth a process login attempt.
    assert_eq!(list[1].fc4_type, Fc4Type::Unknown);
    assert_eq!(list[2].fc4_type, Fc4Type::Other);
    assert_eq!(script.ms_issued().len(), 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gff_id_stays_quiet_before_passthru() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(ms_iocb_config()?);
    let mut list = scan_list(&[
        (0x01, 0x01, 0x01),
        (0x01, 0x02, 0x03),
    ]);
    list[0].fc4_type = Fc4Type::FcpScsi;

    gff_id(&mut adapter, &mut list).await;

    // No FC-4 feature support on this generation: everything resets to
    // unknown without touching the wire.
    assert_eq!(list[0].fc4_type, Fc4Type::Unknown);
    assert_eq!(list[1].fc4_type, Fc4Type::Unknown);
    assert!(script.ms_issued().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ms_iocb_era_addresses_by_loop_id() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(ms_iocb_config()?);
    script.push_ms(MsReply::accept(&ga_nxt_payload(
        0x01,
        PortId::new(0x01, 0x02, 0x04),
        wwn("21:00:00:0e:1e:10:20:30"),
        wwn("20:00:00:0e:1e:10:20:30"),
        true,
    )));

    let mut fcport = FcPort::default();
    ga_nxt(&mut adapter, &mut fcport).await?;

    let issued = script.ms_issued();
    let entry = &issued[0].entry;
    assert_eq!(entry[0], MsIocb::ENTRY_TYPE);
    assert_eq!(u16::from_le_bytes([entry[8], entry[9]]), 0x00fc);
    Ok(())
}
