// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use fcgs_client_rs::{
    cfg::{enums::YesNo, logger::init_logger},
    fabric::error::GsError,
    state_machine::fdmi_states::register_fdmi,
};
use serial_test::serial;

use crate::integration_tests::common::{
    IssuedMs, MsReply, load_config, npiv_config, scripted_adapter, sns_config, test_path,
    wwn,
};

// Attribute-count field offsets inside each registration request.
const RHBA_COUNT_AT: usize = 36;
const RPA_COUNT_AT: usize = 24;
const RPRT_COUNT_AT: usize = 32;

fn attr_count(req: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([req[at], req[at + 1], req[at + 2], req[at + 3]])
}

/// Walks the TLV block and returns the attribute count, checking that the
/// rows tile the block exactly and stay 4-byte aligned.
fn walk_attr_block(block: &[u8]) -> u32 {
    let mut at = 0;
    let mut rows = 0;
    while at < block.len() {
        let len = usize::from(u16::from_be_bytes([block[at + 2], block[at + 3]]));
        assert!(len >= 4, "attribute shorter than its header");
        assert_eq!(len % 4, 0, "attribute not 4-byte aligned");
        at += len;
        rows += 1;
    }
    assert_eq!(at, block.len(), "attribute rows overrun the block");
    rows
}

fn check_registration(ms: &IssuedMs, count_at: usize, expected_attrs: u32) {
    let req = &ms.request;
    assert_eq!(attr_count(req, count_at), expected_attrs);
    assert_eq!(walk_attr_block(&req[count_at + 4..]), expected_attrs);
    assert_eq!(ms.req_bytes() as usize, req.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn extended_catalogs_register_in_one_round() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::accept(&[]));
    script.push_ms(MsReply::accept(&[]));

    register_fdmi(&mut adapter).await?;

    assert_eq!(script.commands(), vec![0x200, 0x211]);
    assert_eq!(script.logins().len(), 1);

    let issued = script.ms_issued();
    let port_name = wwn("21:00:00:e0:8b:01:02:03");
    // RHBA names the HBA and its one port, then the node catalog.
    assert_eq!(&issued[0].request[16..24], &port_name.0);
    assert_eq!(&issued[0].request[24..28], &1u32.to_be_bytes());
    assert_eq!(&issued[0].request[28..36], &port_name.0);
    check_registration(&issued[0], RHBA_COUNT_AT, 17);
    assert_eq!(issued[0].rsp_bytes(), 16);

    // RPA names the port, then the port catalog.
    assert_eq!(&issued[1].request[16..24], &port_name.0);
    check_registration(&issued[1], RPA_COUNT_AT, 16);
    assert_eq!(issued[1].rsp_bytes(), 24);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn stale_hba_record_is_cleared_and_retried() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::reject(0x09, 0x10));
    script.push_ms(MsReply::accept(&[]));
    script.push_ms(MsReply::accept(&[]));
    script.push_ms(MsReply::accept(&[]));

    register_fdmi(&mut adapter).await?;

    assert_eq!(script.commands(), vec![0x200, 0x300, 0x200, 0x211]);

    let issued = script.ms_issued();
    // DHBA clears the record under the registering port name.
    assert_eq!(issued[1].request.len(), 24);
    assert_eq!(
        &issued[1].request[16..24],
        &wwn("21:00:00:e0:8b:01:02:03").0
    );
    // The retried RHBA still carries the extended catalog.
    check_registration(&issued[2], RHBA_COUNT_AT, 17);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn rhba_reject_falls_back_to_the_base_catalog() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::reject(0x09, 0x00));
    script.push_ms(MsReply::accept(&[]));
    script.push_ms(MsReply::accept(&[]));

    register_fdmi(&mut adapter).await?;

    assert_eq!(script.commands(), vec![0x200, 0x200, 0x211]);

    let issued = script.ms_issued();
    check_registration(&issued[0], RHBA_COUNT_AT, 17);
    check_registration(&issued[1], RHBA_COUNT_AT, 9);
    check_registration(&issued[2], RPA_COUNT_AT, 6);
    assert_eq!(issued[2].rsp_bytes(), 16);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn rpa_reject_restarts_the_base_round() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::accept(&[]));
    script.push_ms(MsReply::reject(0x09, 0x00));
    script.push_ms(MsReply::accept(&[]));
    script.push_ms(MsReply::accept(&[]));

    register_fdmi(&mut adapter).await?;

    // The extended RPA has no sibling left, so the whole base round runs.
    assert_eq!(script.commands(), vec![0x200, 0x211, 0x200, 0x211]);

    let issued = script.ms_issued();
    check_registration(&issued[0], RHBA_COUNT_AT, 17);
    check_registration(&issued[1], RPA_COUNT_AT, 16);
    check_registration(&issued[2], RHBA_COUNT_AT, 9);
    check_registration(&issued[3], RPA_COUNT_AT, 6);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn base_round_reject_is_terminal() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.push_ms(MsReply::reject(0x0b, 0x00));
    script.push_ms(MsReply::reject(0x0b, 0x00));

    let err = register_fdmi(&mut adapter)
        .await
        .expect_err("no catalog left to fall back to");

    assert!(matches!(err, GsError::Rejected { reason: 0x0b, .. }));
    assert_eq!(script.commands(), vec![0x200, 0x200]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn smart_san_rpa_runs_before_the_extended_catalog() -> Result<()> {
    let _ = init_logger(&test_path());

    let mut cfg = load_config()?;
    cfg.fdmi.smart_san = YesNo::Yes;
    cfg.validate_and_normalize()?;
    let (mut adapter, script) = scripted_adapter(cfg);
    script.push_ms(MsReply::accept(&[]));
    script.push_ms(MsReply::reject(0x09, 0x00));
    script.push_ms(MsReply::accept(&[]));

    register_fdmi(&mut adapter).await?;

    assert_eq!(script.commands(), vec![0x200, 0x211, 0x211]);

    let issued = script.ms_issued();
    check_registration(&issued[1], RPA_COUNT_AT, 23);
    assert_eq!(issued[1].rsp_bytes(), 24);
    check_registration(&issued[2], RPA_COUNT_AT, 16);
    assert_eq!(issued[2].rsp_bytes(), 24);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn npiv_port_registers_under_its_physical_hba() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(npiv_config()?);
    script.push_ms(MsReply::reject(0x09, 0x00));
    script.push_ms(MsReply::reject(0x09, 0x00));
    script.push_ms(MsReply::accept(&[]));

    register_fdmi(&mut adapter).await?;

    // RPRT only, walking Smart SAN, extended, then base catalogs.
    assert_eq!(script.commands(), vec![0x210, 0x210, 0x210]);

    let issued = script.ms_issued();
    for (ms, attrs) in issued.iter().zip([23u32, 16, 6]) {
        assert_eq!(
            &ms.request[16..24],
            &wwn("21:00:00:e0:8b:01:02:03").0,
            "owning physical port"
        );
        assert_eq!(
            &ms.request[24..32],
            &wwn("21:00:00:e0:8b:aa:bb:cc").0,
            "virtual port being registered"
        );
        check_registration(ms, RPRT_COUNT_AT, attrs);
        assert_eq!(ms.rsp_bytes(), 24);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn npiv_exhausting_every_catalog_fails() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(npiv_config()?);
    for _ in 0..3 {
        script.push_ms(MsReply::reject(0x0b, 0x00));
    }

    let err = register_fdmi(&mut adapter)
        .await
        .expect_err("every RPRT catalog rejected");
    assert!(matches!(err, GsError::Rejected { reason: 0x0b, .. }));
    assert_eq!(script.ms_issued().len(), 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn send_sns_generation_skips_fdmi() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(sns_config()?);

    register_fdmi(&mut adapter).await?;

    assert!(script.ms_issued().is_empty());
    assert!(script.sns_issued().is_empty());
    assert!(script.logins().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn embedded_management_skips_fdmi() -> Result<()> {
    let _ = init_logger(&test_path());

    let mut cfg = load_config()?;
    cfg.adapter.embedded_management = YesNo::Yes;
    cfg.validate_and_normalize()?;
    let (mut adapter, script) = scripted_adapter(cfg);

    register_fdmi(&mut adapter).await?;

    assert!(script.ms_issued().is_empty());
    assert!(script.logins().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn login_failure_stops_registration_cold() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(load_config()?);
    script.set_login_mb0(0x4005);

    let err = register_fdmi(&mut adapter)
        .await
        .expect_err("login failure must stop the flow");

    assert!(matches!(err, GsError::ManagementLogin { status: 0x4005 }));
    assert!(script.ms_issued().is_empty());
    assert_eq!(script.logins().len(), 1);
    Ok(())
}
