// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use fcgs_client_rs::{
    cfg::logger::init_logger,
    handlers::{
        ga_nxt::ga_nxt,
        gid_pt::gid_pt,
        register::{rff_id, rft_id, rnn_id, rsnn_nn},
        wwn_queries::{gnn_id, gpn_id},
    },
    models::fc::{Fc4Type, FcPort, PortEntry, PortId, Wwn},
};

use crate::integration_tests::common::{
    SnsReply, ga_nxt_payload, gid_pt_payload, scan_list, scripted_adapter, sns_config,
    test_path, wwn,
};

fn le16(packet: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([packet[at], packet[at + 1]])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sns_ga_nxt_packs_the_mailbox_packet() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(sns_config()?);
    let port_name = wwn("21:00:00:0e:1e:10:20:30");
    let node_name = wwn("20:00:00:0e:1e:10:20:30");
    script.push_sns(SnsReply::accept(&ga_nxt_payload(
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
    assert_eq!(fcport.fc4_type, Fc4Type::FcpScsi);

    assert!(script.ms_issued().is_empty(), "no pass-through traffic");
    let issued = script.sns_issued();
    assert_eq!(issued.len(), 1);
    let packet = &issued[0].packet;
    assert_eq!(issued[0].cmd_words, 14);
    assert_eq!(packet.len(), 28);
    // Response allocation in 16-bit words, then the shared buffer address.
    assert_eq!(le16(packet, 0), 318);
    assert_eq!(
        u64::from_le_bytes(packet[4..12].try_into()?),
        0x0020_0000
    );
    assert_eq!(le16(packet, 12), 6);
    assert_eq!(le16(packet, 16), 0x100);
    assert_eq!(le16(packet, 18), 155);
    // Port id little-endian: alpa, area, domain.
    assert_eq!(&packet[24..27], &[0x03, 0x02, 0x01]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sns_gid_pt_sizes_for_the_small_fabric() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(sns_config()?);
    script.push_sns(SnsReply::accept(&gid_pt_payload(
        &[(0x01, 0x01, 0x01), (0x01, 0x02, 0x03)],
        true,
    )));

    let mut list = vec![PortEntry::default(); 4];
    gid_pt(&mut adapter, &mut list).await?;

    assert_eq!(list[0].d_id, PortId::new(0x01, 0x01, 0x01));
    assert_eq!(list[1].d_id, PortId::new(0x01, 0x02, 0x03));
    assert!(list[1].last);
    assert_eq!(list[2].d_id, PortId::default());

    let issued = script.sns_issued();
    let packet = &issued[0].packet;
    assert_eq!(issued[0].cmd_words, 14);
    // 256 devices: 1040 response bytes, 520 words, 256 payload words.
    assert_eq!(le16(packet, 0), 520);
    assert_eq!(le16(packet, 16), 0x1a1);
    assert_eq!(le16(packet, 18), 256);
    assert_eq!(packet[24], 0x7f);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sns_registrations_flip_the_id_and_name_bytes() -> Result<()> {
    let _ = init_logger(&test_path());

    let cfg = sns_config()?;
    let node_name = cfg.identity.node_name;
    let (mut adapter, script) = scripted_adapter(cfg);
    script.push_sns(SnsReply::accept(&[]));
    script.push_sns(SnsReply::accept(&[]));

    rft_id(&mut adapter).await?;
    rnn_id(&mut adapter).await?;

    let issued = script.sns_issued();
    assert_eq!(issued.len(), 2);

    let rft = &issued[0].packet;
    assert_eq!(rft.len(), 60);
    assert_eq!(le16(rft, 16), 0x217);
    assert_eq!(&rft[24..27], &[0x03, 0x02, 0x01]);
    assert_eq!(rft[29], 0x01, "FCP SCSI bit");

    let rnn = &issued[1].packet;
    assert_eq!(rnn.len(), 36);
    assert_eq!(le16(rnn, 16), 0x213);
    assert_eq!(&rnn[24..27], &[0x03, 0x02, 0x01]);
    let mut reversed = node_name.0;
    reversed.reverse();
    assert_eq!(&rnn[28..36], &reversed);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sns_skips_rff_and_rsnn() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(sns_config()?);

    // Neither command exists in the mailbox era; both report success.
    rff_id(&mut adapter).await?;
    rsnn_nn(&mut adapter).await?;

    assert!(script.sns_issued().is_empty());
    assert!(script.ms_issued().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sns_name_queries_record_failures_and_walk_on() -> Result<()> {
    let _ = init_logger(&test_path());

    let (mut adapter, script) = scripted_adapter(sns_config()?);
    let mut list = scan_list(&[(0x01, 0x01, 0x01), (0x01, 0x02, 0x03)]);

    let pn = wwn("21:00:00:0e:1e:00:00:02");
    script.push_sns(SnsReply::reject(0x09, 0x00));
    script.push_sns(SnsReply::accept(&pn.0));

    // The second row answered, so the walk reports its outcome.
    gpn_id(&mut adapter, &mut list).await?;
    assert_eq!(list[0].port_name, Wwn::ZERO);
    assert_eq!(list[1].port_name, pn);

    let issued = script.sns_issued();
    assert_eq!(issued.len(), 2);
    assert_eq!(le16(&issued[0].packet, 16), 0x112);
    assert_eq!(le16(&issued[0].packet, 0), 12);

    let nn = wwn("20:00:00:0e:1e:00:00:02");
    script.push_sns(SnsReply::reject(0x09, 0x00));
    script.push_sns(SnsReply::accept(&nn.0));

    gnn_id(&mut adapter, &mut list).await?;
    assert_eq!(list[0].node_name, Wwn::ZERO);
    assert_eq!(list[1].node_name, nn);
    assert_eq!(le16(&script.sns_issued()[2].packet, 16), 0x113);
    Ok(())
}
