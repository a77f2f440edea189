// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;
use fcgs_client_rs::models::{
    common::DmaAddr,
    iocb::{
        CS_DATA_UNDERRUN, CtPassthru, DescriptorOps, ENTRY_SIZE, MsDescriptor,
        MsExchangeArgs, MsIocb,
        sns::SnsScratch,
    },
};

fn le16(wire: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([wire[at], wire[at + 1]])
}

fn le32(wire: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([wire[at], wire[at + 1], wire[at + 2], wire[at + 3]])
}

fn le64(wire: &[u8], at: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&wire[at..at + 8]);
    u64::from_le_bytes(bytes)
}

fn args() -> MsExchangeArgs {
    MsExchangeArgs {
        req_size: 20,
        rsp_size: 636,
        req_dma: DmaAddr(0x0010_0000),
        rsp_dma: DmaAddr(0x0010_0000),
        timeout: 20,
    }
}

#[test]
fn ms_iocb_wire_image() {
    let iocb = MsIocb::ms_request(0x00fc, &args());
    let wire = iocb.to_wire();

    assert_eq!(wire[0], MsIocb::ENTRY_TYPE);
    assert_eq!(wire[1], 1, "entry count");
    assert_eq!(le16(&wire, 8), 0x00fc, "loop id");
    // Read with head-of-queue tagging.
    assert_eq!(le16(&wire, 12), 0x22);
    assert_eq!(le16(&wire, 16), 20, "timeout");
    assert_eq!(le16(&wire, 18), 1, "command segments");
    assert_eq!(le16(&wire, 20), 2, "total segments");
    assert_eq!(le32(&wire, 32), 636, "response bytes");
    assert_eq!(le32(&wire, 36), 20, "request bytes");
    assert_eq!(le64(&wire, 40), 0x0010_0000);
    assert_eq!(le32(&wire, 48), 20);
    assert_eq!(le64(&wire, 52), 0x0010_0000);
    assert_eq!(le32(&wire, 60), 636);
}

#[test]
fn ct_passthru_wire_image() {
    let entry = CtPassthru::ms_request(0x7fc, 2, &args());
    let wire = entry.to_wire();

    assert_eq!(wire[0], CtPassthru::ENTRY_TYPE);
    assert_eq!(wire[1], 1, "entry count");
    assert_eq!(le16(&wire, 10), 0x7fc, "nport handle");
    assert_eq!(le16(&wire, 12), 1, "command segments");
    assert_eq!(wire[14], 2, "vp index");
    assert_eq!(le16(&wire, 16), 20, "timeout");
    assert_eq!(le16(&wire, 20), 1, "response segments");
    assert_eq!(le32(&wire, 32), 636, "response bytes");
    assert_eq!(le32(&wire, 36), 20, "request bytes");
    assert_eq!(le64(&wire, 40), 0x0010_0000);
    assert_eq!(le32(&wire, 48), 20);
    assert_eq!(le64(&wire, 52), 0x0010_0000);
    assert_eq!(le32(&wire, 60), 636);
}

#[test]
fn set_req_size_patches_count_and_segment() {
    let mut descriptor: MsDescriptor = CtPassthru::ms_request(0x7fa, 0, &args()).into();
    descriptor.set_req_size(52);
    assert_eq!(descriptor.req_size(), 52);

    let wire = descriptor.to_wire();
    assert_eq!(le32(&wire, 36), 52);
    assert_eq!(le32(&wire, 48), 52, "command segment length follows");

    let mut descriptor: MsDescriptor = MsIocb::ms_request(0x00fc, &args()).into();
    descriptor.set_req_size(28);
    let wire = descriptor.to_wire();
    assert_eq!(le32(&wire, 36), 28);
    assert_eq!(le32(&wire, 48), 28);
}

#[test]
fn completed_entries_surface_their_statuses() {
    let mut bytes = [0u8; ENTRY_SIZE];
    bytes[0] = CtPassthru::ENTRY_TYPE;
    bytes[3] = 0x02;
    bytes[8..10].copy_from_slice(&CS_DATA_UNDERRUN.to_le_bytes());
    let entry = CtPassthru::from(bytes);
    assert_eq!(entry.entry_status(), 0x02);
    assert_eq!(entry.comp_status(), CS_DATA_UNDERRUN);

    let mut bytes = [0u8; ENTRY_SIZE];
    bytes[0] = MsIocb::ENTRY_TYPE;
    bytes[10..12].copy_from_slice(&0x0007u16.to_le_bytes());
    let iocb = MsIocb::from(bytes);
    assert_eq!(iocb.entry_status(), 0);
    assert_eq!(iocb.comp_status(), 0x0007);
}

#[test]
fn sns_prep_writes_the_mailbox_header() -> Result<()> {
    let mut sns = SnsScratch::new(DmaAddr(0x0020_0000));
    let header = sns.prep(0x100, 6, 636)?;

    assert_eq!(header.buffer_length.get(), 318);
    assert_eq!(header.buffer_address.get(), 0x0020_0000);
    assert_eq!(header.subcommand_length.get(), 6);
    assert_eq!(header.subcommand.get(), 0x100);
    assert_eq!(header.size.get(), 155);

    // The same values in wire bytes at the front of the buffer.
    let data = sns.data_mut();
    assert_eq!(&data[..2], &[0x3e, 0x01]);
    assert_eq!(&data[16..18], &[0x00, 0x01]);
    Ok(())
}

#[test]
fn sns_buffer_holds_the_largest_directory() {
    let mut sns = SnsScratch::new(DmaAddr(0));
    assert_eq!(sns.data_mut().len(), SnsScratch::BUFFER_SIZE);
    assert_eq!(SnsScratch::BUFFER_SIZE, 512 * 4 + 16);
}
