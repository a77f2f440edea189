// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! FDMI registration commands sent to the Management Server: RHBA and RPA
//! for a physical port, RPRT for an NPIV port, DHBA to clear a stale HBA
//! record. Each request is a fixed head followed by a TLV attribute block:
//!
//! ```text
//!   +-------------+------------------+----------------------------+
//!   | CT preamble | RHBA/RPA/RPRT    | attribute TLVs             |
//!   | 16 bytes    | head, names and  | type,len,value rows padded |
//!   |             | entry counts     | to 4-byte multiples        |
//!   +-------------+------------------+----------------------------+
//! ```
//!
//! The head's attribute count and the descriptor's request size are only
//! known once the catalog has been written, so both are patched in last.

use std::mem::size_of;

use tracing::debug;
use zerocopy::byteorder::U32;

use crate::{
    cfg::config::Config,
    fabric::{
        adapter::{Adapter, FdmiStrings},
        channel::CommandChannel,
        error::GsError,
    },
    models::{
        ct::{
            command::{
                DHBA_CMD, DHBA_REQ_SIZE, DHBA_RSP_SIZE, RHBA_CMD, RHBA_RSP_SIZE, RPA_CMD,
                RPA_RSP_SIZE, RPRT_CMD, RPRT_RSP_SIZE, SMARTSAN_RPA_RSP_SIZE,
            },
            preamble::{CtPreamble, CT_PREAMBLE_SIZE},
            request::{DhbaPayload, RhbaHead, RpaHead, RprtHead},
        },
        fc::{PortId, Wwn, NS_NX_PORT_TYPE},
        fdmi::{
            attr::AttrWriter,
            hba::{hba_attributes, HbaAttrInputs},
            port::{
                current_speed_mask, port_attributes, smart_san_guid, supported_speed_mask,
                PortAttrInputs, COS_CLASS_3, PORT_STATE_ONLINE,
            },
            AttrSet,
        },
        iocb::DescriptorOps,
    },
};

/// Register the HBA record and its node-level attribute catalog.
pub async fn rhba<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    set: AttrSet,
) -> Result<(), GsError> {
    let mut descriptor = adapter.prep_ms_mgmt_iocb(0, RHBA_RSP_SIZE);
    adapter.scratch.prep(CtPreamble::fdmi(RHBA_CMD, RHBA_RSP_SIZE))?;

    let port_name = adapter.port_name();
    let inputs = hba_inputs(&adapter.cfg, &adapter.strings, adapter.fabric_name);

    let head = adapter.scratch.req_view::<RhbaHead>("rhba request")?;
    head.hba_identifier = port_name;
    head.entry_count = U32::new(1);
    head.port_name = port_name;

    let mut writer = AttrWriter::new(adapter.scratch.req_tail_mut(size_of::<RhbaHead>())?);
    hba_attributes(&inputs, set, &mut writer)?;
    let (block, count) = writer.finish();
    adapter.scratch.req_view::<RhbaHead>("rhba request")?.attr_count = U32::new(count);

    let req_size = (CT_PREAMBLE_SIZE + size_of::<RhbaHead>() + block) as u32;
    descriptor.set_req_size(req_size);
    debug!(%port_name, ?set, attrs = count, req_size, "RHBA");

    adapter.issue_ms("RHBA", &descriptor).await
}

/// Register the port attribute catalog of the physical port.
pub async fn rpa<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    set: AttrSet,
) -> Result<(), GsError> {
    // The Smart SAN catalog gets a longer accept payload back.
    let rsp_size = if set == AttrSet::Fdmi1 {
        RPA_RSP_SIZE
    } else {
        SMARTSAN_RPA_RSP_SIZE
    };
    let mut descriptor = adapter.prep_ms_mgmt_iocb(0, rsp_size);
    adapter.scratch.prep(CtPreamble::fdmi(RPA_CMD, rsp_size))?;

    let port_name = adapter.port_name();
    let inputs = port_inputs(&adapter.cfg, &adapter.strings, adapter.d_id, adapter.fabric_name);

    adapter.scratch.req_view::<RpaHead>("rpa request")?.port_name = port_name;

    let mut writer = AttrWriter::new(adapter.scratch.req_tail_mut(size_of::<RpaHead>())?);
    port_attributes(&inputs, set, &mut writer)?;
    let (block, count) = writer.finish();
    adapter.scratch.req_view::<RpaHead>("rpa request")?.attr_count = U32::new(count);

    let req_size = (CT_PREAMBLE_SIZE + size_of::<RpaHead>() + block) as u32;
    descriptor.set_req_size(req_size);
    debug!(%port_name, ?set, attrs = count, req_size, "RPA");

    adapter.issue_ms("RPA", &descriptor).await
}

/// Register an NPIV port under the HBA record of its physical port. RPRT
/// carries the same attribute catalog as RPA plus the owning port name.
pub async fn rprt<C: CommandChannel>(
    adapter: &mut Adapter<C>,
    set: AttrSet,
) -> Result<(), GsError> {
    let mut descriptor = adapter.prep_ms_mgmt_iocb(0, RPRT_RSP_SIZE);
    adapter.scratch.prep(CtPreamble::fdmi(RPRT_CMD, RPRT_RSP_SIZE))?;

    let port_name = adapter.port_name();
    let hba_identifier = adapter.physical_port_name();
    let inputs = port_inputs(&adapter.cfg, &adapter.strings, adapter.d_id, adapter.fabric_name);

    let head = adapter.scratch.req_view::<RprtHead>("rprt request")?;
    head.hba_identifier = hba_identifier;
    head.port_name = port_name;

    let mut writer = AttrWriter::new(adapter.scratch.req_tail_mut(size_of::<RprtHead>())?);
    port_attributes(&inputs, set, &mut writer)?;
    let (block, count) = writer.finish();
    adapter.scratch.req_view::<RprtHead>("rprt request")?.attr_count = U32::new(count);

    let req_size = (CT_PREAMBLE_SIZE + size_of::<RprtHead>() + block) as u32;
    descriptor.set_req_size(req_size);
    debug!(%port_name, %hba_identifier, ?set, attrs = count, req_size, "RPRT");

    adapter.issue_ms("RPRT", &descriptor).await
}

/// Deregister the HBA record, clearing whatever an earlier driver instance
/// left behind so RHBA can be retried.
pub async fn dhba<C: CommandChannel>(adapter: &mut Adapter<C>) -> Result<(), GsError> {
    let descriptor = adapter.prep_ms_mgmt_iocb(DHBA_REQ_SIZE, DHBA_RSP_SIZE);
    adapter.scratch.prep(CtPreamble::fdmi(DHBA_CMD, DHBA_RSP_SIZE))?;

    let port_name = adapter.port_name();
    adapter
        .scratch
        .req_view::<DhbaPayload>("dhba request")?
        .port_name = port_name;
    debug!(%port_name, "DHBA");

    adapter.issue_ms("DHBA", &descriptor).await
}

fn hba_inputs<'a>(cfg: &'a Config, strings: &'a FdmiStrings, fabric_name: Wwn) -> HbaAttrInputs<'a> {
    let id = &cfg.identity;
    HbaAttrInputs {
        node_name: id.node_name,
        manufacturer: &id.manufacturer,
        serial_number: &id.serial_number,
        model: &id.model,
        model_description: &id.model_description,
        hardware_version: &id.hardware_version,
        driver_version: &id.driver_version,
        option_rom_version: &id.option_rom_version,
        firmware_version: &id.firmware_version,
        os_name_and_version: &strings.os_name_and_version,
        max_ct_payload: u32::from(cfg.adapter.frame_payload_size),
        symbolic_name: &strings.symbolic_name,
        vendor_specific: id.vendor_id,
        num_ports: 1,
        fabric_name,
        boot_bios_name: &strings.boot_bios_name,
        vendor_identifier: &id.vendor_identifier,
    }
}

fn port_inputs<'a>(
    cfg: &'a Config,
    strings: &'a FdmiStrings,
    d_id: PortId,
    fabric_name: Wwn,
) -> PortAttrInputs<'a> {
    let hw = &cfg.adapter;
    let id = &cfg.identity;
    PortAttrInputs {
        supported_speeds: supported_speed_mask(hw.converged.as_bool(), hw.max_speed),
        current_speed: current_speed_mask(hw.link_rate),
        frame_size: u32::from(hw.frame_payload_size),
        os_device_name: &cfg.os.device_name,
        host_name: &cfg.os.hostname,
        node_name: id.node_name,
        port_name: id.port_name,
        symbolic_name: &strings.symbolic_name,
        port_type: u32::from(NS_NX_PORT_TYPE),
        supported_cos: COS_CLASS_3,
        fabric_name,
        port_state: PORT_STATE_ONLINE,
        discovered_ports: 1,
        port_id: d_id.b24(),
        smart_guid: smart_san_guid(id.node_name, id.port_name),
        smart_model: &strings.smart_model,
        smart_port_info: if hw.vp_index != 0 { 2 } else { 1 },
        smart_qos: 0,
        smart_security: 1,
    }
}
