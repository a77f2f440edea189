// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-adapter Generic Services context: the configuration, the exchange
//! buffers and the issue/decode core every fabric service operation goes
//! through. One value of [`Adapter`] serves one fabric-attached port.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    cfg::config::Config,
    fabric::{
        channel::{
            ChannelError, CommandChannel, LoginFlags, MAILBOX_STATUS_WORDS,
            MBS_COMMAND_COMPLETE,
        },
        error::{GsError, reject_reason_text},
    },
    models::{
        common::DmaAddr,
        ct::scratch::CtScratch,
        fc::{
            MANAGEMENT_SERVER, NPH_MGMT_SERVER, NPH_SNS, PortId, PortSpeed,
            SIMPLE_NAME_SERVER, Wwn,
        },
        iocb::{
            CS_COMPLETE, CS_DATA_OVERRUN, CS_DATA_UNDERRUN, CtPassthru,
            DescriptorOps, MsDescriptor, MsExchangeArgs, MsIocb, sns::SnsScratch,
        },
    },
    utils::hex_dump,
};

/// Strings registered through FDMI, derived once from the configuration so
/// every registration pass reuses the same bytes.
#[derive(Debug, Clone)]
pub struct FdmiStrings {
    /// `<os name> <os version>`.
    pub os_name_and_version: String,
    /// `<model> FW:v<firmware> DVR:v<driver>`, also the RSNN_NN name.
    pub symbolic_name: String,
    /// `BIOS <option rom version>`.
    pub boot_bios_name: String,
    /// Smart SAN product name, `ISP<device id>`.
    pub smart_model: String,
}

impl FdmiStrings {
    fn derive(cfg: &Config) -> Self {
        let id = &cfg.identity;
        Self {
            os_name_and_version: format!("{} {}", cfg.os.name, cfg.os.version),
            symbolic_name: format!(
                "{} FW:v{} DVR:v{}",
                id.model, id.firmware_version, id.driver_version
            ),
            boot_bios_name: format!("BIOS {}", id.option_rom_version),
            smart_model: format!("ISP{:04x}", id.device_id),
        }
    }
}

/// One fabric-attached port and everything its service exchanges need.
///
/// The channel moves prepared descriptors; this type prepares them, owns
/// the shared request/response windows and classifies completions. Fields
/// are crate-visible so operation handlers can borrow the buffers and the
/// identity disjointly.
pub struct Adapter<C: CommandChannel> {
    pub(crate) cfg: Config,
    pub(crate) channel: C,
    pub(crate) scratch: CtScratch,
    pub(crate) sns: Option<SnsScratch>,
    pub(crate) strings: FdmiStrings,
    pub(crate) d_id: PortId,
    pub(crate) fabric_name: Wwn,
    mgmt_loop_id: u16,
    management_logged_in: bool,
    gpsc_supported: bool,
}

impl<C: CommandChannel> Adapter<C> {
    /// Build the context for one port. `ct_dma` and `sns_dma` are the bus
    /// addresses the embedding driver mapped for the exchange windows; a
    /// scripted channel passes placeholders.
    pub fn new(channel: C, cfg: Config, ct_dma: DmaAddr, sns_dma: DmaAddr) -> Self {
        let scratch = CtScratch::new(cfg.adapter.max_fibre_devices, ct_dma);
        let sns = cfg
            .adapter
            .interface
            .is_send_sns()
            .then(|| SnsScratch::new(sns_dma));
        let mgmt_loop_id = if cfg.adapter.interface.is_passthru() {
            NPH_MGMT_SERVER
        } else {
            MANAGEMENT_SERVER
        };
        let strings = FdmiStrings::derive(&cfg);
        Self {
            cfg,
            channel,
            scratch,
            sns,
            strings,
            d_id: PortId::new(0, 0, 0),
            fabric_name: Wwn::ZERO,
            mgmt_loop_id,
            management_logged_in: false,
            gpsc_supported: true,
        }
    }

    /// Record the address and fabric name this port logged in with. Resets
    /// the management server session so the next FDMI pass logs in again.
    pub fn set_fabric(&mut self, d_id: PortId, fabric_name: Wwn) {
        self.d_id = d_id;
        self.fabric_name = fabric_name;
        self.management_logged_in = false;
    }

    /// Refresh the trained link rate after a link-up.
    pub fn set_link_rate(&mut self, rate: PortSpeed) {
        self.cfg.adapter.link_rate = rate;
    }

    #[inline]
    pub fn d_id(&self) -> PortId {
        self.d_id
    }

    #[inline]
    pub fn fabric_name(&self) -> Wwn {
        self.fabric_name
    }

    #[inline]
    pub fn node_name(&self) -> Wwn {
        self.cfg.identity.node_name
    }

    #[inline]
    pub fn port_name(&self) -> Wwn {
        self.cfg.identity.port_name
    }

    /// Physical port behind this one; the port itself when not virtual.
    #[inline]
    pub fn physical_port_name(&self) -> Wwn {
        self.cfg
            .identity
            .physical_port_name
            .unwrap_or(self.cfg.identity.port_name)
    }

    #[inline]
    pub fn vp_index(&self) -> u8 {
        self.cfg.adapter.vp_index
    }

    #[inline]
    pub fn is_npiv(&self) -> bool {
        self.cfg.adapter.vp_index != 0
    }

    #[inline]
    pub fn max_fibre_devices(&self) -> u32 {
        self.cfg.adapter.max_fibre_devices
    }

    #[inline]
    pub fn uses_send_sns(&self) -> bool {
        self.cfg.adapter.interface.is_send_sns()
    }

    #[inline]
    pub fn uses_passthru(&self) -> bool {
        self.cfg.adapter.interface.is_passthru()
    }

    #[inline]
    pub fn supports_iidma(&self) -> bool {
        self.cfg.adapter.iidma.as_bool()
    }

    #[inline]
    pub fn smart_san_enabled(&self) -> bool {
        self.cfg.fdmi.smart_san.as_bool()
    }

    #[inline]
    pub fn embedded_management(&self) -> bool {
        self.cfg.adapter.embedded_management.as_bool()
    }

    /// GPSC is assumed available until the Fabric Config Server rejects it
    /// as unknown; after that the whole session stops asking.
    #[inline]
    pub fn gpsc_supported(&self) -> bool {
        self.gpsc_supported
    }

    pub(crate) fn disable_gpsc(&mut self) {
        self.gpsc_supported = false;
    }

    /// Exchange timeout in seconds: twice the fabric R_A_TOV.
    fn timeout_secs(&self) -> u16 {
        (self.cfg.adapter.r_a_tov / 10) * 2
    }

    /// The same timeout as a [`Duration`], enforced locally on top of the
    /// firmware's own timer.
    pub fn exchange_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs()))
    }

    /// Segment description for one CT exchange over the shared window.
    pub fn exchange_args(&self, req_size: u32, rsp_size: u32) -> MsExchangeArgs {
        MsExchangeArgs {
            req_size,
            rsp_size,
            req_dma: self.scratch.dma(),
            rsp_dma: self.scratch.dma(),
            timeout: self.timeout_secs(),
        }
    }

    /// Prepared descriptor addressed to the Name Server, in whichever
    /// format this generation speaks.
    pub fn prep_ms_iocb(&self, req_size: u32, rsp_size: u32) -> MsDescriptor {
        let args = self.exchange_args(req_size, rsp_size);
        if self.uses_passthru() {
            CtPassthru::ms_request(NPH_SNS, self.vp_index(), &args).into()
        } else {
            MsIocb::ms_request(SIMPLE_NAME_SERVER, &args).into()
        }
    }

    /// Prepared descriptor addressed to the Management Server.
    pub fn prep_ms_mgmt_iocb(&self, req_size: u32, rsp_size: u32) -> MsDescriptor {
        let args = self.exchange_args(req_size, rsp_size);
        if self.uses_passthru() {
            CtPassthru::ms_request(self.mgmt_loop_id, self.vp_index(), &args).into()
        } else {
            MsIocb::ms_request(self.mgmt_loop_id, &args).into()
        }
    }

    /// Issue one prepared CT exchange and classify the outcome. On return
    /// the scratch buffer holds the raw CT response and its header has been
    /// checked for accept.
    pub async fn issue_ms(
        &mut self,
        op: &'static str,
        descriptor: &MsDescriptor,
    ) -> Result<(), GsError> {
        let wire = descriptor.to_wire();
        let req_len = descriptor.req_size() as usize;
        let deadline = self.exchange_timeout();

        let Self {
            channel, scratch, ..
        } = self;
        let done = tokio::time::timeout(
            deadline,
            channel.issue_ms(wire, scratch.response_window(), req_len),
        )
        .await
        .map_err(|_| ChannelError::Timeout(deadline))??;

        let completed: MsDescriptor = match descriptor {
            MsDescriptor::MsIocb(_) => MsIocb::from(done).into(),
            MsDescriptor::CtPassthru(_) => CtPassthru::from(done).into(),
        };
        self.check_ms_status(op, &completed)
    }

    /// Entry status first, then completion status, then the CT header.
    /// Under- and overruns still carry a usable CT response.
    fn check_ms_status(
        &self,
        op: &'static str,
        completed: &MsDescriptor,
    ) -> Result<(), GsError> {
        let entry = completed.entry_status();
        if entry != 0 {
            return Err(GsError::EntryStatus { op, status: entry });
        }
        match completed.comp_status() {
            CS_COMPLETE | CS_DATA_UNDERRUN | CS_DATA_OVERRUN => {
                let head = self.scratch.rsp_header()?;
                if head.is_accept() {
                    return Ok(());
                }
                let reason = head.reason_code;
                let explanation = head.explanation_code;
                debug!(
                    op,
                    reason,
                    explanation,
                    "{op} rejected: {}",
                    reject_reason_text(reason)
                );
                debug!("\n{}", hex_dump(&self.scratch.as_bytes()[..32]));
                Err(GsError::Rejected {
                    op,
                    reason,
                    explanation,
                })
            },
            status => Err(GsError::Completion { op, status }),
        }
    }

    /// The SNS exchange buffer; only mailbox-era adapters carry one.
    pub fn sns_mut(&mut self) -> Result<&mut SnsScratch, GsError> {
        self.sns
            .as_mut()
            .ok_or(GsError::Internal("no sns buffer on this interface"))
    }

    /// Issue the SNS packet already prepared in the buffer and check the
    /// response for accept.
    pub async fn issue_sns(
        &mut self,
        op: &'static str,
        cmd_words: u16,
    ) -> Result<(), GsError> {
        let deadline = self.exchange_timeout();

        let Self { channel, sns, .. } = self;
        let sns = sns
            .as_mut()
            .ok_or(GsError::Internal("no sns buffer on this interface"))?;
        let dma = sns.dma();
        tokio::time::timeout(deadline, channel.send_sns(dma, cmd_words, sns.data_mut()))
            .await
            .map_err(|_| ChannelError::Timeout(deadline))??;

        let head = sns.rsp_header()?;
        if head.is_accept() {
            return Ok(());
        }
        let reason = head.reason_code;
        let explanation = head.explanation_code;
        debug!(
            op,
            reason,
            explanation,
            "{op} rejected: {}",
            reject_reason_text(reason)
        );
        Err(GsError::Rejected {
            op,
            reason,
            explanation,
        })
    }

    /// Log in to the Management Server once per fabric session. FDMI and
    /// GPSC exchanges require this login; Name Server traffic does not.
    pub async fn management_login(&mut self) -> Result<(), GsError> {
        if self.management_logged_in {
            return Ok(());
        }
        let mb: [u16; MAILBOX_STATUS_WORDS] = self
            .channel
            .fabric_login(
                self.mgmt_loop_id,
                PortId::MANAGEMENT,
                LoginFlags::NO_PRLI | LoginFlags::NO_DB_UPDATE,
            )
            .await?;
        if mb[0] != MBS_COMMAND_COMPLETE {
            warn!(
                mb0 = format_args!("{:#06x}", mb[0]),
                mb1 = mb[1],
                mb2 = mb[2],
                mb6 = mb[6],
                mb7 = mb[7],
                "management server login failed"
            );
            return Err(GsError::ManagementLogin { status: mb[0] });
        }
        info!(loop_id = self.mgmt_loop_id, "management server login complete");
        self.management_logged_in = true;
        Ok(())
    }
}
