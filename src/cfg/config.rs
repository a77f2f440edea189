// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    cfg::enums::{DescriptorInterface, YesNo},
    models::fc::{PortSpeed, Wwn},
};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Hardware generation and fabric limits of the adapter.
    pub adapter: AdapterConfig,
    /// Names and versions registered with the fabric services.
    pub identity: IdentityConfig,
    /// Operating system identification reported through FDMI.
    pub os: OsConfig,
    /// FDMI registration options.
    #[serde(default)]
    pub fdmi: FdmiConfig,
}

/// Capability record of one adapter generation. An embedding driver fills
/// this from probed hardware; tools and tests describe the adapter they
/// emulate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AdapterConfig {
    #[serde(rename = "Interface")]
    /// Descriptor interface the firmware generation speaks.
    pub interface: DescriptorInterface,

    #[serde(rename = "MaxSpeed")]
    /// Top speed tier the transceivers can train at.
    pub max_speed: PortSpeed,

    #[serde(default, rename = "LinkRate")]
    /// Rate the link trained at, refreshed by the embedding driver.
    pub link_rate: PortSpeed,

    #[serde(default, rename = "Converged")]
    /// Converged adapter carrying FC over 10 Gb Ethernet.
    pub converged: YesNo,

    #[serde(default, rename = "EmbeddedManagement")]
    /// Adapter with an embedded management stack that registers FDMI on
    /// its own.
    pub embedded_management: YesNo,

    #[serde(default, rename = "Iidma")]
    /// Firmware can retrain per-target link speeds (iIDMA).
    pub iidma: YesNo,

    #[serde(rename = "MaxFibreDevices")]
    /// Directory capacity: the most ports one GID_PT answer may carry.
    pub max_fibre_devices: u32,

    #[serde(rename = "ResourceAllocationTimeout")]
    /// Fabric R_A_TOV in 100 ms units; exchange timeouts derive from it.
    pub r_a_tov: u16,

    #[serde(rename = "FramePayloadSize")]
    /// Largest frame payload in bytes, registered through FDMI.
    pub frame_payload_size: u16,

    #[serde(default, rename = "VpIndex")]
    /// Virtual port index; zero is the physical port.
    pub vp_index: u8,
}

/// Identity registered with the Name Server and the FDMI catalogs.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IdentityConfig {
    #[serde(rename = "NodeName")]
    pub node_name: Wwn,

    #[serde(rename = "PortName")]
    pub port_name: Wwn,

    #[serde(default, rename = "PhysicalPortName")]
    /// Physical port behind a virtual one; virtual ports register under it.
    pub physical_port_name: Option<Wwn>,

    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,

    #[serde(rename = "SerialNumber")]
    pub serial_number: String,

    #[serde(rename = "Model")]
    pub model: String,

    #[serde(rename = "ModelDescription")]
    pub model_description: String,

    #[serde(rename = "HardwareVersion")]
    pub hardware_version: String,

    #[serde(rename = "DriverVersion")]
    pub driver_version: String,

    #[serde(rename = "OptionRomVersion")]
    /// Option ROM revision; the FDMI BIOS name derives from it too.
    pub option_rom_version: String,

    #[serde(rename = "FirmwareVersion")]
    pub firmware_version: String,

    #[serde(rename = "VendorIdentifier")]
    /// Four-letter vendor tag registered as the vendor identifier.
    pub vendor_identifier: String,

    #[serde(rename = "VendorId")]
    /// PCI vendor id, registered verbatim as vendor-specific info.
    pub vendor_id: u32,

    #[serde(rename = "DeviceId")]
    /// PCI device id; the Smart SAN product name derives from it.
    pub device_id: u16,
}

/// Operating system identification reported through FDMI.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OsConfig {
    #[serde(rename = "Name")]
    /// Kernel name, e.g. `Linux`.
    pub name: String,

    #[serde(rename = "Version")]
    /// Release and machine, e.g. `6.8.0-41-generic x86_64`.
    pub version: String,

    #[serde(default, rename = "Hostname")]
    /// Host name registered with the port; empty or `(none)` falls back
    /// to a default.
    pub hostname: String,

    #[serde(rename = "DeviceName")]
    /// OS handle of the port, e.g. `fcgs:host0`.
    pub device_name: String,
}

/// FDMI registration options.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct FdmiConfig {
    #[serde(default, rename = "SmartSan")]
    /// Register the Smart SAN vendor attributes first.
    pub smart_san: YesNo,
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            self.adapter.max_fibre_devices >= 1,
            "MaxFibreDevices must be >= 1"
        );
        ensure!(
            self.adapter.r_a_tov >= 10,
            "ResourceAllocationTimeout must cover at least one second"
        );
        ensure!(
            self.adapter.frame_payload_size >= 256,
            "FramePayloadSize too small for a CT exchange"
        );

        // The mailbox-era interface predates big fabrics and fast links.
        if self.adapter.interface == DescriptorInterface::SendSns {
            ensure!(
                self.adapter.max_fibre_devices <= 512,
                "SendSns caps the directory at 512 entries"
            );
            ensure!(
                !self.adapter.iidma.as_bool(),
                "iIDMA requires the CtPassthru interface"
            );
            ensure!(
                self.adapter.vp_index == 0,
                "virtual ports require the CtPassthru interface"
            );
        }
        if self.adapter.iidma.as_bool() {
            ensure!(
                self.adapter.interface == DescriptorInterface::CtPassthru,
                "iIDMA requires the CtPassthru interface"
            );
        }
        if self.fdmi.smart_san.as_bool() {
            ensure!(
                self.adapter.interface == DescriptorInterface::CtPassthru,
                "Smart SAN registration requires the CtPassthru interface"
            );
        }
        if self.adapter.vp_index != 0 {
            ensure!(
                self.identity.physical_port_name.is_some(),
                "virtual ports must name their PhysicalPortName"
            );
        }

        ensure!(
            !self.identity.node_name.is_zero() && !self.identity.port_name.is_zero(),
            "NodeName and PortName must not be zero"
        );

        // Hosts without a configured name still register something legible.
        if self.os.hostname.is_empty() || self.os.hostname == "(none)" {
            self.os.hostname = "Linux-default".to_string();
        }

        Ok(())
    }
}
