// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Core Fibre Channel identities shared by every Generic Services exchange:
//! 24-bit fabric addresses, 64-bit world wide names, link speeds and the
//! FC-4 classification a port learns from the Name Server.

use core::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Length in bytes of a world wide name.
pub const WWN_SIZE: usize = 8;

/// Loop id the firmware reserves for the Simple Name Server.
pub const SIMPLE_NAME_SERVER: u16 = 0x00fc;
/// Loop id the firmware reserves for the Management Server.
pub const MANAGEMENT_SERVER: u16 = 0x00fe;
/// N_Port handle of the Name Server on pass-through capable firmware.
pub const NPH_SNS: u16 = 0x7fc;
/// N_Port handle of the Management Server on pass-through capable firmware.
pub const NPH_MGMT_SERVER: u16 = 0x7fa;

/// Name Server object port types.
pub const NS_N_PORT_TYPE: u8 = 0x01;
pub const NS_NL_PORT_TYPE: u8 = 0x02;
pub const NS_NX_PORT_TYPE: u8 = 0x7f;

/// 24-bit fabric address kept in wire order (domain, area, AL_PA).
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    FromBytes,
    IntoBytes,
    KnownLayout,
    Immutable,
    Unaligned,
)]
pub struct PortId {
    pub domain: u8,
    pub area: u8,
    pub al_pa: u8,
}

impl PortId {
    /// Well-known address of the directory service (Name Server).
    pub const NAME_SERVER: PortId = PortId::new(0xff, 0xff, 0xfc);
    /// Well-known address of the management service (FDMI and the Fabric
    /// Configuration Server).
    pub const MANAGEMENT: PortId = PortId::new(0xff, 0xff, 0xfa);

    #[inline]
    pub const fn new(domain: u8, area: u8, al_pa: u8) -> Self {
        Self {
            domain,
            area,
            al_pa,
        }
    }

    /// Pack into the low 24 bits of a host integer.
    #[inline]
    pub const fn b24(&self) -> u32 {
        (self.domain as u32) << 16 | (self.area as u32) << 8 | self.al_pa as u32
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.domain, self.area, self.al_pa)
    }
}

impl fmt::Debug for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PortId({self})")
    }
}

/// 64-bit world wide name in wire (big-endian) byte order.
#[repr(transparent)]
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    FromBytes,
    IntoBytes,
    KnownLayout,
    Immutable,
    Unaligned,
)]
pub struct Wwn(pub [u8; WWN_SIZE]);

impl Wwn {
    pub const ZERO: Wwn = Wwn([0u8; WWN_SIZE]);

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; WWN_SIZE]
    }
}

impl fmt::Display for Wwn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Wwn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wwn({self})")
    }
}

impl FromStr for Wwn {
    type Err = anyhow::Error;

    /// Accepts `21:00:00:e0:8b:01:02:03` as well as plain `210000e08b010203`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| *c != ':').collect();
        let bytes = hex::decode(&cleaned)?;
        if bytes.len() != WWN_SIZE {
            bail!("wwn must be {WWN_SIZE} bytes, got {}", bytes.len());
        }
        let mut wwn = [0u8; WWN_SIZE];
        wwn.copy_from_slice(&bytes);
        Ok(Wwn(wwn))
    }
}

impl Serialize for Wwn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Wwn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Negotiated or advertised link speed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PortSpeed {
    #[default]
    #[serde(rename = "Unknown", alias = "unknown")]
    Unknown,
    #[serde(rename = "1Gb")]
    Gb1,
    #[serde(rename = "2Gb")]
    Gb2,
    #[serde(rename = "4Gb")]
    Gb4,
    #[serde(rename = "8Gb")]
    Gb8,
    #[serde(rename = "10Gb")]
    Gb10,
    #[serde(rename = "16Gb")]
    Gb16,
    #[serde(rename = "32Gb")]
    Gb32,
}

impl fmt::Display for PortSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PortSpeed::Unknown => "unknown",
            PortSpeed::Gb1 => "1Gb",
            PortSpeed::Gb2 => "2Gb",
            PortSpeed::Gb4 => "4Gb",
            PortSpeed::Gb8 => "8Gb",
            PortSpeed::Gb10 => "10Gb",
            PortSpeed::Gb16 => "16Gb",
            PortSpeed::Gb32 => "32Gb",
        };
        f.write_str(s)
    }
}

/// FC-4 protocol classification learned from the Name Server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fc4Type {
    /// Nothing learned yet.
    #[default]
    Unknown,
    /// Registered with the fabric, but not an FCP SCSI port.
    Other,
    /// FCP SCSI capable port.
    FcpScsi,
}

/// One fabric device row filled in by GID_PT and refined by the per-port
/// Name Server and Management Server queries.
#[derive(Debug, Clone, Default)]
pub struct PortEntry {
    pub d_id: PortId,
    pub node_name: Wwn,
    pub port_name: Wwn,
    pub fabric_port_name: Wwn,
    pub fp_speed: PortSpeed,
    pub fc4_type: Fc4Type,
    /// Set on the entry whose GID_PT control byte carried the end marker.
    pub last: bool,
}

/// Single-port lookup target for GA_NXT.
#[derive(Debug, Clone, Default)]
pub struct FcPort {
    pub d_id: PortId,
    pub node_name: Wwn,
    pub port_name: Wwn,
    pub fc4_type: Fc4Type,
}
