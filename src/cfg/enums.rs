// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use serde::{Deserialize, Serialize};

/// Boolean enumeration with string serialization support
///
/// Represents yes/no values with support for various string representations
/// including "Yes"/"No", "true"/"false", and "1"/"0".
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YesNo {
    #[serde(
        rename = "Yes",
        alias = "yes",
        alias = "YES",
        alias = "true",
        alias = "True",
        alias = "1"
    )]
    Yes,
    #[default]
    #[serde(
        rename = "No",
        alias = "no",
        alias = "NO",
        alias = "false",
        alias = "False",
        alias = "0"
    )]
    No,
}
impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        })
    }
}
impl From<bool> for YesNo {
    fn from(b: bool) -> Self {
        if b { YesNo::Yes } else { YesNo::No }
    }
}
impl YesNo {
    pub fn as_bool(self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

/// Descriptor interface enumeration
///
/// Names the firmware generation's way of carrying a Generic Services
/// exchange. SendSns is the mailbox-era packet and reaches the Name Server
/// only; MsIocb addresses servers by loop id; CtPassthru addresses them by
/// N_Port handle and is the only interface with FC-4 feature and iIDMA
/// support.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorInterface {
    #[serde(rename = "SendSns", alias = "send-sns", alias = "sns")]
    SendSns,
    #[serde(rename = "MsIocb", alias = "ms-iocb")]
    MsIocb,
    #[serde(rename = "CtPassthru", alias = "ct-passthru")]
    CtPassthru,
}
impl fmt::Display for DescriptorInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DescriptorInterface::SendSns => "SendSns",
            DescriptorInterface::MsIocb => "MsIocb",
            DescriptorInterface::CtPassthru => "CtPassthru",
        })
    }
}
impl DescriptorInterface {
    pub fn is_send_sns(self) -> bool {
        matches!(self, DescriptorInterface::SendSns)
    }

    pub fn is_passthru(self) -> bool {
        matches!(self, DescriptorInterface::CtPassthru)
    }
}
