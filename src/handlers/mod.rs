//! This module contains one handler per fabric service operation.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// FDMI registrations: RHBA, RPA, RPRT and DHBA.
pub mod fdmi;
/// Single-port directory walk with GA_NXT.
pub mod ga_nxt;
/// FC-4 feature query, GFF_ID.
pub mod gff_id;
/// Whole-fabric port list with GID_PT.
pub mod gid_pt;
/// Port speed query against the Fabric Config Server, GPSC.
pub mod gpsc;
/// Name Server registrations: RFT_ID, RFF_ID, RNN_ID, RSNN_NN.
pub mod register;
/// Per-port name queries: GPN_ID, GNN_ID, GFPN_ID.
pub mod wwn_queries;
