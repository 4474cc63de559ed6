// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types of one Neutron database snapshot, and loading it from JSON.

use crate::UsageError;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

/// One row of the `subnetpools` table joined with its prefixes.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubnetPoolRow {
    pub id: String,
    pub ip_version: i64,
    pub min_prefixlen: i64,
    pub max_prefixlen: i64,
    #[serde(default)]
    pub default_prefixlen: i64,
    pub project_id: Option<String>,
    pub name: Option<String>,
    /// comma-joined CIDRs
    pub prefixes: Option<String>,
}

/// One row of the `subnets` table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubnetRow {
    pub id: String,
    pub cidr: String,
    pub gateway_ip: Option<String>,
    pub network_id: String,
    pub project_id: Option<String>,
    pub enable_dhcp: Option<bool>,
    pub dns_nameservers: Option<String>,
    pub subnetpool_id: Option<String>,
}

impl SubnetRow {
    /// Owning pool id; an empty string counts as no pool.
    pub fn pool_id(&self) -> Option<&str> {
        self.subnetpool_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Allocated IP count per subnet, reported as-is.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NetworkIpAvailabilityRow {
    pub network_id: Option<String>,
    pub subnet_id: String,
    pub project_id: Option<String>,
    pub network_name: Option<String>,
    pub subnet_name: Option<String>,
    pub cidr: String,
    pub ip_version: i64,
    pub allocation_count: i64,
}

/**
One allocation pool of a subnet.

A row without `last_ip` stands for the subnet's whole CIDR.
*/
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct IpAvailabilityRangeRow {
    pub network_id: String,
    pub subnet_id: String,
    pub project_id: Option<String>,
    pub network_name: Option<String>,
    pub subnet_name: Option<String>,
    pub cidr: String,
    pub ip_version: i64,
    pub first_ip: Option<String>,
    pub last_ip: Option<String>,
}

/// Everything one reporting cycle reads. Missing tables default to empty.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub subnetpools: Vec<SubnetPoolRow>,
    #[serde(default)]
    pub subnets: Vec<SubnetRow>,
    #[serde(default)]
    pub network_ip_availabilities: Vec<NetworkIpAvailabilityRow>,
    #[serde(default)]
    pub ip_availability_ranges: Vec<IpAvailabilityRangeRow>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and decode a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, UsageError> {
        let path: &Path = path.as_ref();
        let snapshot_err = |reason: String| UsageError::Snapshot {
            path: path.display().to_string(),
            reason,
        };

        let json: String = fs::read_to_string(path).map_err(|e| snapshot_err(e.to_string()))?;
        let snapshot: Snapshot = Self::from_json(&json).map_err(|e| snapshot_err(e.to_string()))?;

        debug!(
            path = %path.display(),
            subnetpools = snapshot.subnetpools.len(),
            subnets = snapshot.subnets.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

/* -------------------------------------------------------------------------- */
