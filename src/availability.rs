// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-subnet IP availability: allocated address counts and allocation pool sizes.

use crate::{
    iptools::{cidr_size, ip_range_size},
    snapshot::{IpAvailabilityRangeRow, NetworkIpAvailabilityRow},
    UsageError,
};
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::{btree_map::Entry, BTreeMap};
use tracing::debug;

/// Labels shared by both availability series.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AvailabilityLabels {
    pub network_id: String,
    pub subnet_id: String,
    pub project_id: String,
    pub network_name: String,
    pub subnet_name: String,
    pub cidr: String,
    pub ip_version: i64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AvailabilityUsed {
    pub labels: AvailabilityLabels,
    pub allocation_count: i64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AvailabilityTotal {
    pub labels: AvailabilityLabels,
    /// summed size of the subnet's allocation pools
    pub total: BigUint,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AvailabilitySeries {
    pub used: Vec<AvailabilityUsed>,
    pub totals: Vec<AvailabilityTotal>,
}

impl AvailabilitySeries {
    /// Both series at once. See [total_series] for errors.
    pub fn new(
        used_rows: &[NetworkIpAvailabilityRow],
        range_rows: &[IpAvailabilityRangeRow],
    ) -> Result<Self, UsageError> {
        Ok(Self {
            used: used_series(used_rows),
            totals: total_series(range_rows)?,
        })
    }
}

/// Allocation counts, passed through in input order.
pub fn used_series(rows: &[NetworkIpAvailabilityRow]) -> Vec<AvailabilityUsed> {
    rows.iter()
        .map(|row| AvailabilityUsed {
            labels: AvailabilityLabels {
                network_id: row.network_id.clone().unwrap_or_default(),
                subnet_id: row.subnet_id.clone(),
                project_id: row.project_id.clone().unwrap_or_default(),
                network_name: row.network_name.clone().unwrap_or_default(),
                subnet_name: row.subnet_name.clone().unwrap_or_default(),
                cidr: row.cidr.clone(),
                ip_version: row.ip_version,
            },
            allocation_count: row.allocation_count,
        })
        .collect()
}

/// Size of one allocation pool row: its explicit range, or the whole CIDR.
fn range_row_size(row: &IpAvailabilityRangeRow) -> Result<BigUint, UsageError> {
    let size = match row.last_ip.as_deref() {
        Some(last) => ip_range_size(row.first_ip.as_deref().unwrap_or_default(), last),
        None => cidr_size(&row.cidr),
    };
    size.map_err(|e| UsageError::parse(format!("subnet {} allocation pool", row.subnet_id), e))
}

/**
Total addresses per subnet: the sum of its allocation pool sizes, sorted by
subnet id. Labels come from the first row seen for each subnet.

### Errors
Any malformed address or reversed range aborts the whole series with
[UsageError::Parse].
*/
pub fn total_series(rows: &[IpAvailabilityRangeRow]) -> Result<Vec<AvailabilityTotal>, UsageError> {
    let mut by_subnet: BTreeMap<&str, AvailabilityTotal> = BTreeMap::new();

    for row in rows {
        let size: BigUint = range_row_size(row)?;
        let entry = match by_subnet.entry(row.subnet_id.as_str()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(AvailabilityTotal {
                labels: AvailabilityLabels {
                    network_id: row.network_id.clone(),
                    subnet_id: row.subnet_id.clone(),
                    project_id: row.project_id.clone().unwrap_or_default(),
                    network_name: row.network_name.clone().unwrap_or_default(),
                    subnet_name: row.subnet_name.clone().unwrap_or_default(),
                    cidr: row.cidr.clone(),
                    ip_version: row.ip_version,
                },
                total: BigUint::zero(),
            }),
        };
        entry.total += size;
    }

    debug!(rows = rows.len(), subnets = by_subnet.len(), "summed allocation pools");
    Ok(by_subnet.into_values().collect())
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iptools::AddressError;

    fn range(subnet_id: &str, cidr: &str, first: Option<&str>, last: Option<&str>) -> IpAvailabilityRangeRow {
        IpAvailabilityRangeRow {
            network_id: "net-1".into(),
            subnet_id: subnet_id.into(),
            cidr: cidr.into(),
            ip_version: if cidr.contains(':') { 6 } else { 4 },
            first_ip: first.map(String::from),
            last_ip: last.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_used_passthrough() {
        let rows = vec![NetworkIpAvailabilityRow {
            network_id: Some("net-1".into()),
            subnet_id: "sub-1".into(),
            cidr: "10.0.0.0/24".into(),
            ip_version: 4,
            allocation_count: 17,
            ..Default::default()
        }];
        let used = used_series(&rows);
        assert_eq!(used.len(), 1);
        assert_eq!(used[0].allocation_count, 17);
        assert_eq!(used[0].labels.network_id, "net-1");
        assert_eq!(used[0].labels.project_id, "");
    }

    #[test]
    fn test_totals_sum_ranges_per_subnet() {
        let rows = vec![
            range("sub-b", "10.0.0.0/24", Some("10.0.0.2"), Some("10.0.0.100")),
            range("sub-a", "192.168.0.0/28", None, None),
            range("sub-b", "10.0.0.0/24", Some("10.0.0.200"), Some("10.0.0.254")),
            range("sub-c", "2001:db8::/64", Some("2001:db8::2"), Some("2001:db8::ffff:ffff:ffff:ffff")),
        ];
        let totals = total_series(&rows).unwrap();

        let ids: Vec<&str> = totals.iter().map(|t| t.labels.subnet_id.as_str()).collect();
        assert_eq!(ids, vec!["sub-a", "sub-b", "sub-c"]);
        assert_eq!(totals[0].total, BigUint::from(16u32));
        assert_eq!(totals[1].total, BigUint::from(99u32 + 55));
        assert_eq!(totals[2].total, (BigUint::from(1u8) << 64usize) - 2u8);
    }

    #[test]
    fn test_totals_abort_on_bad_range() {
        let rows = vec![
            range("sub-a", "192.168.0.0/28", None, None),
            range("sub-b", "10.0.0.0/24", Some("10.0.0.100"), Some("10.0.0.2")),
        ];
        assert_eq!(
            total_series(&rows),
            Err(UsageError::Parse {
                context: "subnet sub-b allocation pool".into(),
                source: AddressError::RangeOrder(
                    "10.0.0.100".parse().unwrap(),
                    "10.0.0.2".parse().unwrap(),
                ),
            })
        );
    }

    #[test]
    fn test_totals_missing_first_ip() {
        let rows = vec![range("sub-a", "10.0.0.0/24", None, Some("10.0.0.9"))];
        assert!(matches!(
            total_series(&rows),
            Err(UsageError::Parse { source: AddressError::InvalidIp(_), .. })
        ));
    }
}
