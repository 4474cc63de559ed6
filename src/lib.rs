// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
Exact address-space accounting for OpenStack Neutron subnet pools.

For every declared prefix of every subnet pool, and every prefix length the
pool allows inside it, count how many blocks exist (total), how many are
entirely unallocated (free) and how many subnets of exactly that length were
cut from it (used). Counts are arbitrary precision, so even the largest IPv6
pools are counted exactly.

```
use num_bigint::BigUint;
use subnetpool_usage::{generate_from_rows, ReportOptions, SubnetPoolRow, SubnetRow};

let pools = vec![SubnetPoolRow {
    id: "pool-a".into(),
    ip_version: 4,
    min_prefixlen: 24,
    max_prefixlen: 26,
    prefixes: Some("10.0.0.0/24".into()),
    ..Default::default()
}];
let subnets = vec![SubnetRow {
    id: "net-a".into(),
    cidr: "10.0.0.0/26".into(),
    subnetpool_id: Some("pool-a".into()),
    ..Default::default()
}];

let report = generate_from_rows(&pools, &subnets, &ReportOptions::default()).unwrap();
let at_26 = &report.rows[2];
assert_eq!(at_26.total, BigUint::from(4u8));
assert_eq!(at_26.free, BigUint::from(3u8));
assert_eq!(at_26.used, 1);
```
*/

pub mod availability;
pub mod config;
pub mod counters;
mod errors;
pub mod iptools;
pub mod metrics;
pub mod report;
pub mod snapshot;
pub mod subnetpools;

pub use availability::{total_series, used_series, AvailabilitySeries};
pub use counters::{free_blocks, total_blocks, used_blocks, ResidualSpace};
pub use errors::{ConfigurationError, UsageError};
pub use iptools::{cidr_size, ip_range_size, AddressError, IpFam, IpSet, Prefix};
pub use metrics::{render, NeutronMetrics};
pub use report::{generate, generate_from_rows, PoolFailure, Report, ReportOptions, UsageLabels, UsageRow};
pub use snapshot::{IpAvailabilityRangeRow, NetworkIpAvailabilityRow, Snapshot, SubnetPoolRow, SubnetRow};
pub use subnetpools::{group_subnets, PoolBounds, PoolWithSubnets};
