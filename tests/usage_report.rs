// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint::BigUint;
use num_traits::One;
use pretty_assertions::assert_eq;
use subnetpool_usage::{
    cidr_size, generate_from_rows, ip_range_size, render, AvailabilitySeries, Report,
    ReportOptions, SubnetPoolRow, SubnetRow, UsageRow,
};

const POOL_ID: &str = "044ee702-b41d-4517-ac95-d0319579775b";
const POOL_PREFIX: &str = "10.0.0.0/22";

fn pool(prefixes: &str) -> SubnetPoolRow {
    SubnetPoolRow {
        id: POOL_ID.into(),
        ip_version: 4,
        min_prefixlen: 8,
        max_prefixlen: 32,
        default_prefixlen: 26,
        project_id: Some("8d652a8c66594b328c6a6bcf617aba5d".into()),
        name: Some("shared-default-subnetpool-v4".into()),
        prefixes: Some(prefixes.into()),
    }
}

fn pooled(id: &str, cidr: &str) -> SubnetRow {
    SubnetRow {
        id: id.into(),
        cidr: cidr.into(),
        network_id: "667a6256-d975-49ed-bfe1-822887202213".into(),
        subnetpool_id: Some(POOL_ID.into()),
        ..Default::default()
    }
}

fn report(subnets: &[SubnetRow]) -> Report {
    generate_from_rows(&[pool(POOL_PREFIX)], subnets, &ReportOptions::default()).unwrap()
}

fn row(report: &Report, len: u8) -> &UsageRow {
    report
        .rows
        .iter()
        .find(|r| r.labels.prefix_length == len)
        .unwrap()
}

fn free_by_length(report: &Report) -> Vec<BigUint> {
    report.rows.iter().map(|r| r.free.clone()).collect()
}

#[test]
fn test_sizes_are_exact() {
    assert_eq!(cidr_size("10.0.0.0/24").unwrap(), BigUint::from(256u32));
    assert_eq!(cidr_size("2001:db8::/64").unwrap(), BigUint::one() << 64usize);
    assert_eq!(ip_range_size("10.0.0.1", "10.0.0.10").unwrap(), BigUint::from(10u32));
}

#[test]
fn test_empty_pool_free_equals_total() {
    let report = report(&[]);
    assert!(report.failures.is_empty());
    assert_eq!(report.rows.len(), 11);

    let expected: Vec<u32> = vec![1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024];
    for (r, want) in report.rows.iter().zip(expected) {
        assert_eq!(r.total, BigUint::from(want));
        assert_eq!(r.free, r.total);
        assert_eq!(r.used, 0);
    }
}

#[test]
fn test_removing_twice_equals_removing_once() {
    let once = report(&[pooled("a", "10.0.2.0/24")]);
    let twice = report(&[pooled("a", "10.0.2.0/24"), pooled("b", "10.0.2.0/24")]);
    assert_eq!(free_by_length(&once), free_by_length(&twice));
}

#[test]
fn test_disjoint_subnet_changes_nothing() {
    let empty = report(&[]);
    let disjoint = report(&[pooled("a", "10.0.4.0/24"), pooled("b", "172.16.0.0/12")]);
    assert_eq!(free_by_length(&empty), free_by_length(&disjoint));
}

#[test]
fn test_used_is_length_exact() {
    let report = report(&[pooled("a", "10.0.1.64/26")]);
    assert_eq!(row(&report, 26).used, 1);
    assert_eq!(row(&report, 24).used, 0);
    assert_eq!(row(&report, 28).used, 0);
    let used_total: u64 = report.rows.iter().map(|r| r.used).sum();
    assert_eq!(used_total, 1);
}

#[test]
fn test_total_strictly_increasing() {
    let report = generate_from_rows(
        &[SubnetPoolRow {
            ip_version: 6,
            min_prefixlen: 48,
            max_prefixlen: 110,
            ..pool("2001:db8::/48")
        }],
        &[],
        &ReportOptions::default(),
    )
    .unwrap();

    assert_eq!(report.rows.len(), 63);
    for pair in report.rows.windows(2) {
        assert!(pair[0].total < pair[1].total);
    }
    for r in &report.rows {
        let exp = (r.labels.prefix_length - 48) as usize;
        assert_eq!(r.total, BigUint::one() << exp);
    }
}

#[test]
fn test_partial_coarse_block() {
    let report = report(&[pooled("a", "10.0.0.0/26")]);
    assert_eq!(row(&report, 22).free, BigUint::from(0u32));
    assert_eq!(row(&report, 22).used, 0);
    assert_eq!(row(&report, 23).free, BigUint::from(1u32));
    assert_eq!(row(&report, 26).free, BigUint::from(15u32));
    assert_eq!(row(&report, 26).used, 1);
}

#[test]
fn test_output_is_deterministic() {
    let pools = vec![
        pool(POOL_PREFIX),
        SubnetPoolRow {
            id: "0b0c1e2a-shared-v6".into(),
            ip_version: 6,
            min_prefixlen: 56,
            max_prefixlen: 64,
            ..pool("2001:db8:1::/56, 2001:db8::/56")
        },
    ];
    let subnets = vec![
        pooled("a", "10.0.1.0/24"),
        SubnetRow {
            subnetpool_id: Some("0b0c1e2a-shared-v6".into()),
            ..pooled("b", "2001:db8::/64")
        },
        pooled("c", "10.0.0.0/26"),
    ];
    let mut reversed_pools = pools.clone();
    reversed_pools.reverse();
    let mut reversed_subnets = subnets.clone();
    reversed_subnets.reverse();

    let opts = ReportOptions::default();
    let first = generate_from_rows(&pools, &subnets, &opts).unwrap();
    let second = generate_from_rows(&reversed_pools, &reversed_subnets, &opts).unwrap();
    assert_eq!(first, second);

    let avail = AvailabilitySeries::default();
    assert_eq!(
        render(&first, &subnets, &avail).unwrap(),
        render(&second, &reversed_subnets, &avail).unwrap()
    );
}
