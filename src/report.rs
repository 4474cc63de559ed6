// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subnet pool usage report: total/free/used for every pool prefix and length.

use crate::{
    counters::{total_blocks, used_blocks, ResidualSpace},
    iptools::Prefix,
    snapshot::{SubnetPoolRow, SubnetRow},
    subnetpools::{group_subnets, PoolBounds, PoolWithSubnets},
    ConfigurationError, UsageError,
};
use num_bigint::BigUint;
use tracing::{debug, warn};

/// Default cap on prefix lengths reported per declared pool prefix.
pub const DEFAULT_MAX_LENGTHS_PER_PREFIX: usize = 64;

/// Labels identifying one (pool, prefix, length) series.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UsageLabels {
    pub subnet_pool_id: String,
    pub prefix: String,
    pub prefix_length: u8,
    pub ip_version: u8,
    pub project_id: String,
    pub subnet_pool_name: String,
}

/// Block counts of one declared prefix at one prefix length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UsageRow {
    pub labels: UsageLabels,
    pub total: BigUint,
    pub free: BigUint,
    pub used: u64,
}

/// A pool left out of the report, and why.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolFailure {
    pub pool_id: String,
    pub error: UsageError,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    /// sorted by labels
    pub rows: Vec<UsageRow>,
    pub failures: Vec<PoolFailure>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReportOptions {
    pub max_lengths_per_prefix: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_lengths_per_prefix: DEFAULT_MAX_LENGTHS_PER_PREFIX,
        }
    }
}

/**
Usage rows of a single pool, in declared prefix order then by length.

### Errors
Any malformed declared prefix or invalid bound fails the whole pool; no
partial rows are returned.
*/
pub fn pool_usage(
    entry: &PoolWithSubnets<'_>,
    opts: &ReportOptions,
) -> Result<Vec<UsageRow>, UsageError> {
    let pool: &SubnetPoolRow = entry.pool;
    let bounds: PoolBounds =
        PoolBounds::of(pool).map_err(|e| UsageError::configuration(&pool.id, e))?;

    let mut rows: Vec<UsageRow> = Vec::new();

    for declared in pool.declared_prefixes() {
        let prefix: Prefix = declared
            .parse()
            .map_err(|e| UsageError::parse(format!("subnet pool {}", pool.id), e))?;
        let lengths = bounds
            .lengths(&prefix)
            .map_err(|e| UsageError::configuration(&pool.id, e))?;

        if lengths.len() > opts.max_lengths_per_prefix {
            return Err(UsageError::configuration(
                &pool.id,
                ConfigurationError::TooManyLengths {
                    prefix,
                    lengths: lengths.len(),
                    limit: opts.max_lengths_per_prefix,
                },
            ));
        }

        let space: ResidualSpace = ResidualSpace::new(&prefix, &entry.subnets);
        debug!(
            pool_id = %pool.id,
            prefix = %prefix,
            free_blocks = space.blocks().len(),
            "computed residual space"
        );

        for len in lengths {
            rows.push(UsageRow {
                labels: UsageLabels {
                    subnet_pool_id: pool.id.clone(),
                    prefix: prefix.to_string(),
                    prefix_length: len,
                    ip_version: bounds.fam.version(),
                    project_id: pool.project_id.clone().unwrap_or_default(),
                    subnet_pool_name: pool.name.clone().unwrap_or_default(),
                },
                total: total_blocks(&prefix, len),
                free: space.free_blocks(len),
                used: used_blocks(&entry.subnets, &prefix, len),
            });
        }
    }

    Ok(rows)
}

/**
Report on every pool. A failing pool is logged, recorded in
[Report::failures] and left out; the other pools are unaffected.
*/
pub fn generate(pools: &[PoolWithSubnets<'_>], opts: &ReportOptions) -> Report {
    let mut report: Report = Report::default();

    for entry in pools {
        match pool_usage(entry, opts) {
            Ok(rows) => report.rows.extend(rows),
            Err(error) => {
                warn!(pool_id = %entry.pool.id, error = %error, "omitting subnet pool from report");
                report.failures.push(PoolFailure {
                    pool_id: entry.pool.id.clone(),
                    error,
                });
            }
        }
    }

    report.rows.sort_by(|a, b| a.labels.cmp(&b.labels));
    report
}

/**
Group `subnets` by pool and report on all `pools`.

### Errors
Only a malformed pooled subnet fails the whole report; see [group_subnets].
*/
pub fn generate_from_rows(
    pools: &[SubnetPoolRow],
    subnets: &[SubnetRow],
    opts: &ReportOptions,
) -> Result<Report, UsageError> {
    let grouped: Vec<PoolWithSubnets<'_>> = group_subnets(pools, subnets)?;
    Ok(generate(&grouped, opts))
}

/* -------------------------------------------------------------------------- */
