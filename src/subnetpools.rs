// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subnet pools: bounds validation and association of subnets to their pool.

use crate::{
    iptools::{IpFam, Prefix},
    snapshot::{SubnetPoolRow, SubnetRow},
    ConfigurationError, UsageError,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    cmp::max,
    collections::HashMap,
    ops::RangeInclusive,
};
use tracing::debug;

lazy_static! {
    static ref PREFIX_SEP: Regex = Regex::new(r"\s*,\s*").expect("Invalid Regex?");
}

impl SubnetPoolRow {
    /// Declared prefixes, split out of the stored comma-joined field.
    pub fn declared_prefixes(&self) -> Vec<&str> {
        match self.prefixes.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(joined) => PREFIX_SEP.split(joined).collect(),
        }
    }
}

/// Validated prefix length bounds of a subnet pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PoolBounds {
    pub fam: IpFam,
    pub min: u8,
    pub max: u8,
}

impl PoolBounds {
    /**
    Check `0 <= min <= max <= address bits` for the pool's IP version.

    ### Errors
    A [ConfigurationError] naming the first violated bound.
    */
    pub fn of(pool: &SubnetPoolRow) -> Result<Self, ConfigurationError> {
        let fam: IpFam = IpFam::from_version(pool.ip_version)
            .ok_or(ConfigurationError::UnknownIpVersion(pool.ip_version))?;
        let (min, max) = (pool.min_prefixlen, pool.max_prefixlen);

        if min < 0 || max < 0 {
            return Err(ConfigurationError::NegativeBound(min.min(max)));
        }
        if min > max {
            return Err(ConfigurationError::BoundsOrder { min, max });
        }
        if max > fam.bits() as i64 {
            return Err(ConfigurationError::BoundsExceedFamily {
                max,
                bits: fam.bits(),
            });
        }

        Ok(Self {
            fam,
            min: min as u8,
            max: max as u8,
        })
    }

    /**
    Prefix lengths achievable inside `prefix`: from the larger of `min` and
    the prefix's own length, up to `max`.

    Lengths shorter than the declared prefix are skipped, since a block
    cannot be larger than the prefix holding it.
    */
    pub fn lengths(&self, prefix: &Prefix) -> Result<RangeInclusive<u8>, ConfigurationError> {
        if prefix.family() != self.fam {
            return Err(ConfigurationError::FamilyMismatch {
                prefix: *prefix,
                ip_version: self.fam.version(),
            });
        }
        if prefix.len() > self.max {
            return Err(ConfigurationError::PrefixTooLong {
                prefix: *prefix,
                max: self.max,
            });
        }
        Ok(max(self.min, prefix.len())..=self.max)
    }
}

/* ---------------------------------- */

/// A subnet pool together with the prefixes of the subnets cut from it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWithSubnets<'a> {
    pub pool: &'a SubnetPoolRow,
    pub subnets: Vec<Prefix>,
}

/**
Bucket subnets by the pool they were allocated from.

Subnets without a pool are left out. Pools keep their input order; a pool
with no subnets gets an empty list.

### Errors
A single malformed pooled subnet CIDR fails the whole grouping: reporting
without it would overstate the free space of its pool.
*/
pub fn group_subnets<'a>(
    pools: &'a [SubnetPoolRow],
    subnets: &[SubnetRow],
) -> Result<Vec<PoolWithSubnets<'a>>, UsageError> {
    let mut by_pool: HashMap<&str, Vec<Prefix>> = HashMap::new();

    for subnet in subnets {
        let Some(pool_id) = subnet.pool_id() else {
            continue;
        };
        let prefix: Prefix = subnet
            .cidr
            .parse()
            .map_err(|e| UsageError::parse(format!("subnet {}", subnet.id), e))?;
        by_pool.entry(pool_id).or_default().push(prefix);
    }

    debug!(
        pools = pools.len(),
        pooled_subnets = by_pool.values().map(Vec::len).sum::<usize>(),
        "grouped subnets by pool"
    );

    Ok(pools
        .iter()
        .map(|pool| PoolWithSubnets {
            pool,
            subnets: by_pool.get(pool.id.as_str()).cloned().unwrap_or_default(),
        })
        .collect())
}

/* -------------------------------------------------------------------------- */
