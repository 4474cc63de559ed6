// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Total, free and used block counts of one pool prefix at one prefix length.

use crate::iptools::{IpSet, Prefix};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::warn;

/// Number of `len`-length blocks that fit in `prefix`: `2^(len - prefix.len)`.
pub fn total_blocks(prefix: &Prefix, len: u8) -> BigUint {
    debug_assert!(len >= prefix.len());
    BigUint::one() << len.saturating_sub(prefix.len()) as usize
}

/**
What is left of a pool prefix once all its subnets are taken out,
as a minimal list of aligned blocks.

Compute it once per declared prefix and query [ResidualSpace::free_blocks]
for every prefix length.
*/
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResidualSpace {
    prefix: Prefix,
    blocks: Vec<Prefix>,
}

impl ResidualSpace {
    /**
    Subtract `subnets` from `prefix`.

    Subnets outside the prefix, or of the other family, fall out of the set
    subtraction on their own. A subnet shorter than the prefix that covers
    it breaks the pool invariant and is skipped.
    */
    pub fn new(prefix: &Prefix, subnets: &[Prefix]) -> Self {
        let mut set: IpSet = IpSet::from_prefix(prefix);

        for subnet in subnets {
            if subnet.len() < prefix.len() && subnet.overlaps(prefix) {
                warn!(
                    pool_prefix = %prefix,
                    subnet = %subnet,
                    "subnet is larger than its pool prefix, not removing it"
                );
                continue;
            }
            set.remove(subnet);
        }

        Self {
            prefix: *prefix,
            blocks: set.prefixes(),
        }
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Unallocated blocks, in address order.
    pub fn blocks(&self) -> &[Prefix] {
        &self.blocks
    }

    /**
    Count `len`-length blocks that are entirely unallocated.

    Residual blocks longer than `len` contribute nothing, so a coarse block
    which is only partly allocated is not free at that length.
    */
    pub fn free_blocks(&self, len: u8) -> BigUint {
        self.blocks
            .iter()
            .filter(|b| b.len() <= len)
            .fold(BigUint::zero(), |acc, b| {
                acc + (BigUint::one() << (len - b.len()) as usize)
            })
    }
}

/// Free `len`-length blocks of `prefix` after removing `subnets`.
pub fn free_blocks(prefix: &Prefix, subnets: &[Prefix], len: u8) -> BigUint {
    ResidualSpace::new(prefix, subnets).free_blocks(len)
}

/**
Count subnets of exactly `len` bits that overlap `prefix`.

Only the exact length counts: a /26 is used at 26, never at 24 or 28. The
test is overlap rather than containment.
*/
pub fn used_blocks(subnets: &[Prefix], prefix: &Prefix, len: u8) -> u64 {
    subnets
        .iter()
        .filter(|s| s.len() == len && prefix.overlaps(s))
        .count() as u64
}

/* -------------------------------------------------------------------------- */
