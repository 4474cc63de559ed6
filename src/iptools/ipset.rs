// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    structs::{Prefix, Range},
    IPV6_BITS,
};
use num_bigint::BigUint;

/**
A set of IP addresses with exact union and subtraction.

Internally the set is a sorted list of disjoint, non-adjacent inclusive
ranges (IPv4 ranges sort before IPv6 ones). [IpSet::prefixes] decomposes it
into the unique minimal list of aligned prefixes covering exactly the set.

Operations are idempotent: inserting or removing the same prefix twice has
no further effect, and removing a prefix that does not overlap the set is a
no-op (this includes prefixes of the other IP family).
*/
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IpSet {
    ranges: Vec<Range>,
}

impl IpSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set containing exactly the addresses of `prefix`.
    pub fn from_prefix(prefix: &Prefix) -> Self {
        Self {
            ranges: vec![prefix.to_range()],
        }
    }

    /// Add all addresses of `prefix` to the set.
    pub fn insert(&mut self, prefix: &Prefix) {
        self.ranges.push(prefix.to_range());
        self.ranges.sort_by_key(|r| r.cmp_key());
        self.ranges = merge_ranges(&self.ranges);
    }

    /// Remove all addresses of `prefix` from the set.
    pub fn remove(&mut self, prefix: &Prefix) {
        let cut: Range = prefix.to_range();
        let mut out: Vec<Range> = Vec::with_capacity(self.ranges.len() + 1);

        for r in self.ranges.iter().copied() {
            if !r.overlaps(&cut) {
                out.push(r);
                continue;
            }
            // cut.beg > r.beg >= 0 and cut.end < r.end <= MAX, so no wrapping
            if r.beg < cut.beg {
                out.push(Range {
                    fam: r.fam,
                    beg: r.beg,
                    end: cut.beg - 1,
                });
            }
            if r.end > cut.end {
                out.push(Range {
                    fam: r.fam,
                    beg: cut.end + 1,
                    end: r.end,
                });
            }
        }
        self.ranges = out;
    }

    /// True if every address of `prefix` is in the set.
    pub fn contains(&self, prefix: &Prefix) -> bool {
        let want: Range = prefix.to_range();
        self.ranges
            .iter()
            .any(|r| r.fam == want.fam && r.beg <= want.beg && want.end <= r.end)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of addresses in the set.
    pub fn size(&self) -> BigUint {
        self.ranges.iter().map(Range::size).sum()
    }

    /// Minimal, canonical decomposition of the set into aligned prefixes.
    pub fn prefixes(&self) -> Vec<Prefix> {
        let mut out: Vec<Prefix> = Vec::new();
        for r in self.ranges.iter().copied() {
            out.extend(range_to_prefixes(r));
        }
        out
    }
}

impl From<&[Prefix]> for IpSet {
    fn from(prefixes: &[Prefix]) -> Self {
        let mut ranges: Vec<Range> = prefixes.iter().map(Prefix::to_range).collect();
        ranges.sort_by_key(|r| r.cmp_key());
        Self {
            ranges: merge_ranges(&ranges),
        }
    }
}

/* ---------------------------------- */

/// Merge overlapping/adjacent ranges within each IP family. Input must be sorted.
#[inline]
fn merge_ranges(sorted: &[Range]) -> Vec<Range> {
    let mut out: Vec<Range> = Vec::with_capacity(sorted.len());
    for r in sorted.iter().copied() {
        if let Some(last) = out.last_mut() {
            // overlap or adjacency?
            if last.fam == r.fam && r.beg <= last.end.saturating_add(1) {
                if r.end > last.end {
                    last.end = r.end;
                }
                continue;
            }
        }
        out.push(r);
    }
    out
}

/// Decompose an inclusive range into the minimal list of aligned prefixes.
fn range_to_prefixes(r: Range) -> Vec<Prefix> {
    let bits: u8 = r.fam.bits();
    let mut start: u128 = r.beg;
    let mut out: Vec<Prefix> = Vec::new();

    loop {
        // Largest block aligned at 'start'. trailing_zeros(0) is 128.
        let align_host: u8 = (start.trailing_zeros() as u8).min(bits);

        // Largest block that fits in what is left. Only the whole v6
        // space has 2^128 addresses left, which does not fit in a u128.
        let fit_host: u8 = match (r.end - start).checked_add(1) {
            Some(remaining) => floor_log2_u128(remaining),
            None => IPV6_BITS,
        };

        let host: u8 = align_host.min(fit_host);
        out.push(Prefix::from_int(r.fam, start, bits - host));

        let span: u128 = if host >= IPV6_BITS {
            u128::MAX
        } else {
            (1u128 << host) - 1
        };
        let last: u128 = start + span;
        if last >= r.end {
            break;
        }
        start = last + 1;
    }

    out
}

/// floor(log2(x)) for x>=1, returns in [0..127]
#[inline]
fn floor_log2_u128(x: u128) -> u8 {
    debug_assert!(x >= 1);
    127u8.saturating_sub(x.leading_zeros() as u8)
}

/* -------------------------------------------------------------------------- */
