// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{strings::*, AddressError, IPV4_BITS, IPV6_BITS};
use ipnet::IpNet;
use num_bigint::BigUint;
use num_traits::One;
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

/// IP address family
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum IpFam {
    V4,
    V6,
}

impl IpFam {
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => IpFam::V4,
            IpAddr::V6(_) => IpFam::V6,
        }
    }

    /// Width of the address space: 32 or 128.
    pub fn bits(self) -> u8 {
        match self {
            IpFam::V4 => IPV4_BITS,
            IpFam::V6 => IPV6_BITS,
        }
    }

    /// Numeric IP version as stored by Neutron (4 or 6).
    pub fn version(self) -> u8 {
        match self {
            IpFam::V4 => 4,
            IpFam::V6 => 6,
        }
    }

    pub fn from_version(version: i64) -> Option<Self> {
        match version {
            4 => Some(IpFam::V4),
            6 => Some(IpFam::V6),
            _ => None,
        }
    }
}

impl fmt::Display for IpFam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version())
    }
}

/* ---------------------------------- */

/// Inclusive range of IP addresses within a single family.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Range {
    pub fam: IpFam,
    pub beg: u128,
    /// inclusive
    pub end: u128,
}

impl Range {
    pub fn cmp_key(&self) -> (IpFam, u128, u128) {
        (self.fam, self.beg, self.end)
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        self.fam == other.fam && self.beg <= other.end && other.beg <= self.end
    }

    /// Number of addresses in the range. Exact, even for the whole v6 space.
    pub fn size(&self) -> BigUint {
        BigUint::from(self.end - self.beg) + 1u8
    }
}

/* ---------------------------------- */

/**
A canonical IP prefix: network address plus prefix length.

Host bits are always masked off, so two prefixes compare equal iff they
denote the same block of addresses.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Prefix {
    /// network address
    addr: IpAddr,
    /// **v4**: `0..=32`, **v6**: `0..=128`
    len: u8,
}

impl Prefix {
    /// Build a prefix from any address inside it. Host bits are masked off.
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, AddressError> {
        IpNet::new(addr, len)
            .map(Prefix::from)
            .map_err(|_| AddressError::InvalidCidr(format!("{addr}{SLASH}{len}")))
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn family(&self) -> IpFam {
        IpFam::of(&self.addr)
    }

    pub fn ip_version(&self) -> u8 {
        self.family().version()
    }

    pub fn host_bits(&self) -> u8 {
        self.family().bits() - self.len
    }

    /// Number of addresses covered by this prefix (`2^host_bits`).
    pub fn size(&self) -> BigUint {
        BigUint::one() << self.host_bits() as usize
    }

    /// True if both prefixes share at least one address.
    pub fn overlaps(&self, other: &Prefix) -> bool {
        self.to_range().overlaps(&other.to_range())
    }

    /// True if `other` lies entirely within `self`.
    pub fn contains(&self, other: &Prefix) -> bool {
        let (outer, inner) = (self.to_range(), other.to_range());
        outer.fam == inner.fam && outer.beg <= inner.beg && inner.end <= outer.end
    }

    pub(crate) fn to_range(&self) -> Range {
        let beg: u128 = ip_to_int(self.addr);
        let host: u8 = self.host_bits();
        let span: u128 = if host >= IPV6_BITS {
            u128::MAX
        } else {
            (1u128 << host) - 1
        };
        Range {
            fam: self.family(),
            beg,
            end: beg | span,
        }
    }

    /// Construct from an already aligned integer network address.
    pub(crate) fn from_int(fam: IpFam, net: u128, len: u8) -> Self {
        Prefix {
            addr: int_to_ip(fam, net),
            len,
        }
    }
}

impl From<IpNet> for Prefix {
    fn from(net: IpNet) -> Self {
        let net: IpNet = net.trunc();
        Prefix {
            addr: net.addr(),
            len: net.prefix_len(),
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SLASH}{}", self.addr, self.len)
    }
}

impl FromStr for Prefix {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<IpNet>()
            .map(Prefix::from)
            .map_err(|_| AddressError::InvalidCidr(s.to_string()))
    }
}

/* ---------------------------------- */

#[inline]
pub(crate) fn ip_to_int(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(a) => u32::from(a) as u128,
        IpAddr::V6(a) => u128::from(a),
    }
}

#[inline]
pub(crate) fn int_to_ip(fam: IpFam, v: u128) -> IpAddr {
    match fam {
        IpFam::V4 => IpAddr::V4(Ipv4Addr::from(v as u32)),
        IpFam::V6 => IpAddr::V6(Ipv6Addr::from(v)),
    }
}

/* -------------------------------------------------------------------------- */
