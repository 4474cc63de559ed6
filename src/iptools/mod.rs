// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exact IP prefix parsing, address-space sizes and canonical IP sets.

mod ipset;
mod sizes;
mod strings;
mod structs;

use std::{error, fmt, net::IpAddr};
use strings::*;

pub use ipset::IpSet;
pub use sizes::{cidr_size, ip_range_size};
pub use structs::{IpFam, Prefix};

pub(crate) const IPV4_BITS: u8 = 32;
pub(crate) const IPV6_BITS: u8 = 128;

#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// malformed CIDR literal
    InvalidCidr(String),
    /// malformed IP literal
    InvalidIp(String),
    /// inclusive range with last < first
    RangeOrder(IpAddr, IpAddr),
    /// start and end are not the same IP family (v4 vs v6).
    Mismatch(IpAddr, IpAddr),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::InvalidCidr(cidr) => {
                write!(f, "{ERR_INVALID_CIDR}: '{cidr}'")
            }
            AddressError::InvalidIp(ip) => {
                write!(f, "{ERR_INVALID_IP}: '{ip}'")
            }
            AddressError::RangeOrder(beg, end) => {
                write!(f, "{ERR_RNG_ORDER} ({beg} > {end})")
            }
            AddressError::Mismatch(a, b) => {
                write!(f, "{ERR_MISMATCH}: {a} - {b}")
            }
        }
    }
}

impl error::Error for AddressError {}
