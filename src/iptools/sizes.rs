// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{structs::Prefix, AddressError};
use num_bigint::BigUint;
use std::net::IpAddr;

/**
Total number of addresses in a CIDR: `2^(family bits - prefix length)`.

The result is exact for any prefix, including `::/0`.
*/
pub fn cidr_size(cidr: impl AsRef<str>) -> Result<BigUint, AddressError> {
    let prefix: Prefix = cidr.as_ref().parse()?;
    Ok(prefix.size())
}

/**
Inclusive size of an IP range, `last - first + 1`.

Both endpoints are mapped into the 128-bit address space (IPv4 addresses
become IPv4-mapped IPv6) before subtracting.

### Errors
- [AddressError::InvalidIp] if either endpoint does not parse
- [AddressError::Mismatch] if the endpoints are of different families
- [AddressError::RangeOrder] if `last < first`
*/
pub fn ip_range_size(
    first: impl AsRef<str>,
    last: impl AsRef<str>,
) -> Result<BigUint, AddressError> {
    let beg: IpAddr = parse_ip(first.as_ref())?;
    let end: IpAddr = parse_ip(last.as_ref())?;

    if beg.is_ipv4() != end.is_ipv4() {
        return Err(AddressError::Mismatch(beg, end));
    }

    let (beg_int, end_int) = (to_mapped_int(beg), to_mapped_int(end));
    if end_int < beg_int {
        return Err(AddressError::RangeOrder(beg, end));
    }

    Ok(BigUint::from(end_int - beg_int) + 1u8)
}

fn parse_ip(s: &str) -> Result<IpAddr, AddressError> {
    s.trim()
        .parse::<IpAddr>()
        .map_err(|_| AddressError::InvalidIp(s.to_string()))
}

#[inline]
fn to_mapped_int(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(a) => a.to_ipv6_mapped().into(),
        IpAddr::V6(a) => a.into(),
    }
}

/* -------------------------------------------------------------------------- */
