// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::iptools::{AddressError, Prefix};
use std::{error, fmt};

/// A subnet pool whose stored bounds or prefixes cannot be reported on.
#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigurationError {
    /// min_prefixlen > max_prefixlen
    BoundsOrder { min: i64, max: i64 },
    /// max_prefixlen is wider than the address family allows
    BoundsExceedFamily { max: i64, bits: u8 },
    NegativeBound(i64),
    UnknownIpVersion(i64),
    /// declared prefix is of the other address family than the pool
    FamilyMismatch { prefix: Prefix, ip_version: u8 },
    /// declared prefix is longer than max_prefixlen: no length is achievable
    PrefixTooLong { prefix: Prefix, max: u8 },
    /// more prefix lengths than the configured series cap
    TooManyLengths { prefix: Prefix, lengths: usize, limit: usize },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::BoundsOrder { min, max } => {
                write!(f, "min_prefixlen {min} is greater than max_prefixlen {max}")
            }
            ConfigurationError::BoundsExceedFamily { max, bits } => {
                write!(f, "max_prefixlen {max} exceeds address width {bits}")
            }
            ConfigurationError::NegativeBound(val) => {
                write!(f, "negative prefix length bound {val}")
            }
            ConfigurationError::UnknownIpVersion(val) => {
                write!(f, "unknown ip_version {val}")
            }
            ConfigurationError::FamilyMismatch { prefix, ip_version } => {
                write!(f, "prefix {prefix} does not belong to an IPv{ip_version} pool")
            }
            ConfigurationError::PrefixTooLong { prefix, max } => {
                write!(f, "prefix {prefix} is longer than max_prefixlen {max}")
            }
            ConfigurationError::TooManyLengths { prefix, lengths, limit } => {
                write!(f, "prefix {prefix} spans {lengths} prefix lengths (limit {limit})")
            }
        }
    }
}

impl error::Error for ConfigurationError {}

/* ---------------------------------- */

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UsageError {
    /// malformed CIDR or IP; `context` names the offending row
    Parse {
        context: String,
        source: AddressError,
    },
    Configuration {
        pool_id: String,
        source: ConfigurationError,
    },
    /// snapshot could not be read or decoded
    Snapshot { path: String, reason: String },
}

impl UsageError {
    pub(crate) fn parse(context: impl Into<String>, source: AddressError) -> Self {
        UsageError::Parse {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn configuration(pool_id: impl Into<String>, source: ConfigurationError) -> Self {
        UsageError::Configuration {
            pool_id: pool_id.into(),
            source,
        }
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::Parse { context, source } => write!(f, "{context}: {source}"),
            UsageError::Configuration { pool_id, source } => {
                write!(f, "subnet pool {pool_id}: {source}")
            }
            UsageError::Snapshot { path, reason } => {
                write!(f, "cannot load snapshot '{path}': {reason}")
            }
        }
    }
}

impl error::Error for UsageError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            UsageError::Parse { source, .. } => Some(source),
            UsageError::Configuration { source, .. } => Some(source),
            UsageError::Snapshot { .. } => None,
        }
    }
}
