// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static SLASH: &str = "/";

// mod.rs
pub(crate) static ERR_INVALID_CIDR: &str = "invalid CIDR";
pub(crate) static ERR_INVALID_IP: &str = "invalid IP address";
pub(crate) static ERR_RNG_ORDER: &str = "range start is greater than range end";
pub(crate) static ERR_MISMATCH: &str = "cannot mix IPv4 and IPv6 in range";
