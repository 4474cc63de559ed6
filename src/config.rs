// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings of the report binary, read from `SUBNETPOOL_USAGE_*` environment variables.

use crate::report::{ReportOptions, DEFAULT_MAX_LENGTHS_PER_PREFIX};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};

pub const ENV_PREFIX: &str = "SUBNETPOOL_USAGE";

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct ReportConfig {
    /// JSON snapshot of the Neutron tables
    pub snapshot: PathBuf,
    #[serde(default = "default_max_lengths")]
    pub max_lengths_per_prefix: usize,
}

fn default_max_lengths() -> usize {
    DEFAULT_MAX_LENGTHS_PER_PREFIX
}

impl ReportConfig {
    /**
    Read the process environment.

    ### Errors
    [ConfigError] if `SUBNETPOOL_USAGE_SNAPSHOT` is unset or a value does not
    deserialize.
    */
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::build(Environment::with_prefix(ENV_PREFIX))
    }

    /// As [ReportConfig::from_env], but over the given variables instead.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::build(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn build(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            max_lengths_per_prefix: self.max_lengths_per_prefix,
        }
    }
}

/* -------------------------------------------------------------------------- */
