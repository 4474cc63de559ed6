// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{
    error::Error,
    io::{self, Write},
    process::ExitCode,
};
use subnetpool_usage::{
    config::ReportConfig, generate_from_rows, render, AvailabilitySeries, Report, Snapshot,
};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "subnet usage report failed");
            ExitCode::FAILURE
        }
    }
}

/// One reporting cycle. `Ok(false)` when a whole series had to be left out.
fn run() -> Result<bool, Box<dyn Error>> {
    let cfg: ReportConfig = ReportConfig::from_env()?;
    let snapshot: Snapshot = Snapshot::load(&cfg.snapshot)?;
    let mut complete: bool = true;

    let report: Report =
        match generate_from_rows(&snapshot.subnetpools, &snapshot.subnets, &cfg.report_options()) {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "cannot group subnets by pool, skipping pool usage");
                complete = false;
                Report::default()
            }
        };
    if !report.failures.is_empty() {
        warn!(
            failed_pools = report.failures.len(),
            "some subnet pools were left out of the report"
        );
    }

    let availability: AvailabilitySeries = match AvailabilitySeries::new(
        &snapshot.network_ip_availabilities,
        &snapshot.ip_availability_ranges,
    ) {
        Ok(series) => series,
        Err(err) => {
            error!(error = %err, "cannot size allocation pools, skipping IP availability");
            complete = false;
            AvailabilitySeries::default()
        }
    };

    let text: String = render(&report, &snapshot.subnets, &availability)?;
    io::stdout().lock().write_all(text.as_bytes())?;

    info!(
        subnetpools = snapshot.subnetpools.len(),
        subnets = snapshot.subnets.len(),
        usage_rows = report.rows.len(),
        "report written"
    );
    Ok(complete)
}
