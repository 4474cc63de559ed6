// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus gauges for subnets, subnet pool usage and IP availability.

use crate::{
    availability::AvailabilitySeries,
    report::{Report, UsageLabels},
    snapshot::SubnetRow,
};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use prometheus::{proto::MetricFamily, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use tracing::debug;

pub const NAMESPACE: &str = "openstack";
pub const SUBSYSTEM: &str = "neutron";

const SUBNET_LABELS: [&str; 7] = [
    "id",
    "cidr",
    "gateway_ip",
    "network_id",
    "project_id",
    "enable_dhcp",
    "dns_nameservers",
];

const USAGE_LABELS: [&str; 6] = [
    "ip_version",
    "prefix",
    "prefix_length",
    "project_id",
    "subnet_pool_id",
    "subnet_pool_name",
];

const AVAILABILITY_LABELS: [&str; 7] = [
    "network_id",
    "subnet_id",
    "project_id",
    "network_name",
    "subnet_name",
    "cidr",
    "ip_version",
];

/// `openstack_neutron_<name>`, with the bare name as help text.
fn opts(name: &str) -> Opts {
    Opts::new(name, name).namespace(NAMESPACE).subsystem(SUBSYSTEM)
}

/// Exposition values are floats; counts past 2^53 lose precision here and only here.
fn as_gauge_value(val: &BigUint) -> f64 {
    val.to_f64().unwrap_or(f64::INFINITY)
}

/**
All Neutron gauges of one reporting cycle, in a private [Registry].

Build a fresh instance per cycle: nothing is reset between observations.
*/
pub struct NeutronMetrics {
    registry: Registry,
    subnet: GaugeVec,
    subnets: Gauge,
    subnets_total: GaugeVec,
    subnets_free: GaugeVec,
    subnets_used: GaugeVec,
    ip_availabilities_used: GaugeVec,
    ip_availabilities_total: GaugeVec,
}

impl NeutronMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let metrics = Self {
            registry: Registry::new(),
            subnet: GaugeVec::new(opts("subnet"), &SUBNET_LABELS)?,
            subnets: Gauge::with_opts(opts("subnets"))?,
            subnets_total: GaugeVec::new(opts("subnets_total"), &USAGE_LABELS)?,
            subnets_free: GaugeVec::new(opts("subnets_free"), &USAGE_LABELS)?,
            subnets_used: GaugeVec::new(opts("subnets_used"), &USAGE_LABELS)?,
            ip_availabilities_used: GaugeVec::new(
                opts("network_ip_availabilities_used"),
                &AVAILABILITY_LABELS,
            )?,
            ip_availabilities_total: GaugeVec::new(
                opts("network_ip_availabilities_total"),
                &AVAILABILITY_LABELS,
            )?,
        };

        metrics.registry.register(Box::new(metrics.subnet.clone()))?;
        metrics.registry.register(Box::new(metrics.subnets.clone()))?;
        metrics.registry.register(Box::new(metrics.subnets_total.clone()))?;
        metrics.registry.register(Box::new(metrics.subnets_free.clone()))?;
        metrics.registry.register(Box::new(metrics.subnets_used.clone()))?;
        metrics.registry.register(Box::new(metrics.ip_availabilities_used.clone()))?;
        metrics.registry.register(Box::new(metrics.ip_availabilities_total.clone()))?;

        Ok(metrics)
    }

    /// One info series per subnet, plus the subnet count.
    pub fn observe_subnets(&self, subnets: &[SubnetRow]) {
        self.subnets.set(subnets.len() as f64);

        for s in subnets {
            let enable_dhcp: String = s.enable_dhcp.unwrap_or(false).to_string();
            self.subnet
                .with_label_values(&[
                    s.id.as_str(),
                    s.cidr.as_str(),
                    s.gateway_ip.as_deref().unwrap_or_default(),
                    s.network_id.as_str(),
                    s.project_id.as_deref().unwrap_or_default(),
                    enable_dhcp.as_str(),
                    s.dns_nameservers.as_deref().unwrap_or_default(),
                ])
                .set(1.0);
        }
    }

    pub fn observe_report(&self, report: &Report) {
        for row in &report.rows {
            let owned: [String; 6] = usage_label_values(&row.labels);
            let values: Vec<&str> = owned.iter().map(String::as_str).collect();
            self.subnets_total
                .with_label_values(&values)
                .set(as_gauge_value(&row.total));
            self.subnets_free
                .with_label_values(&values)
                .set(as_gauge_value(&row.free));
            self.subnets_used
                .with_label_values(&values)
                .set(row.used as f64);
        }
        debug!(
            rows = report.rows.len(),
            failed_pools = report.failures.len(),
            "observed subnet pool usage"
        );
    }

    pub fn observe_availability(&self, series: &AvailabilitySeries) {
        for used in &series.used {
            let version: String = used.labels.ip_version.to_string();
            let l = &used.labels;
            self.ip_availabilities_used
                .with_label_values(&[
                    l.network_id.as_str(),
                    l.subnet_id.as_str(),
                    l.project_id.as_str(),
                    l.network_name.as_str(),
                    l.subnet_name.as_str(),
                    l.cidr.as_str(),
                    version.as_str(),
                ])
                .set(used.allocation_count as f64);
        }
        for total in &series.totals {
            let version: String = total.labels.ip_version.to_string();
            let l = &total.labels;
            self.ip_availabilities_total
                .with_label_values(&[
                    l.network_id.as_str(),
                    l.subnet_id.as_str(),
                    l.project_id.as_str(),
                    l.network_name.as_str(),
                    l.subnet_name.as_str(),
                    l.cidr.as_str(),
                    version.as_str(),
                ])
                .set(as_gauge_value(&total.total));
        }
    }

    /// Families sorted by name, series by label values.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format.
    pub fn encode(&self) -> prometheus::Result<String> {
        TextEncoder::new().encode_to_string(&self.gather())
    }
}

/// Label values in [USAGE_LABELS] order.
fn usage_label_values(l: &UsageLabels) -> [String; 6] {
    [
        l.ip_version.to_string(),
        l.prefix.clone(),
        l.prefix_length.to_string(),
        l.project_id.clone(),
        l.subnet_pool_id.clone(),
        l.subnet_pool_name.clone(),
    ]
}

/// Observe everything of one cycle and encode it.
pub fn render(
    report: &Report,
    subnets: &[SubnetRow],
    availability: &AvailabilitySeries,
) -> prometheus::Result<String> {
    let metrics: NeutronMetrics = NeutronMetrics::new()?;
    metrics.observe_subnets(subnets);
    metrics.observe_report(report);
    metrics.observe_availability(availability);
    metrics.encode()
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        availability::{AvailabilityLabels, AvailabilityTotal, AvailabilityUsed},
        report::UsageRow,
    };
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_cycle() {
        let out = render(&Report::default(), &[], &AvailabilitySeries::default()).unwrap();
        assert_eq!(
            out,
            indoc! {r#"
                # HELP openstack_neutron_subnets subnets
                # TYPE openstack_neutron_subnets gauge
                openstack_neutron_subnets 0
            "#}
        );
    }

    #[test]
    fn test_usage_row() {
        let report = Report {
            rows: vec![UsageRow {
                labels: UsageLabels {
                    subnet_pool_id: "pool-a".into(),
                    prefix: "10.0.0.0/24".into(),
                    prefix_length: 26,
                    ip_version: 4,
                    project_id: "proj".into(),
                    subnet_pool_name: "pool".into(),
                },
                total: BigUint::from(4u8),
                free: BigUint::from(3u8),
                used: 1,
            }],
            failures: vec![],
        };
        let metrics = NeutronMetrics::new().unwrap();
        metrics.observe_report(&report);
        let out = metrics.encode().unwrap();
        assert!(out.contains(r#"openstack_neutron_subnets_free{ip_version="4",prefix="10.0.0.0/24",prefix_length="26",project_id="proj",subnet_pool_id="pool-a",subnet_pool_name="pool"} 3"#));
        assert!(out.contains(r#"openstack_neutron_subnets_total{ip_version="4",prefix="10.0.0.0/24",prefix_length="26",project_id="proj",subnet_pool_id="pool-a",subnet_pool_name="pool"} 4"#));
        assert!(out.contains(r#"openstack_neutron_subnets_used{ip_version="4",prefix="10.0.0.0/24",prefix_length="26",project_id="proj",subnet_pool_id="pool-a",subnet_pool_name="pool"} 1"#));
    }

    #[test]
    fn test_availability() {
        let labels = AvailabilityLabels {
            network_id: "net-1".into(),
            subnet_id: "sub-1".into(),
            project_id: "proj".into(),
            network_name: "private".into(),
            subnet_name: "private-subnet".into(),
            cidr: "10.0.0.0/26".into(),
            ip_version: 4,
        };
        let series = AvailabilitySeries {
            used: vec![AvailabilityUsed {
                labels: labels.clone(),
                allocation_count: 3,
            }],
            totals: vec![AvailabilityTotal {
                labels,
                total: BigUint::from(61u8),
            }],
        };
        let metrics = NeutronMetrics::new().unwrap();
        metrics.observe_availability(&series);
        assert_eq!(
            metrics.encode().unwrap(),
            indoc! {r#"
                # HELP openstack_neutron_network_ip_availabilities_total network_ip_availabilities_total
                # TYPE openstack_neutron_network_ip_availabilities_total gauge
                openstack_neutron_network_ip_availabilities_total{cidr="10.0.0.0/26",ip_version="4",network_id="net-1",network_name="private",project_id="proj",subnet_id="sub-1",subnet_name="private-subnet"} 61
                # HELP openstack_neutron_network_ip_availabilities_used network_ip_availabilities_used
                # TYPE openstack_neutron_network_ip_availabilities_used gauge
                openstack_neutron_network_ip_availabilities_used{cidr="10.0.0.0/26",ip_version="4",network_id="net-1",network_name="private",project_id="proj",subnet_id="sub-1",subnet_name="private-subnet"} 3
                # HELP openstack_neutron_subnets subnets
                # TYPE openstack_neutron_subnets gauge
                openstack_neutron_subnets 0
            "#}
        );
    }

    #[test]
    fn test_big_value_conversion() {
        assert_eq!(as_gauge_value(&BigUint::from(1024u32)), 1024.0);
        assert_eq!(as_gauge_value(&(BigUint::from(1u8) << 128usize)), 2f64.powi(128));
    }
}
