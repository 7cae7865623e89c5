//! Collection of UPS metrics from NUT servers.

use crate::config::ExporterConfig;
use crate::error::Result;
use crate::metrics::data::MetricDescriptor;
use crate::metrics::registry;
use crate::metrics::traits::ObservationSink;
use crate::metrics::translate::translate;
use crate::nut::NutClient;
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

/// Outcome counters of one collection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    /// Hosts whose UPS list was read
    pub hosts_polled: usize,
    /// Hosts that could not be reached or listed
    pub hosts_failed: usize,
    /// UPSs whose variables were translated
    pub upss_polled: usize,
    /// UPSs whose variables could not be read
    pub upss_failed: usize,
}

/// Polls NUT servers and feeds their UPS variables to a sink.
///
/// Every host gets its own connection, opened at the start of the pass and
/// closed once its UPSs are done. A failure only affects the host or UPS it
/// happened on; the pass always moves on to the next unit of work.
#[derive(Debug, Clone)]
pub struct NutCollector {
    hosts: Vec<String>,
    timeout: Duration,
}

impl NutCollector {
    /// Create a collector for the hosts in `config`.
    pub fn new(config: &ExporterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hosts: config.hosts.clone(),
            timeout: config.timeout(),
        })
    }

    /// Hosts polled by [`collect`](NutCollector::collect).
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Every metric this collector can produce.
    pub fn describe_all() -> &'static [MetricDescriptor] {
        registry::descriptors()
    }

    /// Run one collection pass over the configured hosts.
    pub async fn collect<K>(&self, sink: &mut K) -> Result<CollectionSummary>
    where
        K: ObservationSink + ?Sized,
    {
        self.collect_hosts(&self.hosts, sink).await
    }

    /// Run one collection pass over `hosts`.
    ///
    /// Only a failing sink aborts the pass; connection and protocol errors are
    /// logged and counted in the returned summary.
    pub async fn collect_hosts<K>(&self, hosts: &[String], sink: &mut K) -> Result<CollectionSummary>
    where
        K: ObservationSink + ?Sized,
    {
        sink.describe(Self::describe_all())?;

        let mut summary = CollectionSummary::default();
        for host in hosts {
            let client = match NutClient::connect(host, self.timeout).await {
                Ok(client) => client,
                Err(e) => {
                    warn!("Error connecting to NUT server {}: {}", host, e);
                    summary.hosts_failed += 1;
                    continue;
                }
            };
            self.collect_client(host, client, sink, &mut summary).await?;
        }

        info!(
            "Collection pass finished: {} hosts ok, {} failed; {} UPSs ok, {} failed",
            summary.hosts_polled, summary.hosts_failed, summary.upss_polled, summary.upss_failed
        );
        Ok(summary)
    }

    /// Poll every UPS behind an open connection, then close it.
    pub async fn collect_client<S, K>(
        &self,
        host: &str,
        mut client: NutClient<S>,
        sink: &mut K,
        summary: &mut CollectionSummary,
    ) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        K: ObservationSink + ?Sized,
    {
        let upss = match client.list_upss().await {
            Ok(upss) => upss,
            Err(e) => {
                warn!("Error getting list of UPSs from {}: {}", host, e);
                summary.hosts_failed += 1;
                close(host, client).await;
                return Ok(());
            }
        };
        summary.hosts_polled += 1;
        debug!("{} serves {} UPSs", host, upss.len());

        let mut outcome = Ok(());
        for (index, ups) in upss.iter().enumerate() {
            let vars = match client.list_variables(ups).await {
                Ok(vars) => vars,
                Err(e) => {
                    warn!("Error reading variables of {}@{}: {}", ups, host, e);
                    summary.upss_failed += 1;
                    if e.is_fatal_to_connection() {
                        let skipped = upss.len() - index - 1;
                        if skipped > 0 {
                            warn!("Skipping {} remaining UPSs on {}", skipped, host);
                            summary.upss_failed += skipped;
                        }
                        break;
                    }
                    continue;
                }
            };

            summary.upss_polled += 1;
            outcome = translate(&vars)
                .into_iter()
                .try_for_each(|observation| sink.observe(observation));
            if outcome.is_err() {
                break;
            }
        }

        close(host, client).await;
        outcome
    }
}

async fn close<S>(host: &str, client: NutClient<S>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Err(e) = client.close().await {
        debug!("Error closing connection to {}: {}", host, e);
    }
}
