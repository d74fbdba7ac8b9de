//! Run orchestration: probe every configured service and rewrite the status document

use crate::config::Config;
use crate::descriptor::{ResolvedService, load_descriptors, resolve_all};
use crate::errors::{PingerError, Result};
use crate::merge::{PriorRecords, merge};
use crate::probe::{HttpTransport, ProbeOutcome, Transport, probe};
use crate::status::{StatusDocument, Timestamp};
use crate::store::{load_document, save_document};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

/// Drives a single check run.
pub struct UptimeRunner {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl UptimeRunner {
    /// Create a runner that probes over HTTP
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a runner with a custom transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate().map_err(PingerError::Config)?;
        Ok(Self { config, transport })
    }

    /// Load inputs, probe every service, and persist the new document.
    ///
    /// Only a bad service list or a failed write is an error.
    pub async fn run_once(&self) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        self.run_inner()
            .instrument(info_span!("run", run_id = %run_id))
            .await
    }

    async fn run_inner(&self) -> Result<RunSummary> {
        let descriptors = load_descriptors(&self.config.services_file).await?;
        let services = resolve_all(&descriptors, &self.config);
        let prior = load_document(&self.config.status_file).await;
        let now = Utc::now();

        info!("Checking {} services", services.len());

        let (document, summary) = self.check_services(&services, prior, now).await;
        save_document(&self.config.status_file, &document).await?;

        info!(
            "Wrote statuses to {} - {} up, {} down, {} dropped",
            self.config.status_file.display(),
            summary.up,
            summary.down,
            summary.dropped
        );

        Ok(summary)
    }

    /// Probe `services` and merge the outcomes into `prior`.
    ///
    /// Probes run concurrently but results are assembled in `services`
    /// order. Prior records whose url is not in `services` are dropped.
    pub async fn check_services(
        &self,
        services: &[ResolvedService],
        prior: StatusDocument,
        now: Timestamp,
    ) -> (StatusDocument, RunSummary) {
        let transport = self.transport.as_ref();

        let outcomes: Vec<ProbeOutcome> = stream::iter(
            services
                .iter()
                .map(|service| probe(transport, &service.url, service.timeout)),
        )
        .buffered(self.config.max_concurrency)
        .collect()
        .await;

        let mut prior = PriorRecords::from_document(prior);
        let mut summary = RunSummary::default();
        let mut records = Vec::with_capacity(services.len());

        for (service, outcome) in services.iter().zip(&outcomes) {
            let record = merge(prior.take(&service.url), service, outcome, now);
            summary.record(outcome);
            records.push(record);
        }

        summary.dropped = prior.len();
        if summary.dropped > 0 {
            debug!("Dropping {} records no longer configured", summary.dropped);
        }

        let document = StatusDocument {
            updated_at: Some(now),
            services: records,
        };

        (document, summary)
    }
}

/// Counts from one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub up: usize,
    pub down: usize,
    pub dropped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &ProbeOutcome) {
        self.checked += 1;
        if outcome.is_up() {
            self.up += 1;
        } else {
            self.down += 1;
        }
    }
}
