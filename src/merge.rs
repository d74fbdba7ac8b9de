//! History merger: folds a probe outcome into a service record

use crate::descriptor::ResolvedService;
use crate::probe::ProbeOutcome;
use crate::status::{Sample, ServiceRecord, ServiceStatus, StatusDocument, Timestamp};
use std::collections::HashMap;
use tracing::debug;

/// Record for a service that has never been checked.
pub fn placeholder_record(service: &ResolvedService) -> ServiceRecord {
    ServiceRecord {
        name: service.name.clone().unwrap_or_else(|| service.url.clone()),
        url: service.url.clone(),
        status: ServiceStatus::Unknown,
        status_code: None,
        response_time_ms: None,
        last_checked: None,
        history: Vec::new(),
        uptime_percent: 0,
    }
}

/// Share of up samples as a whole percentage, rounding halves up.
/// An empty history is 0%.
pub fn uptime_percent(history: &[Sample]) -> u8 {
    let total = history.len();
    if total == 0 {
        return 0;
    }

    let up = history.iter().filter(|s| s.status.is_up()).count();
    ((200 * up + total) / (2 * total)) as u8
}

/// Merge `outcome` taken at `now` into the prior record for `service`.
pub fn merge(
    prior: Option<ServiceRecord>,
    service: &ResolvedService,
    outcome: &ProbeOutcome,
    now: Timestamp,
) -> ServiceRecord {
    let mut record = prior.unwrap_or_else(|| placeholder_record(service));

    record.history.insert(
        0,
        Sample {
            ts: now,
            status: outcome.status,
            status_code: outcome.status_code,
            response_time_ms: outcome.response_time_ms,
        },
    );
    record.history.truncate(service.keep_history);

    record.status = outcome.status;
    record.status_code = outcome.status_code;
    record.response_time_ms = outcome.response_time_ms;
    record.last_checked = Some(now);
    if let Some(name) = &service.name {
        record.name = name.clone();
    }
    record.url = service.url.clone();
    record.uptime_percent = uptime_percent(&record.history);

    debug!(
        "Merged {} sample for {}: {} samples retained, {}% uptime",
        outcome.status,
        record.url,
        record.history.len(),
        record.uptime_percent
    );

    record
}

/// Prior-run records keyed by url, built once per run.
#[derive(Debug, Default)]
pub struct PriorRecords {
    by_url: HashMap<String, ServiceRecord>,
}

impl PriorRecords {
    pub fn from_document(document: StatusDocument) -> Self {
        let by_url = document
            .services
            .into_iter()
            .map(|record| (record.url.clone(), record))
            .collect();

        Self { by_url }
    }

    /// Remove and return the record for `url`, if the last run had one.
    pub fn take(&mut self, url: &str) -> Option<ServiceRecord> {
        self.by_url.remove(url)
    }

    /// Records not claimed by any configured service.
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }
}
