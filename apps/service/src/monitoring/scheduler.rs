use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use tracing::{error, info, warn};

use crate::alert::{Alert, Notifier};
use crate::config::Config;
use crate::rotation;

use super::checker::HttpChecker;
use super::rules::StatusRules;
use super::types::CheckResult;

/// Re-notification policy for endpoints that keep failing.
#[derive(Debug, Clone, Copy)]
pub enum ResendPolicy {
    /// A fresh alert on every failing cycle.
    EveryCycle,
    /// Repeat alerts for the same endpoint are suppressed until the
    /// interval has elapsed; recovery clears the state.
    After(Duration),
}

struct AlertState {
    last_alerted: Instant,
}

/// The monitoring loop: probes every endpoint in order, alerts on failures,
/// sleeps, repeats. Strictly sequential; one stuck request stalls the cycle
/// until its timeout elapses.
pub struct Scheduler {
    endpoints: Vec<String>,
    rules: StatusRules,
    checker: HttpChecker,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    resend: ResendPolicy,
    log_directory: PathBuf,
    alerted: HashMap<String, AlertState>,
}

impl Scheduler {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let resend = match config.resend_interval_seconds {
            Some(seconds) => ResendPolicy::After(Duration::from_secs(seconds)),
            None => ResendPolicy::EveryCycle,
        };

        Ok(Self {
            endpoints: config.endpoints.clone(),
            rules: StatusRules::new(config.status_overrides.clone()),
            checker: HttpChecker::new(config.probe_timeout_seconds)?,
            notifier,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            resend,
            log_directory: config.log_directory.clone(),
            alerted: HashMap::new(),
        })
    }

    /// Check every endpoint once, alerting where the policy says one is due.
    pub async fn run_cycle(&mut self) -> Vec<CheckResult> {
        let endpoints = self.endpoints.clone();
        let mut results = Vec::with_capacity(endpoints.len());

        for url in &endpoints {
            let expected = self.rules.expected_status_for(url);
            let result = self.checker.check(url, expected).await;

            if result.passed {
                self.alerted.remove(url);
            } else {
                warn!("Service check failed: {url} - Expected HTTP {expected} not received.");

                if self.should_alert(url) {
                    let alert = Alert::service_check_failed(url, expected);
                    if let Err(e) = self.notifier.send(&alert).await {
                        // One failed notification must not end monitoring.
                        error!("Failed to send alert for {url}: {e}");
                    }
                    self.alerted.insert(url.clone(), AlertState { last_alerted: Instant::now() });
                }
            }

            results.push(result);
        }

        results
    }

    fn should_alert(&self, url: &str) -> bool {
        match self.resend {
            ResendPolicy::EveryCycle => true,
            ResendPolicy::After(interval) => self
                .alerted
                .get(url)
                .is_none_or(|state| state.last_alerted.elapsed() >= interval),
        }
    }

    /// Run forever. Terminates only through an unhandled error; there is no
    /// graceful-shutdown signal.
    pub async fn run(mut self) -> Result<()> {
        let mut today = Local::now().date_naive();

        loop {
            let results = self.run_cycle().await;
            let failed = results.iter().filter(|result| !result.passed).count();
            info!("Cycle complete: {} endpoints checked, {failed} failed", results.len());

            // Yesterday's log file closes at the first write past midnight;
            // compress it once the date moves on.
            let now = Local::now().date_naive();
            if now != today {
                rotation::rotate_logs(&self.log_directory, now)?;
                today = now;
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
