use chrono::{DateTime, Utc};

/// Result of probing one endpoint once.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// URL that was probed
    pub url: String,

    /// Status code considered healthy for this endpoint
    pub expected_status: u16,

    /// Timestamp when the probe was performed
    pub timestamp: DateTime<Utc>,

    /// Whether the observed status equalled the expected one
    pub passed: bool,

    /// Round-trip time in milliseconds, when a response arrived
    pub latency_ms: Option<u64>,

    /// Observed HTTP status code, when a response arrived
    pub status_code: Option<u16>,

    /// Transport error message, when no response arrived
    pub error_message: Option<String>,
}

impl CheckResult {
    pub fn new(url: impl Into<String>, expected_status: u16) -> Self {
        Self {
            url: url.into(),
            expected_status,
            timestamp: Utc::now(),
            passed: false,
            latency_ms: None,
            status_code: None,
            error_message: None,
        }
    }

    /// Mark the check as passed: the expected status came back.
    pub fn pass(mut self, latency_ms: u64, status_code: u16) -> Self {
        self.passed = true;
        self.latency_ms = Some(latency_ms);
        self.status_code = Some(status_code);
        self
    }

    /// Mark the check as failed with an unexpected status code.
    pub fn fail_status(mut self, latency_ms: u64, status_code: u16) -> Self {
        self.passed = false;
        self.latency_ms = Some(latency_ms);
        self.status_code = Some(status_code);
        self
    }

    /// Mark the check as failed without a response.
    pub fn fail_error(mut self, error: impl Into<String>) -> Self {
        self.passed = false;
        self.error_message = Some(error.into());
        self
    }
}
