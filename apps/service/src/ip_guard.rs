use serde::Deserialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::alert::{Alert, Notifier};

/// The process refused to start because its outbound IP is not the
/// allow-listed one (or could not be determined at all).
#[derive(Debug, Error)]
#[error("public IP changed to {}; terminating before any service check", .observed.as_deref().unwrap_or("unknown"))]
pub struct IpMismatch {
    pub observed: Option<String>,
}

/// Response from the IP-echo service
#[derive(Debug, Deserialize)]
struct IpEchoResponse {
    ip: String,
}

/// Fetch the caller's public IP from the configured echo service.
///
/// A transport error, a non-200 answer or a malformed body all count as a
/// failed lookup and yield `None`. An absent IP never equals an expected
/// one, so lookup failure takes the same path as a genuine change.
pub async fn fetch_public_ip(client: &reqwest::Client, echo_url: &str) -> Option<String> {
    let response = match client.get(echo_url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Public IP lookup failed: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!("Public IP lookup returned HTTP {}", response.status().as_u16());
        return None;
    }

    match response.json::<IpEchoResponse>().await {
        Ok(body) => Some(body.ip),
        Err(e) => {
            warn!("Public IP lookup returned a malformed body: {e}");
            None
        }
    }
}

/// Startup gate: compare the observed public IP against the allow-listed
/// value. Some monitored endpoints only admit traffic from that IP, so a
/// mismatch means every probe result would be garbage.
///
/// On mismatch one alert email goes out, one warning is logged and an error
/// is returned; the caller terminates without running a single check. A
/// failed send is logged but still terminates.
pub async fn verify_public_ip(
    client: &reqwest::Client,
    notifier: &dyn Notifier,
    echo_url: &str,
    expected: &str,
) -> Result<String, IpMismatch> {
    let observed = fetch_public_ip(client, echo_url).await;

    if let Some(ip) = &observed {
        println!("Current public IP address is: {ip}");
        if ip == expected {
            return Ok(ip.clone());
        }
    }

    let shown = observed.as_deref().unwrap_or("unknown");
    warn!("Public IP changed: {shown}. Please white-list this new IP. The monitor will terminate.");

    if let Err(e) = notifier.send(&Alert::public_ip_changed(observed.as_deref())).await {
        error!("Failed to send the public IP alert: {e}");
    }

    Err(IpMismatch { observed })
}
