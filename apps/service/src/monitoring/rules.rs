use crate::config::StatusOverride;

/// Status code expected from endpoints matching no override.
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// Expected-status dispatch for monitored URLs.
///
/// Overrides match by substring and the first match wins; everything else
/// is expected to answer 200. Substring (not exact) matching is deliberate:
/// any future URL containing a known fragment inherits its override.
#[derive(Debug, Clone)]
pub struct StatusRules {
    overrides: Vec<StatusOverride>,
}

impl StatusRules {
    pub fn new(overrides: Vec<StatusOverride>) -> Self {
        Self { overrides }
    }

    pub fn expected_status_for(&self, url: &str) -> u16 {
        self.overrides
            .iter()
            .find(|rule| url.contains(&rule.contains))
            .map(|rule| rule.status)
            .unwrap_or(DEFAULT_EXPECTED_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rules() -> StatusRules {
        StatusRules::new(crate::config::Config::default().status_overrides)
    }

    #[test]
    fn unmatched_urls_expect_200() {
        let rules = default_rules();

        assert_eq!(rules.expected_status_for("https://mail.example.com"), 200);
        assert_eq!(rules.expected_status_for("https://example.com/favicon.ico"), 200);
    }

    #[test]
    fn support_endpoint_expects_405_regardless_of_path() {
        let rules = default_rules();

        assert_eq!(rules.expected_status_for("https://support.example.com"), 405);
        assert_eq!(rules.expected_status_for("https://support.example.com/hooks/inbound"), 405);
    }

    #[test]
    fn crm_endpoint_expects_404_regardless_of_path() {
        let rules = default_rules();

        assert_eq!(rules.expected_status_for("https://crm.example.com/"), 404);
        assert_eq!(rules.expected_status_for("http://crm.example.com/login?next=/"), 404);
    }

    #[test]
    fn substring_matches_anywhere_in_the_url() {
        let rules = default_rules();

        // Deliberate policy: a fragment match in any component inherits the
        // override, even outside the host.
        assert_eq!(rules.expected_status_for("https://www.example.com/crm./page"), 404);
    }

    #[test]
    fn first_matching_override_wins() {
        let rules = StatusRules::new(vec![
            StatusOverride { contains: "callback".into(), status: 405 },
            StatusOverride { contains: "crm.callback".into(), status: 404 },
        ]);

        assert_eq!(rules.expected_status_for("https://crm.callback.example.com"), 405);
    }

    #[test]
    fn no_overrides_means_everything_expects_200() {
        let rules = StatusRules::new(Vec::new());

        assert_eq!(rules.expected_status_for("https://support.example.com"), 200);
    }
}
