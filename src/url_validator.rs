use ipnet::IpNet;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::net::IpAddr;
use url::{Host, Url};

/// Outcome of validating a crawl target. Every failure path is
/// structured; callers must check `valid` before fetching.
#[derive(Debug, Clone)]
pub struct UrlValidation {
    pub valid: bool,
    pub error: Option<String>,
    /// Canonicalized URL to use for the actual fetch.
    pub resolved_url: Option<String>,
}

impl UrlValidation {
    fn ok(resolved_url: String) -> Self {
        Self {
            valid: true,
            error: None,
            resolved_url: Some(resolved_url),
        }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            resolved_url: None,
        }
    }
}

// Private, loopback, link-local and unspecified ranges. Covers the
// cloud metadata endpoint (169.254.169.254) via the link-local block.
static BLOCKED_CIDRS: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        "127.0.0.0/8",
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "169.254.0.0/16",
        "0.0.0.0/8",
        "::1/128",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .map(|c| c.parse().expect("blocked CIDR should be valid"))
    .collect()
});

static BLOCKED_HOSTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "localhost",
        "0.0.0.0",
        "metadata.google.internal",
        "metadata.gke.internal",
        "instance-data",
    ]
    .into_iter()
    .collect()
});

/// URL validator guarding the crawler against SSRF.
///
/// Blocks non-HTTP(S) schemes, literal private/loopback/link-local
/// addresses, and hostnames whose DNS records resolve to any blocked
/// address (DNS rebinding).
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    /// Hosts that bypass validation entirely (local fixtures, staging
    /// boxes behind a VPN).
    allowed_hosts: HashSet<String>,
}

impl UrlValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Validate a target URL, resolving the hostname via DNS.
    ///
    /// Performs real DNS queries for non-IP hostnames; the only
    /// suspension point in this module.
    pub async fn validate(&self, raw_url: &str) -> UrlValidation {
        let parsed = match Url::parse(raw_url) {
            Ok(u) => u,
            Err(e) => return UrlValidation::fail(format!("invalid URL: {}", e)),
        };

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return UrlValidation::fail(format!(
                    "disallowed scheme '{}': only http and https are supported",
                    scheme
                ));
            }
        }

        let host = match parsed.host() {
            Some(h) => h,
            None => return UrlValidation::fail("URL has no host"),
        };

        if let Some(host_str) = parsed.host_str() {
            if self.allowed_hosts.contains(host_str) {
                return UrlValidation::ok(parsed.to_string());
            }
        }

        match host {
            Host::Ipv4(ip) => {
                if is_blocked_ip(&IpAddr::V4(ip)) {
                    return UrlValidation::fail(format!("blocked private address: {}", ip));
                }
            }
            Host::Ipv6(ip) => {
                if is_blocked_ip(&IpAddr::V6(ip)) {
                    return UrlValidation::fail(format!("blocked private address: {}", ip));
                }
            }
            Host::Domain(domain) => {
                let domain_lower = domain.to_lowercase();
                if BLOCKED_HOSTS.contains(domain_lower.as_str()) {
                    return UrlValidation::fail(format!("blocked host: {}", domain));
                }

                let port = parsed.port_or_known_default().unwrap_or(80);
                let addrs = match tokio::net::lookup_host((domain_lower.as_str(), port)).await {
                    Ok(addrs) => addrs.collect::<Vec<_>>(),
                    Err(e) => {
                        tracing::debug!(host = %domain, error = %e, "DNS resolution failed");
                        return UrlValidation::fail("could not resolve hostname");
                    }
                };

                if addrs.is_empty() {
                    return UrlValidation::fail("could not resolve hostname");
                }

                // Every resolved A/AAAA record must be public; a single
                // private record fails the whole URL (DNS rebinding).
                for addr in &addrs {
                    if is_blocked_ip(&addr.ip()) {
                        return UrlValidation::fail(format!(
                            "hostname {} resolves to blocked address {}",
                            domain,
                            addr.ip()
                        ));
                    }
                }
            }
        }

        UrlValidation::ok(parsed.to_string())
    }
}

fn is_blocked_ip(ip: &IpAddr) -> bool {
    BLOCKED_CIDRS.iter().any(|cidr| cidr.contains(ip))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_loopback_and_private_literals() {
        for ip in ["127.0.0.1", "127.8.8.8", "10.0.0.1", "172.16.0.1", "172.31.255.1", "192.168.1.1", "169.254.169.254", "0.0.0.0"] {
            assert!(
                is_blocked_ip(&ip.parse().unwrap()),
                "{} should be blocked",
                ip
            );
        }
    }

    #[test]
    fn blocks_ipv6_private_ranges() {
        for ip in ["::1", "fc00::1", "fd12:3456::1", "fe80::1"] {
            assert!(
                is_blocked_ip(&ip.parse().unwrap()),
                "{} should be blocked",
                ip
            );
        }
    }

    #[test]
    fn allows_public_addresses() {
        for ip in ["8.8.8.8", "93.184.216.34", "2001:4860:4860::8888"] {
            assert!(!is_blocked_ip(&ip.parse().unwrap()), "{} should pass", ip);
        }
    }
}
