//! SSRF guard for caller-supplied image URLs.
//!
//! String-level validation only: scheme, hostname and literal-IP checks run
//! before any outbound fetch is issued. Hostnames are not DNS-resolved, so a
//! public name pointing at a private address can still slip through
//! (rebinding); the fetch path bounds the blast radius with a 15 second
//! timeout and a 10 MiB byte cap.

use std::net::{IpAddr, Ipv6Addr};

/// Validate a caller-supplied URL before fetching it.
/// Rejects non-http(s) schemes and hosts in private/internal ranges.
pub fn validate_url(url: &str) -> Result<(), String> {
    let parsed = url::Url::parse(url).map_err(|e| format!("Invalid URL: {}", e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(format!(
                "Scheme '{}' is not allowed. Only HTTP and HTTPS are permitted.",
                scheme
            ));
        }
    }

    let host = match parsed.host_str() {
        Some(h) => h,
        None => return Err("URL must have a host".to_string()),
    };

    if host.eq_ignore_ascii_case("localhost") || host == "0.0.0.0" || host == "::1" || host == "[::1]"
    {
        return Err("Access to localhost is not allowed".to_string());
    }

    if host.to_ascii_lowercase().ends_with(".internal") {
        return Err("Access to internal hostnames is not allowed".to_string());
    }

    if let Ok(ip) = host.parse::<IpAddr>()
        && is_restricted_ip(&ip)
    {
        return Err(format!(
            "Access to restricted IP address {} is not allowed (private/internal/metadata)",
            ip
        ));
    }

    if host.starts_with('[')
        && host.ends_with(']')
        && let Ok(ip) = host[1..host.len() - 1].parse::<Ipv6Addr>()
        && is_restricted_ip(&IpAddr::V6(ip))
    {
        return Err(format!(
            "Access to restricted IPv6 address {} is not allowed",
            ip
        ));
    }

    Ok(())
}

/// Check whether an IP address falls in a range the bridge refuses to fetch
/// from: loopback, private, link-local (cloud metadata lives there), CGNAT,
/// and the usual reserved/documentation blocks.
pub fn is_restricted_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            if v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.is_multicast()
            {
                return true;
            }
            match v4.octets() {
                // "This network": 0.0.0.0/8
                [0, ..] => true,
                // CGNAT: 100.64.0.0/10
                [100, 64..=127, ..] => true,
                // IETF Protocol Assignments: 192.0.0.0/24
                [192, 0, 0, _] => true,
                // Benchmark testing: 198.18.0.0/15
                [198, 18..=19, ..] => true,
                // Reserved: 240.0.0.0/4
                [240..=255, ..] => true,
                _ => false,
            }
        }
        IpAddr::V6(v6) => {
            if v6.is_loopback() || v6.is_multicast() {
                return true;
            }
            match v6.segments() {
                // Unique local: fc00::/7
                [0xfc00..=0xfdff, ..] => true,
                // Link-local: fe80::/10
                [0xfe80..=0xfebf, ..] => true,
                // Documentation: 2001:db8::/32
                [0x2001, 0x0db8, ..] => true,
                _ => false,
            }
        }
    }
}
