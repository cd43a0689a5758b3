use std::net::IpAddr;

/// Where a request host points inside the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    Ip,
    MainDomain,
    Subdomain(String),
    CustomDomain(String),
}

/// Classify a raw `Host` header value against the platform's main domain.
///
/// Rules run in a fixed order: IP literal, exact main domain, subdomain of the
/// main domain, and everything else is a custom domain. Every input gets
/// exactly one classification.
pub fn classify_host(raw_host: &str, main_domain: &str) -> HostClass {
    let host = normalize_host(raw_host);
    let main_domain = normalize_host(main_domain);

    if host.parse::<IpAddr>().is_ok() {
        return HostClass::Ip;
    }

    if !main_domain.is_empty() && host == main_domain {
        return HostClass::MainDomain;
    }

    if !main_domain.is_empty() {
        if let Some(prefix) = host.strip_suffix(main_domain.as_str()) {
            if let Some(slug) = prefix.strip_suffix('.') {
                if !slug.is_empty() {
                    return HostClass::Subdomain(slug.to_string());
                }
            }
        }
    }

    HostClass::CustomDomain(host)
}

/// Lowercase, drop the port and any trailing dot.
pub fn normalize_host(raw: &str) -> String {
    let host = raw.trim().to_ascii_lowercase();

    let without_port = if let Some(rest) = host.strip_prefix('[') {
        // [v6]:port
        match rest.split_once(']') {
            Some((addr, _)) => addr.to_string(),
            None => rest.to_string(),
        }
    } else if host.matches(':').count() == 1 {
        host.split(':').next().unwrap_or_default().to_string()
    } else {
        // bare IPv6 literal or no port at all
        host
    };

    without_port.trim_end_matches('.').to_string()
}
