//! Usage: Certificate-error allow-list for the local development origin.

use url::Url;

pub(crate) const LOCAL_DEV_SCHEME: &str = "https";
pub(crate) const LOCAL_DEV_HOST: &str = "localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CertificateDecision {
    Accept,
    Reject,
}

/// Accepts certificate errors only for `https://localhost[:port]`; everything else keeps the
/// engine's default rejection.
pub(crate) fn decide(raw_url: &str) -> CertificateDecision {
    let Ok(url) = Url::parse(raw_url.trim()) else {
        return CertificateDecision::Reject;
    };
    if url.scheme() != LOCAL_DEV_SCHEME {
        return CertificateDecision::Reject;
    }
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case(LOCAL_DEV_HOST) => CertificateDecision::Accept,
        _ => CertificateDecision::Reject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_localhost_with_port_and_path() {
        assert_eq!(
            decide("https://localhost:8443/room?x=1"),
            CertificateDecision::Accept
        );
        assert_eq!(decide("https://localhost/"), CertificateDecision::Accept);
        assert_eq!(decide("https://LOCALHOST:443"), CertificateDecision::Accept);
    }

    #[test]
    fn rejects_public_origin() {
        assert_eq!(decide("https://example.com"), CertificateDecision::Reject);
    }

    #[test]
    fn rejects_hosts_that_only_share_the_prefix() {
        assert_eq!(
            decide("https://localhost.example.com/"),
            CertificateDecision::Reject
        );
        assert_eq!(
            decide("https://localhost@evil.example/"),
            CertificateDecision::Reject
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(decide("wss://localhost:8443"), CertificateDecision::Reject);
        assert_eq!(decide("not a url"), CertificateDecision::Reject);
        assert_eq!(decide(""), CertificateDecision::Reject);
    }
}
