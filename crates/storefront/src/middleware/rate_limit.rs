//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Login and registration posts are limited per client IP to slow down
//! credential stuffing.
//!
//! Proxy headers are client-controlled unless a reverse proxy overwrites
//! them, so they are only read when `STOREFRONT_TRUST_PROXY_HEADERS` is set.
//! Without it the key is the TCP peer address.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{extract::ConnectInfo, http::Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers consulted for the client IP, in order of trust.
const CLIENT_IP_HEADERS: [&str; 2] = ["x-real-ip", "x-forwarded-for"];

/// Key extractor for the client IP.
///
/// With `trust_proxy_headers` it prefers proxy headers and falls back to the
/// peer address; otherwise it uses the peer address only. The peer address
/// is only available when the server is started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Clone, Copy, Debug)]
pub struct ClientIpKeyExtractor {
    pub trust_proxy_headers: bool,
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // X-Forwarded-For may hold a chain; the first entry is the client.
        let from_headers = self
            .trust_proxy_headers
            .then(|| {
                CLIENT_IP_HEADERS.iter().find_map(|name| {
                    headers
                        .get(*name)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.split(',').next())
                        .and_then(|s| s.trim().parse::<IpAddr>().ok())
                })
            })
            .flatten();

        from_headers
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
/// `trust_proxy_headers` selects how the client IP is found, see
/// [`ClientIpKeyExtractor`].
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor {
            trust_proxy_headers,
        })
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    const BEHIND_PROXY: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: true,
    };
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor {
        trust_proxy_headers: false,
    };

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/auth/login");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_prefers_real_ip_header() {
        let req = request(&[("x-real-ip", "203.0.113.7"), ("x-forwarded-for", "198.51.100.1")]);
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_first_forwarded_entry() {
        let req = request(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1")]);
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip, "198.51.100.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = request(&[("x-forwarded-for", "not an ip")]);
        req.extensions_mut()
            .insert(ConnectInfo("192.0.2.9:4100".parse::<SocketAddr>().unwrap()));
        let ip = BEHIND_PROXY.extract(&req).unwrap();
        assert_eq!(ip, "192.0.2.9".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_no_source_fails() {
        let req = request(&[]);
        assert!(BEHIND_PROXY.extract(&req).is_err());
    }

    #[test]
    fn test_direct_ignores_spoofed_headers() {
        let mut req = request(&[("x-real-ip", "203.0.113.7"), ("x-forwarded-for", "198.51.100.1")]);
        req.extensions_mut()
            .insert(ConnectInfo("192.0.2.9:4100".parse::<SocketAddr>().unwrap()));
        let ip = DIRECT.extract(&req).unwrap();
        assert_eq!(ip, "192.0.2.9".parse::<IpAddr>().unwrap());

        let req = request(&[("x-forwarded-for", "198.51.100.1")]);
        assert!(DIRECT.extract(&req).is_err());
    }
}
