//! Client identification for rate limiting.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Identifier used when no address is known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolves the identifier of the client that sent a request.
///
/// Proxy headers are only trusted when `behind_proxy` is set:
/// the first `X-Forwarded-For` entry wins, then `X-Real-IP`.
/// Otherwise the peer socket address is used.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// assert_eq!(client_id(&headers, None, true), "203.0.113.7");
/// assert_eq!(client_id(&headers, None, false), "unknown");
/// ```
pub fn client_id(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }

        let real_ip = headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = real_ip {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.1.2.3:45678".parse().unwrap())
    }

    #[test]
    fn test_uses_peer_address() {
        let headers = HeaderMap::new();
        assert_eq!(client_id(&headers, peer(), false), "10.1.2.3");
    }

    #[test]
    fn test_ignores_forwarded_header_when_not_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"));

        assert_eq!(client_id(&headers, peer(), false), "10.1.2.3");
    }

    #[test]
    fn test_first_forwarded_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        assert_eq!(client_id(&headers, peer(), true), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("198.51.100.4"));

        assert_eq!(client_id(&headers, peer(), true), "198.51.100.4");
    }

    #[test]
    fn test_peer_fallback_behind_proxy_without_headers() {
        let headers = HeaderMap::new();
        assert_eq!(client_id(&headers, peer(), true), "10.1.2.3");
    }

    #[test]
    fn test_unknown_without_peer() {
        let headers = HeaderMap::new();
        assert_eq!(client_id(&headers, None, false), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_ipv6_peer() {
        let headers = HeaderMap::new();
        let addr: SocketAddr = "[::1]:8080".parse().unwrap();
        assert_eq!(client_id(&headers, Some(addr), false), "::1");
    }
}
