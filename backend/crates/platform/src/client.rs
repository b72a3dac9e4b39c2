//! Client identification utilities
//!
//! Client IP for rate limiting and bearer credentials from request headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Client IP address as seen by the outermost trusted proxy
///
/// Each proxy appends the address it received the request from to
/// `X-Forwarded-For`, so only the last `trusted_proxy_hops` entries were
/// written by infrastructure we control. Anything to their left is client
/// supplied and ignored. With no trusted proxies the header is not read at
/// all and the connection address is used.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
/// * `trusted_proxy_hops` - Number of reverse proxies in front of the server
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trusted_proxy_hops: usize,
) -> Option<IpAddr> {
    if trusted_proxy_hops == 0 {
        return direct_ip;
    }

    let forwarded: Vec<&str> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    // Fewer entries than hops: the leftmost is the closest we have
    let index = forwarded.len().saturating_sub(trusted_proxy_hops);
    forwarded
        .get(index)
        .and_then(|entry| entry.parse::<IpAddr>().ok())
        .or(direct_ip)
}

/// Token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively. Empty tokens count as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_client_ip_one_proxy_uses_rightmost() {
        let headers = forwarded("6.6.6.6, 192.168.1.1");
        let ip = extract_client_ip(&headers, None, 1);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_two_proxies() {
        let headers = forwarded("6.6.6.6, 192.168.1.1, 10.0.0.1");
        let ip = extract_client_ip(&headers, None, 2);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));

        let short = forwarded("192.168.1.1");
        assert_eq!(
            extract_client_ip(&short, None, 2),
            Some("192.168.1.1".parse().unwrap())
        );
    }

    #[test]
    fn test_extract_client_ip_ignores_header_without_proxies() {
        let headers = forwarded("192.168.1.1");
        let direct: IpAddr = "127.0.0.1".parse().unwrap();

        assert_eq!(extract_client_ip(&headers, Some(direct), 0), Some(direct));
        assert_eq!(extract_client_ip(&headers, None, 0), None);
    }

    #[test]
    fn test_extract_client_ip_multiple_headers() {
        let mut headers = forwarded("6.6.6.6");
        headers.append("x-forwarded-for", HeaderValue::from_static("192.168.1.1"));

        assert_eq!(
            extract_client_ip(&headers, None, 1),
            Some("192.168.1.1".parse().unwrap())
        );
    }

    #[test]
    fn test_extract_client_ip_direct() {
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(
            extract_client_ip(&HeaderMap::new(), Some(direct), 1),
            Some(direct)
        );

        let garbage = forwarded("not-an-ip");
        assert_eq!(extract_client_ip(&garbage, Some(direct), 1), Some(direct));
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer eyJhbGciOi.payload.sig"),
        );
        assert_eq!(
            extract_bearer_token(&headers),
            Some("eyJhbGciOi.payload.sig".to_string())
        );

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
