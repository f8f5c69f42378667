use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the client IP, preferring the first `X-Forwarded-For` hop and
/// falling back to the socket remote address.
pub fn client_ip(headers: &HeaderMap, socket_addr: IpAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|hop| hop.trim().parse::<IpAddr>().ok())
        .unwrap_or(socket_addr)
}
