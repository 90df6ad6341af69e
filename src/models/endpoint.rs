use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// A candidate that passed format validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedEndpoint {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl ParsedEndpoint {
    pub fn new(host: Ipv4Addr, port: u16) -> Self {
        Self { host, port }
    }

    /// Socket address of the proxy itself
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.host, self.port))
    }
}

impl std::fmt::Display for ParsedEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display_matches_candidate_form() {
        let endpoint = ParsedEndpoint::new(Ipv4Addr::new(8, 8, 8, 8), 1080);
        assert_eq!(endpoint.to_string(), "8.8.8.8:1080");
        assert_eq!(
            endpoint.socket_addr(),
            "8.8.8.8:1080".parse::<SocketAddr>().unwrap()
        );
    }
}
