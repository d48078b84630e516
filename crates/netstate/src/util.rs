//! Address parsing helpers.

use std::net::IpAddr;

use crate::platform::error::{Error, Result};

/// Parse an IPv4 or IPv6 address string.
pub fn parse_addr(s: &str) -> Result<IpAddr> {
    s.parse()
        .map_err(|_| Error::InvalidAddress(s.to_string()))
}

/// Parse an address with prefix length, e.g. "192.168.1.0/24" or
/// "2001:db8::/64". A bare address gets the full host prefix.
pub fn parse_prefix(s: &str) -> Result<(IpAddr, u8)> {
    let (addr_str, plen_str) = match s.split_once('/') {
        Some((addr, plen)) => (addr, Some(plen)),
        None => (s, None),
    };

    let addr = parse_addr(addr_str)?;
    let max = match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };

    let plen = match plen_str {
        Some(plen) => plen
            .parse::<u8>()
            .map_err(|_| Error::InvalidAddress(s.to_string()))?,
        None => max,
    };
    if plen > max {
        return Err(Error::InvalidPrefix { plen, max });
    }

    Ok((addr, plen))
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    #[test]
    fn test_parse_addr() {
        assert_eq!(
            parse_addr("192.168.1.1").unwrap(),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))
        );
        assert_eq!(parse_addr("::1").unwrap(), IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert!(parse_addr("not-an-address").is_err());
    }

    #[test]
    fn test_parse_prefix() {
        let (addr, plen) = parse_prefix("192.168.1.0/24").unwrap();
        assert_eq!(addr, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 0)));
        assert_eq!(plen, 24);

        // bare address: host prefix
        let (_, plen) = parse_prefix("10.0.0.1").unwrap();
        assert_eq!(plen, 32);
        let (_, plen) = parse_prefix("2001:db8::1").unwrap();
        assert_eq!(plen, 128);
    }

    #[test]
    fn test_parse_prefix_rejects_out_of_range() {
        assert!(matches!(
            parse_prefix("10.0.0.0/33"),
            Err(Error::InvalidPrefix { plen: 33, max: 32 })
        ));
        assert!(parse_prefix("2001:db8::/129").is_err());
    }
}
