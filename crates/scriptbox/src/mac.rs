//! Random hardware-address-shaped identifiers.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::types::ScriptError;

/// Bit 0 of the first octet: set for multicast, clear for unicast.
const MULTICAST_BIT: u8 = 0x01;
/// Bit 1 of the first octet: set for locally administered addresses.
const LOCAL_BIT: u8 = 0x02;

/// A six-octet MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Generate a random address from the thread-local generator.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate a random address from `rng`.
    ///
    /// All octets are uniform over `0..=255`, except that bit 0 of the first
    /// octet is always cleared. The locally administered bit is left as drawn.
    pub fn generate_with<R: Rng>(rng: &mut R) -> Self {
        let mut octets = [0u8; 6];
        rng.fill(&mut octets[..]);
        octets[0] &= !MULTICAST_BIT;
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_unicast(&self) -> bool {
        self.0[0] & MULTICAST_BIT == 0
    }

    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & LOCAL_BIT != 0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScriptError::InvalidInput(format!("not a MAC address: {s:?}"));

        let mut octets = [0u8; 6];
        let mut parts = s.trim().split(':');
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(octets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_well_formed(s: &str) -> bool {
        let parts: Vec<&str> = s.split(':').collect();
        parts.len() == 6
            && parts.iter().all(|p| {
                p.len() == 2
                    && p.chars()
                        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            })
    }

    #[test]
    fn test_display_lowercase_padded() {
        let mac = MacAddress::new([0x0a, 0xbc, 0x00, 0xff, 0x1e, 0x02]);
        assert_eq!(mac.to_string(), "0a:bc:00:ff:1e:02");
    }

    #[test]
    fn test_generated_is_unicast_and_well_formed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let mac = MacAddress::generate_with(&mut rng);
            assert!(mac.is_unicast());
            assert_eq!(mac.octets()[0] & 1, 0);
            assert!(is_well_formed(&mac.to_string()));
        }
    }

    #[test]
    fn test_local_bit_is_unconstrained() {
        let mut rng = StdRng::seed_from_u64(42);
        let macs: Vec<_> = (0..256).map(|_| MacAddress::generate_with(&mut rng)).collect();
        assert!(macs.iter().any(|m| m.is_locally_administered()));
        assert!(macs.iter().any(|m| !m.is_locally_administered()));
    }

    #[test]
    fn test_thread_rng_not_fixed() {
        let first = MacAddress::generate();
        let distinct = (0..8).map(|_| MacAddress::generate()).any(|m| m != first);
        assert!(distinct);
    }

    #[test]
    fn test_parse() {
        let mac: MacAddress = "0A:bc:00:ff:1e:02".parse().unwrap();
        assert_eq!(mac.octets(), [0x0a, 0xbc, 0x00, 0xff, 0x1e, 0x02]);
        assert_eq!(mac.to_string(), "0a:bc:00:ff:1e:02");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "0a:bc:00:ff:1e",
            "0a:bc:00:ff:1e:02:03",
            "0a:bc:00:ff:1e:2",
            "0a:bc:00:ff:1e:zz",
            "0a-bc-00-ff-1e-02",
        ] {
            assert!(
                matches!(bad.parse::<MacAddress>(), Err(ScriptError::InvalidInput(_))),
                "accepted {bad:?}"
            );
        }
    }
}
