//! MAC address handling
//!
//! HNS reports endpoint MACs in `00-15-5D-AA-BB-CC` notation while interface
//! metadata uses `02:5a:3b:4c:5d:6e`; both parse into the same value.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Parse a MAC address separated by ':' or '-'
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(Error::InvalidMacAddress(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(parts) {
            if part.len() != 2 {
                return Err(Error::InvalidMacAddress(s.to_string()));
            }
            let byte = hex::decode(part).map_err(|_| Error::InvalidMacAddress(s.to_string()))?;
            *octet = byte[0];
        }

        Ok(Self(octets))
    }

    /// Lowercase hex digits without separators (e.g. "025a3b4c5d6e")
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}
