use std::fmt;
use std::str::FromStr;

/// Error returned when a string cannot be read as a MAC address.
/// Carries the original input text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MAC address: {0:?}")]
pub struct MacParseError(pub String);

/// MAC address representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a new MAC address from a byte array
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Get the underlying byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Parse a MAC address in any of the usual notations.
    ///
    /// Accepted forms, case-insensitive:
    /// - `00:1a:2b:3c:4d:5e`, `00-1A-2B-3C-4D-5E` (groups may drop a leading zero: `0:1a:...`)
    /// - `001a.2b3c.4d5e` (Cisco dotted)
    /// - `001A2B3C4D5E` (bare)
    pub fn parse(s: &str) -> Result<Self, MacParseError> {
        let invalid = || MacParseError(s.to_string());

        let normalized = s.replace(|c: char| c == '-' || c == '.', ":").to_lowercase();
        let groups: Vec<&str> = normalized.split(':').collect();

        if !groups
            .iter()
            .all(|g| g.bytes().all(|b| b.is_ascii_hexdigit()))
        {
            return Err(invalid());
        }

        let mut bytes = [0u8; 6];

        // Six groups of one or two digits each
        if groups.len() == 6 && groups.iter().all(|g| (1..=2).contains(&g.len())) {
            for (i, group) in groups.iter().enumerate() {
                bytes[i] = u8::from_str_radix(group, 16).map_err(|_| invalid())?;
            }
            return Ok(Self(bytes));
        }

        // Runs of whole bytes: bare or dotted notation
        if groups.iter().all(|g| !g.is_empty() && g.len() % 2 == 0) {
            let digits = groups.concat();
            if digits.len() == 12 {
                for (i, byte) in bytes.iter_mut().enumerate() {
                    *byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                        .map_err(|_| invalid())?;
                }
                return Ok(Self(bytes));
            }
        }

        Err(invalid())
    }

    /// Organisationally unique identifier: the first three bytes as six
    /// uppercase hex digits, without separators.
    pub fn oui(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }

    /// True when the address was assigned by an administrator rather than
    /// drawn from a manufacturer block (U/L bit of the first byte).
    pub fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
