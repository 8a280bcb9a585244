//! Discord permission bits cached on user roles
//!
//! Only the bits this service inspects are named; everything else Discord
//! sends is kept verbatim so the stored value round-trips.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Subset of Discord's guild permission flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        const KICK_MEMBERS     = 1 << 1;
        const BAN_MEMBERS      = 1 << 2;
        const ADMINISTRATOR    = 1 << 3;
        const MANAGE_CHANNELS  = 1 << 4;
        const MANAGE_GUILD     = 1 << 5;
        const MANAGE_ROLES     = 1 << 28;

        // keep unknown bits intact
        const _ = !0;
    }
}

impl Permissions {
    /// Whether a role with these bits may manage the server's bot settings
    #[inline]
    pub fn grants_server_admin(self) -> bool {
        self.intersects(Permissions::ADMINISTRATOR | Permissions::MANAGE_GUILD)
    }

    #[inline]
    pub fn to_i64(self) -> i64 {
        self.bits() as i64
    }

    #[inline]
    pub fn from_i64(bits: i64) -> Self {
        Permissions::from_bits_retain(bits as u64)
    }

    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse::<u64>().map(Permissions::from_bits_retain)
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// Discord transmits permissions as decimal strings
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(bits) => Ok(Permissions::from_bits_retain(bits)),
            Raw::Text(s) => Permissions::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
