//! Identifiers for assets, accounts and pools.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmmError;

macro_rules! byte_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            /// Wraps raw bytes.
            #[must_use]
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Returns the raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> [u8; 32] {
                self.0
            }

            /// Id whose last byte is `n` and all other bytes zero.
            ///
            /// Handy for tests and demos.
            #[must_use]
            pub const fn from_index(n: u8) -> Self {
                let mut bytes = [0u8; 32];
                bytes[31] = n;
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0x")?;
                for b in &self.0 {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl FromStr for $name {
            type Err = AmmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_hex32(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

byte_id!(
    /// Chain-agnostic identifier of a pooled asset.
    ///
    /// Rendered and parsed as `0x` followed by 64 hex digits.
    ///
    /// ```
    /// use weighted_amm_core::domain::AssetId;
    ///
    /// let id = AssetId::from_index(7);
    /// let Ok(parsed) = id.to_string().parse::<AssetId>() else { panic!() };
    /// assert_eq!(parsed, id);
    /// ```
    AssetId
);

byte_id!(
    /// Identifier of a caller, liquidity provider or fee authority.
    AccountId
);

fn parse_hex32(s: &str) -> Result<[u8; 32], AmmError> {
    let hex = s.strip_prefix("0x").unwrap_or(s);
    if hex.len() != 64 {
        return Err(AmmError::InvalidConfiguration("id must be 32 hex-encoded bytes"));
    }
    let mut out = [0u8; 32];
    for (slot, pair) in out.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
        let hi = hex_digit(pair.first().copied())?;
        let lo = hex_digit(pair.get(1).copied())?;
        *slot = (hi << 4) | lo;
    }
    Ok(out)
}

fn hex_digit(c: Option<u8>) -> Result<u8, AmmError> {
    match c {
        Some(c @ b'0'..=b'9') => Ok(c - b'0'),
        Some(c @ b'a'..=b'f') => Ok(c - b'a' + 10),
        Some(c @ b'A'..=b'F') => Ok(c - b'A' + 10),
        _ => Err(AmmError::InvalidConfiguration("id contains a non-hex character")),
    }
}

/// Registry key of a pool.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PoolId(u64);

impl PoolId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// The id after this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}
