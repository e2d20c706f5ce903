//! Shared newtypes used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize
//! identically to the raw format the backend sends, so they can be used
//! directly in wire types without conversion overhead.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TradeError;

// ─── WalletAddress ───────────────────────────────────────────────────────────

/// An EVM wallet address stored as its hex string, byte-for-byte as the
/// wallet reported it. No checksum normalization — the backend compares the
/// signature against the address it issued the nonce for, casing and all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(WalletAddress(s))
    }
}

// ─── PositionId ──────────────────────────────────────────────────────────────

/// Backend-assigned position identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionId(String);

impl PositionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PositionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PositionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for PositionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PositionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(PositionId(s))
    }
}

// ─── Direction ───────────────────────────────────────────────────────────────

/// Trade direction. Wire format matches the backend: `"LONG"` / `"SHORT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Leverage ────────────────────────────────────────────────────────────────

/// Leverage multiplier. The backend supports exactly this set; any other
/// value is rejected at construction, before a request is ever built.
///
/// Serializes as the bare number (`100`, `500`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Leverage {
    X100,
    X500,
    X1000,
    X5000,
    X10000,
}

impl Leverage {
    /// All supported multipliers, ascending.
    pub const ALL: [Leverage; 5] = [
        Self::X100,
        Self::X500,
        Self::X1000,
        Self::X5000,
        Self::X10000,
    ];

    pub fn multiplier(&self) -> u32 {
        match self {
            Self::X100 => 100,
            Self::X500 => 500,
            Self::X1000 => 1000,
            Self::X5000 => 5000,
            Self::X10000 => 10000,
        }
    }
}

impl TryFrom<u32> for Leverage {
    type Error = TradeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(Self::X100),
            500 => Ok(Self::X500),
            1000 => Ok(Self::X1000),
            5000 => Ok(Self::X5000),
            10000 => Ok(Self::X10000),
            other => Err(TradeError::UnsupportedLeverage(other)),
        }
    }
}

impl From<Leverage> for u32 {
    fn from(value: Leverage) -> Self {
        value.multiplier()
    }
}

impl std::fmt::Display for Leverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}
