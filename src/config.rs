//! Hub configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Where chat messages are published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatAddressing {
    /// Every chat message goes to `/topic/public`.
    #[default]
    Global,
    /// Chat goes to `/topic/room/{roomId}/chat` of the sender's room.
    Room,
}

/// Error returned when `CHAT_ADDRESSING` holds an unknown mode.
#[derive(Debug, thiserror::Error)]
#[error("invalid chat addressing {0:?}, expected \"global\" or \"room\"")]
pub struct ParseAddressingError(String);

impl FromStr for ChatAddressing {
    type Err = ParseAddressingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" | "public" => Ok(Self::Global),
            "room" => Ok(Self::Room),
            _ => Err(ParseAddressingError(s.to_string())),
        }
    }
}

impl fmt::Display for ChatAddressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Room => f.write_str("room"),
        }
    }
}

/// Top-level hub configuration.
///
/// Loaded once at startup via [`HubConfig::from_env`].
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8080`).
    pub listen_addr: SocketAddr,

    /// Chat topic addressing mode.
    pub chat_addressing: ChatAddressing,

    /// Keep rooms listed after their last member leaves.
    pub retain_empty_rooms: bool,

    /// Capacity of the broker's broadcast channel.
    pub broker_capacity: usize,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            chat_addressing: ChatAddressing::Global,
            retain_empty_rooms: false,
            broker_capacity: 1024,
            log_json: false,
        }
    }
}

impl HubConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` cannot be parsed as a
    /// [`SocketAddr`] or `CHAT_ADDRESSING` names an unknown mode.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let chat_addressing = match std::env::var("CHAT_ADDRESSING") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.chat_addressing,
        };

        let retain_empty_rooms = parse_bool(
            std::env::var("ROOM_RETAIN_EMPTY").ok().as_deref(),
            defaults.retain_empty_rooms,
        );
        let broker_capacity = parse_or(
            std::env::var("BROKER_CAPACITY").ok().as_deref(),
            defaults.broker_capacity,
        );
        let log_json = std::env::var("LOG_FORMAT")
            .is_ok_and(|format| format.trim().eq_ignore_ascii_case("json"));

        Ok(Self {
            listen_addr,
            chat_addressing,
            retain_empty_rooms,
            broker_capacity,
            log_json,
        })
    }
}

/// Parses `raw` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
