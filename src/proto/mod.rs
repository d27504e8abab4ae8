//! Wire protocol shared by the gateway and the workers.
//!
//! # Data Flow
//! ```text
//! Client bytes (HTTP body / TCP line / UDP datagram)
//!     → command.rs (parse into Command)
//!     → dispatch + forward
//!     → worker executes, answers with a responses.rs string
//! ```
//!
//! # Design Decisions
//! - The command grammar is identical across transports; only framing differs
//! - Fields are `;`-separated with no escaping, so a field containing `;`
//!   changes the arity and the command is rejected at parse time
//! - Response strings live in one place so the three worker transports and
//!   the ingress error paths stay byte-identical

pub mod command;
pub mod responses;

pub use command::{Command, ParseError};

use std::fmt;
use std::str::FromStr;

/// Transport protocol a worker speaks. Each worker speaks exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Tcp,
    Udp,
}

impl Protocol {
    /// All protocols, in registry-lane order.
    pub const ALL: [Protocol; 3] = [Protocol::Http, Protocol::Tcp, Protocol::Udp];

    /// Stable index used for per-protocol state arrays.
    pub fn index(self) -> usize {
        match self {
            Protocol::Http => 0,
            Protocol::Tcp => 1,
            Protocol::Udp => 2,
        }
    }

    /// Lowercase name as it appears in registration bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Http => "HTTP",
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        };
        f.write_str(name)
    }
}

impl FromStr for Protocol {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("http") {
            Ok(Protocol::Http)
        } else if s.eq_ignore_ascii_case("tcp") {
            Ok(Protocol::Tcp)
        } else if s.eq_ignore_ascii_case("udp") {
            Ok(Protocol::Udp)
        } else {
            Err(ParseError::UnknownProtocol(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_parse_is_case_insensitive() {
        assert_eq!("HTTP".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!("Udp".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert!("ws".parse::<Protocol>().is_err());
    }

    #[test]
    fn protocol_indices_are_distinct() {
        let mut seen = [false; 3];
        for p in Protocol::ALL {
            assert!(!seen[p.index()]);
            seen[p.index()] = true;
        }
    }
}
