//! Command grammar parsing.
//!
//! ```text
//! register_item = "cadastrarItem" ";" NAME ";" DESC ";" PRICE
//! place_bid     = "registrarLance" ";" ITEM_ID ";" BIDDER ";" VALUE
//! register_svc  = PROTOCOL ";" PORT
//! ```
//!
//! Numeric fields use decimal notation with a period separator. Operation
//! names are matched case-insensitively. Arity is strict: a field containing
//! `;` shifts the split and the line is rejected.

use std::str::FromStr;

use crate::proto::Protocol;

pub const OP_REGISTER_ITEM: &str = "cadastrarItem";
pub const OP_PLACE_BID: &str = "registrarLance";

/// Liveness probe payloads.
pub const PING: &str = "ping";
pub const PONG_TCP: &str = "pong";
pub const PONG_UDP: &str = "Pong";

/// Error raised while parsing a command or registration body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty request")]
    Empty,
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
    #[error("unknown protocol `{0}`")]
    UnknownProtocol(String),
    #[error("expected {expected} fields, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

/// A parsed auction command, transport-independent.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RegisterItem {
        name: String,
        description: String,
        initial_price: f64,
    },
    PlaceBid {
        item_id: i64,
        bidder: String,
        value: f64,
    },
}

impl Command {
    /// Parse a full command line, e.g. `cadastrarItem;Painting;Oil;100.0`.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        let fields: Vec<&str> = line.split(';').collect();
        let op = fields[0];
        if op.eq_ignore_ascii_case(OP_REGISTER_ITEM) {
            Self::register_item_from(&fields[1..])
        } else if op.eq_ignore_ascii_case(OP_PLACE_BID) {
            Self::place_bid_from(&fields[1..])
        } else {
            Err(ParseError::UnknownOperation(op.to_string()))
        }
    }

    /// Parse the argument part of a register-item request
    /// (`name;description;price`), as carried by the HTTP body.
    pub fn parse_register_args(body: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = body.trim().split(';').collect();
        Self::register_item_from(&fields)
    }

    /// Parse the argument part of a place-bid request (`id;bidder;value`).
    pub fn parse_bid_args(body: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = body.trim().split(';').collect();
        Self::place_bid_from(&fields)
    }

    fn register_item_from(fields: &[&str]) -> Result<Self, ParseError> {
        if fields.len() != 3 {
            return Err(ParseError::Arity {
                expected: 3,
                found: fields.len(),
            });
        }
        let initial_price = parse_number(fields[2])?;
        Ok(Command::RegisterItem {
            name: fields[0].to_string(),
            description: fields[1].to_string(),
            initial_price,
        })
    }

    fn place_bid_from(fields: &[&str]) -> Result<Self, ParseError> {
        if fields.len() != 3 {
            return Err(ParseError::Arity {
                expected: 3,
                found: fields.len(),
            });
        }
        let item_id = fields[0]
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidNumber(fields[0].to_string()))?;
        let value = parse_number(fields[2])?;
        Ok(Command::PlaceBid {
            item_id,
            bidder: fields[1].to_string(),
            value,
        })
    }

    /// The operation name this command travels under.
    pub fn op(&self) -> &'static str {
        match self {
            Command::RegisterItem { .. } => OP_REGISTER_ITEM,
            Command::PlaceBid { .. } => OP_PLACE_BID,
        }
    }

    /// Render back to the wire form (no trailing newline).
    pub fn to_line(&self) -> String {
        match self {
            Command::RegisterItem {
                name,
                description,
                initial_price,
            } => format!("{OP_REGISTER_ITEM};{name};{description};{initial_price}"),
            Command::PlaceBid {
                item_id,
                bidder,
                value,
            } => format!("{OP_PLACE_BID};{item_id};{bidder};{value}"),
        }
    }
}

/// Parse a `/registerServer` body (`protocol;port`).
pub fn parse_registration(body: &str) -> Result<(Protocol, u16), ParseError> {
    let fields: Vec<&str> = body.trim().split(';').collect();
    if fields.len() != 2 {
        return Err(ParseError::Arity {
            expected: 2,
            found: fields.len(),
        });
    }
    let protocol = Protocol::from_str(fields[0])?;
    let port = fields[1]
        .trim()
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidNumber(fields[1].to_string()))?;
    Ok((protocol, port))
}

fn parse_number(field: &str) -> Result<f64, ParseError> {
    let value = field
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(field.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::InvalidNumber(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_register_item() {
        let cmd = Command::parse("cadastrarItem;Painting;Oil on canvas;100.0").unwrap();
        assert_eq!(
            cmd,
            Command::RegisterItem {
                name: "Painting".into(),
                description: "Oil on canvas".into(),
                initial_price: 100.0,
            }
        );
    }

    #[test]
    fn parses_place_bid_with_trailing_newline() {
        let cmd = Command::parse("registrarLance;1;alice;150.0\n").unwrap();
        assert_eq!(
            cmd,
            Command::PlaceBid {
                item_id: 1,
                bidder: "alice".into(),
                value: 150.0,
            }
        );
    }

    #[test]
    fn operation_name_is_case_insensitive() {
        assert!(Command::parse("CADASTRARITEM;a;b;1").is_ok());
    }

    #[test]
    fn rejects_unknown_operation() {
        assert!(matches!(
            Command::parse("cancelarLance;1;alice;10"),
            Err(ParseError::UnknownOperation(_))
        ));
    }

    #[test]
    fn rejects_semicolon_in_fields_via_arity() {
        // "Oil; on canvas" splits into an extra field.
        let err = Command::parse("cadastrarItem;Painting;Oil; on canvas;100.0").unwrap_err();
        assert!(matches!(err, ParseError::Arity { expected: 3, found: 4 }));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            Command::parse("registrarLance;one;alice;10"),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            Command::parse("cadastrarItem;a;b;NaN"),
            Err(ParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn round_trips_to_wire_form() {
        let line = "registrarLance;7;bob;120.5";
        assert_eq!(Command::parse(line).unwrap().to_line(), line);
    }

    #[test]
    fn parses_registration_body() {
        assert_eq!(
            parse_registration("http;8081").unwrap(),
            (Protocol::Http, 8081)
        );
        assert!(parse_registration("http").is_err());
        assert!(parse_registration("ftp;8081").is_err());
        assert!(parse_registration("udp;notaport").is_err());
    }
}
