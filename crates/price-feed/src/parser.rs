use model::PriceTick;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Raw mini-ticker event. Only the fields the dashboard consumes; the
/// remaining OHLC/volume fields are ignored.
#[derive(Debug, Deserialize)]
struct MiniTickerRaw {
    #[allow(dead_code)]
    #[serde(rename = "e")]
    event_type: String,
    #[serde(rename = "s")]
    symbol: String,
    /// Last traded price, as a decimal string.
    #[serde(rename = "c")]
    close_price: String,
}

/// Failure to extract a price from an inbound message.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("price field is not a number: {value}")]
    Price { value: String },
}

pub enum ParsedMessage {
    Tick(PriceTick),
    Unknown,
}

/// Parse one inbound text frame.
///
/// Messages of other event types are `Unknown` and ignored; a recognized
/// event with a non-numeric price is an error so the caller can log and
/// discard it without touching state.
pub fn parse_message(text: &str) -> Result<ParsedMessage, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    match value.get("e").and_then(|v| v.as_str()) {
        Some("24hrMiniTicker") => {
            let raw: MiniTickerRaw = serde_json::from_value(value)?;

            let last_price = Decimal::from_str(&raw.close_price).map_err(|_| ParseError::Price {
                value: raw.close_price.clone(),
            })?;

            Ok(ParsedMessage::Tick(PriceTick {
                symbol: raw.symbol,
                last_price,
            }))
        }
        _ => Ok(ParsedMessage::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_mini_ticker() {
        let json = r#"{
            "e": "24hrMiniTicker",
            "E": 1672515782136,
            "s": "BTCEUR",
            "c": "55980.12",
            "o": "55100.00",
            "h": "56300.00",
            "l": "54900.00",
            "v": "1234.5",
            "q": "69000000.0"
        }"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Tick(tick) => {
                assert_eq!(tick.symbol, "BTCEUR");
                assert_eq!(tick.last_price, dec!(55980.12));
            }
            ParsedMessage::Unknown => panic!("Expected Tick"),
        }
    }

    #[test]
    fn test_parse_high_precision_price() {
        let json = r#"{"e": "24hrMiniTicker", "s": "BTCEUR", "c": "55980.123456789012"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Tick(tick) => {
                assert_eq!(tick.last_price, dec!(55980.123456789012));
            }
            ParsedMessage::Unknown => panic!("Expected Tick"),
        }
    }

    #[test]
    fn test_parse_non_numeric_price() {
        let json = r#"{"e": "24hrMiniTicker", "s": "BTCEUR", "c": "not-a-price"}"#;
        assert!(matches!(
            parse_message(json),
            Err(ParseError::Price { .. })
        ));

        let json = r#"{"e": "24hrMiniTicker", "s": "BTCEUR", "c": "NaN"}"#;
        assert!(matches!(
            parse_message(json),
            Err(ParseError::Price { .. })
        ));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse_message("{not json"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_parse_unknown_event() {
        let json = r#"{"e": "24hrTicker", "s": "BTCEUR", "c": "55980.12"}"#;
        assert!(matches!(
            parse_message(json).unwrap(),
            ParsedMessage::Unknown
        ));

        let json = r#"{"result": null, "id": 1}"#;
        assert!(matches!(
            parse_message(json).unwrap(),
            ParsedMessage::Unknown
        ));
    }
}
