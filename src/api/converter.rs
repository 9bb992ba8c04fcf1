//! Decoding of provider responses.

use crate::error::FetchError;
use crate::state::Token;
use rust_decimal::Decimal;
use serde::Deserialize;

/// `GET /assets/{id}` body.
#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    data: Option<Token>,
}

/// `GET /assets?limit=n` body.
#[derive(Debug, Deserialize)]
struct AssetsEnvelope {
    data: Vec<Token>,
}

/// `GET /api/v3/avgPrice` body.
#[derive(Debug, Deserialize)]
struct AvgPrice {
    price: Decimal,
}

/// Converts provider payloads to [`Token`] values.
pub struct DataConverter;

impl DataConverter {
    /// Decode a single CoinCap asset.
    pub fn asset(body: &[u8]) -> Result<Token, FetchError> {
        let envelope: AssetEnvelope =
            serde_json::from_slice(body).map_err(|e| FetchError::parse(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| FetchError::parse("response has no data"))
    }

    /// Decode a CoinCap asset list.
    pub fn assets(body: &[u8]) -> Result<Vec<Token>, FetchError> {
        let envelope: AssetsEnvelope =
            serde_json::from_slice(body).map_err(|e| FetchError::parse(e.to_string()))?;
        Ok(envelope.data)
    }

    /// Apply a Binance average price to `token`.
    ///
    /// Binance has no 24h change in this endpoint, so any change carried over
    /// from another provider is cleared.
    pub fn avg_price(token: &Token, body: &[u8]) -> Result<Token, FetchError> {
        let quote: AvgPrice =
            serde_json::from_slice(body).map_err(|e| FetchError::parse(e.to_string()))?;

        let mut updated = token.clone().with_price(quote.price);
        updated.change_percent_24h = None;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset() {
        let body = br#"{"data":{"id":"ethereum","symbol":"ETH","name":"Ethereum","priceUsd":"151.12","changePercent24Hr":"2.5"},"timestamp":1}"#;
        let token = DataConverter::asset(body).unwrap();
        assert_eq!(token.id, "ethereum");
        assert_eq!(token.price_usd, Some(dec!(151.12)));
        assert_eq!(token.change_percent_24h, Some(dec!(2.5)));
    }

    #[test]
    fn test_asset_without_data() {
        let err = DataConverter::asset(br#"{"data":null,"timestamp":1}"#).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_avg_price_clears_change() {
        let token = Token::new("bitcoin", "BTC", "Bitcoin")
            .with_price(dec!(1))
            .with_change(dec!(3.3));
        let updated = DataConverter::avg_price(&token, br#"{"mins":5,"price":"9351.75183452"}"#).unwrap();
        assert_eq!(updated.price_usd, Some(dec!(9351.75183452)));
        assert_eq!(updated.change_percent_24h, None);
        assert_eq!(updated.symbol, "BTC");
    }

    #[test]
    fn test_garbage_is_parse_failure() {
        assert!(matches!(
            DataConverter::assets(b"<html>"),
            Err(FetchError::Parse(_))
        ));
    }
}
