//! Token and price source types.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// A tradable asset as reported by the catalog provider.
///
/// Identity is `id`: two tokens with the same id are equal no matter what
/// their last fetched values are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Provider asset id (e.g. "bitcoin").
    pub id: String,
    /// Ticker symbol (e.g. "BTC").
    pub symbol: String,
    /// Human readable name.
    pub name: String,
    /// Last fetched USD price.
    #[serde(rename = "priceUsd", default, deserialize_with = "lenient_decimal")]
    pub price_usd: Option<Decimal>,
    /// Last fetched 24h change in percent.
    #[serde(
        rename = "changePercent24Hr",
        default,
        deserialize_with = "lenient_decimal"
    )]
    pub change_percent_24h: Option<Decimal>,
    /// Free-form note carried through persistence.
    #[serde(default)]
    pub comment: String,
}

impl Token {
    /// Create a token without any price data.
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            price_usd: None,
            change_percent_24h: None,
            comment: String::new(),
        }
    }

    /// Set the price (builder style).
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price_usd = Some(price);
        self
    }

    /// Set the 24h change (builder style).
    #[cfg(test)]
    pub fn with_change(mut self, change: Decimal) -> Self {
        self.change_percent_24h = Some(change);
        self
    }

    /// Compare every field, not just the identity.
    #[cfg(test)]
    pub fn same_values(&self, other: &Token) -> bool {
        self.id == other.id
            && self.symbol == other.symbol
            && self.name == other.name
            && self.price_usd == other.price_usd
            && self.change_percent_24h == other.change_percent_24h
            && self.comment == other.comment
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Accepts decimal strings, JSON numbers, `null` and `""` (as no value).
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    let raw = Option::<Value>::deserialize(deserializer)?;
    let text = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(D::Error::custom(format!("expected a decimal, got {other}")));
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map(Some)
        .map_err(|e| D::Error::custom(format!("invalid decimal {text:?}: {e}")))
}

/// Upstream price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Catalog and quote provider; reports price and 24h change.
    #[default]
    CoinCap,
    /// Quote-only provider keyed by trading pair.
    Binance,
}

impl Source {
    /// Every selectable source in menu order.
    pub const ALL: [Source; 2] = [Source::CoinCap, Source::Binance];

    /// Label used in the menu, on the indicator and in the state file.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CoinCap => "coincap",
            Self::Binance => "binance",
        }
    }

    /// The source actually used for an optional selection.
    ///
    /// Unset falls back to the default provider.
    pub fn resolve(source: Option<Source>) -> Source {
        source.unwrap_or_default()
    }

    /// Parse a stored label. Empty or unknown labels mean "unset".
    pub fn from_label(label: &str) -> Option<Source> {
        match label.parse() {
            Ok(source) => Some(source),
            Err(UnknownSource(raw)) => {
                if !raw.is_empty() {
                    tracing::debug!(source = %raw, "unknown source, using default");
                }
                None
            }
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label that names no known source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price source: {0:?}")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coincap" => Ok(Self::CoinCap),
            "binance" => Ok(Self::Binance),
            _ => Err(UnknownSource(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equality_by_id() {
        let a = Token::new("bitcoin", "BTC", "Bitcoin").with_price(dec!(1));
        let b = Token::new("bitcoin", "XBT", "Other").with_price(dec!(2));
        assert_eq!(a, b);
        assert!(!a.same_values(&b));
        assert_ne!(a, Token::new("ethereum", "ETH", "Ethereum"));
    }

    #[test]
    fn test_deserialize_upstream_record() {
        let json = r#"{
            "id": "bitcoin",
            "rank": "1",
            "symbol": "BTC",
            "name": "Bitcoin",
            "priceUsd": "7791.7934691770748761",
            "changePercent24Hr": "-1.4691508362430571"
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.symbol, "BTC");
        assert_eq!(
            token.price_usd,
            Some(Decimal::from_str("7791.7934691770748761").unwrap())
        );
        assert_eq!(token.price_usd.unwrap().to_string(), "7791.7934691770748761");
        assert_eq!(token.comment, "");
    }

    #[test]
    fn test_deserialize_empty_and_null_values() {
        let json = r#"{"id":"x","symbol":"X","name":"X","priceUsd":null,"changePercent24Hr":""}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.price_usd, None);
        assert_eq!(token.change_percent_24h, None);

        let json = r#"{"id":"x","symbol":"X","name":"X","priceUsd":12.5}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.price_usd, Some(dec!(12.5)));
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let json = r#"{"id":"x","symbol":"X","name":"X","priceUsd":"abc"}"#;
        assert!(serde_json::from_str::<Token>(json).is_err());
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(Source::default(), Source::CoinCap);
        assert_eq!("binance".parse::<Source>(), Ok(Source::Binance));
        assert_eq!("CoinCap".parse::<Source>(), Ok(Source::CoinCap));
        assert_eq!(Source::from_label(""), None);
        assert_eq!(Source::from_label("kraken"), None);
        assert_eq!(Source::resolve(None), Source::CoinCap);
        assert_eq!(Source::Binance.to_string(), "binance");
    }
}
