//! Indicator text rendering.

use crate::api::Quote;
use crate::state::Source;
use rust_decimal::{Decimal, RoundingStrategy};

/// Shown instead of prices while nothing is watched.
pub const EMPTY_PROMPT: &str = "select coin";

const PRICE_DECIMALS: u32 = 3;
const CHANGE_DECIMALS: u32 = 2;

/// Everything one refresh cycle shows.
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    /// Active source, `None` when unset.
    pub source: Option<Source>,
    /// One quote per watched token, in watch order.
    pub quotes: Vec<Quote>,
}

/// Build the indicator text for a frame.
///
/// `"<source>: "` followed by one segment per quote, or the empty prompt.
pub fn render_title(frame: &RenderFrame) -> String {
    let mut title = format!("{}: ", Source::resolve(frame.source).label());

    if frame.quotes.is_empty() {
        title.push_str(EMPTY_PROMPT);
        return title;
    }

    for quote in &frame.quotes {
        match &quote.result {
            Ok(token) => {
                let price = token.price_usd.unwrap_or_default();
                title.push_str(&format!(
                    "{} - {}$ ",
                    token.symbol,
                    format_fixed(price, PRICE_DECIMALS)
                ));

                if let Some(change) = token.change_percent_24h.filter(|c| !c.is_zero()) {
                    title.push_str(&format!("[{}%]  ", format_fixed(change, CHANGE_DECIMALS)));
                }
            }
            Err(err) => {
                title.push_str(&format!("{} - {} ", quote.token.symbol, err));
            }
        }
    }

    title
}

/// Round half away from zero and pad to exactly `decimals` places.
fn format_fixed(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}
