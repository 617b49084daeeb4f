//! Live Price Stream
//!
//! WebSocket client for the live price endpoint: frame codec and
//! validation gate, reconnection backoff, heartbeat idle timer, and the
//! worker that ties them together.

pub mod backoff;
pub mod client;
pub mod codec;
pub mod heartbeat;

pub use backoff::{BackoffConfig, BackoffPolicy};
pub use client::{PriceStreamClient, StreamClientError};
pub use codec::{CodecError, PriceFrame, decode_point};
pub use heartbeat::IdleTimeout;

/// Market stream symbol for a dashboard token symbol, if one exists.
///
/// The default pairing is against USD; tokens with no tradable market
/// map to `None` and their stream surfaces render as unavailable.
#[must_use]
pub fn stream_symbol_for(token_symbol: Option<&str>) -> Option<String> {
    let symbol = token_symbol?;
    if symbol.is_empty() {
        return None;
    }
    Some(format!("{symbol}-USD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_tokens_to_usd_markets() {
        assert_eq!(stream_symbol_for(Some("rETH")), Some("rETH-USD".to_string()));
        assert_eq!(stream_symbol_for(Some("stETH")), Some("stETH-USD".to_string()));
    }

    #[test]
    fn missing_selection_has_no_market() {
        assert_eq!(stream_symbol_for(None), None);
        assert_eq!(stream_symbol_for(Some("")), None);
    }
}
