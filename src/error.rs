// ===============================
// src/error.rs
// ===============================
use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure an invocation can end with.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Symbol {0} not found in exchangeInfo")]
    SymbolNotFound(String),

    #[error("Invalid order parameters: {0}")]
    InvalidOrderParameters(String),

    #[error("Adjusted quantity {quantity} exceeds maxQty {max_qty}")]
    QuantityExceedsLimit { quantity: Decimal, max_qty: Decimal },

    /// The exchange answered, but did not accept the request.
    #[error("Exchange rejected request (HTTP {status}, code {}): {message}", display_code(.code))]
    ExchangeRejection {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// No usable answer. For the order endpoint the order state is unknown.
    #[error("Transport failure on {path}{}: {source}", timeout_suffix(.timed_out))]
    TransportFailure {
        path: String,
        timed_out: bool,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to write trade history: {0}")]
    LoggingFailure(#[source] std::io::Error),

    #[error("Malformed filter for {symbol}: {reason}")]
    MalformedFilter { symbol: String, reason: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Map a reqwest failure onto the transport kind, keeping the timeout bit.
    pub fn transport(path: &str, source: reqwest::Error) -> Self {
        BotError::TransportFailure {
            path: path.to_string(),
            timed_out: source.is_timeout(),
            source,
        }
    }

    /// True when the order may or may not have reached the exchange.
    pub fn is_state_unknown(&self) -> bool {
        matches!(self, BotError::TransportFailure { .. })
    }
}

fn display_code(code: &Option<i64>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "n/a".to_string())
}

fn timeout_suffix(timed_out: &bool) -> &'static str {
    if *timed_out { " (timeout)" } else { "" }
}

pub type Result<T> = std::result::Result<T, BotError>;
