// ===============================
// src/lib.rs
// ===============================
pub mod binance; // signer + wire models
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod filters;
pub mod logging;
pub mod normalizer;
pub mod recorder;
pub mod submitter;
pub mod workflow;

pub use client::ExchangeClient;
pub use config::{AppConfig, ClientConfig, Credentials};
pub use domain::{NormalizedOrder, OrderRequest, OrderResult, OrderType, Side};
pub use error::{BotError, Result};
pub use filters::SymbolFilters;
pub use workflow::{Decision, Outcome, PreparedOrder};
