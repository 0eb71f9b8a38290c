// ===============================
// src/recorder.rs
// ===============================
//
// CSV trade history (append-only):
// - Satu baris per order yang berhasil ditempatkan.
// - File dibuka append per tulis, lalu ditutup.
// - Header ditulis bila file baru / kosong.
// - Parent directory dibuat otomatis.
//
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::info;

use crate::domain::OrderResult;
use crate::error::{BotError, Result};

pub const HEADER: [&str; 9] = ["Time", "Symbol", "Side", "Type", "Price", "Qty", "Notional", "OrderId", "Status"];

#[derive(Debug, Clone)]
pub struct TradeHistory {
    path: PathBuf,
}

impl TradeHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Any failure here is a `LoggingFailure`; the order itself already went through.
    pub async fn append(&self, result: &OrderResult) -> Result<()> {
        self.write_row(result).await.map_err(BotError::LoggingFailure)
    }

    async fn write_row(&self, result: &OrderResult) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;

        let mut out = String::new();
        if file.metadata().await?.len() == 0 {
            out.push_str(&csv_line(&HEADER.map(String::from)));
        }
        out.push_str(&csv_line(&row(result)));

        file.write_all(out.as_bytes()).await?;
        file.flush().await?;
        info!(path = %self.path.display(), order_id = ?result.order_id, "trade recorded");
        Ok(())
    }
}

fn row(result: &OrderResult) -> [String; 9] {
    let price = result.effective_price().map(|p| p.to_string()).unwrap_or_else(|| "0".to_string());
    let qty = if result.orig_qty.is_empty() { "0".to_string() } else { result.orig_qty.clone() };
    let notional = result.notional().map(|n| n.to_string()).unwrap_or_default();
    [
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        result.symbol.clone(),
        result.side.clone(),
        result.order_type.clone(),
        price,
        qty,
        notional,
        result.order_id.map(|id| id.to_string()).unwrap_or_default(),
        result.status.clone(),
    ]
}

// Quote only when a field needs it (RFC 4180 style).
fn csv_line(fields: &[String]) -> String {
    let mut line = fields
        .iter()
        .map(|f| {
            if f.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}
