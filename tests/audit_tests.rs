//! Audit trail emitted by the signed request path.

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use common::{client_for, order_ack, setup_mock_server, ValidSignature, API_KEY, API_SECRET};
use futures_bot_rust::binance::ORDER_PATH;
use reqwest::Method;
use tokio_test::assert_ok;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// In-memory log sink shared with the subscriber.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn signed_request_is_audited_without_credentials() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path(ORDER_PATH))
        .and(ValidSignature)
        .respond_with(ResponseTemplate::new(200).set_body_json(order_ack("MARKET", "0.00", "0.002")))
        .expect(1)
        .mount(&server)
        .await;

    let logs = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();
    // current-thread runtime: the default stays on this thread across awaits
    let _guard = tracing::subscriber::set_default(subscriber);

    let client = client_for(&server);
    let params = vec![
        ("symbol".to_string(), "BTCUSDT".to_string()),
        ("side".to_string(), "BUY".to_string()),
        ("type".to_string(), "MARKET".to_string()),
        ("quantity".to_string(), "0.002".to_string()),
    ];
    let body = assert_ok!(client.signed_request(Method::POST, ORDER_PATH, params).await);
    assert_eq!(body["orderId"], 4060129917u64);

    let out = logs.contents();
    let audit: Vec<&str> = out.lines().filter(|l| l.contains("audit")).collect();
    assert!(
        audit.iter().any(|l| l.contains("signed request") && l.contains("symbol=BTCUSDT")),
        "no audit request line in:\n{out}"
    );
    assert!(
        audit.iter().any(|l| l.contains("response") && l.contains("status=200") && l.contains("4060129917")),
        "no audit response line in:\n{out}"
    );
    for line in &audit {
        assert!(!line.contains(API_KEY), "api key leaked: {line}");
        assert!(!line.contains(API_SECRET), "api secret leaked: {line}");
        assert!(!line.contains("signature="), "signature leaked: {line}");
    }
    assert!(!out.contains(API_SECRET));
}
