//! # Relay Mailer
//!
//! Delivers order confirmations through an HTTP mail relay.
//!
//! Each message is posted as JSON `{from, to, subject, html}` with the relay
//! secret as a bearer token. The raw body is signed with HMAC-SHA256 under the
//! same secret and the hex digest sent in `X-Signature`.

use crate::config::MailConfig;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use shop_core::{ConfirmationSender, Order, StoreError, StoreResult};
use std::fmt::Write as _;
use tracing::{error, info, instrument, warn};

/// Header carrying the hex HMAC-SHA256 of the request body
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Confirmation sender backed by an HTTP mail relay
pub struct RelayMailer {
    config: MailConfig,
    client: Client,
}

impl RelayMailer {
    /// Create a mailer; fails only if the HTTP client cannot be built
    pub fn new(config: MailConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Configuration(format!("HTTP client: {}", e)))?;

        if !config.is_configured() {
            warn!("Mail relay not configured: set MAIL_RELAY_URL, MAIL_USER and MAIL_PASS");
        }

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> StoreResult<Self> {
        Self::new(MailConfig::from_env())
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }
}

#[async_trait]
impl ConfirmationSender for RelayMailer {
    #[instrument(skip(self, order), fields(order_id = %order.order_id()))]
    async fn send_confirmation(&self, contact: &str, order: &Order) -> StoreResult<()> {
        let undeliverable = |reason: String| StoreError::NotificationUndeliverable {
            contact: contact.to_string(),
            reason,
        };

        let (Some(url), Some(sender), Some(secret)) = (
            self.config.relay_url.as_deref(),
            self.config.sender.as_deref(),
            self.config.secret.as_deref(),
        ) else {
            return Err(undeliverable("mail relay not configured".to_string()));
        };

        let message = RelayMessage {
            from: sender,
            to: contact,
            subject: confirmation_subject(order),
            html: render_confirmation(order)?,
        };
        let body = serde_json::to_vec(&message)?;
        let signature = compute_hmac_sha256(secret, &body)?;

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", secret))
            .header("Content-Type", "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await
            .map_err(|e| undeliverable(format!("relay unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("Mail relay error: status={}, body={}", status, detail);
            return Err(undeliverable(format!("relay returned HTTP {}", status)));
        }

        info!("Confirmation email sent to {}", contact);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    html: String,
}

/// Subject line for an order confirmation
pub fn confirmation_subject(order: &Order) -> String {
    format!("Order Confirmation #{}", order.order_id())
}

/// HTML body listing each line, the total and the payment method
pub fn render_confirmation(order: &Order) -> StoreResult<String> {
    let mut html = String::from("<html><body style='font-family: Arial, sans-serif;'>");
    html.push_str("<h2 style='color: #28a745;'>Thank you for your purchase!</h2>");
    html.push_str("<h3>Order Details:</h3>");
    let _ = write!(
        html,
        "<p><strong>Order Number:</strong> {}</p>",
        escape(order.order_id())
    );
    html.push_str("<table border='1' cellpadding='10' style='border-collapse: collapse; width: 100%;'>");
    html.push_str("<tr style='background-color: #f2f2f2;'>");
    html.push_str("<th>Product</th><th>Quantity</th><th>Price</th><th>Total</th></tr>");

    for item in order.line_items() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&item.product_name),
            item.quantity,
            money(item.current_price),
            money(item.subtotal()?)
        );
    }
    html.push_str("</table>");

    if let Some(description) = order.discount_description() {
        let _ = write!(
            html,
            "<p><strong>Discount ({}):</strong> -{}</p>",
            escape(description),
            money(order.discount())
        );
    }
    let _ = write!(
        html,
        "<h3 style='color: #28a745;'>Total: {}</h3>",
        money(order.total_amount())
    );
    let _ = write!(
        html,
        "<p><strong>Payment Method:</strong> {}</p>",
        escape(order.payment_provider())
    );
    html.push_str("<hr/><p style='color: #666;'>Best regards,<br/>The Storefront Team</p>");
    html.push_str("</body></html>");
    Ok(html)
}

fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
}

fn compute_hmac_sha256(secret: &str, message: &[u8]) -> StoreResult<String> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| StoreError::Internal(format!("HMAC key: {}", e)))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_order() -> Order {
        serde_json::from_value(json!({
            "orderId": "AB12CD34",
            "customerContact": "buyer@example.com",
            "lineItems": [
                {"productId": "P002", "productName": "T-Shirt", "quantity": 2, "currentPrice": 20},
                {"productId": "P003", "productName": "Tom & Jerry <Box Set>", "quantity": 1, "currentPrice": 15}
            ],
            "subtotal": 55,
            "discount": 0,
            "totalAmount": 55,
            "paymentProvider": "PayPal",
            "createdAt": "2024-05-01T12:00:00Z"
        }))
        .unwrap()
    }

    fn mailer_for(server: &MockServer) -> RelayMailer {
        let config = MailConfig::new(
            format!("{}/v1/send", server.uri()),
            "shop@example.com",
            "relay-secret",
        );
        RelayMailer::new(config).unwrap()
    }

    #[test]
    fn test_subject_and_body() {
        let order = sample_order();
        let html = render_confirmation(&order).unwrap();

        assert_eq!(confirmation_subject(&order), "Order Confirmation #AB12CD34");
        assert!(html.contains("<td>T-Shirt</td><td>2</td><td>$20.00</td><td>$40.00</td>"));
        assert!(html.contains("Tom &amp; Jerry &lt;Box Set&gt;"));
        assert!(html.contains("Total: $55.00"));
        assert!(html.contains("<strong>Payment Method:</strong> PayPal"));
        assert!(!html.contains("Discount ("));
    }

    #[test]
    fn test_overflowing_line_is_not_rendered() {
        let order: Order = serde_json::from_value(json!({
            "orderId": "AB12CD34",
            "customerContact": "buyer@example.com",
            "lineItems": [
                {"productId": "P009", "productName": "Yacht", "quantity": 4_000_000_000u32, "currentPrice": 1e20}
            ],
            "subtotal": 0,
            "discount": 0,
            "totalAmount": 0,
            "paymentProvider": "PayPal",
            "createdAt": "2024-05-01T12:00:00Z"
        }))
        .unwrap();

        assert!(matches!(
            render_confirmation(&order),
            Err(StoreError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_hmac_sha256() {
        let sig = compute_hmac_sha256("relay-secret", b"{}").unwrap();

        // Should produce a 64-character hex string
        assert_eq!(sig.len(), 64);
        assert_eq!(sig, compute_hmac_sha256("relay-secret", b"{}").unwrap());
        assert_ne!(sig, compute_hmac_sha256("other-secret", b"{}").unwrap());
    }

    #[tokio::test]
    async fn test_sends_signed_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .and(header("authorization", "Bearer relay-secret"))
            .and(header_exists("x-signature"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = mailer_for(&server);
        mailer
            .send_confirmation("buyer@example.com", &sample_order())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["to"], "buyer@example.com");
        assert_eq!(body["from"], "shop@example.com");
        assert_eq!(body["subject"], "Order Confirmation #AB12CD34");

        let signature = requests[0]
            .headers
            .get("x-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert_eq!(
            signature,
            compute_hmac_sha256("relay-secret", &requests[0].body).unwrap()
        );
    }

    #[tokio::test]
    async fn test_relay_rejection_is_undeliverable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("smtp down"))
            .mount(&server)
            .await;

        let result = mailer_for(&server)
            .send_confirmation("buyer@example.com", &sample_order())
            .await;

        match result {
            Err(StoreError::NotificationUndeliverable { contact, reason }) => {
                assert_eq!(contact, "buyer@example.com");
                assert!(reason.contains("500"));
            }
            other => panic!("expected NotificationUndeliverable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_never_sends() {
        let mailer = RelayMailer::new(MailConfig::default()).unwrap();
        assert!(!mailer.is_configured());

        let result = mailer
            .send_confirmation("buyer@example.com", &sample_order())
            .await;

        assert!(matches!(
            result,
            Err(StoreError::NotificationUndeliverable { .. })
        ));
    }
}
