//! Direct payment links through Stripe, for users without a Lane account.
//!
//! One invoice is a product, a price on that product, and a payment link
//! selling one unit of the price.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::api::USER_AGENT;
use crate::error::InvoiceError;
use crate::invoices::{CreatedInvoice, InvoiceProvider, InvoiceRequest};

pub const STRIPE_API_URL: &str = "https://api.stripe.com";

#[derive(Deserialize, Debug)]
struct Created {
    id: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

pub struct StripeClient {
    base_url: String,
    secret_key: String,
    http_client: Client,
}

impl StripeClient {
    pub fn new(
        base_url: &str,
        secret_key: String,
        timeout: Duration,
    ) -> Result<Self, InvoiceError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
            http_client,
        })
    }

    fn post<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, InvoiceError> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        debug!(path, %status, "stripe api");

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| status.to_string());
            return Err(InvoiceError::Api {
                message: format!("failed to create {}: {}", what, detail),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl InvoiceProvider for StripeClient {
    fn name(&self) -> &'static str {
        "Stripe"
    }

    fn supports_email(&self) -> bool {
        false
    }

    fn create_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<CreatedInvoice, InvoiceError> {
        let mut product_form = vec![("name", request.product_name())];
        if !request.description.is_empty() {
            product_form.push(("description", request.description.clone()));
        }
        let product: Created =
            self.post("product", "/v1/products", &product_form)?;

        let price: Created = self.post(
            "price",
            "/v1/prices",
            &[
                ("product", product.id),
                ("unit_amount", request.amount.value().to_string()),
                ("currency", request.currency.to_string()),
            ],
        )?;

        let link: Created = self.post(
            "payment link",
            "/v1/payment_links",
            &[
                ("line_items[0][price]", price.id),
                ("line_items[0][quantity]", "1".to_string()),
            ],
        )?;

        Ok(CreatedInvoice {
            id: Some(link.id),
            payment_link: link.url,
            pdf_url: None,
            email_sent: false,
        })
    }
}
