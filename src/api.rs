//! Bearer-authenticated client for the Lane backend.

use std::time::Duration;

use const_format::concatcp;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::InvoiceError;
use crate::invoices::{CreatedInvoice, InvoiceProvider, InvoiceRequest};
use crate::wire::null_as_default;

pub const USER_AGENT: &str = concatcp!("Lane-CLI/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize, Debug)]
struct InvoiceResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    payment_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pdf_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    email_sent: bool,
}

#[derive(Deserialize, Debug, PartialEq, Clone)]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Deserialize, Debug, Default)]
struct ErrorResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
}

pub struct LaneClient {
    base_url: String,
    token: String,
    http_client: Client,
}

impl LaneClient {
    pub fn new(
        base_url: &str,
        token: String,
        timeout: Duration,
    ) -> Result<Self, InvoiceError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http_client,
        })
    }

    pub fn current_user(&self) -> Result<User, InvoiceError> {
        let response = self.send(self.http_client.get(self.url("/api/v1/me")))?;
        if response.status() != StatusCode::OK {
            return Err(api_error(response));
        }
        Ok(serde_json::from_str(&response.text()?)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<Response, InvoiceError> {
        let response = request.bearer_auth(&self.token).send()?;
        debug!(url = %response.url(), status = %response.status(), "lane api");
        Ok(response)
    }
}

impl InvoiceProvider for LaneClient {
    fn name(&self) -> &'static str {
        "Lane"
    }

    fn supports_email(&self) -> bool {
        true
    }

    fn create_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<CreatedInvoice, InvoiceError> {
        let response = self.send(
            self.http_client
                .post(self.url("/api/v1/invoices"))
                .json(request),
        )?;

        if !matches!(response.status(), StatusCode::OK | StatusCode::CREATED) {
            return Err(api_error(response));
        }

        let created: InvoiceResponse = serde_json::from_str(&response.text()?)?;
        Ok(CreatedInvoice {
            id: non_empty(created.id),
            payment_link: created.payment_link,
            pdf_url: non_empty(created.pdf_url),
            email_sent: created.email_sent,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Prefers the backend's own message, falling back to the status line.
fn api_error(response: Response) -> InvoiceError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    let parsed: ErrorResponse = serde_json::from_str(&body).unwrap_or_default();

    let message = if parsed.message.is_empty() {
        format!("API error: {}", status)
    } else {
        parsed.message
    };
    InvoiceError::Api { message }
}
