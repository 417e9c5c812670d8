use std::fmt;

use serde::Serialize;

use crate::billing::{Cents, Currency, Money};
use crate::error::InvoiceError;

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct InvoiceRequest {
    pub amount: Cents,
    pub currency: Currency,
    #[serde(rename = "client_name")]
    pub client: Option<String>,
    #[serde(rename = "client_email")]
    pub email: Option<String>,
    pub description: String,
    #[serde(rename = "send_email")]
    pub send: bool,
}

impl InvoiceRequest {
    pub fn total(&self) -> Money {
        Money(self.currency, self.amount)
    }

    /// Name the payment page shows for the line item.
    pub fn product_name(&self) -> String {
        match &self.client {
            Some(client) => format!("{} - {}", client, self.description),
            None => self.description.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct CreatedInvoice {
    pub id: Option<String>,
    pub payment_link: String,
    pub pdf_url: Option<String>,
    pub email_sent: bool,
}

impl fmt::Display for CreatedInvoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} ({})", self.payment_link, id),
            None => write!(f, "{}", self.payment_link),
        }
    }
}

/// Something that can turn an invoice request into a payment link.
pub trait InvoiceProvider {
    fn name(&self) -> &'static str;

    fn supports_email(&self) -> bool;

    fn create_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<CreatedInvoice, InvoiceError>;
}
