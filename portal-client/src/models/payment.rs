use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ars,
    Usd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Debit,
    Credit,
    Check,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub consorcio_id: String,
    #[serde(default)]
    pub payer_user: Option<String>,
    /// Decimal string on the wire, e.g. `"87500.00"`.
    pub amount: Decimal,
    pub currency: Currency,
    /// `YYYY-MM`
    pub period: String,
    pub concept: String,
    pub method: PaymentMethod,
    #[serde(default)]
    pub note: Option<String>,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Payload for recording a payment (ADMIN only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPayment {
    pub consorcio_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_user_id: Option<String>,
    pub amount: Decimal,
    pub currency: Currency,
    pub period: String,
    pub concept: String,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
