use chrono::{Datelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::payments::{PaymentsApi, active_consorcio_id};
use crate::api::{ApiClient, ApiError};
use crate::models::Payment;

/// Expected billing relative to what was collected, until the backend
/// exposes a budget endpoint.
const EXPECTED_TOTAL_FACTOR: Decimal = Decimal::from_parts(115, 0, 0, false, 2);

/// Taken from the head of the page, in the order the backend returns.
const RECENT_ACTIVITY: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub total: Decimal,
    pub collected: Decimal,
    pub pending: Decimal,
    pub health_percent: u8,
    pub consorcio_name: String,
    pub fictitious_expenses: Decimal,
    /// `collected - fictitious_expenses`
    pub operative_balance: Decimal,
}

impl FinanceSummary {
    pub fn empty(consorcio_name: impl Into<String>) -> Self {
        Self {
            total: Decimal::ZERO,
            collected: Decimal::ZERO,
            pending: Decimal::ZERO,
            health_percent: 0,
            consorcio_name: consorcio_name.into(),
            fictitious_expenses: Decimal::ZERO,
            operative_balance: Decimal::ZERO,
        }
    }

    pub fn from_payments(payments: &[Payment], consorcio_name: impl Into<String>) -> Self {
        if payments.is_empty() {
            return Self::empty(consorcio_name);
        }

        let collected: Decimal = payments.iter().map(|p| p.amount).sum();
        let total = collected * EXPECTED_TOTAL_FACTOR;
        let pending = total - collected;
        let health_percent = if total.is_zero() {
            0
        } else {
            whole(collected / total * Decimal::ONE_HUNDRED)
                .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
                .to_u8()
                .unwrap_or(0)
        };
        let fictitious_expenses = Decimal::ZERO;

        Self {
            total: whole(total),
            collected: whole(collected),
            pending: whole(pending),
            health_percent,
            consorcio_name: consorcio_name.into(),
            fictitious_expenses,
            operative_balance: whole(collected - fictitious_expenses),
        }
    }
}

fn whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceOverview {
    pub period: String,
    pub summary: FinanceSummary,
    pub recent_activity: Vec<Payment>,
}

/// Current month as `YYYY-MM`.
pub fn current_period() -> String {
    let now = Utc::now();
    format!("{:04}-{:02}", now.year(), now.month())
}

#[derive(Clone)]
pub struct FinanceApi {
    client: ApiClient,
    payments: PaymentsApi,
}

impl FinanceApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            payments: PaymentsApi::new(client.clone()),
            client,
        }
    }

    /// Summary of the active consorcio's first page of payments for `period`.
    pub async fn overview(&self, period: &str) -> Result<FinanceOverview, ApiError> {
        let consorcio_id = active_consorcio_id(&self.client)?;
        let name = self
            .client
            .session()
            .state()
            .active_consorcio
            .and_then(|c| c.name)
            .unwrap_or_else(|| consorcio_id.clone());

        let page = self.payments.list(&consorcio_id, Some(period), 1).await?;
        let summary = FinanceSummary::from_payments(&page.results, name);

        let mut recent_activity = page.results;
        recent_activity.truncate(RECENT_ACTIVITY);

        Ok(FinanceOverview {
            period: period.to_string(),
            summary,
            recent_activity,
        })
    }
}
