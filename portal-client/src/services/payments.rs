use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{NewPayment, Paginated, Payment};

const PAYMENTS_PATH: &str = "/payments/payments/";

#[derive(Clone)]
pub struct PaymentsApi {
    client: ApiClient,
}

impl PaymentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Admins see every payment of the consorcio, members only their own.
    pub async fn list(
        &self,
        consorcio_id: &str,
        period: Option<&str>,
        page: u32,
    ) -> Result<Paginated<Payment>, ApiError> {
        let request = ApiRequest::get(PAYMENTS_PATH)
            .query("consorcio_id", consorcio_id)
            .query_opt("period", period.filter(|p| !p.is_empty()))
            .query("page", page);
        self.client.send(request).await
    }

    /// Same as [`list`](Self::list) for the session's active consorcio.
    pub async fn list_for_active(
        &self,
        period: Option<&str>,
        page: u32,
    ) -> Result<Paginated<Payment>, ApiError> {
        let consorcio_id = active_consorcio_id(&self.client)?;
        self.list(&consorcio_id, period, page).await
    }

    pub async fn payment(&self, id: &str) -> Result<Payment, ApiError> {
        self.client
            .get(&format!("{}{}/", PAYMENTS_PATH, id))
            .await
    }

    pub async fn create(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        self.client.post(PAYMENTS_PATH, payment).await
    }

    /// The receipt payload is not modelled; it is returned as raw JSON.
    pub async fn issue_receipt(&self, id: &str) -> Result<serde_json::Value, ApiError> {
        self.client
            .post(&format!("{}{}/receipt/", PAYMENTS_PATH, id), &serde_json::json!({}))
            .await
    }
}

pub(crate) fn active_consorcio_id(client: &ApiClient) -> Result<String, ApiError> {
    client
        .session()
        .state()
        .active_consorcio
        .map(|c| c.id)
        .ok_or_else(|| ApiError::InvalidRequest("no active consorcio selected".to_string()))
}
