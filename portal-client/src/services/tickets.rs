use serde_json::json;

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    NewTicket, Paginated, Ticket, TicketComment, TicketStatus, TicketStatusUpdate,
};

const TICKETS_PATH: &str = "/tickets/tickets/";

#[derive(Clone)]
pub struct TicketsApi {
    client: ApiClient,
}

impl TicketsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        consorcio_id: &str,
        status: Option<TicketStatus>,
        page: u32,
    ) -> Result<Paginated<Ticket>, ApiError> {
        let request = ApiRequest::get(TICKETS_PATH)
            .query("consorcio_id", consorcio_id)
            .query_opt("status", status.map(|s| s.as_str()))
            .query("page", page);
        self.client.send(request).await
    }

    pub async fn ticket(&self, id: &str) -> Result<Ticket, ApiError> {
        self.client.get(&format!("{}{}/", TICKETS_PATH, id)).await
    }

    pub async fn create(&self, ticket: &NewTicket) -> Result<Ticket, ApiError> {
        self.client.post(TICKETS_PATH, ticket).await
    }

    /// Admin only.
    pub async fn update_status(
        &self,
        id: &str,
        update: &TicketStatusUpdate,
    ) -> Result<Ticket, ApiError> {
        self.client
            .post(&format!("{}{}/status/", TICKETS_PATH, id), update)
            .await
    }

    pub async fn comments(&self, id: &str) -> Result<Vec<TicketComment>, ApiError> {
        self.client
            .get(&format!("{}{}/comments/", TICKETS_PATH, id))
            .await
    }

    pub async fn add_comment(&self, id: &str, body: &str) -> Result<TicketComment, ApiError> {
        self.client
            .post(
                &format!("{}{}/comments/", TICKETS_PATH, id),
                &json!({ "body": body }),
            )
            .await
    }
}
