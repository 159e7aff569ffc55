use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{ActiveConsorcio, Consorcio, ConsorcioMember, Paginated};

const CONSORCIOS_PATH: &str = "/accounts/consorcios";

#[derive(Clone)]
pub struct ConsorcioApi {
    client: ApiClient,
}

impl ConsorcioApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Buildings the signed-in user belongs to.
    pub async fn my_consorcios(&self) -> Result<Vec<Consorcio>, ApiError> {
        self.client
            .get(&format!("{}/my_consorcios/", CONSORCIOS_PATH))
            .await
    }

    pub async fn consorcio(&self, id: &str) -> Result<Consorcio, ApiError> {
        self.client
            .get(&format!("{}/{}/", CONSORCIOS_PATH, id))
            .await
    }

    pub async fn members(
        &self,
        id: &str,
        search: Option<&str>,
        page: u32,
    ) -> Result<Paginated<ConsorcioMember>, ApiError> {
        let request = ApiRequest::get(format!("{}/{}/members/", CONSORCIOS_PATH, id))
            .query_opt("search", search.filter(|s| !s.is_empty()))
            .query("page", page);
        self.client.send(request).await
    }

    /// Make `consorcio` the active building for consorcio-scoped calls.
    pub fn select(&self, consorcio: &Consorcio) {
        tracing::info!(consorcio_id = %consorcio.id, "Active consorcio selected");
        self.client
            .session()
            .set_active_consorcio(Some(ActiveConsorcio::from(consorcio)));
    }

    pub fn clear_selection(&self) {
        self.client.session().set_active_consorcio(None);
    }

    pub fn active(&self) -> Option<ActiveConsorcio> {
        self.client.session().state().active_consorcio
    }
}
