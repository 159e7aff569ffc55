pub mod auth;
pub mod consorcios;
pub mod finance;
pub mod metrics;
pub mod payments;
pub mod tickets;

pub use auth::{AuthService, Credentials};
pub use consorcios::ConsorcioApi;
pub use finance::{FinanceApi, FinanceOverview, FinanceSummary, current_period};
pub use payments::PaymentsApi;
pub use tickets::TicketsApi;
