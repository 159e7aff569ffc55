pub mod consorcio;
pub mod pagination;
pub mod payment;
pub mod ticket;
pub mod user;

pub use consorcio::{ActiveConsorcio, Consorcio, ConsorcioMember};
pub use pagination::Paginated;
pub use payment::{Currency, NewPayment, Payment, PaymentMethod};
pub use ticket::{NewTicket, Ticket, TicketComment, TicketPriority, TicketStatus, TicketStatusUpdate};
pub use user::{Role, UserProfile};
