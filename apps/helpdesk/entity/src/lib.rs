pub mod message;
pub mod ticket;
pub mod user;

pub use message::Model as Message;
pub use ticket::Model as Ticket;
pub use user::Model as User;
