mod message_store;
mod user;

pub use message_store::InMemoryMessageStore;
pub use user::InMemoryUserRepository;
