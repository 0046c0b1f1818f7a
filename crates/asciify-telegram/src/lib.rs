pub mod adapter;
pub mod allow;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod send;
pub mod status;

pub use adapter::TelegramAdapter;
pub use error::TelegramError;
pub use gateway::TelegramGateway;
