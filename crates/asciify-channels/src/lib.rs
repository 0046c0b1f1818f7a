pub mod error;
pub mod gateway;
pub mod types;

pub use error::ChannelError;
pub use gateway::Gateway;
pub use types::{BotCommand, InboundEvent, MenuOption, MessageFormat, OutboundText};
