pub mod config;
pub mod error;
pub mod types;

pub use config::AsciifyConfig;
pub use error::AsciifyError;
pub use types::{OwnerId, PhotoRef};
