pub mod store;
pub mod sweeper;
pub mod types;

pub use store::SessionStore;
pub use sweeper::run_sweeper;
pub use types::{ClaimedJob, Session, SessionState};
