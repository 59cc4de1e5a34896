//! Discovery wizard command and query handlers.

mod apply_command;
mod errors;
mod export_agreement;
mod load_session;
mod session_store;

pub use apply_command::{ApplyCommandCommand, ApplyCommandHandler};
pub use errors::DiscoveryError;
pub use export_agreement::{ExportAgreementCommand, ExportAgreementHandler};
pub use load_session::{LoadSessionHandler, LoadSessionQuery};
pub use session_store::DiscoverySessionStore;
