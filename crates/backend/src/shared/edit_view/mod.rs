pub mod controls;
pub mod error;
pub mod service;
pub mod session;
pub mod session_store;
pub mod validation;

pub use error::EditError;
pub use service::{parse_answer, EditView, RenderedForm, SubmitOutcome};
pub use session::EditSession;
pub use session_store::{
    delete_session, load_session, new_session_key, purge_stale_sessions, save_session,
};
