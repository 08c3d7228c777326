// Core module - Session state machine and line framing
pub mod event;
pub mod framing;
pub mod session;

pub use event::{DataEvent, ErrorEvent, OpOutcome, SessionEvent};
pub use framing::LineFramer;
pub use session::SerialSession;
