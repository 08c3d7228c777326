//! Linescope Library
//!
//! Serial port line monitor library providing port enumeration and a
//! single-session serial read/write state machine with push events.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::event::{DataEvent, ErrorEvent, OpOutcome, SessionEvent};
pub use crate::core::framing::LineFramer;
pub use crate::core::session::SerialSession;
pub use crate::domain::config::LinescopeConfig;
pub use crate::domain::error::{LinescopeError, LinescopeResult};
pub use crate::infrastructure::ports::{list_ports, PortDescriptor};
