//! Conversation flow: state machine, step table, session model

pub mod engine;
pub mod messages;
pub mod session;
pub mod steps;

pub use engine::{Completion, FlowEngine, FlowReply};
pub use session::{Field, Session};
pub use steps::{Step, Validator, STEPS};
