//! The objects passed between the session driver, the orchestration
//! loop, and the chat provider.
//!
//! Internally, tool requests and responses stay attached to the
//! conversation messages. The provider's flat wire format (separate
//! "tool" role entries paired by tool_call_id) is produced only at the
//! provider boundary, in `providers::utils`.
pub mod message;
pub mod role;
pub mod tool;
