//! Shared pass-contract validation (§4.3, §4.4, §4.6).
//!
//! The recording state machine itself lives in [`crate::command_buffer`]; this module holds the
//! usage-bit checks that the device dispatcher runs before handing a pass-begin call to the
//! command buffer, since they need the resource tables the command buffer doesn't have access to.

pub mod compute;
pub mod copy;
pub mod render;
