//! CLI command implementations

pub(crate) mod common;
pub(crate) mod create;
pub(crate) mod down;
pub(crate) mod fix;
pub(crate) mod status;
pub(crate) mod up;
