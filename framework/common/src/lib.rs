#![allow(missing_docs, reason = "TODO remove before release")]

pub mod event;
pub mod xr;
