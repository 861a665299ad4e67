//! Content-stream parsing: the lopdf-backed [`backend`] and the text-state
//! machine in [`layout`] that turns operators into lines and blocks.

pub mod backend;
pub mod layout;
