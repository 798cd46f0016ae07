//! Everything that turns processed output into text or files.
pub mod file;
pub mod script;
