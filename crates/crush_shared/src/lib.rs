//! Shared functionality
//!
//! This crate supplies the input stream and the error types that are used by the css3 syntax
//! crate and its collaborators.
//!

pub mod byte_stream;
pub mod errors;
