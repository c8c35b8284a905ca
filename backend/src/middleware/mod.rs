//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently
//! trace-id scoping.

pub mod trace;

pub use trace::Trace;
