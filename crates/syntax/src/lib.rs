//! Syntax validation backed by tree-sitter grammars.
//!
//! Wraps one parser per supported language, created at startup and
//! reused across calls. Parser instances are not safe for concurrent
//! use, so each engine instance owns its own validator.

#![warn(missing_docs)]

mod validator;

pub use validator::{signal_name, SyntaxError, SyntaxValidator};
