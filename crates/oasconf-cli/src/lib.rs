//! # oasconf-cli — Conformance Harness CLI
//!
//! Thin command-line shell over `oasconf-harness`: argument parsing,
//! logging setup, artifact writing, and exit-code mapping live here;
//! everything else is delegated to the library crates.
//!
//! ## Exit Codes
//!
//! - `0` — every failure matched the accepted baseline.
//! - `1` — unresolved regressions, a transport/validator fault, or an
//!   argument fault.

pub mod run;
