//! Child-care enrollment intake.
//!
//! A submission flows through validation, age derivation, a transactional
//! SQLite write, and finally a best-effort e-mail to the program
//! administrator. Only the first three steps can influence the response the
//! caller receives.

pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
