//! Output formatting utilities

pub mod display;

pub use display::{GroupReport, ReportFormatter};
