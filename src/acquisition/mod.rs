//! Page acquisition and probability extraction.
//!
//! Two ways to obtain the forecast page (rendered via the browser module,
//! static via plain HTTP) feed one extraction engine. The static path is
//! the fallback and the only one allowed to use the page-wide sweep.

pub mod extractor;
pub mod static_fetch;
