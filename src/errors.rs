//! Ambient errors: misconfiguration that is a programming error, not a
//! `Status`-worthy business outcome of a book operation.
//!
//! `OrderBook`'s own methods never return `Result` — see `types::Status` for
//! why. `EngineError` exists for the layer around the book: the benchmark
//! harness's own config validation, run before the book is ever touched.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid benchmark config: {0}")]
    InvalidConfig(String),
}
