mod batch_engine;
mod summary;
#[cfg(test)]
mod tests;

pub use batch_engine::BatchEngine;
pub use summary::{BatchReport, BatchSummary};
