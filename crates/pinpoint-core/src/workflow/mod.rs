//! The two ways of getting ranked descriptions out of the model.
//!
//! - [`JudgeOrchestrator`]: three independent description calls, then one
//!   comparative judge call (four requests, strictly in sequence).
//! - [`SingleCallOrchestrator`]: upload the image once and ask for the
//!   descriptions and the judgment in a single JSON-constrained request.

mod multi_call;
mod single_call;

pub use multi_call::JudgeOrchestrator;
pub use single_call::SingleCallOrchestrator;
