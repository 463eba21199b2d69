pub mod chat;
pub mod fact_analysis;
pub mod transcribe;

pub use chat::*;
pub use fact_analysis::*;
pub use transcribe::*;
