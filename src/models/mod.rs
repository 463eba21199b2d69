pub mod citation;
pub mod evidence;
pub mod report;
pub mod transcript;

pub use citation::*;
pub use evidence::*;
pub use report::*;
pub use transcript::*;
