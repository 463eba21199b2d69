//! Speaker conventions in transcript text: detection and renaming.

pub mod detect;
pub mod rename;

pub use detect::*;
pub use rename::*;

/// How a speaker name is written at the start of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerConvention {
    /// `**Name**` anywhere in the text
    Bold,
    /// `Name:` at the start of a line
    Colon,
    /// `Name` as the leading word, without markup
    Bare,
    /// The name does not appear
    None,
}
