pub mod grouping;
pub mod inline;
pub mod resolver;
pub mod span;
pub mod structured;

pub use grouping::*;
pub use inline::*;
pub use resolver::*;
pub use span::*;
pub use structured::*;

use crate::models::{EvidenceFileRef, SeekTarget, SeekUnit};
use crate::sanitize::{page_number, parse};

/// Where a reference into `file` should navigate.
///
/// Audio seeks to the parsed time in seconds; documents open at the first
/// number in the reference, page 1 when there is none or it is 0.
pub fn seek_target(file: &EvidenceFileRef, ref_value: &str) -> SeekTarget {
    match file.evidence_type.seek_unit() {
        SeekUnit::Seconds => SeekTarget::Seconds(parse(ref_value).seek_value),
        SeekUnit::Page => SeekTarget::Page(page_number(ref_value).unwrap_or(1).max(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EvidenceType;

    #[test]
    fn test_seek_target_by_file_type() {
        let audio = EvidenceFileRef::new("a", "a.mp3", EvidenceType::Audio);
        let doc = EvidenceFileRef::new("d", "d.pdf", EvidenceType::Pdf);

        assert_eq!(seek_target(&audio, "01:05"), SeekTarget::Seconds(65));
        assert_eq!(seek_target(&audio, "??"), SeekTarget::Seconds(0));
        assert_eq!(seek_target(&doc, "Pág 12"), SeekTarget::Page(12));
        assert_eq!(seek_target(&doc, "capa"), SeekTarget::Page(1));
        assert_eq!(SeekTarget::Page(12).value(), 12);
    }

    #[test]
    fn test_document_page_never_zero() {
        let doc = EvidenceFileRef::new("d", "Contrato.pdf", EvidenceType::Pdf);

        assert_eq!(seek_target(&doc, "00:10"), SeekTarget::Page(1));
        assert_eq!(seek_target(&doc, "Pág 0"), SeekTarget::Page(1));
    }
}
