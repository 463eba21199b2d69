use std::cmp::Reverse;

use crate::models::EvidenceFileRef;

/// An evidence file that matches a cited name fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub file: &'a EvidenceFileRef,
    /// Position in the evidence index
    pub index: usize,
    /// Names are equal ignoring case
    pub exact: bool,
    /// Length in characters of the contained string
    pub overlap: usize,
    /// Difference in characters between name and fragment
    pub length_gap: usize,
}

/// All files whose name contains the fragment or is contained in it,
/// ignoring case, best match first.
///
/// Ranking: exact match, then longest overlap, then closest length, then
/// index order. An empty fragment matches nothing.
pub fn rank_candidates<'a>(fragment: &str, files: &'a [EvidenceFileRef]) -> Vec<Candidate<'a>> {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return vec![];
    }
    let needle_len = needle.chars().count();

    let mut candidates: Vec<Candidate<'a>> = files
        .iter()
        .enumerate()
        .filter_map(|(index, file)| {
            let name = file.name.trim().to_lowercase();
            if name.is_empty() {
                return None;
            }
            let name_len = name.chars().count();

            let overlap = if name.contains(&needle) {
                needle_len
            } else if needle.contains(&name) {
                name_len
            } else {
                return None;
            };

            Some(Candidate {
                file,
                index,
                exact: name == needle,
                overlap,
                length_gap: name_len.abs_diff(needle_len),
            })
        })
        .collect();

    candidates.sort_by_key(|c| (!c.exact, Reverse(c.overlap), c.length_gap, c.index));
    candidates
}

/// Best evidence file for a cited name fragment
pub fn resolve<'a>(fragment: &str, files: &'a [EvidenceFileRef]) -> Option<&'a EvidenceFileRef> {
    rank_candidates(fragment, files).first().map(|c| c.file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EvidenceType;

    fn index() -> Vec<EvidenceFileRef> {
        vec![
            EvidenceFileRef::new("f1", "Depoimento_Joao_Parte2.mp3", EvidenceType::Audio),
            EvidenceFileRef::new("f2", "Depoimento_Joao.mp3", EvidenceType::Audio),
            EvidenceFileRef::new("f3", "Contrato.pdf", EvidenceType::Pdf),
        ]
    }

    #[test]
    fn test_resolve_by_substring() {
        let files = index();
        assert_eq!(resolve("contrato", &files).unwrap().id, "f3");
    }

    #[test]
    fn test_resolve_fragment_containing_name() {
        let files = index();
        let file = resolve("Ficheiro Contrato.pdf, anexo", &files).unwrap();
        assert_eq!(file.id, "f3");
    }

    #[test]
    fn test_tightest_match_wins_over_index_order() {
        let files = index();
        // Both names contain "joao"; the shorter name is the closer match
        assert_eq!(resolve("Joao", &files).unwrap().id, "f2");
    }

    #[test]
    fn test_exact_match_first() {
        let files = index();
        let ranked = rank_candidates("depoimento_joao.MP3", &files);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].file.id, "f2");
        assert!(ranked[0].exact);

        let files = vec![
            EvidenceFileRef::new("long", "Ata_Joao.mp3", EvidenceType::Audio),
            EvidenceFileRef::new("exact", "joao", EvidenceType::Audio),
        ];
        assert_eq!(resolve("Joao", &files).unwrap().id, "exact");
    }

    #[test]
    fn test_ties_fall_back_to_index_order() {
        let files = vec![
            EvidenceFileRef::new("a", "Maria_1.mp3", EvidenceType::Audio),
            EvidenceFileRef::new("b", "Maria_2.mp3", EvidenceType::Audio),
        ];
        assert_eq!(resolve("maria", &files).unwrap().id, "a");
    }

    #[test]
    fn test_unresolvable_and_empty() {
        let files = index();
        assert!(resolve("Arquivo_Inexistente", &files).is_none());
        assert!(resolve("   ", &files).is_none());
        assert!(resolve("Joao", &[]).is_none());
    }
}
