use std::collections::BTreeSet;

use tracing::debug;

use super::config::SyllableTables;

/// Maximum number of syllables a romanized query is split into.
///
/// Each part must match a table entry on its own, so the number of
/// segmentations grows exponentially with this bound. Three parts covers
/// short words ("ni"+"ho"+"n"); longer queries resolve only if a table entry
/// spans several syllables, otherwise they yield no candidates.
pub const MAX_SEGMENTS: usize = 3;

/// Shortest input, in characters, for which three-part splits are tried.
pub const THREE_PART_MIN_LEN: usize = 4;

/// Segment budget for an input of `len` characters.
fn segment_budget(len: usize) -> usize {
    if len >= THREE_PART_MIN_LEN {
        MAX_SEGMENTS
    } else {
        2
    }
}

impl SyllableTables {
    /// All kana spellings of a single romanized syllable: particle forms,
    /// then hiragana, then katakana.
    fn resolve(&self, syllable: &str) -> Vec<&str> {
        let mut forms: Vec<&str> = Vec::new();
        if let Some(particles) = self.particles.get(syllable) {
            forms.extend(particles.iter().map(String::as_str));
        }
        if let Some(hiragana) = self.hiragana.get(syllable) {
            forms.push(hiragana);
        }
        if let Some(katakana) = self.katakana.get(syllable) {
            forms.push(katakana);
        }
        forms
    }

    /// Kana spellings for every segmentation of `input` into at most
    /// `max_parts` resolvable parts.
    fn expand(&self, input: &str, max_parts: usize) -> Vec<String> {
        let mut found: Vec<String> = self
            .resolve(input)
            .into_iter()
            .map(str::to_string)
            .collect();

        if max_parts > 1 {
            for (split, _) in input.char_indices().skip(1) {
                let (head, tail) = input.split_at(split);
                let heads = self.resolve(head);
                if heads.is_empty() {
                    continue;
                }
                let tails = self.expand(tail, max_parts - 1);
                for h in &heads {
                    for t in &tails {
                        found.push(format!("{h}{t}"));
                    }
                }
            }
        }

        found
    }

    /// Every kana string consistent with a segmentation of `romaji` into
    /// 1..=[`MAX_SEGMENTS`] syllables. Three-part splits are only tried for
    /// inputs of [`THREE_PART_MIN_LEN`] characters or more. Each part may
    /// resolve to hiragana, katakana or a particle, and all combinations are
    /// returned.
    ///
    /// The input is trimmed and lowercased first. An empty set means no
    /// segmentation resolved.
    pub fn kana_candidates(&self, romaji: &str) -> BTreeSet<String> {
        let input = romaji.trim().to_lowercase();
        if input.is_empty() {
            return BTreeSet::new();
        }

        let candidates: BTreeSet<String> = self
            .expand(&input, segment_budget(input.chars().count()))
            .into_iter()
            .collect();
        if candidates.is_empty() {
            debug!(romaji = %input, "no candidate segmentation");
        } else {
            debug!(romaji = %input, candidates = candidates.len());
        }
        candidates
    }
}
