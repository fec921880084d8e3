use super::config::SyllableTables;
use crate::unicode::{is_small_kana, is_sokuon};

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'i' | 'u' | 'e' | 'o')
}

/// Output buffer that remembers where the last syllable starts, so that a
/// following small kana can rewrite it.
struct Romanized<'a> {
    buf: String,
    last: Option<usize>,
    sokuon: Option<&'a str>,
}

impl<'a> Romanized<'a> {
    fn new(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            last: None,
            sokuon: None,
        }
    }

    /// Emit a pending sokuon on its own (nothing geminable followed it).
    fn flush_sokuon(&mut self) {
        if let Some(reading) = self.sokuon.take() {
            self.last = Some(self.buf.len());
            self.buf.push_str(reading);
        }
    }

    fn push_syllable(&mut self, reading: &str) {
        if self.sokuon.is_some() {
            if let Some(lead) = geminate_lead(reading) {
                self.sokuon = None;
                self.last = Some(self.buf.len());
                self.buf.push(lead);
                self.buf.push_str(reading);
                return;
            }
            self.flush_sokuon();
        }
        self.last = Some(self.buf.len());
        self.buf.push_str(reading);
    }

    fn push_verbatim(&mut self, ch: char) {
        self.flush_sokuon();
        self.last = None;
        self.buf.push(ch);
    }

    fn attach_small(&mut self, glide: &str) {
        self.flush_sokuon();
        let Some(start) = self.last else {
            self.last = Some(self.buf.len());
            self.buf.push_str(glide);
            return;
        };
        match merge_small(&self.buf[start..], glide) {
            Some(merged) => {
                self.buf.truncate(start);
                self.buf.push_str(&merged);
            }
            None => self.buf.push_str(glide),
        }
    }

    fn finish(mut self) -> String {
        self.flush_sokuon();
        self.buf
    }
}

/// The consonant a sokuon doubles in front of `reading`, if any.
/// "chi" geminates as "tchi"; vowels and "n" do not geminate.
fn geminate_lead(reading: &str) -> Option<char> {
    if reading.starts_with("ch") {
        return Some('t');
    }
    let first = reading.chars().next()?;
    if first.is_ascii_lowercase() && !is_vowel(first) && first != 'n' {
        Some(first)
    } else {
        None
    }
}

/// Combine the previous syllable with a small kana's glide.
///
/// Returns `None` when the glide should simply be appended.
fn merge_small(prev: &str, glide: &str) -> Option<String> {
    let vowel = prev.chars().last().filter(|&c| is_vowel(c))?;
    let body = &prev[..prev.len() - 1];

    if let Some(glide_vowel) = glide.strip_prefix('y') {
        // ゃゅょ palatalize an i-syllable: ki+ya → kya, shi+ya → sha
        if vowel != 'i' || body.is_empty() {
            return None;
        }
        if body.ends_with("sh") || body.ends_with("ch") || body.ends_with('j') {
            return Some(format!("{body}{glide_vowel}"));
        }
        return Some(format!("{body}{glide}"));
    }

    if body.is_empty() {
        // Bare vowel + small vowel: ウィ → wi, イェ → ye
        if glide.len() != 1 {
            return None;
        }
        return match vowel {
            'u' => Some(format!("w{glide}")),
            'i' => Some(format!("y{glide}")),
            _ => None,
        };
    }

    // fu+a → fa, te+i → ti, shi+e → she, ku+wa → kwa
    Some(format!("{body}{glide}"))
}

impl SyllableTables {
    /// Romanize a kana string. Total: characters missing from the tables are
    /// copied through unchanged.
    ///
    /// Particle kana (は, へ, を) take their particle reading everywhere
    /// except at the start of the string.
    pub fn romanize(&self, kana: &str) -> String {
        let mut out = Romanized::new(kana.len());

        for (pos, ch) in kana.chars().enumerate() {
            if is_sokuon(ch) {
                if let Some(reading) = self.kana.get(&ch) {
                    out.flush_sokuon();
                    out.sokuon = Some(reading.as_str());
                    continue;
                }
            }

            let reading = if pos > 0 {
                self.particle_readings
                    .get(&ch)
                    .or_else(|| self.kana.get(&ch))
            } else {
                self.kana.get(&ch)
            };

            match reading {
                Some(r) if is_small_kana(ch) => out.attach_small(r),
                Some(r) => out.push_syllable(r),
                None => out.push_verbatim(ch),
            }
        }

        out.finish()
    }
}
