use icu_normalizer::ComposingNormalizerBorrowed;

/// Canonical form used to grade every answer in every mode.
///
/// Input is NFC-composed first so that decomposed Cyrillic letters (e.g. `й`
/// typed as `и` + combining breve) survive the filter below. The result is
/// lowercased with all whitespace removed, keeping only ASCII word characters
/// (`[A-Za-z0-9_]`) and Cyrillic letters.
pub fn normalize_answer(raw: &str) -> String {
    let composed = ComposingNormalizerBorrowed::new_nfc().normalize(raw);
    composed
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|&ch| is_kept(ch))
        .collect()
}

fn is_kept(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || is_cyrillic_letter(ch)
}

fn is_cyrillic_letter(ch: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&ch) && ch.is_alphabetic()
}

/// True when `input` normalizes to the same string as any accepted answer.
/// An input that normalizes to nothing never matches.
pub fn matches_any<S: AsRef<str>>(input: &str, answers: &[S]) -> bool {
    let given = normalize_answer(input);
    if given.is_empty() {
        return false;
    }
    answers
        .iter()
        .any(|answer| normalize_answer(answer.as_ref()) == given)
}
