use std::collections::HashSet;

/// One parsed line of bulk input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewWord {
    pub hint: String,
    pub answers: Vec<String>,
}

/// Parses `hint - answer1, answer2` lines. The hint ends at the first `-`;
/// everything after it is the comma-separated answer list. Blank lines and
/// lines missing a hint or any answer are skipped.
pub fn parse_bulk(input: &str) -> Vec<NewWord> {
    input.lines().filter_map(parse_line).collect()
}

pub fn parse_line(line: &str) -> Option<NewWord> {
    let raw = line.trim();
    let (hint, rest) = raw.split_once('-')?;
    let hint = hint.trim();
    let answers = parse_answers(rest);
    if hint.is_empty() || answers.is_empty() {
        return None;
    }
    Some(NewWord {
        hint: hint.to_string(),
        answers,
    })
}

/// Comma-separated answers, trimmed, empties dropped.
pub fn parse_answers(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hints of `incoming` that already exist in `existing` or repeat within the
/// batch, compared case-insensitively. Reported once each, in input order.
pub fn duplicate_hints<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    incoming: &[NewWord],
) -> Vec<String> {
    let mut seen: HashSet<String> = existing.into_iter().map(str::to_lowercase).collect();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for word in incoming {
        let key = word.hint.to_lowercase();
        if !seen.insert(key.clone()) && reported.insert(key) {
            duplicates.push(word.hint.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bulk_lines() {
        let input = "cat - кіт, котик\n\n  dog-пес  \r\nbroken line\n- no hint\nempty -  , \n";
        let parsed = parse_bulk(input);
        assert_eq!(
            parsed,
            vec![
                NewWord {
                    hint: "cat".into(),
                    answers: vec!["кіт".into(), "котик".into()],
                },
                NewWord {
                    hint: "dog".into(),
                    answers: vec!["пес".into()],
                },
            ]
        );
    }

    #[test]
    fn test_hint_ends_at_first_dash() {
        let parsed = parse_line("city - New-York").unwrap();
        assert_eq!(parsed.hint, "city");
        assert_eq!(parsed.answers, vec!["New-York".to_string()]);
    }

    #[test]
    fn test_duplicate_hints_case_insensitive() {
        let incoming = parse_bulk("Cat - кіт\nbird - птах\nBIRD - пташка\nfish - риба");
        let dups = duplicate_hints(["cat", "Horse"], &incoming);
        assert_eq!(dups, vec!["Cat".to_string(), "BIRD".to_string()]);
    }

    #[test]
    fn test_no_duplicates() {
        let incoming = parse_bulk("sun - сонце");
        assert!(duplicate_hints(["moon"], &incoming).is_empty());
    }
}
