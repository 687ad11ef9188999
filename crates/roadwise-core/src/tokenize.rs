use regex::Regex;

/// Words with no matching signal of their own; dropped before scoring.
const STOP_WORDS: [&str; 13] = [
    "the", "a", "an", "is", "are", "at", "to", "for", "and", "or", "in", "on", "of",
];

/// Split a free-text issue description into candidate keyword tokens.
///
/// Lower-cases the text, extracts words, and emits every surviving word plus
/// each adjacent two-word phrase whose words both survive the stop-word
/// filter. Duplicates are kept; a query made solely of stop words yields an
/// empty vector, which callers must treat as zero base similarity.
pub fn tokenize(query: &str) -> Vec<String> {
    let word_re = Regex::new(r"\w+").expect("valid regex");
    let lowered = query.to_lowercase();
    let words: Vec<&str> = word_re.find_iter(&lowered).map(|m| m.as_str()).collect();

    let mut tokens = Vec::new();
    for (i, word) in words.iter().enumerate() {
        if is_stop_word(word) {
            continue;
        }
        tokens.push((*word).to_string());
        if let Some(next) = words.get(i + 1) {
            if !is_stop_word(next) {
                tokens.push(format!("{word} {next}"));
            }
        }
    }
    tokens
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
