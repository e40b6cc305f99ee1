use once_cell::sync::Lazy;
use regex::Regex;

/// Bad-word list for the profanity filter (lowercase). Whole-word matching
/// only, so keep tiny substrings like "ass" out of the list.
const BAD_WORDS: &[&str] = &[
    "fuck",
    "fucking",
    "fucker",
    "motherfucker",
    "shit",
    "bullshit",
    "bitch",
    "asshole",
    "dick",
    "cunt",
    "bastard",
    "whore",
    "slut",
    "boobs",
    "sex",
    "porn",
];

/// Compiled whole-word, case-insensitive pattern over BAD_WORDS.
static BAD_WORDS_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = BAD_WORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("bad-word pattern is valid")
});

/// Check if text contains a listed bad word as a whole word.
pub fn contains_profanity(text: &str) -> bool {
    BAD_WORDS_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_words_case_insensitively() {
        assert!(contains_profanity("what the FUCK"));
        assert!(contains_profanity("total bullshit, honestly"));
        assert!(contains_profanity("Shit."));
    }

    #[test]
    fn does_not_match_inside_words() {
        assert!(!contains_profanity("scunthorpe united"));
        assert!(!contains_profanity("classic assessment"));
        assert!(!contains_profanity("sussex county"));
    }

    #[test]
    fn clean_text_passes() {
        assert!(!contains_profanity("have a nice day everyone"));
    }
}
