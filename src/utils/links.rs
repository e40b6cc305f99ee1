use once_cell::sync::Lazy;
use regex::Regex;

/// Broad link-indicator pattern: URL schemes plus the invite/shortener
/// hosts most commonly dropped into group chats.
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)https?://|t\.me/|telegram\.me/|discord\.gg/|discordapp\.com/|bit\.ly/|youtu\.be/|youtube\.com/",
    )
    .expect("link pattern is valid")
});

/// Check if text contains a link indicator (case-insensitive).
pub fn contains_link(text: &str) -> bool {
    LINK_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_schemes_and_hosts() {
        assert!(contains_link("visit http://example.com"));
        assert!(contains_link("HTTPS://EXAMPLE.COM"));
        assert!(contains_link("join t.me/spam"));
        assert!(contains_link("discord.gg/abc"));
        assert!(contains_link("watch youtu.be/xyz now"));
    }

    #[test]
    fn ignores_plain_text() {
        assert!(!contains_link("no links here, just chat"));
        assert!(!contains_link("telegram is fun"));
    }
}
