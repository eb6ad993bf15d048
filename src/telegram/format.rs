use crate::feed::types::Entry;

/// Characters Telegram's MarkdownV2 dialect treats as markup.
const FULL_SPECIAL_CHARS: &str = "_*~`>#+-.!()";
const NO_PARENS_SPECIAL_CHARS: &str = "_*~`>#+-.!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeSet {
    #[default]
    Full,
    /// Leaves `(` and `)` alone.
    NoParens,
}

impl EscapeSet {
    pub fn chars(self) -> &'static str {
        match self {
            EscapeSet::Full => FULL_SPECIAL_CHARS,
            EscapeSet::NoParens => NO_PARENS_SPECIAL_CHARS,
        }
    }
}

pub fn escape_markdown(text: &str, set: EscapeSet) -> String {
    let special = set.chars();
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if special.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Title in backticks on the first line, link on the second.
pub fn format_message(entry: &Entry, set: EscapeSet) -> String {
    format!(
        "`{}`\n{}",
        escape_markdown(&entry.title, set),
        escape_markdown(&entry.link, set)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_parens_and_bang() {
        assert_eq!(
            escape_markdown("Hello (World)!", EscapeSet::Full),
            "Hello \\(World\\)\\!"
        );
    }

    #[test]
    fn test_no_parens_set_leaves_parens() {
        assert_eq!(
            escape_markdown("Hello (World)!", EscapeSet::NoParens),
            "Hello (World)\\!"
        );
    }

    #[test]
    fn test_every_special_char_is_prefixed() {
        let escaped = escape_markdown(FULL_SPECIAL_CHARS, EscapeSet::Full);
        let expected: String = FULL_SPECIAL_CHARS
            .chars()
            .flat_map(|c| ['\\', c])
            .collect();
        assert_eq!(escaped, expected);
    }

    #[test]
    fn test_plain_and_unicode_text_untouched() {
        let text = "普通标题 plain text 123";
        assert_eq!(escape_markdown(text, EscapeSet::Full), text);
    }

    #[test]
    fn test_format_message() {
        let entry = Entry {
            id: "42".to_string(),
            title: "New release v1.2".to_string(),
            link: "https://example.com/post-42.html".to_string(),
        };
        assert_eq!(
            format_message(&entry, EscapeSet::Full),
            "`New release v1\\.2`\nhttps://example\\.com/post\\-42\\.html"
        );
    }
}
