//! Tokenizer
//!
//! Splits definition text into whitespace and word tokens for interactive
//! rendering. Tokens are a derived view: they are recomputed from the
//! accumulated text on every render pass and never stored.
//!
//! The split preserves the exact original spacing. Runs of whitespace are
//! kept as tokens in their own right, so concatenating the raw text of
//! every token reproduces the input exactly.

/// Punctuation stripped from both ends of a word to obtain its clean form.
pub const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')', '"', '\''];

/// A single token of definition text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A run of whitespace, verbatim
    Whitespace(String),
    /// A run of non-whitespace characters
    Word {
        /// The text as it appeared, punctuation included
        raw: String,
        /// `raw` with the punctuation set stripped from both ends. Empty
        /// for pure-punctuation words, which render as inert text.
        clean: String,
    },
}

impl Token {
    /// The raw text of this token
    pub fn raw(&self) -> &str {
        match self {
            Token::Whitespace(text) => text,
            Token::Word { raw, .. } => raw,
        }
    }

    /// The click payload for this token, if it is interactive
    pub fn clean(&self) -> Option<&str> {
        match self {
            Token::Word { clean, .. } if !clean.is_empty() => Some(clean),
            _ => None,
        }
    }

    /// Whether this token carries a click payload
    pub fn is_interactive(&self) -> bool {
        self.clean().is_some()
    }
}

/// Strip the fixed punctuation set from both ends of a word.
///
/// Idempotent: stripping an already-clean word is a no-op. Interior
/// punctuation (e.g. the apostrophe in "don't") is kept.
pub fn strip_punctuation(raw: &str) -> &str {
    raw.trim_matches(|c| PUNCTUATION.contains(&c))
}

/// Whether a clean word matches the current topic, case-insensitively.
pub fn is_topic_match(clean: &str, topic: &str) -> bool {
    clean.to_lowercase() == topic.to_lowercase()
}

/// Tokenize content into alternating word and whitespace tokens.
pub fn tokenize(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut run_is_ws = false;

    for ch in content.chars() {
        let is_ws = ch.is_whitespace();
        if !run.is_empty() && is_ws != run_is_ws {
            tokens.push(make_token(std::mem::take(&mut run), run_is_ws));
        }
        run.push(ch);
        run_is_ws = is_ws;
    }
    if !run.is_empty() {
        tokens.push(make_token(run, run_is_ws));
    }

    tokens
}

fn make_token(run: String, is_ws: bool) -> Token {
    if is_ws {
        Token::Whitespace(run)
    } else {
        let clean = strip_punctuation(&run).to_string();
        Token::Word { raw: run, clean }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rejoin(tokens: &[Token]) -> String {
        tokens.iter().map(Token::raw).collect()
    }

    #[test]
    fn test_round_trip() {
        for input in [
            "",
            " ",
            "   \t \n ",
            "word",
            "Hello, world!",
            "  leading and  trailing   ",
            "no-whitespace-at-all...",
            "line one\nline two\n",
        ] {
            assert_eq!(rejoin(&tokenize(input)), input);
        }
    }

    #[test]
    fn test_alternating_runs() {
        let tokens = tokenize("a  b");
        assert_eq!(
            tokens,
            vec![
                Token::Word {
                    raw: "a".to_string(),
                    clean: "a".to_string()
                },
                Token::Whitespace("  ".to_string()),
                Token::Word {
                    raw: "b".to_string(),
                    clean: "b".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_strip_is_idempotent() {
        for word in ["cat,", "(parens)", "\"quoted\"", "don't", "...", "plain"] {
            let once = strip_punctuation(word);
            assert_eq!(strip_punctuation(once), once);
        }
    }

    #[test]
    fn test_strip_edges_only() {
        assert_eq!(strip_punctuation("cat,"), "cat");
        assert_eq!(strip_punctuation("'quoted'"), "quoted");
        assert_eq!(strip_punctuation("don't"), "don't");
        assert_eq!(strip_punctuation("(ocean)."), "ocean");
    }

    #[test]
    fn test_pure_punctuation_is_inert() {
        let tokens = tokenize("... !?");
        assert!(tokens.iter().all(|t| !t.is_interactive()));
        assert_eq!(rejoin(&tokens), "... !?");
    }

    #[test]
    fn test_highlight_case_insensitive() {
        let tokens = tokenize("The cat, sat.");
        let clean: Vec<_> = tokens.iter().filter_map(Token::clean).collect();
        assert_eq!(clean, vec!["The", "cat", "sat"]);
        assert!(is_topic_match("cat", "Cat"));
        assert!(is_topic_match("CAT", "cat"));
        assert!(!is_topic_match("cat", "dog"));
    }
}
