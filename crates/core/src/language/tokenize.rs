//! Split a line of English into word and punctuation tokens.

use crate::ipa::symbols::RETAINED_PUNCTUATION;
use crate::types::Token;

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '’' | '‘')
}

/// Tokenize one line of text.
///
/// Words are runs of alphanumerics, lower-cased, with apostrophes kept
/// only between two word characters ("can't", "o'clock"). Retained
/// punctuation becomes its own token; anything else separates words.
pub fn tokenize(line: &str) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut word = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            word.extend(c.to_lowercase());
            continue;
        }
        if is_apostrophe(c)
            && !word.is_empty()
            && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric())
        {
            word.push('\'');
            continue;
        }
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(&mut word)));
        }
        if RETAINED_PUNCTUATION.contains(&c) {
            tokens.push(Token::Punct(c));
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// Only the words of `line`, in order.
pub fn words(line: &str) -> Vec<String> {
    tokenize(line)
        .into_iter()
        .filter_map(|t| match t {
            Token::Word(w) => Some(w),
            Token::Punct(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            tokenize("Hello, World!"),
            vec![w("hello"), Token::Punct(','), w("world"), Token::Punct('!')]
        );
    }

    #[test]
    fn test_contractions_kept_whole() {
        assert_eq!(tokenize("I can't go."), vec![w("i"), w("can't"), w("go"), Token::Punct('.')]);
        assert_eq!(tokenize("Don’t"), vec![w("don't")]);
    }

    #[test]
    fn test_edge_apostrophes_dropped() {
        assert_eq!(tokenize("'quoted' dogs'"), vec![w("quoted"), w("dogs")]);
    }

    #[test]
    fn test_other_symbols_separate() {
        assert_eq!(tokenize("well-known (test)"), vec![w("well"), w("known"), w("test")]);
        assert_eq!(tokenize("\"yes\"; no:"), vec![w("yes"), Token::Punct(';'), w("no"), Token::Punct(':')]);
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
        assert!(words("... !").is_empty());
    }
}
