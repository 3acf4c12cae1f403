use std::borrow::Cow;

use fxhash::FxHashSet;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::LexicalConfig;
use crate::stem::singularize;

/// Cleans raw symptom text into canonical word tokens.
///
/// The pipeline is: optional NFKC, lower-case, drop every character that is
/// neither a word character (alphanumeric or `_`) nor whitespace, split on
/// whitespace, drop stop words, singularize. Dropped characters do not split
/// words, so `can't` becomes `cant`.
///
/// Normalization is total: any input, including the empty string, produces
/// a (possibly empty) token list.
#[derive(Debug, Clone)]
pub struct Normalizer {
    normalize_unicode: bool,
    singularize: bool,
    stop_words: FxHashSet<String>,
}

impl Normalizer {
    pub fn new(cfg: &LexicalConfig) -> Self {
        Self {
            normalize_unicode: cfg.normalize_unicode,
            singularize: cfg.singularize,
            stop_words: cfg.stop_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Returns the normalized tokens of `text`.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let cleaned = clean_chars(text, self.normalize_unicode);
        cleaned
            .split_whitespace()
            .filter(|word| !self.is_stop_word(word))
            .map(|word| {
                if self.singularize {
                    singularize(word).into_owned()
                } else {
                    word.to_string()
                }
            })
            .collect()
    }

    /// Byte-oriented entry point. Invalid UTF-8 sequences are replaced with
    /// U+FFFD, which the cleaning step then drops.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Vec<String> {
        self.normalize(&String::from_utf8_lossy(bytes))
    }

    /// Cleaned text with stop words removed, joined by single spaces.
    ///
    /// This is the form used when preparing training text; unlike
    /// [`normalize`](Self::normalize) it does not singularize.
    pub fn clean_text(&self, text: &str) -> String {
        let cleaned = clean_chars(text, self.normalize_unicode);
        let words: Vec<&str> = cleaned
            .split_whitespace()
            .filter(|word| !self.is_stop_word(word))
            .collect();
        words.join(" ")
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&LexicalConfig::default())
    }
}

/// One-shot helper for callers that do not keep a [`Normalizer`] around.
pub fn normalize(text: &str, cfg: &LexicalConfig) -> Vec<String> {
    Normalizer::new(cfg).normalize(text)
}

fn clean_chars(text: &str, normalize_unicode: bool) -> String {
    let normalized: Cow<str> = if normalize_unicode {
        Cow::Owned(text.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(text)
    };

    let mut out = String::with_capacity(normalized.len());
    // Lowercasing can expand one character into several (e.g. 'İ').
    for grapheme in normalized.graphemes(true) {
        for ch in grapheme.to_lowercase().chars() {
            if ch.is_whitespace() {
                out.push(' ');
            } else if is_word_char(ch) {
                out.push(ch);
            }
        }
    }
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        Normalizer::default().normalize(text)
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \n\t ").is_empty());
    }

    #[test]
    fn only_stop_words_yields_no_tokens() {
        assert!(tokens("Please help me, I think my...").is_empty());
    }

    #[test]
    fn chest_pain_utterance() {
        assert_eq!(
            tokens("my chest really hurts and I can't breathe"),
            vec!["chest", "really", "hurt", "and", "cant", "breathe"]
        );
    }

    #[test]
    fn tummy_utterance() {
        assert_eq!(
            tokens("my tummy feels like it's on fire"),
            vec!["tummy", "feel", "like", "its", "on", "fire"]
        );
    }

    #[test]
    fn punctuation_is_removed_not_split() {
        assert_eq!(tokens("ow!!! it's—bleeding"), vec!["ow", "itsbleeding"]);
        assert_eq!(tokens("left_arm, numb."), vec!["left_arm", "numb"]);
    }

    #[test]
    fn clean_text_matches_training_preprocessing() {
        let normalizer = Normalizer::default();
        assert_eq!(
            normalizer.clean_text("Help! I think i got my ribs fractured."),
            "ribs fractured"
        );
        assert_eq!(
            normalizer.clean_text("Please help, somebody is choking!"),
            "choking"
        );
        assert_eq!(
            normalizer.clean_text("I have a minor cut on my finger."),
            "have minor cut on finger"
        );
        assert_eq!(normalizer.clean_text(""), "");
    }

    #[test]
    fn unicode_is_normalized_before_casing() {
        // Fullwidth letters fold to ASCII under NFKC.
        assert_eq!(tokens("ＣＨＥＳＴ"), vec!["chest"]);
        assert_eq!(tokens("Café"), tokens("Cafe\u{0301}"));
    }

    #[test]
    fn without_unicode_normalization_combining_marks_drop() {
        let cfg = LexicalConfig {
            normalize_unicode: false,
            ..Default::default()
        };
        assert_eq!(normalize("Cafe\u{0301}", &cfg), vec!["cafe"]);
    }

    #[test]
    fn singularize_can_be_disabled() {
        let cfg = LexicalConfig::default().with_singularize(false);
        assert_eq!(normalize("burns everywhere", &cfg), vec!["burns", "everywhere"]);
    }

    #[test]
    fn custom_stop_words_are_case_insensitive() {
        let cfg = LexicalConfig::default().with_stop_words(["Ouch"]);
        assert_eq!(normalize("OUCH my knee", &cfg), vec!["my", "knee"]);
    }

    #[test]
    fn invalid_utf8_is_tolerated() {
        let normalizer = Normalizer::default();
        let out = normalizer.normalize_bytes(b"cut \xff\xfe finger");
        assert_eq!(out, vec!["cut", "finger"]);
    }

    #[test]
    fn emoji_and_symbols_are_stripped() {
        assert_eq!(tokens("🤕 head 💥 injury!!"), vec!["head", "injury"]);
    }
}
