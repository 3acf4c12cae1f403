use std::borrow::Cow;

const IRREGULAR: &[(&str, &str)] = &[
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("lice", "louse"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("halves", "half"),
    ("leaves", "leaf"),
    ("calves", "calf"),
    ("shelves", "shelf"),
    ("wolves", "wolf"),
    ("goes", "go"),
];

const UNCOUNTABLE: &[&str] = &[
    "news", "series", "species", "diabetes", "measles", "mumps", "rabies", "herpes", "scabies",
    "lupus", "shingles",
];

/// Reduces a lower-cased word to its singular form.
///
/// Rules are applied in order and the first match wins:
/// irregular plurals (including `goes` → `go`), uncountable nouns, words of
/// three characters or fewer, `-ss`/`-us`/`-is` endings (kept), `-ies` → `-y`
/// for words longer than four characters, `-aches` → `-ache`,
/// `-ches`/`-shes`/`-sses`/`-xes`/`-zzes` drop `es`, `-oes` drops `es` for
/// words longer than five characters, and finally a trailing `s` is dropped.
/// A single-`z` `-zes` keeps its `e` (`sneezes` → `sneeze`).
pub fn singularize(word: &str) -> Cow<'_, str> {
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return Cow::Borrowed(singular);
    }
    let char_len = word.chars().count();
    if char_len <= 3 || UNCOUNTABLE.contains(&word) {
        return Cow::Borrowed(word);
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return Cow::Borrowed(word);
    }
    if char_len > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return Cow::Owned(format!("{stem}y"));
        }
    }
    if word.ends_with("aches") {
        return Cow::Borrowed(&word[..word.len() - 1]);
    }
    let drops_es = ["ches", "shes", "sses", "xes", "zzes"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
        || (char_len > 5 && word.ends_with("oes"));
    if drops_es {
        return Cow::Borrowed(&word[..word.len() - 2]);
    }
    match word.strip_suffix('s') {
        Some(stem) => Cow::Borrowed(stem),
        None => Cow::Borrowed(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(word: &str) -> String {
        singularize(word).into_owned()
    }

    #[test]
    fn regular_plurals() {
        assert_eq!(s("ribs"), "rib");
        assert_eq!(s("burns"), "burn");
        assert_eq!(s("hurts"), "hurt");
        assert_eq!(s("bruises"), "bruise");
    }

    #[test]
    fn es_and_ies_endings() {
        assert_eq!(s("rashes"), "rash");
        assert_eq!(s("stitches"), "stitch");
        assert_eq!(s("glasses"), "glass");
        assert_eq!(s("injuries"), "injury");
        assert_eq!(s("allergies"), "allergy");
        assert_eq!(s("tomatoes"), "tomato");
        assert_eq!(s("toes"), "toe");
        assert_eq!(s("shoes"), "shoe");
        assert_eq!(s("buzzes"), "buzz");
        assert_eq!(s("fizzes"), "fizz");
        assert_eq!(s("sneezes"), "sneeze");
        assert_eq!(s("boxes"), "box");
    }

    #[test]
    fn aches_keep_their_e() {
        assert_eq!(s("headaches"), "headache");
        assert_eq!(s("aches"), "ache");
    }

    #[test]
    fn irregulars() {
        assert_eq!(s("teeth"), "tooth");
        assert_eq!(s("feet"), "foot");
        assert_eq!(s("knives"), "knife");
    }

    #[test]
    fn words_left_alone() {
        for word in [
            "virus", "bronchitis", "dizziness", "its", "gas", "diabetes", "chest", "breathe",
            "shingles", "",
        ] {
            assert_eq!(s(word), word, "{word} should be unchanged");
        }
    }

    #[test]
    fn borrowed_when_unchanged() {
        assert!(matches!(singularize("chest"), Cow::Borrowed("chest")));
    }

    #[test]
    fn multibyte_words_do_not_panic() {
        assert_eq!(s("cafés"), "café");
        assert_eq!(s("日本"), "日本");
    }
}
