use std::collections::BTreeMap;

/// Lowercased alphanumeric runs of `text`, in order, duplicates kept.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Term-frequency vector of `text`. Ordered so that any arithmetic over it is
/// reproducible run to run.
pub fn term_frequencies(text: &str) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for term in tokenize(text) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_folds_case() {
        let terms: Vec<String> = tokenize("STARBUCKS #123, Seattle-WA $4.50").collect();
        assert_eq!(terms, vec!["starbucks", "123", "seattle", "wa", "4", "50"]);
    }

    #[test]
    fn counts_repeats() {
        let tf = term_frequencies("Coffee coffee SHOP");
        assert_eq!(tf.get("coffee"), Some(&2));
        assert_eq!(tf.get("shop"), Some(&1));
        assert_eq!(tf.len(), 2);
    }

    #[test]
    fn empty_and_symbol_only_text_has_no_terms() {
        assert!(term_frequencies("").is_empty());
        assert!(term_frequencies(" -- ; $ ").is_empty());
    }
}
