//! Caption similarity.
//!
//! Sørensen–Dice coefficient over character bigrams, case-insensitive.
//! Bigram overlap tolerates the truncation and light reformatting scrapers
//! apply to captions (dropped quotes, emoji, trailing hashtags) better than
//! edit distance, which penalizes every missing trailing character.
//!
//! Whitespace is dropped before forming bigrams, so captions reflowed by the
//! scraper (newlines, doubled spaces) score the same as the original.
//! Lengths are counted in chars: accented letters and emoji weigh the same
//! as ASCII letters.

use std::collections::HashMap;

/// Normalized similarity in `[0, 1]`. Symmetric; `1.0` for identical
/// non-empty input; `0.0` when either side is empty or whitespace-only.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalized_chars(a);
    let b = normalized_chars(b);

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut a_bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *a_bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0_usize;
    for pair in b.windows(2) {
        if let Some(count) = a_bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}

/// Lower-cased chars with whitespace removed.
fn normalized_chars(s: &str) -> Vec<char> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("astuces productivité", "astuces productivité"), 1.0);
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(similarity("Morning Routine", "morning routine"), 1.0);
        assert_eq!(similarity("Été à Montréal ☀️", "été à montréal ☀️"), 1.0);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(similarity("", "morning routine"), 0.0);
        assert_eq!(similarity("morning routine", ""), 0.0);
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("   ", "   "), 0.0);
    }

    #[test]
    fn whitespace_layout_is_ignored() {
        assert_eq!(similarity("pour tout", "pourtout"), 1.0);
        assert_eq!(similarity("ma routine\n\ndu matin", "ma  routine du matin"), 1.0);
    }

    #[test]
    fn symmetric() {
        let pairs = [
            ("commente guide pour recevoir mon ebook", "commente 'guide' pour recevoir"),
            ("abcdef", "abcdxy"),
            ("recette carbonara", "carbonara maison"),
            ("routine beauté été 🌸✨", "ma routine beauté d'été 🌸✨🔥"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn more_shared_bigrams_scores_higher() {
        let base = "recette pates carbonara facile";
        let close = similarity(base, "recette de pates carbonara");
        let far = similarity(base, "recette carbonara maison");
        let unrelated = similarity(base, "astuces productivité");
        assert!(close > far);
        assert!(far > unrelated);
    }

    #[test]
    fn bounded() {
        let score = similarity("commente guide", "commente 'guide' pour recevoir mon ebook");
        assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn known_dice_value() {
        // 5 bigrams each, 3 shared: 2 * 3 / 10
        assert_eq!(similarity("abcdef", "abcdxy"), 0.6);
    }

    #[test]
    fn known_dice_value_with_accents_and_emoji() {
        // "crèmebrûlée🍮" has 12 chars, "crèmebrûléemaison" 17; 10 bigrams shared
        assert_eq!(similarity("crème brûlée 🍮", "crème brûlée maison"), 20.0 / 27.0);
    }

    #[test]
    fn accented_caption_clears_default_threshold() {
        let score = similarity("routine beauté été 🌸✨", "ma routine beauté d'été 🌸✨🔥");
        assert!(score > 0.8, "got {score}");
    }
}
