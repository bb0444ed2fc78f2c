//! Name collation for explorer listings.
//!
//! Names compare at base strength: letters that differ only by case or by
//! diacritics are equal (`a = A = á`, `ø = o`, `æ = ae`, `ß = ss`, `a ≠ b`).
//! Runs of digits compare by numeric value, so `file2` sorts before `file10`.
//! Whitespace and punctuation are significant and sort before letters, so
//! `"a b"` precedes `"ab"`.
//!
//! The collation is the same for every locale. Folding uses Unicode
//! canonical decomposition, so precomposed and decomposed spellings of the
//! same letter always compare equal. Latin letters with no decomposition
//! (stroked letters, ligatures, sharp s) fold through their ASCII
//! transliteration.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Reduce a name to its base letters.
///
/// Decomposes to NFD, lowercases, drops combining marks, and transliterates
/// the remaining non-ASCII Latin letters:
/// - `"Café"` → `"cafe"`
/// - `"ÅNGSTRÖM"` → `"angstrom"`
/// - `"Ærøskøbing"` → `"aeroskobing"`
pub fn fold(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name
        .nfd()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
    {
        push_base_letter(&mut folded, c);
    }
    folded
}

fn push_base_letter(out: &mut String, c: char) {
    if c.is_ascii() || !c.is_alphabetic() || !is_latin(c) {
        out.push(c);
        return;
    }
    match deunicode::deunicode_char(c) {
        Some(base) if !base.is_empty() && base.chars().all(|b| b.is_ascii_alphabetic()) => {
            out.extend(base.chars().map(|b| b.to_ascii_lowercase()));
        }
        _ => out.push(c),
    }
}

/// Latin-1 Supplement, Latin Extended-A/B and Latin Extended Additional.
fn is_latin(c: char) -> bool {
    matches!(c, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}')
}

/// Compare two display names, ascending.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    compare_folded(&fold(a), &fold(b))
}

/// Character-by-character comparison where aligned digit runs compare as
/// numbers. A name that is a prefix of another sorts first.
fn compare_folded(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let ord = compare_digit_runs(&take_digits(&mut a), &take_digits(&mut b));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

/// Numeric comparison of two ASCII digit runs of any length.
/// Leading zeros do not count: `"007"` equals `"7"`.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_case_and_accents() {
        assert_eq!(fold("Café"), "cafe");
        assert_eq!(fold("ÅNGSTRÖM"), "angstrom");
        assert_eq!(fold("naïve"), "naive");
    }

    #[test]
    fn fold_handles_decomposed_input() {
        // "e" followed by U+0301 COMBINING ACUTE ACCENT
        assert_eq!(fold("cafe\u{0301}"), "cafe");
    }

    #[test]
    fn fold_transliterates_undecomposable_latin_letters() {
        assert_eq!(fold("Ærøskøbing"), "aeroskobing");
        assert_eq!(fold("Straße"), "strasse");
        assert_eq!(fold("Łódź"), "lodz");
    }

    #[test]
    fn fold_keeps_non_latin_scripts() {
        assert_eq!(fold("Ωμέγα"), "ωμεγα");
        assert_eq!(fold("日本"), "日本");
    }

    #[test]
    fn case_only_difference_is_equal() {
        assert_eq!(compare_names("README", "readme"), Ordering::Equal);
    }

    #[test]
    fn accent_only_difference_is_equal() {
        assert_eq!(compare_names("café", "CAFE"), Ordering::Equal);
        assert_eq!(compare_names("résumé", "resume"), Ordering::Equal);
    }

    #[test]
    fn stroked_letters_and_ligatures_are_equal_to_base_letters() {
        assert_eq!(compare_names("ø", "o"), Ordering::Equal);
        assert_eq!(compare_names("æ", "ae"), Ordering::Equal);
        assert_eq!(compare_names("ß", "ss"), Ordering::Equal);
        assert_eq!(compare_names("Øresund", "oresund"), Ordering::Equal);
    }

    #[test]
    fn base_letters_still_differ() {
        assert_eq!(compare_names("a", "b"), Ordering::Less);
        assert_eq!(compare_names("b", "a"), Ordering::Greater);
    }

    #[test]
    fn case_does_not_put_capitals_first() {
        // Byte order would place "B" (0x42) before "a" (0x61).
        assert_eq!(compare_names("a", "B"), Ordering::Less);
        assert_eq!(compare_names("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn digit_runs_compare_by_value() {
        assert_eq!(compare_names("file2", "file10"), Ordering::Less);
        assert_eq!(compare_names("file10", "file2"), Ordering::Greater);
        assert_eq!(compare_names("chapter 9", "chapter 12"), Ordering::Less);
        assert_eq!(compare_names("v1.9", "v1.10"), Ordering::Less);
    }

    #[test]
    fn digit_runs_longer_than_u64_still_compare() {
        let big = "99999999999999999999999";
        let bigger = "100000000000000000000000";
        assert_eq!(compare_names(big, bigger), Ordering::Less);
        assert_eq!(compare_names("007", "7"), Ordering::Equal);
    }

    #[test]
    fn empty_sorts_first() {
        assert_eq!(compare_names("", "a"), Ordering::Less);
        assert_eq!(compare_names("a", ""), Ordering::Greater);
        assert_eq!(compare_names("", ""), Ordering::Equal);
        assert_eq!(compare_names("", " "), Ordering::Less);
    }

    #[test]
    fn whitespace_is_significant() {
        assert_eq!(compare_names("a b", "ab"), Ordering::Less);
        assert_eq!(compare_names("ab", "a b"), Ordering::Greater);
        assert_eq!(compare_names("file 2", "file2"), Ordering::Less);
        assert_eq!(compare_names("Zebra folder", "Zebrafolder"), Ordering::Less);
    }

    #[test]
    fn digits_sort_before_letters() {
        assert_eq!(compare_names("2024 notes", "apple"), Ordering::Less);
    }
}
