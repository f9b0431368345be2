//! Text normalization for knowledge-base matching.
//!
//! Both the incoming message and every trigger phrase go through
//! [`normalize`] before comparison, so matching ignores case, accents
//! and punctuation:
//!
//! 1. Unicode canonical decomposition (NFD)
//! 2. Drop combining diacritical marks (U+0300–U+036F)
//! 3. Every character that is not an ASCII letter, digit or `_` becomes a space
//! 4. Collapse whitespace runs, trim, lowercase
//!
//! The output only ever contains `[a-z0-9_]` and single spaces, which makes
//! the transform idempotent.

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block.
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Fold `text` into its matching form.
///
/// ```
/// use marlos_core::normalize;
/// assert_eq!(normalize("¿Qué es una Dirección IP?"), "que es una direccion ip");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfd().filter(|c| !is_combining_diacritic(*c)) {
        if is_word_char(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_space = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_and_case_fold() {
        assert_eq!(normalize("Dirección IP"), normalize("direccion ip"));
        assert_eq!(normalize("CUÁNTA RAM"), "cuanta ram");
        assert_eq!(normalize("Ñandú"), "nandu");
    }

    #[test]
    fn punctuation_becomes_single_space() {
        assert_eq!(normalize("¿Qué es DNS?"), "que es dns");
        assert_eq!(normalize("hdd/ssd...diferencia!!"), "hdd ssd diferencia");
        assert_eq!(normalize("  ipv4   vs\tipv6 \n"), "ipv4 vs ipv6");
        assert_eq!(normalize("snake_case stays"), "snake_case stays");
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!¡¿"), "");
        // Non-Latin scripts carry no word characters.
        assert_eq!(normalize("привет"), "");
    }

    #[test]
    fn idempotent_on_samples() {
        for sample in ["Dirección IP", "¿Cómo limpiar archivos temporales?", "Ctrl+Shift+Esc", "ǅemal İstanbul"] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {sample:?}");
        }
    }
}
