//! URL-safe slug derivation.

/// Derive a URL-safe slug from a title or category name.
///
/// Lowercases the input, strips every character outside `[a-z0-9\s-]`,
/// collapses whitespace runs into single hyphens and collapses hyphen runs.
/// Leading and trailing hyphens are trimmed, so the result contains only
/// `[a-z0-9]` separated by single hyphens.
///
/// Non-ASCII letters (including accented ones) are stripped rather than
/// transliterated, so a mostly-accented title can produce a short slug.
/// This matches the historical behavior the rest of the site links against.
///
/// Every caller that derives a slug (post titles and category names) must go
/// through this function; the slug doubles as the category identifier.
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for ch in lowered.chars() {
        let mapped = match ch {
            'a'..='z' | '0'..='9' => ch,
            c if c.is_whitespace() => '-',
            '-' => '-',
            _ => continue,
        };

        if mapped == '-' {
            // Collapse runs of separators; defer until the next real char so
            // the slug never starts or ends with a hyphen.
            if !slug.is_empty() {
                pending_hyphen = true;
            }
        } else {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(mapped);
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Avances en IA"), "avances-en-ia");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn collapses_whitespace_and_hyphen_runs() {
        assert_eq!(slugify("  a  -  b --- c  "), "a-b-c");
    }

    #[test]
    fn no_leading_or_trailing_hyphens() {
        assert_eq!(slugify("-- edge case --"), "edge-case");
        assert_eq!(slugify("trailing-"), "trailing");
    }

    #[test]
    fn accented_characters_are_dropped() {
        // Accents vanish instead of transliterating; see doc comment.
        assert_eq!(slugify("Ética en IA"), "tica-en-ia");
        assert_eq!(slugify("  Cómo la IA!! revoluciona  "), "cmo-la-ia-revoluciona");
    }

    #[test]
    fn is_deterministic_and_ascii_safe() {
        let inputs = ["Una publicación", "123 Go!", "ñandú", ""];
        for input in inputs {
            let a = slugify(input);
            let b = slugify(input);
            assert_eq!(a, b);
            assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!a.starts_with('-') && !a.ends_with('-'));
            assert!(!a.contains("--"));
        }
    }
}
