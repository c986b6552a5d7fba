//! Slug generation for field aliases.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Separator placed between words of a generated alias.
pub const ALIAS_SEPARATOR: char = '_';

/// ASCII approximations for common accented Latin letters.
static TRANSLITERATIONS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    let table: &[(&str, &'static str)] = &[
        ("àáâãäå", "a"),
        ("ÀÁÂÃÄÅ", "A"),
        ("æ", "ae"),
        ("Æ", "AE"),
        ("ç", "c"),
        ("Ç", "C"),
        ("èéêë", "e"),
        ("ÈÉÊË", "E"),
        ("ìíîï", "i"),
        ("ÌÍÎÏ", "I"),
        ("ñ", "n"),
        ("Ñ", "N"),
        ("òóôõöø", "o"),
        ("ÒÓÔÕÖØ", "O"),
        ("œ", "oe"),
        ("Œ", "OE"),
        ("ùúûü", "u"),
        ("ÙÚÛÜ", "U"),
        ("ýÿ", "y"),
        ("Ý", "Y"),
        ("ß", "ss"),
    ];

    table
        .iter()
        .flat_map(|(chars, ascii)| chars.chars().map(move |c| (c, *ascii)))
        .collect()
});

/// Turns free text into a lowercase, `_`-separated identifier.
///
/// Letters, digits, `-` and `_` are kept; every other run of characters
/// collapses into a single separator. Separators are never leading or
/// trailing.
///
/// ```
/// use custom_fields::models::parameterize;
///
/// assert_eq!(parameterize("Publication Date"), "publication_date");
/// assert_eq!(parameterize("pubDate"), "pubdate");
/// ```
pub fn parameterize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        let ascii = match TRANSLITERATIONS.get(&c) {
            Some(replacement) => replacement,
            None if c.is_ascii_alphanumeric() || c == '-' || c == ALIAS_SEPARATOR => {
                push_word_char(&mut slug, &mut pending_separator, c);
                continue;
            }
            None => {
                pending_separator = true;
                continue;
            }
        };
        for r in ascii.chars() {
            push_word_char(&mut slug, &mut pending_separator, r);
        }
    }

    slug
}

fn push_word_char(slug: &mut String, pending_separator: &mut bool, c: char) {
    if c == ALIAS_SEPARATOR {
        *pending_separator = true;
        return;
    }
    if *pending_separator && !slug.is_empty() {
        slug.push(ALIAS_SEPARATOR);
    }
    *pending_separator = false;
    slug.push(c.to_ascii_lowercase());
}
