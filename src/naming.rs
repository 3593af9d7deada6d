//! Class-name and CSS-property naming.
//!
//! Theme categories are camel-cased (`colRuleWidth`). Class names use the
//! kebab-cased category with `color`/`style` removed (`col-rule-width-sm`,
//! `col-rule-dotted`), CSS properties swap the `col` shorthand for `column`
//! (`column-rule-width`).

/// Substrings dropped from a category name when building its class stem.
const STRIPPED_WORDS: [&str; 2] = ["color", "style"];

/// Split a string into words and join them lower-cased with `-`.
///
/// Word boundaries are runs of non-alphanumeric characters, a lower-case
/// letter followed by an upper-case one, a letter/digit transition, and the
/// last capital of an acronym followed by a lower-case letter
/// (`XMLHttp` -> `xml-http`).
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && ch.is_uppercase())
                || (prev.is_alphabetic() && ch.is_numeric())
                || (prev.is_numeric() && ch.is_alphabetic())
                || (prev.is_uppercase()
                    && ch.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(ch.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// Class stem for a theme category: `colRuleColor` -> `col-rule`.
///
/// Only the first `color`/`style` occurrence is removed.
pub fn class_stem(property: &str) -> String {
    let kebab = kebab_case(property);

    let first = STRIPPED_WORDS
        .iter()
        .filter_map(|word| kebab.find(word).map(|pos| (pos, word.len())))
        .min_by_key(|(pos, _)| *pos);

    match first {
        Some((pos, len)) => {
            let stripped = format!("{}{}", &kebab[..pos], &kebab[pos + len..]);
            kebab_case(&stripped)
        }
        None => kebab,
    }
}

/// CSS property emitted for a theme category: `colRuleWidth` -> `column-rule-width`.
pub fn generate_css_property(property: &str) -> String {
    kebab_case(&property.replacen("col", "column", 1))
}

/// Build the selector for a generated utility, escaping the class name
/// with the host's `escape`.
///
/// `generate_class_name("colGap", "0.5", None, "tw-", escape_class_name)` -> `.tw-col-gap-0\.5`
pub fn generate_class_name<E>(
    property: &str,
    key: &str,
    variant: Option<&str>,
    prefix: &str,
    escape: E,
) -> String
where
    E: Fn(&str) -> String,
{
    let mut class_name = format!("{}-{}", class_stem(property), key);
    if let Some(variant) = variant {
        class_name.push('-');
        class_name.push_str(variant);
    }

    format!(".{}", escape(&format!("{}{}", prefix, class_name)))
}

/// Serialize a class name as a CSS identifier.
pub fn escape_class_name(class: &str) -> String {
    let chars: Vec<char> = class.chars().collect();
    let mut escaped = String::with_capacity(class.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        match ch {
            '\0' => escaped.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => escaped.push_str(&hex_escape(ch)),
            '0'..='9' if i == 0 || (i == 1 && chars[0] == '-') => {
                escaped.push_str(&hex_escape(ch))
            }
            '-' if i == 0 && chars.len() == 1 => escaped.push_str("\\-"),
            c if c == '-' || c == '_' || c.is_ascii_alphanumeric() || (c as u32) >= 0x80 => {
                escaped.push(c)
            }
            c => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }

    escaped
}

fn hex_escape(ch: char) -> String {
    format!("\\{:x} ", ch as u32)
}
