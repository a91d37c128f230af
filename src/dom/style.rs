//! Inline style declarations stored in the `style` attribute.

pub(crate) fn parse(source: &str) -> Vec<(String, String)> {
    split_declarations(source)
        .into_iter()
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            // Custom property names are case-sensitive.
            let name = if name.starts_with("--") {
                name.to_string()
            } else {
                name.to_ascii_lowercase()
            };
            Some((name, value.to_string()))
        })
        .collect()
}

/// Splits on semicolons outside parentheses and quoted strings.
fn split_declarations(source: &str) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (index, ch) in source.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(open), ch) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                declarations.push(&source[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    declarations.push(&source[start..]);
    declarations
}

pub(crate) fn serialize(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps camelCase accessor names (`backgroundColor`) onto CSS property
/// names (`background-color`). Custom properties pass through untouched.
pub(crate) fn property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }
    if name == "cssFloat" {
        return "float".to_string();
    }

    let mut converted = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            converted.push('-');
            converted.push(ch.to_ascii_lowercase());
        } else {
            converted.push(ch);
        }
    }
    if converted.starts_with("webkit-") || converted.starts_with("moz-") {
        converted.insert(0, '-');
    }
    converted
}
