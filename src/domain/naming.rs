//! Field-name conversion between the remote (snake_case) and in-memory
//! (camelCase) conventions.
//!
//! Only an underscore followed by an ASCII lowercase letter is folded, so
//! `data_inicio` becomes `dataInicio` while `_1`, a trailing `_` or an
//! already camelCase name pass through untouched.

/// `data_inicio` → `dataInicio`
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// `dataInicio` → `data_inicio`
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
