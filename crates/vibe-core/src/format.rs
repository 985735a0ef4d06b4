//! Template formatting
//!
//! Resolves `{placeholder}` tokens in a command template against positional
//! arguments. Placeholder names are cosmetic: the i-th placeholder in scan
//! order takes the i-th argument, and a placeholder with no argument is left
//! verbatim so the user sees what was missing instead of it vanishing.
//!
//! Substituted values are shell-quoted individually. The executor hands the
//! final string to `sh -c`, so an unquoted `; rm -rf /` argument would be a
//! command injection.

use regex::Regex;

/// Resolve the placeholders in `template` with `args`, positionally
///
/// Pure and deterministic. Replacement values are never re-scanned for
/// further placeholders; a template without placeholders comes back
/// unchanged.
pub fn format_template(template: &str, args: &[String]) -> String {
    let re = Regex::new(r"\{[^}]+\}").unwrap();

    let mut index = 0;
    re.replace_all(template, |caps: &regex::Captures| {
        let arg = args.get(index);
        index += 1;
        match arg {
            Some(value) => shell_quote(value),
            None => caps[0].to_string(),
        }
    })
    .to_string()
}

/// Quote a single argument for `sh`
///
/// Values made only of shell-inert characters pass through untouched;
/// everything else is wrapped in single quotes with embedded single quotes
/// escaped via the `'\''` idiom.
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_shell_inert) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

fn is_shell_inert(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '_' | '-')
}
