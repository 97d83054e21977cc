//! SQL text utility functions

/// Quote a string literal using ANSI quote doubling
///
/// # Example
///
/// ```
/// use jsonlogic_sql::utils::sql::quote_ansi;
///
/// assert_eq!(quote_ansi("it's"), "'it''s'");
/// ```
pub fn quote_ansi(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote a string literal for engines where backslash is the escape character
///
/// Used by BigQuery, Spanner and ClickHouse. Raw newlines are not allowed
/// inside single-quoted literals there, so they are escaped as well.
pub fn quote_backslash_escaped(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Check whether a SQL fragment must be parenthesized before it is used as
/// an operand of a tighter-binding operator
///
/// A fragment is atomic when it has no whitespace outside of parentheses,
/// brackets and string literals (`a.b`, `42`, `'x y'`, `(a AND b)`,
/// `COALESCE(a, 0)`). `backslash_escapes` selects how quotes inside string
/// literals are escaped and must match the dialect that quoted them.
pub fn needs_grouping(sql: &str, backslash_escapes: bool) -> bool {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '\\' if backslash_escapes => {
                    chars.next();
                }
                '\'' => {
                    // '' is an escaped quote, not the end of the literal
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                    } else {
                        in_string = false;
                    }
                }
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => in_string = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Check whether one pair of parentheses encloses the whole fragment
///
/// `(a AND b)` is enclosed; `(a + 1) = (b + 1)` and `COALESCE(a, 0)` are not.
pub fn is_enclosed(sql: &str, backslash_escapes: bool) -> bool {
    if !sql.starts_with('(') {
        return false;
    }
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if in_string {
            match c {
                '\\' if backslash_escapes => {
                    chars.next();
                }
                '\'' => {
                    if chars.peek().map(|&(_, next)| next) == Some('\'') {
                        chars.next();
                    } else {
                        in_string = false;
                    }
                }
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + c.len_utf8() == sql.len();
                }
            }
            _ => {}
        }
    }
    false
}

/// Wrap a SQL fragment in parentheses unless a single pair already encloses it
pub fn enclose(sql: String, backslash_escapes: bool) -> String {
    if is_enclosed(&sql, backslash_escapes) {
        sql
    } else {
        format!("({})", sql)
    }
}

/// Wrap a SQL fragment in parentheses unless it is already atomic
pub fn group(sql: String, backslash_escapes: bool) -> String {
    if needs_grouping(&sql, backslash_escapes) {
        format!("({})", sql)
    } else {
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ansi() {
        assert_eq!(quote_ansi("hello"), "'hello'");
        assert_eq!(quote_ansi("o'brien"), "'o''brien'");
        assert_eq!(quote_ansi(""), "''");
    }

    #[test]
    fn test_quote_backslash_escaped() {
        assert_eq!(quote_backslash_escaped("hello"), "'hello'");
        assert_eq!(quote_backslash_escaped("o'brien"), r"'o\'brien'");
        assert_eq!(quote_backslash_escaped(r"c:\tmp"), r"'c:\\tmp'");
        assert_eq!(quote_backslash_escaped("a\nb"), r"'a\nb'");
    }

    #[test]
    fn test_needs_grouping_atomic() {
        assert!(!needs_grouping("price", false));
        assert!(!needs_grouping("user.address.city", false));
        assert!(!needs_grouping("42", false));
        assert!(!needs_grouping("'two words'", false));
        assert!(!needs_grouping("'it''s here'", false));
        assert!(!needs_grouping(r"'it\'s here'", true));
        assert!(!needs_grouping("(a AND b)", false));
        assert!(!needs_grouping("COALESCE(a, 0)", false));
        assert!(!needs_grouping("[1, 2]", false));
        assert!(!needs_grouping("ARRAY[1, 2]", false));
    }

    #[test]
    fn test_needs_grouping_compound() {
        assert!(needs_grouping("a > 1", false));
        assert!(needs_grouping("x IS NULL", false));
        assert!(needs_grouping("NOT (a)", false));
        assert!(needs_grouping("CASE WHEN a THEN 1 ELSE 0 END", false));
    }

    #[test]
    fn test_needs_grouping_escape_styles() {
        // PostgreSQL keeps backslashes literal, so the string ends at the quote
        assert!(needs_grouping(r"'c:\' = path", false));
        assert!(needs_grouping(r"'it\'s' = name", true));
    }

    #[test]
    fn test_is_enclosed() {
        assert!(is_enclosed("(a AND b)", false));
        assert!(is_enclosed("((a))", false));
        assert!(is_enclosed("(name = ')')", false));
        assert!(is_enclosed(r"(name = '\')')", true));
        assert!(!is_enclosed("(a + 1) = (b + 1)", false));
        assert!(!is_enclosed("COALESCE(a, 0)", false));
        assert!(!is_enclosed("a", false));
        assert!(!is_enclosed("(a", false));
    }

    #[test]
    fn test_enclose() {
        assert_eq!(enclose("a".to_string(), false), "(a)");
        assert_eq!(enclose("(a OR b)".to_string(), false), "(a OR b)");
        assert_eq!(enclose("(a) = (b)".to_string(), false), "((a) = (b))");
    }

    #[test]
    fn test_group() {
        assert_eq!(group("a".to_string(), false), "a");
        assert_eq!(group("a > 1".to_string(), false), "(a > 1)");
        assert_eq!(group("(a > 1)".to_string(), false), "(a > 1)");
    }
}
