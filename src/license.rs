// src/license.rs

//! License expression cleanup
//!
//! `License:` values are split into individual licenses joined by `and`,
//! `or`, `with` and parentheses. Each license is looked up in the license
//! conversion table and the expression is rebuilt with upper-case SPDX
//! operators and tight parentheses.

use std::collections::HashMap;

/// Words that continue a license name after `or` ("GPL v2 or later")
const OR_CONTINUATIONS: &[&str] = &["later", "newer"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Operator(&'static str),
    License(String),
}

/// Normalize a license expression through the conversion table
pub fn fix_license(value: &str, conversions: &HashMap<String, String>) -> String {
    let tokens = tokenize(value);
    if tokens.is_empty() {
        return value.trim().to_string();
    }

    let mut out = String::new();
    let mut after_open = true;
    for token in tokens {
        let text = match token {
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
            Token::Operator(op) => op.to_string(),
            Token::License(name) => conversions.get(&name).cloned().unwrap_or(name),
        };
        if !out.is_empty() && !after_open && text != ")" {
            out.push(' ');
        }
        after_open = text == "(";
        out.push_str(&text);
    }

    out
}

fn tokenize(value: &str) -> Vec<Token> {
    let spaced = value
        .replace('(', " ( ")
        .replace(')', " ) ")
        .replace(';', " and ");
    let words: Vec<&str> = spaced.split_whitespace().collect();

    let mut tokens = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, word) in words.iter().enumerate() {
        let next = words.get(i + 1).map(|w| w.to_lowercase());
        let operator = match word.to_lowercase().as_str() {
            "and" => Some("AND"),
            "with" => Some("WITH"),
            "or" if !next.as_deref().is_some_and(|n| OR_CONTINUATIONS.contains(&n)) => Some("OR"),
            _ => None,
        };

        let structural = match *word {
            "(" => Some(Token::Open),
            ")" => Some(Token::Close),
            _ => operator.map(Token::Operator),
        };

        match structural {
            Some(token) => {
                flush_license(&mut tokens, &mut current);
                tokens.push(token);
            }
            None => current.push(word),
        }
    }
    flush_license(&mut tokens, &mut current);

    tokens
}

fn flush_license(tokens: &mut Vec<Token>, current: &mut Vec<&str>) {
    if !current.is_empty() {
        tokens.push(Token::License(current.join(" ")));
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HashMap<String, String> {
        HashMap::from([
            ("GPLv2+".to_string(), "GPL-2.0-or-later".to_string()),
            ("GPL v2 or later".to_string(), "GPL-2.0-or-later".to_string()),
            ("MIT License".to_string(), "MIT".to_string()),
        ])
    }

    #[test]
    fn test_plain_license_converted() {
        assert_eq!(fix_license("GPLv2+", &table()), "GPL-2.0-or-later");
        assert_eq!(fix_license("Apache-2.0", &table()), "Apache-2.0");
    }

    #[test]
    fn test_operators_uppercased() {
        assert_eq!(fix_license("GPLv2+ and MIT", &table()), "GPL-2.0-or-later AND MIT");
        assert_eq!(
            fix_license("GPL-2.0-only with Classpath-exception-2.0", &table()),
            "GPL-2.0-only WITH Classpath-exception-2.0"
        );
    }

    #[test]
    fn test_or_later_is_not_an_operator() {
        assert_eq!(fix_license("GPL v2 or later", &table()), "GPL-2.0-or-later");
        assert_eq!(
            fix_license("GPL v2 or later or MIT License", &table()),
            "GPL-2.0-or-later OR MIT"
        );
    }

    #[test]
    fn test_parentheses_tightened() {
        assert_eq!(
            fix_license("( GPLv2+ or MIT License )  and BSD-3-Clause", &table()),
            "(GPL-2.0-or-later OR MIT) AND BSD-3-Clause"
        );
    }

    #[test]
    fn test_semicolon_list() {
        assert_eq!(fix_license("MIT; BSD-2-Clause", &table()), "MIT AND BSD-2-Clause");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(fix_license("  MIT   License ", &table()), "MIT");
        assert_eq!(fix_license("   ", &table()), "");
    }

    #[test]
    fn test_idempotent() {
        let once = fix_license("(GPLv2+ or MIT License) and BSD", &table());
        assert_eq!(fix_license(&once, &table()), once);
    }
}
