//! # Pattern Sampling
//!
//! Builds a short string that matches a `regex:` rule, and one that does
//! not. Construction walks the pattern once, taking the first alternative
//! of every alternation and the minimum repetition of every quantifier;
//! character classes are resolved by probing a fixed pool of characters
//! against the class itself. The result is always checked against the full
//! compiled pattern, so a construction that goes wrong is reported as
//! infeasible rather than returned.
//!
//! Unsupported constructs (look-around, back-references) make the pattern
//! infeasible.

use regex::Regex;

/// Characters probed, in order, when a class has to produce one character.
const CHAR_POOL: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-.@ +/:#!~";

/// Strings tried, in order, when looking for a value a pattern rejects.
const NON_MATCH_CANDIDATES: [&str; 8] = ["!", "~~~", "", "0", "a", "A", " ", "-_-"];

/// A minimal string the pattern matches, or `None` when no generic
/// construction works.
pub fn sample(pattern: &str) -> Option<String> {
    let compiled = Regex::new(pattern).ok()?;
    let mut walker = Walker {
        chars: pattern.chars().collect(),
        pos: 0,
    };
    let candidate = walker.alternation()?;
    if walker.pos != walker.chars.len() {
        return None;
    }
    compiled.is_match(&candidate).then_some(candidate)
}

/// A short string the pattern does not match.
pub fn non_matching(pattern: &str) -> Option<String> {
    let compiled = Regex::new(pattern).ok()?;
    NON_MATCH_CANDIDATES
        .iter()
        .find(|c| !compiled.is_match(c))
        .map(|c| c.to_string())
}

/// Whether `value` matches `pattern`; `None` if the pattern does not compile.
pub fn is_match(pattern: &str, value: &str) -> Option<bool> {
    Regex::new(pattern).ok().map(|re| re.is_match(value))
}

/// First pool character matched by a single-character expression.
fn pick_char(expression: &str) -> Option<char> {
    let anchored = Regex::new(&format!("^(?:{expression})$")).ok()?;
    let mut buf = [0u8; 4];
    CHAR_POOL
        .chars()
        .find(|c| anchored.is_match(c.encode_utf8(&mut buf)))
}

struct Walker {
    chars: Vec<char>,
    pos: usize,
}

enum GroupKind {
    Capturing,
    FlagsOnly,
}

impl Walker {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn alternation(&mut self) -> Option<String> {
        let first = self.sequence()?;
        while self.peek() == Some('|') {
            self.pos += 1;
            self.sequence()?;
        }
        Some(first)
    }

    fn sequence(&mut self) -> Option<String> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let atom = self.atom()?;
            let times = self.quantifier()?;
            for _ in 0..times {
                out.push_str(&atom);
            }
        }
        Some(out)
    }

    fn atom(&mut self) -> Option<String> {
        match self.bump()? {
            '^' | '$' => Some(String::new()),
            '.' => Some("a".to_string()),
            '(' => match self.group_kind()? {
                GroupKind::FlagsOnly => Some(String::new()),
                GroupKind::Capturing => {
                    let inner = self.alternation()?;
                    (self.bump()? == ')').then_some(inner)
                }
            },
            '[' => {
                let body = self.class_body()?;
                pick_char(&format!("[{body}]")).map(String::from)
            }
            '\\' => self.escape(),
            '*' | '+' | '?' | '{' | ')' => None,
            literal => Some(literal.to_string()),
        }
    }

    /// Consume a group prefix (`?:`, `?P<name>`, `?<name>`, `?i`, `?i:`).
    fn group_kind(&mut self) -> Option<GroupKind> {
        if self.peek() != Some('?') {
            return Some(GroupKind::Capturing);
        }
        self.pos += 1;
        match self.bump()? {
            ':' => Some(GroupKind::Capturing),
            'P' => {
                (self.bump()? == '<').then_some(())?;
                self.skip_past('>')?;
                Some(GroupKind::Capturing)
            }
            '<' => match self.peek()? {
                '=' | '!' => None,
                _ => {
                    self.skip_past('>')?;
                    Some(GroupKind::Capturing)
                }
            },
            '=' | '!' => None,
            flag if flag.is_ascii_alphabetic() || flag == '-' => loop {
                match self.bump()? {
                    ':' => break Some(GroupKind::Capturing),
                    ')' => break Some(GroupKind::FlagsOnly),
                    c if c.is_ascii_alphabetic() || c == '-' => continue,
                    _ => break None,
                }
            },
            _ => None,
        }
    }

    fn skip_past(&mut self, end: char) -> Option<()> {
        while self.bump()? != end {}
        Some(())
    }

    /// Raw text between `[` and the matching `]`.
    fn class_body(&mut self) -> Option<String> {
        let mut body = String::new();
        if self.peek() == Some('^') {
            body.push('^');
            self.pos += 1;
        }
        if self.peek() == Some(']') {
            body.push(']');
            self.pos += 1;
        }
        loop {
            let c = self.bump()?;
            match c {
                ']' => return Some(body),
                '\\' => {
                    body.push('\\');
                    body.push(self.bump()?);
                }
                '[' if self.peek() == Some(':') => {
                    body.push('[');
                    loop {
                        let inner = self.bump()?;
                        body.push(inner);
                        if inner == ']' {
                            break;
                        }
                    }
                }
                other => body.push(other),
            }
        }
    }

    fn escape(&mut self) -> Option<String> {
        let c = self.bump()?;
        let s = match c {
            'd' => "0".to_string(),
            'D' | 'w' | 'S' => "a".to_string(),
            'W' => "-".to_string(),
            's' => " ".to_string(),
            'b' | 'B' | 'A' | 'z' => String::new(),
            'n' => "\n".to_string(),
            't' => "\t".to_string(),
            'r' => "\r".to_string(),
            'p' | 'P' => {
                let mut class = format!("\\{c}");
                if self.peek() == Some('{') {
                    loop {
                        let inner = self.bump()?;
                        class.push(inner);
                        if inner == '}' {
                            break;
                        }
                    }
                } else {
                    class.push(self.bump()?);
                }
                return pick_char(&class).map(String::from);
            }
            'x' => {
                let hex: String = if self.peek() == Some('{') {
                    self.pos += 1;
                    let mut h = String::new();
                    loop {
                        match self.bump()? {
                            '}' => break,
                            d => h.push(d),
                        }
                    }
                    h
                } else {
                    let a = self.bump()?;
                    let b = self.bump()?;
                    [a, b].iter().collect()
                };
                let code = u32::from_str_radix(&hex, 16).ok()?;
                return char::from_u32(code).map(String::from);
            }
            '1'..='9' => return None,
            literal => literal.to_string(),
        };
        Some(s)
    }

    /// Minimum repetition count of an optional quantifier (1 when absent).
    fn quantifier(&mut self) -> Option<usize> {
        let times = match self.peek() {
            Some('*') | Some('?') => {
                self.pos += 1;
                0
            }
            Some('+') => {
                self.pos += 1;
                1
            }
            Some('{') => {
                self.pos += 1;
                let mut digits = String::new();
                loop {
                    match self.bump()? {
                        '}' => break,
                        c if c.is_ascii_digit() || c == ',' || c == ' ' => digits.push(c),
                        _ => return None,
                    }
                }
                let min = digits.split(',').next()?.trim();
                min.parse::<usize>().ok()?
            }
            _ => return Some(1),
        };
        if matches!(self.peek(), Some('?') | Some('+')) {
            self.pos += 1;
        }
        Some(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sample_matches(pattern: &str) -> String {
        let s = sample(pattern).unwrap_or_else(|| panic!("no sample for {pattern}"));
        assert!(Regex::new(pattern).unwrap().is_match(&s), "{s:?} !~ {pattern}");
        s
    }

    #[test]
    fn literal_and_anchors() {
        assert_eq!(assert_sample_matches("^abc$"), "abc");
    }

    #[test]
    fn classes_and_quantifiers() {
        assert_eq!(assert_sample_matches("^[a-z]{3}$"), "aaa");
        assert_eq!(assert_sample_matches("^[A-Z][0-9]+$"), "A0");
        assert_eq!(assert_sample_matches("^\\d{2,4}-\\w+$"), "00-a");
        assert_eq!(assert_sample_matches("^x*y?z$"), "z");
    }

    #[test]
    fn negated_class_probes_pool() {
        let s = assert_sample_matches("^[^a-z]$");
        assert_eq!(s, "A");
    }

    #[test]
    fn alternation_takes_first_branch() {
        assert_eq!(assert_sample_matches("^(cat|dog)s?$"), "cat");
        assert_eq!(assert_sample_matches("^(?:red|blue)$"), "red");
        assert_eq!(assert_sample_matches("^(?P<code>[A-Z]{2})$"), "AA");
    }

    #[test]
    fn inline_flags() {
        assert_eq!(assert_sample_matches("(?i)^abc$"), "abc");
    }

    #[test]
    fn realistic_patterns() {
        assert_sample_matches("^[A-Z]{2}[0-9]{2}[A-Z0-9]{4}[0-9]{7}([A-Z0-9]?){0,16}$");
        assert_sample_matches("^\\+?[1-9]\\d{1,14}$");
        assert_sample_matches("^#[0-9a-fA-F]{6}$");
        assert_sample_matches("^[a-z0-9]+(?:-[a-z0-9]+)*$");
    }

    #[test]
    fn escaped_metacharacters_are_literal() {
        assert_eq!(assert_sample_matches("^v\\d+\\.\\d+$"), "v0.0");
        assert_eq!(assert_sample_matches("^\\x41$"), "A");
    }

    #[test]
    fn infeasible_patterns() {
        assert!(sample("^(a)\\1$").is_none());
        assert!(sample("[").is_none());
    }

    #[test]
    fn non_matching_value() {
        let s = non_matching("^[a-z]+$").unwrap();
        assert!(!Regex::new("^[a-z]+$").unwrap().is_match(&s));
        assert!(non_matching(".*").is_none());
    }

    #[test]
    fn is_match_reports_compile_failure() {
        assert_eq!(is_match("^a$", "a"), Some(true));
        assert_eq!(is_match("(", "a"), None);
    }
}
