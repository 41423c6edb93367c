use regex::{Regex, RegexBuilder};

use crate::error::ClassifyError;

/// A compiled `/pattern/flags` rule bound to an account.
#[derive(Debug, Clone)]
pub struct Rule {
    pub account: String,
    pub source: String,
    pub pattern: Regex,
}

impl Rule {
    /// Parses `/pattern/flags`, where flags combine `i` (case-insensitive) and
    /// `x` (whitespace and `#` comments ignored in the pattern).
    ///
    /// Under `x`, whitespace and `#` inside a character class stay literal, so
    /// `/[ ]coffee/x` matches " coffee".
    pub fn parse(account: &str, rule_text: &str) -> Result<Self, ClassifyError> {
        let (pattern, flags) = split_rule(rule_text)
            .ok_or_else(|| ClassifyError::Parse(rule_text.to_string()))?;

        let extended = flags.contains('x');
        let pattern = if extended {
            escape_class_literals(pattern)
        } else {
            pattern.to_string()
        };

        let compiled = RegexBuilder::new(&pattern)
            .case_insensitive(flags.contains('i'))
            .ignore_whitespace(extended)
            .build()
            .map_err(|source| ClassifyError::Regex {
                rule: rule_text.to_string(),
                source,
            })?;

        Ok(Rule {
            account: account.to_string(),
            source: rule_text.to_string(),
            pattern: compiled,
        })
    }

    fn matched_len(&self, description: &str) -> Option<usize> {
        self.pattern
            .find(description)
            .map(|m| m.as_str().chars().count())
    }
}

fn split_rule(text: &str) -> Option<(&str, &str)> {
    let body = text.strip_prefix('/')?;
    let end = body.rfind('/')?;
    let flags = &body[end + 1..];
    if flags.chars().all(|c| c == 'i' || c == 'x') {
        Some((&body[..end], flags))
    } else {
        None
    }
}

/// The `regex` crate drops whitespace and `#` comments inside character
/// classes too when ignoring whitespace; write those as `\x{..}` escapes.
fn escape_class_literals(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut depth = 0usize;
    let mut escaped = false;
    // Just after `[` or `[^`, where `]` is a literal.
    let mut class_start = false;

    for c in pattern.chars() {
        if escaped {
            out.push(c);
            escaped = false;
            class_start = false;
            continue;
        }
        match c {
            '\\' => {
                out.push(c);
                escaped = true;
                class_start = false;
            }
            '[' => {
                depth += 1;
                out.push(c);
                class_start = true;
            }
            '^' if class_start => out.push(c),
            ']' if depth > 0 && !class_start => {
                depth -= 1;
                out.push(c);
            }
            c if depth > 0 && (c.is_whitespace() || c == '#') => {
                out.push_str(&format!("\\x{{{:X}}}", u32::from(c)));
                class_start = false;
            }
            _ => {
                out.push(c);
                class_start = false;
            }
        }
    }
    out
}

/// Append-only collection of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleMatcher {
    rules: Vec<Rule>,
}

impl RuleMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, account: &str, rule_text: &str) -> Result<(), ClassifyError> {
        self.push(Rule::parse(account, rule_text)?);
        Ok(())
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Accounts of every rule matching `description`, shortest matched text
    /// first. Equal lengths keep insertion order; an account matched by
    /// several rules appears once per rule.
    pub fn match_description(&self, description: &str) -> Vec<String> {
        let mut hits: Vec<(&str, usize)> = self
            .rules
            .iter()
            .filter_map(|rule| {
                rule.matched_len(description)
                    .map(|len| (rule.account.as_str(), len))
            })
            .collect();
        hits.sort_by_key(|&(_, len)| len);
        hits.into_iter().map(|(account, _)| account.to_string()).collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
