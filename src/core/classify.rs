use regex::Regex;

/// Classification of one line of source text. Purely syntactic and
/// line-local: a line is a quoted include, an angle-bracket include, a
/// `#pragma once` guard, or plain content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Quoted include; carries the path between the quotes, verbatim.
    Local(String),
    /// Angle-bracket include; carries the whole directive line, trimmed.
    External(String),
    PragmaOnce,
    Plain,
}

pub struct Classifier {
    local: Regex,
    external: Regex,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            local: Regex::new(r#"^\s*#include\s+"([^"]+)""#).unwrap(),
            external: Regex::new(r"^\s*#include\s+<([^>]+)>").unwrap(),
        }
    }

    pub fn classify(&self, line: &str) -> Directive {
        if let Some(caps) = self.local.captures(line) {
            return Directive::Local(caps[1].to_string());
        }
        if self.external.is_match(line) {
            return Directive::External(line.trim().to_string());
        }
        if line.trim_start().starts_with("#pragma once") {
            return Directive::PragmaOnce;
        }
        Directive::Plain
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
