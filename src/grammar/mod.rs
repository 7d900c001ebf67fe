//! Compiled class-name grammar.
//!
//! A [`Grammar`] is an immutable value built from a rule slice. It holds the
//! prefix alternations the parser walks: pattern prefixes that take a full
//! value (fraction, hex color, number, named token), pattern prefixes that
//! only take named tokens, and helper prefixes that take a parameter list.
//! Changing the rule set means compiling a new grammar.

pub mod pseudo;

use crate::error::{Error, Result};
use crate::parser::{self, ClassMatch};
use crate::rules::{Rule, RuleKind};
use ahash::AHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueGroup {
    /// Fraction, hex color, signed number or named token.
    SuffixValue,
    /// Named token only.
    Named,
    /// Parenthesized parameter list.
    Params,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    pub prefix: String,
    /// Index of the owning rule in registration order.
    pub rule: usize,
    pub group: ValueGroup,
}

#[derive(Debug, Clone, Default)]
pub struct Grammar {
    patterns: Vec<PrefixEntry>,
    helpers: Vec<PrefixEntry>,
}

impl Grammar {
    pub fn compile(rules: &[Rule]) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(rules.len());
        let mut grammar = Self::default();
        for (index, rule) in rules.iter().enumerate() {
            if !seen.insert(rule.prefix.as_str()) {
                return Err(Error::duplicate_prefix(rule.prefix.as_str()));
            }
            let (group, branch) = match rule.kind {
                RuleKind::Helper => (ValueGroup::Params, &mut grammar.helpers),
                RuleKind::Pattern if rule.allow_suffix_to_value => {
                    (ValueGroup::SuffixValue, &mut grammar.patterns)
                }
                RuleKind::Pattern => (ValueGroup::Named, &mut grammar.patterns),
            };
            branch.push(PrefixEntry {
                prefix: rule.prefix.clone(),
                rule: index,
                group,
            });
        }
        tracing::debug!(
            patterns = grammar.patterns.len(),
            helpers = grammar.helpers.len(),
            "compiled class name grammar"
        );
        Ok(grammar)
    }

    pub fn patterns(&self) -> &[PrefixEntry] {
        &self.patterns
    }

    pub fn helpers(&self) -> &[PrefixEntry] {
        &self.helpers
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.helpers.is_empty()
    }

    /// First class name the grammar accepts at the start of `src`. A parent
    /// context is tried before a bare prefix.
    pub fn match_class<'a>(&self, src: &'a str) -> Option<ClassMatch<'a>> {
        parser::match_class(self, src)
    }

    /// Matches only when the whole of `class_name` is accepted.
    pub fn match_exact<'a>(&self, class_name: &'a str) -> Option<ClassMatch<'a>> {
        self.match_class(class_name)
            .filter(|m| m.text.len() == class_name.len())
    }

    pub fn find_class_names(&self, text: &str) -> Vec<String> {
        parser::find_class_names(self, text)
    }
}
