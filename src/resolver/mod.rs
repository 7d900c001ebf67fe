//! Turns one class name into a [`MatchRecord`].
//!
//! Values are decoded in grammar order: fractions become percentages, hex
//! colors with an alpha suffix become `rgba()`, numbers keep their unit and
//! named tokens are looked up in the rule's keyword table and then in the
//! caller's custom values. A named token found nowhere leaves the record
//! without a value; the caller reports it and leaves it out of the output.

use crate::config::Config;
use crate::grammar::Grammar;
use crate::parser::{Body, Separator, ValueKind};
use crate::rules::{Declaration, Rule};
use memchr::memchr;

const IMPORTANT: &str = " !important";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentSelector {
    pub parent: String,
    pub pseudo: Option<&'static str>,
    pub separator: Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub class_name: String,
    pub prefix: String,
    /// Index of the owning rule in registration order.
    pub rule: usize,
    pub parent_selector: Option<ParentSelector>,
    pub value: Option<String>,
    /// Set when a keyword rule supplied the value.
    pub declaration: Option<Declaration>,
    /// The named token, resolved or not.
    pub named: Option<String>,
    pub params: Vec<String>,
    pub value_pseudo: Option<&'static str>,
    pub break_point: Option<String>,
    pub important: bool,
}

impl MatchRecord {
    /// A named token that neither the keyword table nor the custom values
    /// know about.
    pub fn is_unresolved(&self) -> bool {
        self.named.is_some() && self.value.is_none() && self.declaration.is_none()
    }
}

/// `None` when `class_name` as a whole is not accepted by `grammar`.
pub fn resolve(
    grammar: &Grammar,
    rules: &[Rule],
    class_name: &str,
    config: &Config,
) -> Option<MatchRecord> {
    let m = grammar.match_exact(class_name)?;
    let rule = rules.get(m.rule)?;

    let mut record = MatchRecord {
        class_name: class_name.to_string(),
        prefix: m.prefix.to_string(),
        rule: m.rule,
        parent_selector: m.parent.map(|p| ParentSelector {
            parent: p.parent.to_string(),
            pseudo: p.pseudo,
            separator: p.separator,
        }),
        value: None,
        declaration: None,
        named: None,
        params: Vec::new(),
        value_pseudo: m.pseudo,
        break_point: m.breakpoint.map(str::to_string),
        important: m.important,
    };

    match m.body {
        Body::Params(params) => {
            record.params = params.into_iter().map(str::to_string).collect();
        }
        Body::Value(ValueKind::Fraction {
            numerator,
            denominator,
        }) => {
            record.value = Some(fraction_to_percentage(numerator, denominator)?);
        }
        Body::Value(ValueKind::Hex { digits, alpha }) => {
            record.value = Some(match alpha {
                Some(alpha) => hex_to_rgba(digits, alpha)?,
                None => format!("#{digits}"),
            });
        }
        Body::Value(ValueKind::Number {
            negative,
            number,
            unit,
        }) => {
            let sign = if negative { "-" } else { "" };
            record.value = Some(format!("{sign}{number}{}", unit.unwrap_or("")));
        }
        Body::Value(ValueKind::Named(named)) => {
            resolve_named(rule, m.prefix, named, config, &mut record);
        }
    }

    if record.important {
        if let Some(value) = record.value.as_mut() {
            value.push_str(IMPORTANT);
        }
        if let Some(declaration) = record.declaration.as_mut() {
            for value in declaration.values_mut() {
                value.push_str(IMPORTANT);
            }
        }
    }

    tracing::trace!(class = class_name, value = ?record.value, "resolved class name");
    Some(record)
}

fn resolve_named(rule: &Rule, prefix: &str, named: &str, config: &Config, record: &mut MatchRecord) {
    record.named = Some(named.to_string());

    if let Some(value) = rule.keyword_value(named) {
        record.declaration = Some(
            rule.properties
                .iter()
                .map(|property| (property.clone(), value.to_string()))
                .collect(),
        );
        record.value = Some(value.to_string());
        return;
    }

    record.value = config
        .custom
        .get(&custom_key(prefix, named))
        .or_else(|| config.custom.get(named))
        .cloned();
}

/// Key under which a custom value for `prefix` and `named` is looked up
/// first, e.g. `C-brand`.
pub fn custom_key(prefix: &str, named: &str) -> String {
    format!("{prefix}-{named}")
}

// Two-stage scaling keeps results identical to the reference output for
// denominators that are not powers of two.
fn fraction_to_percentage(numerator: &str, denominator: &str) -> Option<String> {
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    let percentage = (numerator / denominator * 100.0 * 10000.0).round() / 10000.0;
    if !percentage.is_finite() {
        return None;
    }
    Some(format!("{percentage}%"))
}

fn hex_to_rgba(digits: &str, alpha: &str) -> Option<String> {
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    Some(format!("rgba({r},{g},{b},{alpha})"))
}

/// Replaces `$0`, `$1`, ... in every value of `template` with `params`.
/// Placeholders without a matching parameter are left as written.
pub fn substitute_params(template: &Declaration, params: &[String]) -> Declaration {
    template
        .iter()
        .map(|(property, value)| (property.clone(), fill_placeholders(value, params)))
        .collect()
}

// Single pass, so text coming from a parameter is never substituted again.
fn fill_placeholders(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(i) = memchr(b'$', rest.as_bytes()) {
        out.push_str(&rest[..i]);
        let after = &rest[i + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        match after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|index| params.get(index))
        {
            Some(param) => out.push_str(param),
            None => out.push_str(&rest[i..i + 1 + digits]),
        }
        rest = &after[digits..];
    }
    out.push_str(rest);
    out
}
