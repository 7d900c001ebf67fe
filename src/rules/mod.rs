mod defaults;

pub use defaults::defaults;

use crate::error::{Error, Result};
use ahash::AHashMap;
use indexmap::IndexMap;
use serde::Deserialize;

/// Ordered property -> value map.
pub type Declaration = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// `Prefix-value`, the value comes from the class name.
    Pattern,
    /// `Prefix(a,b)`, parameters fill a declaration template.
    Helper,
}

/// A named suffix with a fixed value, e.g. `D-n` -> `none`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordRule {
    pub suffix: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub prefix: String,
    pub kind: RuleKind,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub declaration: Option<Declaration>,
    #[serde(default)]
    pub allow_suffix_to_value: bool,
    #[serde(default)]
    pub keyword_rules: Vec<KeywordRule>,
    #[serde(default)]
    pub sub_rules: IndexMap<String, Declaration>,
}

impl Rule {
    pub fn pattern<I, S>(prefix: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.to_string(),
            kind: RuleKind::Pattern,
            properties: properties.into_iter().map(Into::into).collect(),
            declaration: None,
            allow_suffix_to_value: false,
            keyword_rules: Vec::new(),
            sub_rules: IndexMap::new(),
        }
    }

    pub fn helper<I, K, V>(prefix: &str, declaration: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.to_string(),
            kind: RuleKind::Helper,
            properties: Vec::new(),
            declaration: Some(to_declaration(declaration)),
            allow_suffix_to_value: false,
            keyword_rules: Vec::new(),
            sub_rules: IndexMap::new(),
        }
    }

    /// Accept fractions, colors and numbers verbatim.
    pub fn suffix_to_value(mut self) -> Self {
        self.allow_suffix_to_value = true;
        self
    }

    pub fn keyword(mut self, suffix: &str, value: &str) -> Self {
        self.keyword_rules.push(KeywordRule {
            suffix: suffix.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn sub_rule<I, K, V>(mut self, selector: &str, declaration: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.sub_rules
            .insert(selector.to_string(), to_declaration(declaration));
        self
    }

    pub fn is_helper(&self) -> bool {
        self.kind == RuleKind::Helper
    }

    pub fn keyword_value(&self, suffix: &str) -> Option<&str> {
        self.keyword_rules
            .iter()
            .find(|k| k.suffix == suffix)
            .map(|k| k.value.as_str())
    }
}

fn to_declaration<I, K, V>(pairs: I) -> Declaration
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[derive(Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<Rule>,
}

/// Ordered rule set indexed by prefix.
///
/// Registration order decides both matching precedence and the order of
/// the generated CSS.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    rules: Vec<Rule>,
    index: AHashMap<String, usize>,
}

impl Registry {
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let mut registry = Self::default();
        registry.extend(rules)?;
        Ok(registry)
    }

    pub fn from_toml_str(src: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(src)?;
        Self::new(file.rules)
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(src)?;
        Self::new(file.rules)
    }

    pub fn add(&mut self, rule: Rule) -> Result<()> {
        if self.index.contains_key(&rule.prefix) {
            return Err(Error::duplicate_prefix(rule.prefix));
        }
        self.index.insert(rule.prefix.clone(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// Adds every rule or none of them.
    pub fn extend(&mut self, rules: Vec<Rule>) -> Result<()> {
        let mut staged = self.clone();
        for rule in rules {
            staged.add(rule)?;
        }
        *self = staged;
        Ok(())
    }

    pub fn get(&self, prefix: &str) -> Option<&Rule> {
        self.index.get(prefix).map(|&i| &self.rules[i])
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_registration_order() {
        let registry = Registry::new(vec![
            Rule::pattern("W", ["width"]),
            Rule::pattern("Op", ["opacity"]),
            Rule::pattern("C", ["color"]),
        ])
        .unwrap();
        let prefixes: Vec<_> = registry.rules().iter().map(|r| r.prefix.as_str()).collect();
        assert_eq!(prefixes, ["W", "Op", "C"]);
        assert_eq!(registry.get("Op").unwrap().properties, ["opacity"]);
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
        let err = Registry::new(vec![
            Rule::pattern("Op", ["opacity"]),
            Rule::pattern("Op", ["order"]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicatePrefix { prefix } if prefix == "Op"));
    }

    #[test]
    fn failed_extend_leaves_registry_untouched() {
        let mut registry = Registry::new(vec![Rule::pattern("Op", ["opacity"])]).unwrap();
        let result = registry.extend(vec![
            Rule::pattern("W", ["width"]),
            Rule::pattern("Op", ["opacity"]),
        ]);
        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
        assert!(registry.get("W").is_none());
    }

    #[test]
    fn keyword_lookup() {
        let rule = Rule::pattern("D", ["display"])
            .keyword("n", "none")
            .keyword("b", "block");
        assert_eq!(rule.keyword_value("b"), Some("block"));
        assert_eq!(rule.keyword_value("ib"), None);
    }

    #[test]
    fn rules_from_toml() {
        let src = r#"
            [[rules]]
            prefix = "Op"
            kind = "pattern"
            properties = ["opacity"]
            allowSuffixToValue = true

            [[rules]]
            prefix = "D"
            kind = "pattern"
            properties = ["display"]
            keywordRules = [{ suffix = "n", value = "none" }]

            [[rules]]
            prefix = "LineClamp"
            kind = "helper"
            declaration = { "-webkit-line-clamp" = "$0", "max-height" = "$1" }
        "#;
        let registry = Registry::from_toml_str(src).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.get("Op").unwrap().allow_suffix_to_value);
        assert_eq!(registry.get("D").unwrap().keyword_value("n"), Some("none"));
        let helper = registry.get("LineClamp").unwrap();
        assert!(helper.is_helper());
        let declaration = helper.declaration.as_ref().unwrap();
        assert_eq!(declaration.get_index(0).unwrap().0, "-webkit-line-clamp");
    }

    #[test]
    fn rules_from_json() {
        let src = r#"{"rules": [
            {"prefix": "C", "kind": "pattern", "properties": ["color"], "allowSuffixToValue": true}
        ]}"#;
        let registry = Registry::from_json_str(src).unwrap();
        assert!(registry.get("C").is_some());
    }
}
