//! Style tree construction.
//!
//! [`build`] folds resolved records into a [`StyleTree`]: an ordered map
//! from selector to declarations, with breakpoint keys and namespaces as
//! nested blocks. A [`StyleSheetCompiler`] turns the tree into text.

mod compiler;
mod escape;

pub use compiler::{CompileOptions, CssWriter, StyleSheetCompiler};
pub use escape::{END, START, escape_selector, mask_commas, replace_constants, unmask_commas};

use crate::config::{Config, Options};
use crate::error::{Error, Result};
use crate::resolver::{MatchRecord, substitute_params};
use crate::rules::{Declaration, Rule};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleNode {
    Value(String),
    Block(StyleTree),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTree {
    entries: IndexMap<String, StyleNode>,
}

impl StyleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StyleNode> {
        self.entries.get(key)
    }

    pub fn block(&self, key: &str) -> Option<&StyleTree> {
        match self.entries.get(key)? {
            StyleNode::Block(block) => Some(block),
            StyleNode::Value(_) => None,
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            StyleNode::Value(value) => Some(value),
            StyleNode::Block(_) => None,
        }
    }

    /// The block under `key`, created if missing. A value under `key` is
    /// replaced.
    pub fn block_mut(&mut self, key: &str) -> &mut StyleTree {
        let node = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| StyleNode::Block(StyleTree::new()));
        if let StyleNode::Value(_) = node {
            *node = StyleNode::Block(StyleTree::new());
        }
        match node {
            StyleNode::Block(block) => block,
            StyleNode::Value(_) => unreachable!("value replaced by a block above"),
        }
    }

    pub fn insert_value(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_string(), StyleNode::Value(value.to_string()));
    }

    pub fn insert_block(&mut self, key: &str, block: StyleTree) {
        self.entries.insert(key.to_string(), StyleNode::Block(block));
    }

    pub fn merge_declaration(&mut self, declaration: &Declaration) {
        for (property, value) in declaration {
            self.insert_value(property, value);
        }
    }

    /// Deep merge; entries of `other` win. Existing keys keep their
    /// position.
    pub fn merge(&mut self, other: StyleTree) {
        for (key, node) in other.entries {
            match node {
                StyleNode::Block(block) => self.block_mut(&key).merge(block),
                value @ StyleNode::Value(_) => {
                    self.entries.insert(key, value);
                }
            }
        }
    }

    /// Rewrites every key at every depth.
    pub fn map_keys(self, f: &impl Fn(&str) -> String) -> StyleTree {
        let entries = self
            .entries
            .into_iter()
            .map(|(key, node)| {
                let node = match node {
                    StyleNode::Block(block) => StyleNode::Block(block.map_keys(f)),
                    value => value,
                };
                (f(&key), node)
            })
            .collect();
        StyleTree { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StyleNode)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the style tree for `records`.
///
/// Selectors follow rule registration order; records of one rule keep the
/// order they were given in. Unresolved records are skipped.
pub fn build(
    records: &[MatchRecord],
    rules: &[Rule],
    config: &Config,
    options: &Options,
) -> Result<StyleTree> {
    let mut by_rule: Vec<Vec<&MatchRecord>> = vec![Vec::new(); rules.len()];
    for record in records {
        if let Some(group) = by_rule.get_mut(record.rule) {
            group.push(record);
        }
    }

    let mut patterns = StyleTree::new();
    let mut helpers = StyleTree::new();
    for (rule, records) in rules.iter().zip(&by_rule) {
        if records.is_empty() {
            continue;
        }
        if rule.is_helper() {
            add_helper(&mut helpers, rule, records, config)?;
        } else {
            for record in records {
                add_pattern(&mut patterns, rule, record, config);
            }
        }
    }

    let mut tree = nest(patterns, options.namespace.as_deref());
    tree.merge(nest(helpers, options.helpers_ns.as_deref()));
    tracing::debug!(selectors = tree.len(), "built style tree");
    Ok(tree)
}

fn add_pattern(tree: &mut StyleTree, rule: &Rule, record: &MatchRecord, config: &Config) {
    let declaration: Declaration = match (&record.declaration, &record.value) {
        (Some(declaration), _) => declaration.clone(),
        (None, Some(value)) => rule
            .properties
            .iter()
            .map(|property| (property.clone(), value.clone()))
            .collect(),
        (None, None) => return,
    };
    insert(tree, record, config, &declaration);
}

fn add_helper(
    tree: &mut StyleTree,
    rule: &Rule,
    records: &[&MatchRecord],
    config: &Config,
) -> Result<()> {
    let template = rule
        .declaration
        .as_ref()
        .ok_or_else(|| Error::MissingDeclaration {
            prefix: rule.prefix.clone(),
        })?;

    for (selector, declaration) in &rule.sub_rules {
        tree.block_mut(selector).merge_declaration(declaration);
    }

    for record in records {
        let mut declaration = substitute_params(template, &record.params);
        if record.important {
            for value in declaration.values_mut() {
                value.push_str(" !important");
            }
        }
        insert(tree, record, config, &declaration);
    }
    Ok(())
}

fn insert(tree: &mut StyleTree, record: &MatchRecord, config: &Config, declaration: &Declaration) {
    let block = tree.block_mut(&selector(record));
    match record
        .break_point
        .as_deref()
        .filter(|key| config.break_points.contains_key(*key))
    {
        Some(key) => block.block_mut(key).merge_declaration(declaration),
        None => block.merge_declaration(declaration),
    }
}

/// `.parent:pseudo>.class:pseudo`, with both class names escaped.
pub fn selector(record: &MatchRecord) -> String {
    let mut s = String::with_capacity(record.class_name.len() * 2 + 8);
    if let Some(parent) = &record.parent_selector {
        s.push('.');
        s.push_str(&escape_selector(&parent.parent));
        if let Some(pseudo) = parent.pseudo {
            s.push_str(pseudo);
        }
        s.push_str(parent.separator.combinator());
    }
    s.push('.');
    s.push_str(&escape_selector(&record.class_name));
    if let Some(pseudo) = record.value_pseudo {
        s.push_str(pseudo);
    }
    s
}

fn nest(tree: StyleTree, namespace: Option<&str>) -> StyleTree {
    match namespace {
        Some(namespace) if !tree.is_empty() => {
            let mut outer = StyleTree::new();
            outer.insert_block(namespace, tree);
            outer
        }
        _ => tree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::resolver::resolve;

    fn rules() -> Vec<Rule> {
        vec![
            Rule::pattern("D", ["display"])
                .keyword("n", "none")
                .keyword("b", "block"),
            Rule::pattern("Op", ["opacity"]).suffix_to_value(),
            Rule::pattern("C", ["color"]).suffix_to_value(),
            Rule::helper(
                "LineClamp",
                [("-webkit-line-clamp", "$0"), ("max-height", "$1")],
            )
            .sub_rule("[class*=LineClamp]", [("display", "-webkit-box")]),
        ]
    }

    fn tree_for(class_names: &[&str], config: &Config, options: &Options) -> StyleTree {
        let rules = rules();
        let grammar = Grammar::compile(&rules).unwrap();
        let records: Vec<MatchRecord> = class_names
            .iter()
            .filter_map(|name| resolve(&grammar, &rules, name, config))
            .collect();
        build(&records, &rules, config, options).unwrap()
    }

    #[test]
    fn orders_selectors_by_rule_registration() {
        let tree = tree_for(&["C-#000", "Op-1", "D-n"], &Config::new(), &Options::new());
        assert_eq!(tree.keys().collect::<Vec<_>>(), [".D-n", ".Op-1", ".C-\\#000"]);
        assert_eq!(tree.block(".Op-1").unwrap().value("opacity"), Some("1"));
    }

    #[test]
    fn composes_parent_and_pseudo_selectors() {
        let tree = tree_for(
            &["foo:h>D-n", "foo_Op-0:f"],
            &Config::new(),
            &Options::new(),
        );
        assert!(tree.block(".foo:hover>.foo\\:h\\>D-n").is_some());
        assert!(tree.block(".foo .foo_Op-0\\:f:focus").is_some());
    }

    #[test]
    fn nests_only_configured_breakpoints() {
        let config = Config::new().with_break_point("sm", "@media (min-width: 700px)");
        let tree = tree_for(&["D-n--sm", "D-b--xl"], &config, &Options::new());

        let nested = tree.block(".D-n--sm").unwrap();
        assert_eq!(nested.block("sm").unwrap().value("display"), Some("none"));

        let flat = tree.block(".D-b--xl").unwrap();
        assert_eq!(flat.value("display"), Some("block"));
        assert!(flat.block("xl").is_none());
    }

    #[test]
    fn helpers_substitute_params_and_add_sub_rules_once() {
        let tree = tree_for(
            &["LineClamp(3,4.5em)", "LineClamp(2,3em)"],
            &Config::new(),
            &Options::new(),
        );
        let block = tree.block(".LineClamp\\(3\\,4\\.5em\\)").unwrap();
        assert_eq!(block.value("-webkit-line-clamp"), Some("3"));
        assert_eq!(block.value("max-height"), Some("4.5em"));
        assert_eq!(tree.keys().filter(|k| k.starts_with("[class")).count(), 1);
        assert_eq!(tree.keys().next(), Some("[class*=LineClamp]"));
    }

    #[test]
    fn skips_unresolved_names() {
        let tree = tree_for(&["C-brand", "Op-1"], &Config::new(), &Options::new());
        assert!(tree.block(".C-brand").is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn namespaces_patterns_and_helpers_separately() {
        let options = Options::new().namespace("#app");
        let tree = tree_for(&["Op-1", "LineClamp(1,2em)"], &Config::new(), &options);
        assert!(tree.block("#app").unwrap().block(".Op-1").is_some());
        assert!(tree.block(".LineClamp\\(1\\,2em\\)").is_some());

        let options = Options::new().namespace("#app").helpers_namespace("#app");
        let tree = tree_for(&["Op-1", "LineClamp(1,2em)"], &Config::new(), &options);
        assert_eq!(tree.len(), 1);
        let app = tree.block("#app").unwrap();
        assert!(app.block(".Op-1").is_some());
        assert!(app.block(".LineClamp\\(1\\,2em\\)").is_some());
    }

    #[test]
    fn helper_without_declaration_fails() {
        let mut helper = Rule::helper("Foo", [("a", "$0")]);
        helper.declaration = None;
        let rules = vec![helper];
        let grammar = Grammar::compile(&rules).unwrap();
        let config = Config::new();
        let record = resolve(&grammar, &rules, "Foo(1)", &config).unwrap();
        let err = build(&[record], &rules, &config, &Options::new()).unwrap_err();
        assert!(matches!(err, Error::MissingDeclaration { prefix } if prefix == "Foo"));
    }

    #[test]
    fn merge_keeps_position_and_lets_other_win() {
        let mut base = StyleTree::new();
        base.block_mut(".a").insert_value("color", "red");
        base.block_mut(".b").insert_value("color", "blue");
        let mut top = StyleTree::new();
        top.block_mut(".a").insert_value("color", "green");
        top.block_mut(".a").insert_value("zoom", "1");
        base.merge(top);
        assert_eq!(base.keys().collect::<Vec<_>>(), [".a", ".b"]);
        let a = base.block(".a").unwrap();
        assert_eq!(a.value("color"), Some("green"));
        assert_eq!(a.value("zoom"), Some("1"));
    }
}
