use super::{StyleNode, StyleTree};
use crate::error::{Error, Result};
use indexmap::IndexMap;

pub struct CompileOptions<'a> {
    /// Written verbatim before the first rule.
    pub banner: &'a str,
    /// Breakpoint keys in the tree map to these media queries.
    pub break_points: &'a IndexMap<String, String>,
}

/// Serializes a style tree into stylesheet text.
pub trait StyleSheetCompiler {
    fn compile(&self, tree: &StyleTree, options: &CompileOptions<'_>) -> Result<String>;
}

/// Writes plain CSS. Nested selectors are joined with a space (or replace
/// `&`), breakpoint keys and `@` keys become wrapping at-rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssWriter;

impl StyleSheetCompiler for CssWriter {
    fn compile(&self, tree: &StyleTree, options: &CompileOptions<'_>) -> Result<String> {
        let mut out = String::with_capacity(tree.len() * 48 + options.banner.len());
        if !options.banner.is_empty() {
            out.push_str(options.banner);
            if !options.banner.ends_with('\n') {
                out.push('\n');
            }
        }
        for (key, node) in tree.iter() {
            match node {
                StyleNode::Block(block) => write_rule(&mut out, key, block, &[], options)?,
                StyleNode::Value(value) => {
                    return Err(Error::compile(format!(
                        "declaration `{key}: {value}` is not inside a selector"
                    )));
                }
            }
        }
        Ok(out)
    }
}

fn write_rule(
    out: &mut String,
    selector: &str,
    block: &StyleTree,
    at_rules: &[&str],
    options: &CompileOptions<'_>,
) -> Result<()> {
    if selector.trim().is_empty() {
        return Err(Error::compile("empty selector"));
    }

    let declarations: Vec<(&str, &str)> = block
        .iter()
        .filter_map(|(property, node)| match node {
            StyleNode::Value(value) => Some((property.as_str(), value.as_str())),
            StyleNode::Block(_) => None,
        })
        .collect();
    if !declarations.is_empty() {
        out.push_str(&wrap_at_rules(build_block(selector, &declarations), at_rules));
    }

    for (key, node) in block.iter() {
        let StyleNode::Block(child) = node else {
            continue;
        };
        if let Some(media_query) = options.break_points.get(key) {
            let nested = with_at_rule(at_rules, media_query);
            write_rule(out, selector, child, &nested, options)?;
        } else if key.starts_with('@') {
            let nested = with_at_rule(at_rules, key);
            write_rule(out, selector, child, &nested, options)?;
        } else {
            write_rule(out, &join_selectors(selector, key), child, at_rules, options)?;
        }
    }
    Ok(())
}

fn with_at_rule<'a>(at_rules: &[&'a str], at_rule: &'a str) -> Vec<&'a str> {
    let mut nested = at_rules.to_vec();
    nested.push(at_rule);
    nested
}

// Every selector in the child list is combined with every selector in the
// parent list.
fn join_selectors(parent: &str, child: &str) -> String {
    let mut joined = Vec::new();
    for p in parent.split(',').map(str::trim) {
        for c in child.split(',').map(str::trim) {
            if c.contains('&') {
                joined.push(c.replace('&', p));
            } else {
                joined.push(format!("{p} {c}"));
            }
        }
    }
    joined.join(", ")
}

fn build_block(selector: &str, declarations: &[(&str, &str)]) -> String {
    let mut s = String::with_capacity(selector.len() + declarations.len() * 24 + 8);
    s.push_str(selector);
    s.push_str(" {\n");
    for (property, value) in declarations {
        s.push_str("  ");
        s.push_str(property);
        s.push_str(": ");
        s.push_str(value);
        s.push_str(";\n");
    }
    s.push_str("}\n");
    s
}

fn wrap_at_rules(mut body: String, at_rules: &[&str]) -> String {
    for at_rule in at_rules.iter().rev() {
        let mut wrapped = String::with_capacity(body.len() + at_rule.len() + 8);
        wrapped.push_str(at_rule);
        wrapped.push_str(" {\n");
        for line in body.trim_end().lines() {
            if line.is_empty() {
                continue;
            }
            wrapped.push_str("  ");
            wrapped.push_str(line);
            wrapped.push('\n');
        }
        wrapped.push_str("}\n");
        body = wrapped;
    }
    body
}
