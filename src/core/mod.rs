use crate::config::{Config, Options};
use crate::error::Result;
use crate::generator::{
    self, CompileOptions, CssWriter, StyleSheetCompiler, StyleTree, mask_commas,
    replace_constants, unmask_commas,
};
use crate::grammar::Grammar;
use crate::resolver::{self, MatchRecord, custom_key};
use crate::rules::{self, Registry, Rule};
use colored::Colorize;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A class name whose named suffix has no value anywhere. It is left out
/// of the generated CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub class_name: String,
    pub prefix: String,
    pub named: String,
}

impl Warning {
    fn from_record(record: &MatchRecord) -> Option<Self> {
        if !record.is_unresolved() {
            return None;
        }
        Some(Self {
            class_name: record.class_name.clone(),
            prefix: record.prefix.clone(),
            named: record.named.clone()?,
        })
    }

    /// What to add to the config to make the class resolve.
    pub fn custom_snippet(&self) -> String {
        format!(
            "custom: {{\n  \"{}\": \"YOUR-CUSTOM-VALUE\"\n}}",
            custom_key(&self.prefix, &self.named)
        )
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}`: no value found for `{}`, add it to config.custom",
            self.class_name, self.named
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub css: String,
    pub warnings: Vec<Warning>,
}

/// Owns a rule registry and turns class names into CSS with it.
///
/// The grammar is compiled on first use and cached until the rule set
/// changes.
pub struct Atomizer {
    registry: Registry,
    grammar: RwLock<Option<Arc<Grammar>>>,
}

impl Atomizer {
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        Ok(Self {
            registry: Registry::new(rules)?,
            grammar: RwLock::new(None),
        })
    }

    pub fn with_default_rules() -> Result<Self> {
        Self::new(rules::defaults())
    }

    /// Registers `rules` after the existing ones. Nothing is added when one
    /// of them reuses a prefix.
    pub fn add_rules(&mut self, rules: Vec<Rule>) -> Result<()> {
        self.registry.extend(rules)?;
        *self.grammar.get_mut() = None;
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        self.registry.rules()
    }

    pub fn grammar(&self) -> Result<Arc<Grammar>> {
        if let Some(grammar) = self.grammar.read().as_ref() {
            return Ok(Arc::clone(grammar));
        }
        let mut slot = self.grammar.write();
        if let Some(grammar) = slot.as_ref() {
            return Ok(Arc::clone(grammar));
        }
        let grammar = Arc::new(Grammar::compile(self.registry.rules())?);
        *slot = Some(Arc::clone(&grammar));
        Ok(grammar)
    }

    pub fn find_class_names(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.grammar()?.find_class_names(text))
    }

    /// `base` with `class_names` appended, skipping names it already has.
    pub fn config_for<I, S>(&self, class_names: I, base: Config) -> Config
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        base.with_class_names(class_names)
    }

    pub fn resolve(&self, class_name: &str, config: &Config) -> Result<Option<MatchRecord>> {
        let grammar = self.grammar()?;
        Ok(resolver::resolve(&grammar, self.rules(), class_name, config))
    }

    pub fn style_tree(&self, config: &Config, options: &Options) -> Result<(StyleTree, Vec<Warning>)> {
        config.validate()?;
        let grammar = self.grammar()?;
        let rules = self.rules();

        let records: Vec<MatchRecord> = config
            .unique_class_names()
            .into_iter()
            .filter_map(|name| resolver::resolve(&grammar, rules, name, config))
            .collect();
        let warnings: Vec<Warning> = records.iter().filter_map(Warning::from_record).collect();
        if options.verbose {
            for warning in &warnings {
                eprintln!(
                    "{} {}\n{}",
                    "Warning:".yellow().bold(),
                    warning,
                    warning.custom_snippet().dimmed()
                );
            }
        }

        let tree = generator::build(&records, rules, config, options)?;
        tracing::debug!(
            classes = records.len(),
            unresolved = warnings.len(),
            "generated style tree"
        );
        Ok((tree, warnings))
    }

    pub fn css(&self, config: &Config, options: &Options) -> Result<Generated> {
        self.css_with(config, options, &CssWriter)
    }

    pub fn css_with(
        &self,
        config: &Config,
        options: &Options,
        compiler: &dyn StyleSheetCompiler,
    ) -> Result<Generated> {
        let (tree, warnings) = self.style_tree(config, options)?;
        let tree = tree.map_keys(&mask_commas);
        let css = compiler.compile(
            &tree,
            &CompileOptions {
                banner: &options.banner,
                break_points: &config.break_points,
            },
        )?;
        let css = replace_constants(&unmask_commas(&css), options.rtl);
        Ok(Generated { css, warnings })
    }
}

impl fmt::Debug for Atomizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atomizer")
            .field("rules", &self.registry.len())
            .field("grammar_cached", &self.grammar.read().is_some())
            .finish()
    }
}
