//! Atomic CSS generation.
//!
//! Class names such as `D-n`, `W-1/3`, `C-#fff.5:h--sm` or
//! `LineClamp(3,4.5em)` are matched against a registry of [`Rule`]s,
//! resolved to declarations and written out as a style sheet.
//!
//! ```no_run
//! use atomizer::{Atomizer, Config, Options};
//!
//! let atomizer = Atomizer::with_default_rules()?;
//! let found = atomizer.find_class_names(r#"<div class="D-n Op-1 W-1/3">"#)?;
//! let config = atomizer.config_for(found, Config::new());
//! let generated = atomizer.css(&config, &Options::new())?;
//! print!("{}", generated.css);
//! # Ok::<(), atomizer::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod parser;
pub mod resolver;
pub mod rules;

pub use crate::config::{Config, Options};
pub use crate::core::{Atomizer, Generated, Warning};
pub use crate::error::{Error, Result};
pub use crate::generator::{CompileOptions, CssWriter, StyleNode, StyleSheetCompiler, StyleTree};
pub use crate::grammar::Grammar;
pub use crate::resolver::MatchRecord;
pub use crate::rules::{Declaration, Registry, Rule, RuleKind};
