use crate::error::{Error, Result};
use ahash::AHashSet;
use indexmap::IndexMap;
use serde::Deserialize;

const MEDIA_PREFIX: &str = "@media";

/// What to generate: the class names, values for custom named suffixes and
/// the breakpoint media queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub class_names: Vec<String>,
    /// Keyed by `Prefix-name` or by the bare `name`.
    #[serde(default)]
    pub custom: IndexMap<String, String>,
    #[serde(default)]
    pub break_points: IndexMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in &self.break_points {
            if !value.starts_with(MEDIA_PREFIX) {
                return Err(Error::invalid_breakpoint(key, value));
            }
        }
        Ok(())
    }

    pub fn with_class_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_class_names(names);
        self
    }

    pub fn with_custom(mut self, key: &str, value: &str) -> Self {
        self.custom.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_break_point(mut self, key: &str, media_query: &str) -> Self {
        self.break_points
            .insert(key.to_string(), media_query.to_string());
        self
    }

    /// Appends names that are not already present.
    pub fn add_class_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: AHashSet<String> = self.class_names.iter().cloned().collect();
        for name in names {
            let name = name.into();
            if seen.insert(name.clone()) {
                self.class_names.push(name);
            }
        }
    }

    /// Class names without duplicates, first occurrence wins.
    pub fn unique_class_names(&self) -> Vec<&str> {
        let mut seen = AHashSet::with_capacity(self.class_names.len());
        self.class_names
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn media_query(&self, key: &str) -> Option<&str> {
        self.break_points.get(key).map(String::as_str)
    }
}

/// How to generate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Nests every pattern selector under this selector.
    pub namespace: Option<String>,
    /// Nests every helper selector under this selector.
    #[serde(rename = "helpersNS")]
    pub helpers_ns: Option<String>,
    /// Right-to-left documents swap `left` and `right`.
    pub rtl: bool,
    /// Emitted before the rules.
    pub banner: String,
    /// Print a warning for every class name that could not be resolved.
    pub verbose: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn helpers_namespace(mut self, namespace: &str) -> Self {
        self.helpers_ns = Some(namespace.to_string());
        self
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn banner(mut self, banner: &str) -> Self {
        self.banner = banner.to_string();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_toml() {
        let config = Config::from_toml_str(
            r##"
            classNames = ["D-n", "C-brand", "D-n"]

            [custom]
            brand = "#0280ae"

            [breakPoints]
            sm = "@media (min-width: 700px)"
            "##,
        )
        .unwrap();
        assert_eq!(config.unique_class_names(), ["D-n", "C-brand"]);
        assert_eq!(config.custom["brand"], "#0280ae");
        assert_eq!(config.media_query("sm"), Some("@media (min-width: 700px)"));
    }

    #[test]
    fn loads_from_json() {
        let config = Config::from_json_str(
            r#"{"classNames": ["Op-1"], "breakPoints": {"lg": "@media (min-width: 1200px)"}}"#,
        )
        .unwrap();
        assert_eq!(config.class_names, ["Op-1"]);
        assert!(config.custom.is_empty());
    }

    #[test]
    fn rejects_breakpoint_without_media_query() {
        let err = Config::from_json_str(r#"{"breakPoints": {"sm": "(min-width: 700px)"}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBreakpoint { key, .. } if key == "sm"));
    }

    #[test]
    fn rejects_breakpoints_that_are_not_a_map() {
        let err = Config::from_json_str(r#"{"breakPoints": ["@media screen"]}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = Config::from_toml_str(r#"breakPoints = "@media screen""#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn add_class_names_dedupes() {
        let mut config = Config::new().with_class_names(["D-n", "Op-1"]);
        config.add_class_names(["Op-1", "C-#000", "D-n"]);
        assert_eq!(config.class_names, ["D-n", "Op-1", "C-#000"]);
    }

    #[test]
    fn options_from_json() {
        let options: Options =
            serde_json::from_str(r##"{"namespace": "#app", "helpersNS": "#app", "rtl": true}"##)
                .unwrap();
        assert_eq!(options.namespace.as_deref(), Some("#app"));
        assert_eq!(options.helpers_ns.as_deref(), Some("#app"));
        assert!(options.rtl);
        assert!(options.banner.is_empty());
    }
}
