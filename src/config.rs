//! Generator settings: defaults, optional JSON config file, CLI overrides.
//!
//! ```json
//! { "root_name": "response", "prefix": "NS", "project_name": "Petstore",
//!   "author": "Jane Roe", "date": "2024-03-07", "collision_policy": "keep-first" }
//! ```
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::codegen::RenderConfig;
use crate::error::ConfigError;
use crate::inference::{BuildOptions, CollisionPolicy, DEFAULT_ROOT_NAME};

const DEFAULT_PROJECT_NAME: &str = "Project";
const DEFAULT_AUTHOR: &str = "Author";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub root_name: String,
    pub prefix: String,
    pub project_name: String,
    pub author: String,
    pub date: NaiveDate,
    pub collision_policy: CollisionPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            prefix: String::new(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            date: Local::now().date_naive(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

/// Partial settings; every field present overrides the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub root_name: Option<String>,
    pub prefix: Option<String>,
    pub project_name: Option<String>,
    pub author: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub collision_policy: Option<CollisionPolicy>,
}

impl ConfigOverrides {
    pub fn from_json(src: &str, path: &str) -> Result<Self, ConfigError> {
        crate::path_de::from_str_with_path(src).map_err(|message| ConfigError::Parse {
            path: path.to_string(),
            message,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&src, &display)
    }
}

impl GeneratorConfig {
    pub fn apply(&mut self, overrides: ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(root_name) = overrides.root_name {
            self.root_name = root_name;
        }
        if let Some(prefix) = overrides.prefix {
            self.prefix = prefix;
        }
        if let Some(project_name) = overrides.project_name {
            self.project_name = project_name;
        }
        if let Some(author) = overrides.author {
            self.author = author;
        }
        if let Some(date) = overrides.date {
            self.date = parse_date(&date)?;
        }
        if let Some(policy) = overrides.collision_policy {
            self.collision_policy = policy;
        }
        Ok(())
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            prefix: self.prefix.clone(),
            collision_policy: self.collision_policy,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            prefix: self.prefix.clone(),
            project_name: self.project_name.clone(),
            author: self.author.clone(),
            date: self.date,
        }
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.root_name, "root");
        assert_eq!(config.prefix, "");
        assert_eq!(config.collision_policy, CollisionPolicy::Overwrite);
    }

    #[test]
    fn overrides_replace_only_present_fields() {
        let mut config = GeneratorConfig::default();
        let overrides = ConfigOverrides::from_json(
            r#"{"prefix": "NS", "date": "2024-03-07", "collision_policy": "keep-first"}"#,
            "gen.json",
        )
        .unwrap();
        config.apply(overrides).unwrap();
        assert_eq!(config.prefix, "NS");
        assert_eq!(config.root_name, "root");
        assert_eq!(config.date, NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(config.collision_policy, CollisionPolicy::KeepFirst);
        assert_eq!(config.render_config().date_label(), "7/3/2024");
        assert_eq!(config.build_options().prefix, "NS");
    }

    #[test]
    fn unknown_keys_are_reported_with_the_file() {
        let err = ConfigOverrides::from_json(r#"{"prefx": "NS"}"#, "gen.json").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("gen.json"), "{message}");
        assert!(message.contains("prefx"), "{message}");
    }

    #[test]
    fn bad_policy_names_its_path() {
        let err = ConfigOverrides::from_json(r#"{"collision_policy": "merge"}"#, "gen.json").unwrap_err();
        assert!(err.to_string().contains("collision_policy"), "{err}");
    }

    #[test]
    fn bad_date_is_rejected() {
        let mut config = GeneratorConfig::default();
        let overrides = ConfigOverrides { date: Some("07/03/2024".into()), ..Default::default() };
        assert!(matches!(config.apply(overrides), Err(ConfigError::InvalidDate(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ConfigOverrides::load(Path::new("/nonexistent/gen.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
