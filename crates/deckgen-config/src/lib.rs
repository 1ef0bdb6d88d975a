//! Configuration values for deckgen.
//!
//! There is no configuration file: [`Config::default`] carries every value the
//! pipeline needs, and the CLI passes the relevant sections down to the deck
//! assembler, the title resolver and the package writer for the duration of
//! one run.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Note fields shared by both card models, in storage order.
pub const FIELD_NAMES: [&str; 3] = ["Question", "Answer", "Image"];

/// Style sheet shared by the plain and cloze models.
pub const DEFAULT_CSS: &str = ".card {
 font-family: Monospace, sans-serif;
 font-size: 1.2rem;
 max-width: 960px;
 margin: 0 auto;
}
.cloze {
 font-weight: medium;
 font-style: italic;
 color: #9ccc65;
}
";

/// Browser-like client identity sent when fetching page titles.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:51.0) Gecko/20100101 Firefox/51.0";

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Input discovery and output naming.
    pub input: InputConfig,
    /// Media path handling.
    pub media: MediaConfig,
    /// Page title resolution for bare URLs.
    pub resolver: ResolverConfig,
    /// Note models written into the package.
    pub models: ModelsConfig,
}

impl Config {
    /// Validate values that a caller may have overridden.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a value is empty or the two models
    /// share an id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.input.source_extension, "input.source_extension")?;
        require_non_empty(&self.input.package_extension, "input.package_extension")?;
        require_non_empty(&self.resolver.user_agent, "resolver.user_agent")?;
        if self.resolver.timeout.is_zero() {
            return Err(ConfigError::Validation(
                "resolver.timeout must be greater than zero".to_owned(),
            ));
        }
        if self.models.basic.id == self.models.cloze.id {
            return Err(ConfigError::Validation(format!(
                "models.basic.id and models.cloze.id must differ (both {})",
                self.models.basic.id
            )));
        }
        Ok(())
    }
}

/// Input discovery and output naming.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Extension of source files (without dot).
    pub source_extension: String,
    /// Base name excluded from conversion.
    pub excluded_stem: String,
    /// Extension of written packages (without dot).
    pub package_extension: String,
}

impl InputConfig {
    /// Whether `path` names a file that should be converted.
    #[must_use]
    pub fn is_source(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .is_some_and(|ext| ext == self.source_extension.as_str());
        let excluded = path
            .file_stem()
            .is_some_and(|stem| stem == self.excluded_stem.as_str());
        extension_matches && !excluded
    }

    /// Package path for the source file with base name `stem`.
    #[must_use]
    pub fn package_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{stem}.{}", self.package_extension))
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source_extension: "rst".to_owned(),
            excluded_stem: "README".to_owned(),
            package_extension: "apkg".to_owned(),
        }
    }
}

/// Media path handling.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory prefix stripped from image URIs in rendered `<img>` tags.
    ///
    /// Packaged media are stored flat, so cards reference them by file name.
    pub strip_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            strip_prefix: "img/".to_owned(),
        }
    }
}

/// Page title resolution settings.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Upper bound for one title request.
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// The two note models written into every package.
#[derive(Debug, Clone)]
pub struct ModelsConfig {
    /// Style sheet shared by both models.
    pub css: String,
    /// Question/answer model.
    pub basic: ModelConfig,
    /// Cloze deletion model.
    pub cloze: ModelConfig,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            css: DEFAULT_CSS.to_owned(),
            basic: ModelConfig {
                id: 1_607_392_319,
                name: "Basic Model".to_owned(),
                template_name: "Basic Card".to_owned(),
                front: "{{Question}}".to_owned(),
                back: "{{FrontSide}}<hr id=\"answer\">{{Answer}}<hr id=\"media\">{{Image}}"
                    .to_owned(),
            },
            cloze: ModelConfig {
                id: 998_877_661,
                name: "Cloze Model".to_owned(),
                template_name: "Cloze Card".to_owned(),
                front: "{{cloze:Question}}".to_owned(),
                back: "{{cloze:Question}}<hr id=\"answer\">{{Answer}}<hr id=\"media\">{{Image}}"
                    .to_owned(),
            },
        }
    }
}

/// One note model with a single card template.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model id stored in the collection.
    pub id: i64,
    /// Model display name.
    pub name: String,
    /// Card template name.
    pub template_name: String,
    /// Front side template.
    pub front: String,
    /// Back side template.
    pub back: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.source_extension, "rst");
        assert_eq!(config.input.excluded_stem, "README");
        assert_eq!(config.media.strip_prefix, "img/");
        assert_eq!(config.resolver.timeout, Duration::from_secs(5));
        assert_eq!(config.models.basic.id, 1_607_392_319);
        assert_eq!(config.models.cloze.front, "{{cloze:Question}}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_source() {
        let input = InputConfig::default();
        assert!(input.is_source(Path::new("rust.rst")));
        assert!(input.is_source(Path::new("/tmp/deck/rust.rst")));
        assert!(!input.is_source(Path::new("README.rst")));
        assert!(!input.is_source(Path::new("notes.md")));
        assert!(!input.is_source(Path::new("rst")));
    }

    #[test]
    fn test_readme_with_other_extension_is_not_source() {
        let input = InputConfig::default();
        assert!(!input.is_source(Path::new("README.md")));
    }

    #[test]
    fn test_package_path() {
        let input = InputConfig::default();
        assert_eq!(
            input.package_path(Path::new("/work"), "rust"),
            PathBuf::from("/work/rust.apkg")
        );
    }

    #[test]
    fn test_validate_rejects_shared_model_id() {
        let mut config = Config::default();
        config.models.cloze.id = config.models.basic.id;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_validate_rejects_empty_extension() {
        let mut config = Config::default();
        config.input.source_extension = String::new();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: input.source_extension cannot be empty"
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.resolver.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
