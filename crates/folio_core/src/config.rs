//! Runtime configuration for discovery bounds, routing and tokenization.
//!
//! # Responsibility
//! - Hold every tunable constant used by discovery and quiz code.
//! - Load overrides from JSON; missing fields keep their defaults.
//!
//! # Invariants
//! - A validated config has non-zero limits and non-blank URL prefixes.

use crate::discover::{
    PathUrlResolver, DEFAULT_RECENT_LIMIT, DEFAULT_RELATED_LIMIT, DEFAULT_TIMELINE_LIMIT,
};
use crate::quiz::QuizGenerator;
use crate::text::{
    Tokenizer, TokenizerError, DEFAULT_WORD_CLASS, QUIZ_STOP_WORDS, SIMILARITY_STOP_WORDS,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Configuration load/validation failures.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
    Tokenizer(TokenizerError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
            Self::Tokenizer(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
            Self::Tokenizer(err) => Some(err),
        }
    }
}

impl From<TokenizerError> for ConfigError {
    fn from(value: TokenizerError) -> Self {
        Self::Tokenizer(value)
    }
}

/// Bounds applied by discovery queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Most recent documents per kind scored for related content.
    pub candidate_window: u32,
    pub related_limit: usize,
    pub timeline_limit: usize,
    /// Documents per kind fetched for the recent sidebar.
    pub recent_per_kind: u32,
    pub recent_limit: usize,
    /// Title search hits per kind.
    pub search_limit: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            candidate_window: 80,
            related_limit: DEFAULT_RELATED_LIMIT,
            timeline_limit: DEFAULT_TIMELINE_LIMIT,
            recent_per_kind: 5,
            recent_limit: DEFAULT_RECENT_LIMIT,
            search_limit: 50,
        }
    }
}

/// Detail-page URL prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlConfig {
    pub post_prefix: String,
    pub note_prefix: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            post_prefix: "/blog/".to_string(),
            note_prefix: "/notes/".to_string(),
        }
    }
}

/// Stop words per subsystem; the two sets are tuned independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StopWordConfig {
    pub similarity: Vec<String>,
    pub quiz: Vec<String>,
}

impl Default for StopWordConfig {
    fn default() -> Self {
        Self {
            similarity: SIMILARITY_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            quiz: QUIZ_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    pub discovery: DiscoveryConfig,
    pub urls: UrlConfig,
    /// Regex character-class body of word characters.
    pub word_class: String,
    pub stop_words: StopWordConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            urls: UrlConfig::default(),
            word_class: DEFAULT_WORD_CLASS.to_string(),
            stop_words: StopWordConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks limits, prefixes and the word class.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let discovery = &self.discovery;
        let limits = [
            ("discovery.candidate_window", discovery.candidate_window as usize),
            ("discovery.related_limit", discovery.related_limit),
            ("discovery.timeline_limit", discovery.timeline_limit),
            ("discovery.recent_per_kind", discovery.recent_per_kind as usize),
            ("discovery.recent_limit", discovery.recent_limit),
            ("discovery.search_limit", discovery.search_limit as usize),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be > 0")));
        }

        if self.urls.post_prefix.trim().is_empty() || self.urls.note_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "urls.post_prefix and urls.note_prefix must not be blank".to_string(),
            ));
        }

        self.similarity_tokenizer()?;
        Ok(())
    }

    /// Tokenizer for related-content scoring.
    pub fn similarity_tokenizer(&self) -> Result<Tokenizer, ConfigError> {
        Ok(Tokenizer::with_word_class(
            &self.word_class,
            &self.stop_words.similarity,
        )?)
    }

    /// Quiz generator using the quiz stop-word set.
    pub fn quiz_generator(&self) -> Result<QuizGenerator, ConfigError> {
        let tokenizer = Tokenizer::with_word_class(&self.word_class, &self.stop_words.quiz)?;
        Ok(QuizGenerator::new(tokenizer))
    }

    pub fn url_resolver(&self) -> PathUrlResolver {
        PathUrlResolver::new(self.urls.post_prefix.trim(), self.urls.note_prefix.trim())
    }
}
