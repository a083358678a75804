// src/config/builder.rs

use super::{
    parsing::parse_language, path_resolve::resolve_root, validation::validate_builder_options,
    ChapterConfig, Config, OutputDestination,
};
use crate::budget::TokenLimits;
use crate::cli::{Cli, Commands};
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_TOKENIZER_MODEL};
use crate::discovery::ListingMode;
use crate::errors::Result;
use crate::scoring::FileCategory;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// A builder for creating a `Config` instance programmatically.
///
/// This is the primary way for library users to configure a `sential` run.
/// Every option has a sensible default; `build` validates the combination and
/// resolves the root path.
///
/// # Examples
///
/// ```
/// use sential::ConfigBuilder;
/// use sential::scoring::Language;
///
/// let config = ConfigBuilder::new()
///     .input_path(".")
///     .language("js")
///     .max_tokens(50_000)
///     .batch_size(25)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.language, Language::JavaScript);
/// assert_eq!(config.limits.max_total, 50_000);
/// assert_eq!(config.batch_size, 25);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    pub(super) input_path: Option<String>,
    pub(super) language: Option<String>,
    pub(super) max_tokens: Option<usize>,
    pub(super) ratios: BTreeMap<FileCategory, f64>,
    pub(super) batch_size: Option<usize>,
    pub(super) tokenizer_model: Option<String>,
    pub(super) ctags_program: Option<String>,
    pub(super) listing: Option<ListingMode>,
    pub(super) output_file: Option<String>,
    pub(super) summary: Option<bool>,
    pub(super) dry_run: Option<bool>,
    pub(super) timeout_secs: Option<u64>,
    pub(super) strict_tagger: Option<bool>,
    pub(super) chapter: Option<(Vec<String>, f64)>,
}

impl ConfigBuilder {
    /// Creates a new `ConfigBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from parsed command-line arguments.
    pub fn from_cli(cli: Cli) -> Self {
        let mut builder = Self::new()
            .input_path(cli.input_path)
            .language(cli.language)
            .max_tokens(cli.max_tokens)
            .batch_size(cli.batch_size)
            .tokenizer_model(cli.model)
            .listing(if cli.no_git {
                ListingMode::Walk
            } else if cli.git {
                ListingMode::Git
            } else {
                ListingMode::Auto
            })
            .summary(cli.summary)
            .dry_run(cli.dry_run)
            .strict_tagger(cli.strict_tagger);
        builder.ctags_program = cli.ctags;
        builder.output_file = cli.output_file;
        builder.timeout_secs = cli.timeout;
        if let Some(Commands::Chapter { paths, ratio }) = cli.command {
            builder = builder.chapter(paths, ratio);
        }
        builder
    }

    /// Sets the repository root. Defaults to `.`.
    pub fn input_path(mut self, path: impl Into<String>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Sets the language by identifier (`py`, `js`, `java`, `cs`, `go`, `cpp`). Defaults to `py`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the total token cap the category ratios are applied to.
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Overrides the share of the cap `category` adds to the pool.
    pub fn category_ratio(mut self, category: FileCategory, ratio: f64) -> Self {
        self.ratios.insert(category, ratio);
        self
    }

    /// Sets how many source files are tagged per tagger invocation.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Sets the model whose tokenizer prices text.
    pub fn tokenizer_model(mut self, model: impl Into<String>) -> Self {
        self.tokenizer_model = Some(model.into());
        self
    }

    /// Uses this ctags executable instead of locating one.
    pub fn ctags_program(mut self, program: impl Into<String>) -> Self {
        self.ctags_program = Some(program.into());
        self
    }

    /// Selects the file-listing provider.
    pub fn listing(mut self, mode: ListingMode) -> Self {
        self.listing = Some(mode);
        self
    }

    /// Writes output to a file instead of stdout.
    pub fn output_file(mut self, path: impl Into<String>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Prints a run summary to stderr.
    pub fn summary(mut self, summary: bool) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Lists scored files without extracting anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    /// Stops the run after `secs` seconds, keeping what was already extracted.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Treats a tagger failure as a failed run.
    pub fn strict_tagger(mut self, strict: bool) -> Self {
        self.strict_tagger = Some(strict);
        self
    }

    /// Switches to a chapter run over `paths` with a flat budget of `ratio` times the cap.
    pub fn chapter(mut self, paths: Vec<String>, ratio: f64) -> Self {
        self.chapter = Some((paths, ratio));
        self
    }

    /// Builds the final `Config`.
    ///
    /// # Errors
    /// Returns [`Error::Config`](crate::errors::Error::Config) for invalid values
    /// or conflicting options, and [`Error::Io`](crate::errors::Error::Io) if the
    /// root path cannot be resolved.
    pub fn build(self) -> Result<Config> {
        validate_builder_options(&self)?;

        let language = parse_language(self.language.as_deref().unwrap_or("py"))?;
        let root = resolve_root(self.input_path.as_deref().unwrap_or("."))?;

        let mut limits = TokenLimits::default();
        if let Some(max_tokens) = self.max_tokens {
            limits.max_total = max_tokens;
        }
        limits.ratios.extend(self.ratios);

        let output_destination = match self.output_file {
            Some(path) => OutputDestination::File(PathBuf::from(path)),
            None => OutputDestination::Stdout,
        };

        Ok(Config {
            root,
            language,
            limits,
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            tokenizer_model: self
                .tokenizer_model
                .unwrap_or_else(|| DEFAULT_TOKENIZER_MODEL.to_string()),
            ctags_program: self.ctags_program.map(PathBuf::from),
            listing: self.listing.unwrap_or_default(),
            output_destination,
            summary: self.summary.unwrap_or(false),
            dry_run: self.dry_run.unwrap_or(false),
            timeout: self.timeout_secs.map(Duration::from_secs),
            strict_tagger: self.strict_tagger.unwrap_or(false),
            chapter: self.chapter.map(|(paths, ratio)| ChapterConfig { paths, ratio }),
        })
    }
}
