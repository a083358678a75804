// src/cli.rs

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHAPTER_RATIO, DEFAULT_MAX_TOKENS, DEFAULT_TOKENIZER_MODEL,
};
use clap::{Parser, Subcommand};

/// Condenses a repository into a token-budgeted JSONL payload for language models.
///
/// sential scores every file by how much it says about the project, then spends
/// a fixed token budget in priority order: documentation and context files,
/// dependency manifests, entry points, and finally symbol listings of the
/// remaining source files produced by universal-ctags.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the repository root.
    #[arg(default_value = ".")]
    pub input_path: String,

    // --- Selection ---
    /// Language profile used for scoring (py, js, java, cs, go, cpp).
    #[arg(short = 'l', long, value_name = "LANG", default_value = "py")]
    pub language: String,

    /// Use git to list files (fails outside a git work tree).
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "no_git")]
    pub git: bool,

    /// Walk the filesystem instead of asking git, still honoring .gitignore files.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_git: bool,

    // --- Budget ---
    /// Total token cap the per-category shares are taken from.
    #[arg(short = 'm', long, value_name = "TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: usize,

    /// Tokenizer model used to price text.
    #[arg(long, value_name = "MODEL", default_value = DEFAULT_TOKENIZER_MODEL)]
    pub model: String,

    // --- Tagger ---
    /// Number of source files handed to ctags per invocation.
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Path to a universal-ctags executable (overrides SENTIAL_CTAGS and the bundled binary).
    #[arg(long, value_name = "PATH")]
    pub ctags: Option<String>,

    /// Exit with an error status if ctags fails, even when partial output was written.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub strict_tagger: bool,

    // --- Output ---
    /// Write output to the specified file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<String>,

    /// Print a per-category summary to stderr when done.
    #[arg(short = 's', long, action = clap::ArgAction::SetTrue)]
    pub summary: bool,

    /// List the scored files per category without reading or tagging anything.
    #[arg(short = 'D', long, action = clap::ArgAction::SetTrue)]
    pub dry_run: bool,

    // --- Execution Control ---
    /// Stop after this many seconds, keeping whatever was extracted so far.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Alternative run modes.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the given files in order under a single flat budget.
    Chapter {
        /// Repository-relative paths, read in the order given.
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,

        /// Share of --max-tokens available to the chapter.
        #[arg(long, value_name = "RATIO", default_value_t = DEFAULT_CHAPTER_RATIO)]
        ratio: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sential"]).unwrap();
        assert_eq!(cli.input_path, ".");
        assert_eq!(cli.language, "py");
        assert_eq!(cli.max_tokens, 200_000);
        assert_eq!(cli.batch_size, 100);
        assert_eq!(cli.model, "gpt-4o");
        assert!(!cli.git && !cli.no_git);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_git_and_no_git_conflict() {
        let result = Cli::try_parse_from(["sential", "--git", "--no-git"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_chapter_requires_paths() {
        assert!(Cli::try_parse_from(["sential", "chapter"]).is_err());

        let cli = Cli::try_parse_from(["sential", "repo", "chapter", "a.md", "b.md"]).unwrap();
        assert_eq!(cli.input_path, "repo");
        match cli.command {
            Some(Commands::Chapter { paths, ratio }) => {
                assert_eq!(paths, vec!["a.md", "b.md"]);
                assert_eq!(ratio, DEFAULT_CHAPTER_RATIO);
            }
            None => panic!("expected chapter subcommand"),
        }
    }
}
