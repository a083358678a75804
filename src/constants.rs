// src/constants.rs

/// Filenames (lowercase) that carry project intent regardless of language.
pub const UNIVERSAL_CONTEXT_FILES: &[&str] = &[
    // Documentation & intent
    "readme.md",
    "readme.txt",
    "architecture.md",
    "contributing.md",
    "design.md",
    // Assistant instructions
    "claude.md",
    ".cursorrules",
    ".windsurfrules",
    // Environment / infrastructure templates
    ".env.example",
    ".env.template",
    "docker-compose.yml",
    "dockerfile",
    "makefile",
    "justfile",
    "rakefile",
    "procfile",
];

/// Symbol kinds reported by the tagger that are kept in source records.
pub const SYMBOL_KINDS: &[&str] = &[
    "class",
    "method",
    "function",
    "struct",
    "enum",
    "union",
    "interface",
    "typedef",
    "type",
    "namespace",
    "module",
    "package",
];

/// Points subtracted per directory level above the file.
pub const DEPTH_PENALTY: i64 = 5;

/// Points subtracted when any ancestor directory is in the profile's ignore list.
pub const IGNORED_DIR_PENALTY: i64 = 100;

/// Default total token cap for a categorized run.
pub const DEFAULT_MAX_TOKENS: usize = 200_000;

/// Default share of the total cap granted to a flat (chapter) budget.
pub const DEFAULT_CHAPTER_RATIO: f64 = 0.6;

/// Number of source files handed to the tagger per invocation.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Tokenizer model used when none is configured.
pub const DEFAULT_TOKENIZER_MODEL: &str = "gpt-4o";

/// Number of leading bytes inspected when deciding whether a file is binary.
pub const BINARY_SNIFF_WINDOW: usize = 1024;

/// Program name used when no bundled or configured tagger is found.
pub const DEFAULT_CTAGS_PROGRAM: &str = "ctags";

/// Environment variable that overrides the tagger location.
pub const CTAGS_ENV_VAR: &str = "SENTIAL_CTAGS";
