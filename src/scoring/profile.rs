// src/scoring/profile.rs

//! Language heuristics used by the scorer.
//!
//! Each profile is an immutable lookup structure. The built-in ones are
//! constructed once and handed out by reference; tests and callers with
//! unusual layouts can build their own with [`LanguageProfile::new`].

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Languages with a built-in heuristics profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Python.
    Python,
    /// JavaScript and TypeScript.
    JavaScript,
    /// Java and other JVM languages.
    Java,
    /// C# and other .NET languages.
    CSharp,
    /// Go.
    Go,
    /// C, C++ and Objective-C.
    Cpp,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::JavaScript,
        Language::Java,
        Language::CSharp,
        Language::Go,
        Language::Cpp,
    ];

    /// Returns the built-in heuristics for this language.
    pub fn profile(self) -> &'static LanguageProfile {
        match self {
            Language::Python => &PYTHON,
            Language::JavaScript => &JAVASCRIPT,
            Language::Java => &JAVA,
            Language::CSharp => &CSHARP,
            Language::Go => &GO,
            Language::Cpp => &CPP,
        }
    }

    /// Short identifier accepted on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::Java => "java",
            Language::CSharp => "cs",
            Language::Go => "go",
            Language::Cpp => "cpp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript/TypeScript",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Cpp => "C/C++",
        };
        f.write_str(name)
    }
}

impl FromStr for Language {
    type Err = String;

    /// Parses a language identifier case-insensitively.
    ///
    /// ```
    /// use sential::scoring::Language;
    ///
    /// assert_eq!("PY".parse::<Language>(), Ok(Language::Python));
    /// assert_eq!("typescript".parse::<Language>(), Ok(Language::JavaScript));
    /// assert!("cobol".parse::<Language>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "py" | "python" => Ok(Language::Python),
            "js" | "ts" | "javascript" | "typescript" => Ok(Language::JavaScript),
            "java" | "kotlin" => Ok(Language::Java),
            "cs" | "c#" | "csharp" | "dotnet" => Ok(Language::CSharp),
            "go" | "golang" => Ok(Language::Go),
            "c" | "cpp" | "c++" => Ok(Language::Cpp),
            other => Err(format!(
                "unknown language '{}' (expected one of: {})",
                other,
                Language::ALL
                    .iter()
                    .map(|l| l.id())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Manifest names, source extensions, signal stems and ignored directories for one language.
///
/// All entries are stored lowercase. Extensions and extension-style manifests
/// (e.g. `.csproj`) include the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    manifests: HashSet<String>,
    extensions: HashSet<String>,
    signals: HashSet<String>,
    ignore_dirs: HashSet<String>,
}

impl LanguageProfile {
    /// Builds a profile from the four heuristic lists.
    ///
    /// ```
    /// use sential::scoring::LanguageProfile;
    ///
    /// let profile = LanguageProfile::new(["Cargo.toml"], [".rs"], ["main", "lib"], ["tests"]);
    /// assert!(profile.is_source_extension(".rs"));
    /// assert!(profile.is_manifest("cargo.toml", ".toml"));
    /// ```
    pub fn new<M, E, S, D>(manifests: M, extensions: E, signals: S, ignore_dirs: D) -> Self
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            manifests: lowercase_set(manifests),
            extensions: lowercase_set(extensions),
            signals: lowercase_set(signals),
            ignore_dirs: lowercase_set(ignore_dirs),
        }
    }

    /// True if the lowercase filename, or its extension, names a manifest.
    pub fn is_manifest(&self, name_lower: &str, extension_lower: &str) -> bool {
        self.manifests.contains(name_lower)
            || (!extension_lower.is_empty() && self.manifests.contains(extension_lower))
    }

    /// True if the lowercase extension (with dot) belongs to this language.
    pub fn is_source_extension(&self, extension_lower: &str) -> bool {
        self.extensions.contains(extension_lower)
    }

    /// True if the lowercase stem is an entry-point name.
    pub fn is_signal_stem(&self, stem_lower: &str) -> bool {
        self.signals.contains(stem_lower)
    }

    /// True if the lowercase directory name marks tests, examples, vendored code, etc.
    pub fn is_ignored_dir(&self, dir_lower: &str) -> bool {
        self.ignore_dirs.contains(dir_lower)
    }

    /// Manifest names and extensions.
    pub fn manifests(&self) -> &HashSet<String> {
        &self.manifests
    }

    /// Source extensions.
    pub fn extensions(&self) -> &HashSet<String> {
        &self.extensions
    }

    /// Signal stems.
    pub fn signals(&self) -> &HashSet<String> {
        &self.signals
    }

    /// Ignored directory names.
    pub fn ignore_dirs(&self) -> &HashSet<String> {
        &self.ignore_dirs
    }
}

fn lowercase_set<I>(items: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_lowercase())
        .collect()
}

static PYTHON: Lazy<LanguageProfile> = Lazy::new(|| {
    LanguageProfile::new(
        [
            "requirements.txt",
            "pyproject.toml",
            "setup.py",
            "pipfile",
            "tox.ini",
        ],
        [".py", ".pyi"],
        [
            "__init__",
            "__main__",
            "main",
            "app",
            "wsgi",
            "asgi",
            "manage",
            "run",
            "application",
            "server",
        ],
        [
            "tests",
            "test",
            "mocks",
            "examples",
            "benchmarks",
            "scripts",
            "htmlcov",
            "docs",
        ],
    )
});

static JAVASCRIPT: Lazy<LanguageProfile> = Lazy::new(|| {
    LanguageProfile::new(
        [
            "package.json",
            "deno.json",
            "yarn.lock",
            "pnpm-lock.yaml",
            "next.config.js",
            "vite.config.js",
            "tsconfig.json",
        ],
        [
            ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".vue", ".svelte", ".astro",
        ],
        [
            "index",
            "main",
            "app",
            "server",
            "entry",
            "bootstrap",
            "start",
        ],
        [
            "tests",
            "__tests__",
            "mocks",
            "stories",
            "examples",
            "e2e",
            "cypress",
            "docs",
            "spec",
        ],
    )
});

static JAVA: Lazy<LanguageProfile> = Lazy::new(|| {
    LanguageProfile::new(
        [
            "pom.xml",
            "build.gradle",
            "build.gradle.kts",
            "settings.gradle",
            "mvnw",
            "gradlew",
        ],
        [".java", ".kt", ".scala", ".groovy"],
        ["main", "application", "app"],
        ["test", "tests", "mocks", "examples", "samples", "docs", "it"],
    )
});

static CSHARP: Lazy<LanguageProfile> = Lazy::new(|| {
    LanguageProfile::new(
        [
            ".csproj",
            ".sln",
            ".fsproj",
            ".vbproj",
            "global.json",
            "nuget.config",
        ],
        [".cs", ".fs", ".vb", ".cshtml", ".razor"],
        ["program", "startup", "app", "main", "module1"],
        [
            "tests",
            "test",
            "mocks",
            "examples",
            "spec",
            "samples",
            "testresults",
        ],
    )
});

static GO: Lazy<LanguageProfile> = Lazy::new(|| {
    LanguageProfile::new(
        ["go.mod", "go.sum", "go.work", "main.go"],
        [".go"],
        ["main", "server", "app", "cmd", "doc"],
        [
            "tests", "test", "examples", "vendor", "testdata", "mocks", "bench",
        ],
    )
});

static CPP: Lazy<LanguageProfile> = Lazy::new(|| {
    LanguageProfile::new(
        [
            "cmakelists.txt",
            "makefile",
            "configure.ac",
            "meson.build",
            "conanfile.txt",
            "vcpkg.json",
            ".gitmodules",
        ],
        [
            ".c", ".cpp", ".h", ".hpp", ".cc", ".hh", ".cxx", ".hxx", ".m", ".mm",
        ],
        ["main", "app", "application"],
        [
            "tests",
            "test",
            "mocks",
            "examples",
            "samples",
            "third_party",
            "vendor",
            "external",
        ],
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_a_non_empty_profile() {
        for language in Language::ALL {
            let profile = language.profile();
            assert!(!profile.manifests().is_empty(), "{}", language);
            assert!(!profile.extensions().is_empty(), "{}", language);
            assert!(!profile.signals().is_empty(), "{}", language);
            assert!(!profile.ignore_dirs().is_empty(), "{}", language);
        }
    }

    #[test]
    fn test_profile_entries_are_lowercased() {
        let profile = LanguageProfile::new(["CMakeLists.txt"], [".CPP"], ["Main"], ["Tests"]);
        assert!(profile.is_manifest("cmakelists.txt", ".txt"));
        assert!(profile.is_source_extension(".cpp"));
        assert!(profile.is_signal_stem("main"));
        assert!(profile.is_ignored_dir("tests"));
    }

    #[test]
    fn test_extension_style_manifests_match_by_extension() {
        let profile = Language::CSharp.profile();
        assert!(profile.is_manifest("api.csproj", ".csproj"));
        assert!(profile.is_manifest("global.json", ".json"));
        assert!(!profile.is_manifest("appsettings.json", ".json"));
        // An empty extension never matches an extension-style entry.
        assert!(!profile.is_manifest("readme", ""));
    }

    #[test]
    fn test_language_ids_round_trip_through_from_str() {
        for language in Language::ALL {
            assert_eq!(language.id().parse::<Language>(), Ok(language));
        }
    }
}
