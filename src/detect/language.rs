//! Language identifiers for code fences and source blocks.

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::collections::HashMap;
use std::path::Path;

pub const FALLBACK_LANGUAGE: &str = "text";

const LANGUAGE_EXTENSIONS: &[(&str, &[&str])] = &[
    ("go", &[".go"]),
    ("elisp", &[".el"]),
    ("org", &[".org"]),
    ("python", &[".py", ".pyw", ".pyi"]),
    ("javascript", &[".js", ".mjs", ".cjs", ".jsx"]),
    ("typescript", &[".ts", ".mts", ".cts", ".tsx"]),
    ("java", &[".java"]),
    ("kotlin", &[".kt", ".kts"]),
    ("c", &[".c", ".h"]),
    ("cpp", &[".cpp", ".hpp", ".cc", ".hh", ".cxx"]),
    ("csharp", &[".cs"]),
    ("rust", &[".rs"]),
    ("ruby", &[".rb"]),
    ("php", &[".php"]),
    ("swift", &[".swift"]),
    ("lua", &[".lua"]),
    ("bash", &[".sh", ".bash"]),
    ("zsh", &[".zsh"]),
    ("fish", &[".fish"]),
    ("sql", &[".sql"]),
    ("html", &[".html", ".htm"]),
    ("css", &[".css"]),
    ("scss", &[".scss"]),
    ("json", &[".json"]),
    ("yaml", &[".yaml", ".yml"]),
    ("toml", &[".toml"]),
    ("xml", &[".xml"]),
    ("markdown", &[".md", ".markdown"]),
    ("haskell", &[".hs"]),
    ("nix", &[".nix"]),
];

const SPECIAL_FILENAMES: &[(&str, &str)] = &[
    ("Makefile", "makefile"),
    ("GNUmakefile", "makefile"),
    ("Dockerfile", "dockerfile"),
    ("Jenkinsfile", "groovy"),
    ("Vagrantfile", "ruby"),
    ("Gemfile", "ruby"),
    ("Rakefile", "ruby"),
    ("CMakeLists.txt", "cmake"),
    ("go.mod", "go-mod"),
    ("go.sum", "go-sum"),
    ("Cargo.lock", "toml"),
];

/// Interpreter name (from a `#!` line) to language.
const INTERPRETERS: &[(&str, &str)] = &[
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "zsh"),
    ("fish", "fish"),
    ("python", "python"),
    ("node", "javascript"),
    ("ruby", "ruby"),
    ("perl", "perl"),
    ("php", "php"),
    ("lua", "lua"),
    ("emacs", "elisp"),
];

static EXTENSION_TO_LANGUAGE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    LANGUAGE_EXTENSIONS
        .iter()
        .flat_map(|(lang, exts)| exts.iter().map(move |ext| (*ext, *lang)))
        .collect()
});

static SHEBANG: Lazy<Regex> = Lazy::new(|| {
    // `#!/usr/bin/env -S python3 -u`, `#!/bin/bash`, `#! /usr/local/bin/node`
    Regex::new(r"^#!\s*(?:\S*/)?(?:env\s+(?:-\S+\s+)*)?(?:\S*/)?([A-Za-z]+)").unwrap()
});

/// Lookup tables from file names, extensions and interpreters to languages.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable;

impl LanguageTable {
    /// Special file names first, then the (case-insensitive) extension.
    pub fn by_name(&self, path: &Path) -> Option<&'static str> {
        let base = path.file_name()?.to_str()?;

        if let Some(&(_, lang)) = SPECIAL_FILENAMES.iter().find(|(name, _)| *name == base) {
            return Some(lang);
        }

        let ext = path.extension()?.to_str()?.to_lowercase();
        EXTENSION_TO_LANGUAGE.get(format!(".{}", ext).as_str()).copied()
    }

    /// Language named by a `#!` interpreter line at the start of `sample`.
    pub fn by_shebang(&self, sample: &[u8]) -> Option<&'static str> {
        let caps = SHEBANG.captures(sample)?;
        let interpreter = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?;
        INTERPRETERS
            .iter()
            .find(|(name, _)| interpreter == *name || interpreter.starts_with(name))
            .map(|(_, lang)| *lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        let table = LanguageTable;
        assert_eq!(table.by_name(Path::new("main.go")), Some("go"));
        assert_eq!(table.by_name(Path::new("src/lib.RS")), Some("rust"));
        assert_eq!(table.by_name(Path::new("docker/Dockerfile")), Some("dockerfile"));
        assert_eq!(table.by_name(Path::new("go.mod")), Some("go-mod"));
        assert_eq!(table.by_name(Path::new("README")), None);
        assert_eq!(table.by_name(Path::new("archive.unknownext")), None);
    }

    #[test]
    fn test_by_shebang() {
        let table = LanguageTable;
        assert_eq!(table.by_shebang(b"#!/bin/bash\necho hi"), Some("bash"));
        assert_eq!(table.by_shebang(b"#!/usr/bin/env python3\n"), Some("python"));
        assert_eq!(table.by_shebang(b"#! /usr/local/bin/node\n"), Some("javascript"));
        assert_eq!(table.by_shebang(b"#!/usr/bin/env -S perl -w\n"), Some("perl"));
        assert_eq!(table.by_shebang(b"print('no shebang')\n"), None);
        assert_eq!(table.by_shebang(b"#!/opt/custom-tool\n"), None);
    }
}
