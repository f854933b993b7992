//! Segment-wise view of a glob pattern.
//!
//! A pattern must spell out every dot-prefixed segment it wants to reach:
//! `.test/**` reaches `.test/kkk/ll.go` but not `.test/.xxx`, and `*` or `**`
//! never match a hidden segment. Alignment treats `**` as "zero or more
//! segments", so `**/.env` reaches `a/b/.env` no matter how deep it sits.

use globset::{GlobBuilder, GlobMatcher};

const GLOB_META: &[char] = &['*', '?', '[', '{'];

#[derive(Debug, Clone)]
enum Segment {
    /// `**`
    AnyDepth,
    Literal(String),
    Glob { text: String, matcher: GlobMatcher },
}

impl Segment {
    fn matches(&self, component: &str) -> bool {
        match self {
            Segment::AnyDepth => true,
            Segment::Literal(text) => text == component,
            Segment::Glob { matcher, .. } => matcher.is_match(component),
        }
    }

    fn spells_dot(&self) -> bool {
        match self {
            Segment::AnyDepth => false,
            Segment::Literal(text) | Segment::Glob { text, .. } => text.starts_with('.'),
        }
    }
}

/// A slash-separated glob pattern compiled one segment at a time.
#[derive(Debug, Clone)]
pub struct SegmentPattern {
    segments: Vec<Segment>,
}

impl SegmentPattern {
    pub fn parse(pattern: &str) -> Result<Self, globset::Error> {
        let mut segments = Vec::new();
        for part in split_segments(pattern) {
            let segment = if part == "**" {
                Segment::AnyDepth
            } else if !has_glob_meta(part) {
                Segment::Literal(part.to_string())
            } else {
                let matcher =
                    GlobBuilder::new(part).literal_separator(true).build()?.compile_matcher();
                Segment::Glob { text: part.to_string(), matcher }
            };
            segments.push(segment);
        }
        Ok(Self { segments })
    }

    /// Whole-path alignment: does the pattern match `path` segment by segment?
    ///
    /// With `allow_hidden == false` a hidden path segment only aligns with a
    /// pattern segment that itself begins with `.`.
    pub fn matches(&self, path: &str, allow_hidden: bool) -> bool {
        let components = split_segments(path).collect::<Vec<_>>();
        let reach = self.reachability(&components, allow_hidden);
        reach[self.segments.len()][components.len()]
    }

    /// Prefix alignment: could some path beneath directory `dir` still match?
    pub fn could_match_below(&self, dir: &str, allow_hidden: bool) -> bool {
        let components = split_segments(dir).collect::<Vec<_>>();
        let reach = self.reachability(&components, allow_hidden);
        (0..self.segments.len()).any(|i| reach[i][components.len()])
    }

    /// `reach[i][j]`: the first `i` pattern segments can consume the first `j`
    /// path components.
    fn reachability(&self, components: &[&str], allow_hidden: bool) -> Vec<Vec<bool>> {
        let (m, n) = (self.segments.len(), components.len());
        let mut reach = vec![vec![false; n + 1]; m + 1];
        reach[0][0] = true;

        for i in 0..m {
            let segment = &self.segments[i];
            for j in 0..=n {
                if !reach[i][j] {
                    continue;
                }
                match segment {
                    Segment::AnyDepth => {
                        reach[i + 1][j] = true;
                        if j < n && (allow_hidden || !is_hidden(components[j])) {
                            reach[i][j + 1] = true;
                        }
                    }
                    _ => {
                        if j < n
                            && segment.matches(components[j])
                            && (allow_hidden || !is_hidden(components[j]) || segment.spells_dot())
                        {
                            reach[i + 1][j + 1] = true;
                        }
                    }
                }
            }
        }
        reach
    }
}

/// A dot-prefixed segment other than `.` and `..`.
pub fn is_hidden(component: &str) -> bool {
    component.starts_with('.') && component != "." && component != ".."
}

pub fn has_hidden_component(path: &str) -> bool {
    split_segments(path).any(is_hidden)
}

pub fn has_glob_meta(segment: &str) -> bool {
    segment.contains(GLOB_META)
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|seg| !seg.is_empty() && *seg != ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(pattern: &str, path: &str) -> bool {
        SegmentPattern::parse(pattern).expect("pattern").matches(path, false)
    }

    #[test]
    fn test_wildcards_do_not_reach_hidden_segments() {
        assert!(visible("**", "src/main.rs"));
        assert!(!visible("**", ".hidden/file.go"));
        assert!(!visible("**", "src/.hidden/file.go"), "intermediate hidden dir");
        assert!(!visible("**", "src/.env"), "hidden final segment");
        assert!(!visible("*", ".gitignore"));
        assert!(!visible("**/*.go", ".test/a.go"));
    }

    #[test]
    fn test_explicit_dot_segments_are_visible() {
        assert!(visible(".test/**", ".test/kkk/oo/ll.go"));
        assert!(!visible(".test/**", ".test/.xxx"));
        assert!(visible(".*", ".gitignore"));
        assert!(visible("**/.env", "a/b/.env"));
        assert!(visible("**/.env", ".env"));
        assert!(!visible("**/.env", ".config/.env"), "** still cannot cross .config");
        assert!(visible(".config/**/.env", ".config/app/.env"));
        assert!(visible(".github/workflows/*.yml", ".github/workflows/ci.yml"));
    }

    #[test]
    fn test_dot_markers_are_not_hidden() {
        assert!(visible("./src/*.rs", "./src/lib.rs"));
        assert!(visible("../lib/*.rs", "../lib/a.rs"));
        assert!(!is_hidden("."));
        assert!(!is_hidden(".."));
        assert!(is_hidden(".x"));
    }

    #[test]
    fn test_allow_hidden_restores_plain_glob_semantics() {
        let pattern = SegmentPattern::parse("**").expect("pattern");
        assert!(pattern.matches(".a/.b/c", true));
        assert!(!pattern.matches(".a/.b/c", false));
    }

    #[test]
    fn test_absolute_patterns_align_with_absolute_paths() {
        assert!(visible("/home/u/.config/**", "/home/u/.config/nvim/init.lua"));
        assert!(!visible("/home/u/**", "/home/u/.config/nvim/init.lua"));
    }

    #[test]
    fn test_could_match_below_prunes_directories() {
        let pattern = SegmentPattern::parse("src/**/*.rs").expect("pattern");
        assert!(pattern.could_match_below("src", false));
        assert!(pattern.could_match_below("src/a/b", false));
        assert!(!pattern.could_match_below("docs", false));
        assert!(!pattern.could_match_below("src/.cache", false));
        assert!(pattern.could_match_below("src/.cache", true));

        let flat = SegmentPattern::parse("*.go").expect("pattern");
        assert!(!flat.could_match_below("vendor", false));
    }

    #[test]
    fn test_has_hidden_component() {
        assert!(has_hidden_component("a/.b/c"));
        assert!(!has_hidden_component("./a/../b"));
    }
}
