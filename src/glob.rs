//! Glob patterns for selecting collection files.
//!
//! Patterns are matched against `/`-separated paths relative to the
//! collection base. Supported syntax: `**` (any number of directories), `*`,
//! `?`, `[abc]` / `[!abc]` classes and `{a,b}` alternation.

use regex::RegexSet;

#[derive(Debug, Clone)]
pub struct GlobSet {
    set: RegexSet,
}

impl GlobSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let regexes: Vec<String> = patterns
            .into_iter()
            .map(|p| to_regex(p.as_ref()))
            .collect();
        Ok(GlobSet { set: RegexSet::new(regexes)? })
    }

    /// True if `path` matches at least one pattern.
    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}

/// Translates one glob into an anchored regular expression.
pub fn to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from("^");
    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_segment_start = i == 0 || chars[i - 1] == '/';
                match chars.get(i + 2) {
                    Some('/') if at_segment_start => {
                        out.push_str("(?:.*/)?");
                        i += 3;
                    }
                    None if at_segment_start && i > 0 => {
                        // `dir/**` also matches `dir` itself
                        out.pop();
                        out.push_str("(?:/.*)?");
                        i += 2;
                    }
                    _ => {
                        out.push_str(".*");
                        i += 2;
                    }
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                if let Some(len) = chars[i + 1..].iter().position(|&ch| ch == ']') {
                    let class: String = chars[i + 1..i + 1 + len].iter().collect();
                    out.push('[');
                    match class.strip_prefix('!') {
                        Some(negated) => {
                            out.push('^');
                            out.push_str(&escape_class(negated));
                        }
                        None => out.push_str(&escape_class(&class)),
                    }
                    out.push(']');
                    i += len + 2;
                    continue;
                }
                out.push_str(r"\[");
            }
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            '\\' if i + 1 < chars.len() => {
                i += 1;
                out.push_str(&regex::escape(&chars[i].to_string()));
            }
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Escapes everything inside a class except ranges.
fn escape_class(class: &str) -> String {
    class
        .chars()
        .map(|c| match c {
            '\\' | '[' | ']' | '^' | '&' | '~' => format!("\\{c}"),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("**/*.md", "hello.md", true)]
    #[case("**/*.md", "2024/01/hello.md", true)]
    #[case("**/*.md", "hello.mdx", false)]
    #[case("**/*.md", "hello.md.bak", false)]
    #[case("*.md", "nested/hello.md", false)]
    #[case("*.md", "hello.md", true)]
    #[case("**/*.{md,mdx}", "a/b.mdx", true)]
    #[case("**/*.{md,mdx}", "a/b.txt", false)]
    #[case("drafts/**", "drafts/x/y.md", true)]
    #[case("drafts/**", "drafts", true)]
    #[case("drafts/**", "published/x.md", false)]
    #[case("post-?.md", "post-1.md", true)]
    #[case("post-?.md", "post-10.md", false)]
    #[case("post-[0-9].md", "post-7.md", true)]
    #[case("post-[!0-9].md", "post-7.md", false)]
    #[case("post-[!0-9].md", "post-a.md", true)]
    #[case("a+b(1).md", "a+b(1).md", true)]
    fn test_match(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        let set = GlobSet::new([pattern]).unwrap();
        assert_eq!(set.is_match(path), expected, "{pattern} vs {path}");
    }

    #[test]
    fn test_any_pattern_matches() {
        let set = GlobSet::new(["**/*.md", "**/*.mdx"]).unwrap();
        assert!(set.is_match("a.md"));
        assert!(set.is_match("x/a.mdx"));
        assert!(!set.is_match("x/a.markdown"));
    }

    #[test]
    fn test_unclosed_brace_is_an_error() {
        assert!(GlobSet::new(["{a,b"]).is_err());
    }
}
