pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

pub use error::GeneratorError;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for code generators that produce files from an IR spec.
///
/// Every target (node-client, react-swr-client, fastapi-server, ...)
/// implements this against the shared `GeneratorConfig` so the CLI can
/// dispatch over `OagConfig::generators` without knowing the concrete type.
pub trait CodeGenerator {
    fn id(&self) -> config::GeneratorId;

    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &config::GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError>;
}

/// Drop any generated file whose path matches one of `patterns`.
///
/// Patterns are shell-style globs (`*` matches within a path segment, `**`
/// matches across segments) relative to the generator's output root — the
/// same root `GeneratedFile::path` is relative to. No dependency on the
/// `glob` crate: the corpus doesn't use one, so patterns are translated to
/// a `regex` instead.
pub fn apply_exclude_patterns(files: Vec<GeneratedFile>, patterns: &[String]) -> Vec<GeneratedFile> {
    if patterns.is_empty() {
        return files;
    }
    let regexes: Vec<regex::Regex> = patterns.iter().filter_map(|p| glob_to_regex(p)).collect();
    files
        .into_iter()
        .filter(|f| !regexes.iter().any(|r| r.is_match(&f.path)))
        .collect()
}

fn glob_to_regex(pattern: &str) -> Option<regex::Regex> {
    let mut out = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(".*");
                } else {
                    out.push_str("[^/]*");
                }
            }
            '?' => out.push_str("[^/]"),
            '.' | '+' | '(' | ')' | '|' | '^' | '$' | '{' | '}' | '[' | ']' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out.push('$');
    regex::Regex::new(&out).ok()
}

#[cfg(test)]
mod exclude_tests {
    use super::*;

    #[test]
    fn drops_matching_files() {
        let files = vec![
            GeneratedFile { path: "services/pets.ts".into(), content: String::new() },
            GeneratedFile { path: "services/users.ts".into(), content: String::new() },
            GeneratedFile { path: "index.ts".into(), content: String::new() },
        ];
        let kept = apply_exclude_patterns(files, &["services/pets.ts".to_string()]);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|f| f.path != "services/pets.ts"));
    }

    #[test]
    fn wildcard_matches_within_segment() {
        let files = vec![
            GeneratedFile { path: "services/pets.ts".into(), content: String::new() },
            GeneratedFile { path: "services/nested/users.ts".into(), content: String::new() },
        ];
        let kept = apply_exclude_patterns(files, &["services/*.ts".to_string()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].path, "services/nested/users.ts");
    }

    #[test]
    fn double_star_crosses_segments() {
        let files = vec![
            GeneratedFile { path: "services/pets.ts".into(), content: String::new() },
            GeneratedFile { path: "services/nested/users.ts".into(), content: String::new() },
        ];
        let kept = apply_exclude_patterns(files, &["services/**".to_string()]);
        assert!(kept.is_empty());
    }

    #[test]
    fn no_patterns_is_a_no_op() {
        let files = vec![GeneratedFile { path: "index.ts".into(), content: String::new() }];
        let kept = apply_exclude_patterns(files, &[]);
        assert_eq!(kept.len(), 1);
    }
}
