//! `.helmignore` support
//!
//! Patterns follow the usual ignore-file conventions:
//! - blank lines and lines starting with `#` are skipped
//! - a pattern without `/` matches the base name at any depth
//! - a pattern containing `/` matches the path relative to the chart root
//! - a trailing `/` restricts the pattern to directories
//! - a leading `!` re-includes a previously ignored path
//!
//! The last matching pattern wins.

use glob::{MatchOptions, Pattern};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Name of the ignore file at the chart root
pub const HELMIGNORE: &str = ".helmignore";

/// Hidden files inside `templates/` are never packaged
const DEFAULT_PATTERNS: &[&str] = &["templates/.?*"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled set of ignore rules for one chart directory
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: Pattern,
    negate: bool,
    dir_only: bool,
    anchored: bool,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        let rules = DEFAULT_PATTERNS
            .iter()
            .filter_map(|p| Rule::parse(p).ok())
            .collect();
        Self { rules }
    }
}

impl IgnoreRules {
    /// Load `.helmignore` from a chart root, falling back to the defaults
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(HELMIGNORE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse the contents of an ignore file
    pub fn parse(content: &str) -> Result<Self> {
        let mut ignore = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            ignore.rules.push(Rule::parse(line)?);
        }
        Ok(ignore)
    }

    /// Check whether a chart-relative path (using `/` separators) is excluded
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        if rel_path == HELMIGNORE {
            return true;
        }

        let mut ignored = false;
        for rule in &self.rules {
            if rule.matches(rel_path, is_dir) {
                ignored = !rule.negate;
            }
        }
        ignored
    }
}

impl Rule {
    fn parse(line: &str) -> Result<Self> {
        let (negate, rest) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let dir_only = rest.ends_with('/');
        let rest = rest.trim_end_matches('/');
        let anchored = rest.contains('/');
        let rest = rest.trim_start_matches('/');

        if rest.is_empty() {
            return Err(CoreError::GlobPattern {
                message: format!("empty pattern '{}'", line),
            });
        }

        let pattern = Pattern::new(rest).map_err(|e| CoreError::GlobPattern {
            message: format!("'{}': {}", line, e),
        })?;

        Ok(Self {
            pattern,
            negate,
            dir_only,
            anchored,
        })
    }

    fn matches(&self, rel_path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }

        if self.anchored {
            self.pattern.matches_with(rel_path, MATCH_OPTIONS)
        } else {
            let name = rel_path.rsplit('/').next().unwrap_or(rel_path);
            self.pattern.matches_with(name, MATCH_OPTIONS)
        }
    }
}
