//! Splitting user paths into a directory and a wildcard pattern.

use std::fmt;

use dosfs_vfs::{Volume, glob};

/// Canonical spelling of a user path: `\` becomes `/`, and leading,
/// trailing and doubled separators are dropped. The root is `""`.
pub fn fix_path(raw: &str) -> String {
    raw.split(['/', '\\'])
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// `true` if the last component of `raw` contains `*` or `?`.
pub fn has_glob(raw: &str) -> bool {
    fix_path(raw)
        .rsplit('/')
        .next()
        .is_some_and(glob::has_wildcard)
}

/// `dir/name`, or just `name` at the root.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Case-insensitive comparison of two volume paths.
pub fn same_path(a: &str, b: &str) -> bool {
    fix_path(a).to_lowercase() == fix_path(b).to_lowercase()
}

/// A directory plus an optional pattern selecting entries inside it.
///
/// `pattern` is `None` when the whole path named a directory, in which case
/// every entry matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumePath {
    directory: Vec<String>,
    pattern: Option<String>,
}

impl VolumePath {
    pub fn root() -> Self {
        Self {
            directory: Vec::new(),
            pattern: None,
        }
    }

    /// Split `raw`, asking the volume whether the whole path is a directory.
    pub fn split(vol: &dyn Volume, raw: &str) -> Self {
        let fixed = fix_path(raw);
        if vol.is_dir(&fixed) {
            return Self {
                directory: segments(&fixed),
                pattern: None,
            };
        }
        Self::literal(&fixed)
    }

    /// Split `raw` without looking at the volume: the last component is
    /// always the pattern.
    pub fn literal(raw: &str) -> Self {
        let fixed = fix_path(raw);
        let mut directory = segments(&fixed);
        let pattern = directory.pop();
        Self { directory, pattern }
    }

    /// A directory whose every entry matches.
    pub fn directory_of(dir: &str) -> Self {
        Self {
            directory: segments(&fix_path(dir)),
            pattern: None,
        }
    }

    /// Directory part, `/`-joined; empty for the root.
    pub fn directory(&self) -> String {
        self.directory.join("/")
    }

    pub fn segments(&self) -> &[String] {
        &self.directory
    }

    /// Pattern to enumerate with; `*` when the path named a directory.
    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or("*")
    }

    /// The pattern as the user spelled it, if any.
    pub fn explicit_pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn is_glob(&self) -> bool {
        self.pattern.as_deref().is_some_and(glob::has_wildcard)
    }

    pub fn is_root(&self) -> bool {
        self.directory.is_empty() && self.pattern.is_none()
    }

    /// Full path of entry `name` inside the directory part.
    pub fn join(&self, name: &str) -> String {
        join(&self.directory(), name)
    }
}

/// `directory/pattern`, or the bare directory when no pattern was given.
impl fmt::Display for VolumePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Some(pattern) => f.write_str(&self.join(pattern)),
            None => f.write_str(&self.directory()),
        }
    }
}

fn segments(fixed: &str) -> Vec<String> {
    fixed
        .split('/')
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
