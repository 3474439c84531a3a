//! Scene name bookkeeping: `#` auto-increment suffixes and `*` name patterns.
use std::collections::BTreeSet;

/// Trailing marker replaced by the smallest free positive integer.
pub const AUTO_SUFFIX: char = '#';

/// Set of live object names with collision-free name resolution.
///
/// `myCube#` resolves to `myCube1`, then `myCube2`, and so on. A plain name that
/// is already taken gets the first free numeric suffix after its trailing digits
/// are stripped (`box` -> `box1`, `box1` -> `box2`).
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: BTreeSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Realized name for `requested` without reserving it.
    pub fn resolve(&self, requested: &str) -> String {
        if let Some(stem) = requested.strip_suffix(AUTO_SUFFIX) {
            return self.first_free(stem);
        }
        if !self.names.contains(requested) {
            return requested.to_owned();
        }
        self.first_free(requested.trim_end_matches(|c: char| c.is_ascii_digit()))
    }

    /// Resolves `requested` and reserves the result.
    pub fn claim(&mut self, requested: &str) -> String {
        let name = self.resolve(requested);
        self.names.insert(name.clone());
        name
    }

    /// Registers an existing name verbatim. Returns `false` if it was already live.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Frees a name. Returns `false` if it was not live.
    pub fn release(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// Live names matching `pattern`, in sorted order.
    pub fn matching(&self, pattern: &str) -> Vec<String> {
        self.names
            .iter()
            .filter(|n| matches_pattern(n, pattern))
            .cloned()
            .collect()
    }

    fn first_free(&self, stem: &str) -> String {
        (1u64..)
            .map(|n| format!("{stem}{n}"))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| stem.to_owned())
    }
}

impl<S: Into<String>> FromIterator<S> for NameRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Glob match where `*` stands for any run of characters (including none).
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut n, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, n));
            p += 1;
        } else if p < pattern.len() && pattern[p] == name[n] {
            n += 1;
            p += 1;
        } else if let Some((star_p, star_n)) = backtrack {
            p = star_p + 1;
            n = star_n + 1;
            backtrack = Some((star_p, star_n + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_suffix_counts_up() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("myCube#"), "myCube1");
        assert_eq!(names.claim("myCube#"), "myCube2");
        assert!(names.release("myCube1"));
        assert_eq!(names.claim("myCube#"), "myCube1");
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn plain_names_are_kept_until_taken() {
        let mut names = NameRegistry::new();
        assert_eq!(names.claim("grp"), "grp");
        assert_eq!(names.claim("grp"), "grp1");
        assert_eq!(names.claim("grp1"), "grp2");
    }

    #[test]
    fn collected_names_are_registered_verbatim() {
        let mut names: NameRegistry = ["persp", "myCube1"].into_iter().collect();
        assert!(!names.insert("persp"));
        assert_eq!(names.claim("myCube#"), "myCube2");
        assert_eq!(names.matching("my*"), vec!["myCube1", "myCube2"]);
    }

    #[test]
    fn derived_names_follow_resolved_base() {
        let mut names = NameRegistry::new();
        let base = names.claim("myCube#");
        assert_eq!(names.claim(&format!("{base}_instance#")), "myCube1_instance1");
        assert_eq!(names.claim(&format!("{base}_instance#")), "myCube1_instance2");
        assert_eq!(
            names.claim(&format!("{base}_instance_grp#")),
            "myCube1_instance_grp1"
        );
    }

    #[test]
    fn pattern_matching_supports_wildcards() {
        assert!(matches_pattern("myCube1", "myCube*"));
        assert!(matches_pattern("myCube1_instance12", "myCube*"));
        assert!(matches_pattern("myCube", "myCube*"));
        assert!(!matches_pattern("pCube1", "myCube*"));
        assert!(matches_pattern("a_instance_grp3", "*_grp*"));
        assert!(matches_pattern("exact", "exact"));
        assert!(!matches_pattern("exact1", "exact"));
        assert!(matches_pattern("", "*"));
    }

    #[test]
    fn matching_lists_sorted_names() {
        let mut names = NameRegistry::new();
        names.claim("myCube#");
        names.claim("myCube1_instance#");
        names.claim("persp");
        assert_eq!(
            names.matching("myCube*"),
            vec!["myCube1".to_owned(), "myCube1_instance1".to_owned()]
        );
    }
}
