//! Configuration item identity.

use std::fmt;

/// One key within one fully-qualified namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigItem {
    namespace: String,
    key: String,
}

impl ConfigItem {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ConfigItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.key)
    }
}

/// Combine a project prefix with a short namespace.
pub fn full_namespace(project: &str, short: &str) -> String {
    format!("{project}.{short}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_structural_identity() {
        let mut set = HashSet::new();
        set.insert(ConfigItem::new("app.svc", "maxRetries"));
        assert!(set.contains(&ConfigItem::new("app.svc".to_string(), "maxRetries".to_string())));
        assert!(!set.contains(&ConfigItem::new("app.svc", "timeout")));
        assert!(!set.contains(&ConfigItem::new("app.db", "maxRetries")));
    }

    #[test]
    fn test_full_namespace() {
        assert_eq!(full_namespace("project", "svc"), "project.svc");
        assert_eq!(ConfigItem::new("project.svc", "k").to_string(), "project.svc/k");
    }
}
