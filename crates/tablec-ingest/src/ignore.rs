//! Ignore-file policy.

use std::path::{Component, Path};

/// Decides whether a file under the data root is skipped entirely.
pub trait IgnorePolicy: Send + Sync {
    fn is_ignored(&self, data_root: &Path, file: &Path) -> bool;
}

impl<F> IgnorePolicy for F
where
    F: Fn(&Path, &Path) -> bool + Send + Sync,
{
    fn is_ignored(&self, data_root: &Path, file: &Path) -> bool {
        self(data_root, file)
    }
}

/// Skips hidden entries (`.git`), private entries (`_draft.xlsx`) and office
/// lock files (`~$items.xlsx`) anywhere below the data root.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIgnore;

impl IgnorePolicy for DefaultIgnore {
    fn is_ignored(&self, data_root: &Path, file: &Path) -> bool {
        let relative = file.strip_prefix(data_root).unwrap_or(file);
        relative.components().any(|component| match component {
            Component::Normal(name) => name
                .to_str()
                .is_some_and(|name| name.starts_with(['.', '_', '~'])),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ignore_rules() {
        let root = Path::new("/data");
        let policy = DefaultIgnore;
        assert!(policy.is_ignored(root, Path::new("/data/~$items.xlsx")));
        assert!(policy.is_ignored(root, Path::new("/data/.git/items.csv")));
        assert!(policy.is_ignored(root, Path::new("/data/_drafts/items.csv")));
        assert!(!policy.is_ignored(root, Path::new("/data/path/to/#Hero.xlsx")));
    }

    #[test]
    fn root_components_are_not_checked() {
        let root = Path::new("/tmp/.hidden_root");
        assert!(!DefaultIgnore.is_ignored(root, Path::new("/tmp/.hidden_root/items.csv")));
    }

    #[test]
    fn closures_are_policies() {
        let policy = |_: &Path, file: &Path| file.ends_with("skip.csv");
        assert!(policy.is_ignored(Path::new("/data"), Path::new("/data/skip.csv")));
        assert!(!policy.is_ignored(Path::new("/data"), Path::new("/data/keep.csv")));
    }
}
