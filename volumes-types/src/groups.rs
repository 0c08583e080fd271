// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Names of the access groups the current session belongs to.
///
/// Computed once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupMembership(BTreeSet<String>);

impl GroupMembership {
    pub fn new<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(groups.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, group: &str) -> bool {
        self.0.contains(group)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for GroupMembership {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_groups_collapse() {
        let groups = GroupMembership::new(["guests", "audio", "guests"]);
        assert_eq!(groups.len(), 2);
        assert!(groups.contains("guests"));
        assert!(!groups.contains("admin"));
        assert_eq!(groups.iter().collect::<Vec<_>>(), vec!["audio", "guests"]);
    }
}
