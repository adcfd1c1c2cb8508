//! Deterministic issue collection.
//!
//! Issues handed back to any caller are sorted by file, line, column, code
//! and message, with missing locations sorting after present ones.

use crate::{Issue, Severity};
use std::cmp::Ordering;

/// Collects issues and keeps them in deterministic order.
#[derive(Debug, Clone, Default)]
pub struct IssueCollector {
    issues: Vec<Issue>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
        sort_issues(&mut self.issues);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
        sort_issues(&mut self.issues);
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    /// Serialize the issues as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.issues)
    }
}

impl FromIterator<Issue> for IssueCollector {
    fn from_iter<T: IntoIterator<Item = Issue>>(iter: T) -> Self {
        let mut collector = Self::new();
        collector.extend(iter);
        collector
    }
}

impl IntoIterator for IssueCollector {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a IssueCollector {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

/// Sort issues in place using the collector ordering. The sort is stable.
pub fn sort_issues(issues: &mut [Issue]) {
    issues.sort_by(compare_issues);
}

fn compare_issues(a: &Issue, b: &Issue) -> Ordering {
    none_last(&a.file, &b.file)
        .then_with(|| none_last(&a.line, &b.line))
        .then_with(|| none_last(&a.col, &b.col))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.message.cmp(&b.message))
}

fn none_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
