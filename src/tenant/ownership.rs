use std::fmt;

/// Kinds of tenant-owned resources and the foreign keys that lead from each
/// of them back to an organization.
///
/// Every backend derives its scoping filter from this chain instead of
/// hand-writing one per resource, so a new resource kind cannot be added
/// without saying how it reaches its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Task,
    TaskComment,
}

impl ResourceKind {
    /// Table holding rows of this kind
    pub fn table(self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Task => "tasks",
            ResourceKind::TaskComment => "task_comments",
        }
    }

    /// Foreign key column pointing at the next link of the chain
    pub fn owner_column(self) -> &'static str {
        match self {
            ResourceKind::Project => "organization_id",
            ResourceKind::Task => "project_id",
            ResourceKind::TaskComment => "task_id",
        }
    }

    /// The resource `owner_column` points at; `None` when it points at the
    /// organization itself.
    pub fn parent(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Project => None,
            ResourceKind::Task => Some(ResourceKind::Project),
            ResourceKind::TaskComment => Some(ResourceKind::Task),
        }
    }

    /// This kind followed by each ancestor, ending with the kind owned
    /// directly by an organization.
    pub fn chain(self) -> Vec<ResourceKind> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Project => "Project",
            ResourceKind::Task => "Task",
            ResourceKind::TaskComment => "Task comment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chain_ends_at_a_project() {
        for kind in [ResourceKind::Project, ResourceKind::Task, ResourceKind::TaskComment] {
            let chain = kind.chain();
            assert_eq!(chain.first(), Some(&kind));
            assert_eq!(chain.last(), Some(&ResourceKind::Project));
            assert_eq!(chain.last().unwrap().owner_column(), "organization_id");
        }
    }

    #[test]
    fn comment_chain_walks_through_task() {
        assert_eq!(
            ResourceKind::TaskComment.chain(),
            vec![ResourceKind::TaskComment, ResourceKind::Task, ResourceKind::Project]
        );
    }
}
