//! Repository reset: delete every issue or every milestone.
//!
//! Both operations are irreversible and ask for no confirmation.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{GithubError, Result};
use crate::tracker::RepositoryAdmin;

/// Deletes every milestone, open or closed. Returns how many were deleted.
pub fn delete_all_milestones<A: RepositoryAdmin>(admin: &mut A) -> Result<usize> {
    let milestones = admin.list_milestones()?;
    info!(count = milestones.len(), "deleting milestones");
    for milestone in &milestones {
        debug!(number = milestone.number.0, title = %milestone.title, "deleting milestone");
        admin.delete_milestone(milestone.number)?;
    }
    Ok(milestones.len())
}

/// Deletes every issue, `page_size` at a time. Returns how many were deleted.
///
/// The first page is fetched again after each batch until it comes back
/// empty.
///
/// # Errors
///
/// Returns [`GithubError::DeletionStalled`] if a page holds only issues that
/// were already deleted, since later issues may still exist.
pub fn delete_all_issues<A: RepositoryAdmin>(admin: &mut A, page_size: u32) -> Result<usize> {
    let mut deleted = HashSet::new();
    loop {
        let ids = admin.issue_node_ids(page_size)?;
        if ids.is_empty() {
            break;
        }
        let fresh: Vec<String> = ids.into_iter().filter(|id| !deleted.contains(id)).collect();
        if fresh.is_empty() {
            return Err(GithubError::DeletionStalled {
                deleted: deleted.len(),
            });
        }
        for id in fresh {
            debug!(node_id = %id, "deleting issue");
            admin.delete_issue(&id)?;
            deleted.insert(id);
        }
        info!(deleted = deleted.len(), "issue batch deleted");
    }
    Ok(deleted.len())
}
