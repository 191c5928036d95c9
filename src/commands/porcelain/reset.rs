use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

impl Repository {
    /// Move the active branch (or a detached HEAD) to `revision` and sync the
    /// working tree to it.
    pub fn reset(&self, revision: &str) -> Result<ObjectId> {
        let (_, head_commit) = self.head_commit()?;
        let target_oid = Revision::try_parse(revision)?.resolve(self)?;
        let target_commit = self.database().load_commit(&target_oid)?;

        self.migrate_working_tree(head_commit.tree(), target_commit.tree())?;
        self.refs().update_head(&target_oid)?;

        tracing::info!(commit = %target_oid.to_short_oid(), "reset HEAD");

        Ok(target_oid)
    }
}
