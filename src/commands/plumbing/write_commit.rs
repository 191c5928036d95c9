use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, Tree};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

impl Repository {
    /// Commit the staging area on top of `parents[0]`.
    ///
    /// The new tree is the first parent's tree with every staged addition
    /// applied and every staged removal dropped. The commit object is stored
    /// before HEAD moves; the staging area is cleared last.
    pub fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        message: &str,
    ) -> Result<(ObjectId, Commit)> {
        let mut index = self.load_index()?;

        let mut tree = match parents.first() {
            Some(parent) => self.database().load_commit(parent)?.tree().clone(),
            None => Tree::new(),
        };
        for (path, oid) in index.additions() {
            tree.insert(path.clone(), oid.clone());
        }
        for path in index.removals() {
            tree.remove(path);
        }

        let commit = Commit::new(
            message.to_string(),
            Commit::timestamp_from_env(),
            parents,
            tree,
        );
        let commit_id = self.database().store(&commit)?;

        self.refs().update_head(&commit_id)?;

        index.clear();
        index.write_updates()?;

        Ok((commit_id, commit))
    }
}
