use crate::areas::database::CommitCache;
use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::collections::HashSet;

impl Repository {
    /// First-parent history from HEAD back to the initial commit.
    pub fn log(&self) -> Result<RevList<'_>> {
        Ok(RevList::new(self, self.head_oid()?))
    }

    /// Every commit in the object store, in object id order.
    pub fn global_log(&self) -> Result<Vec<(ObjectId, Commit)>> {
        self.ensure_initialized()?;

        self.database()
            .list_commits()?
            .into_iter()
            .map(|oid| -> Result<(ObjectId, Commit)> {
                let commit = self.database().load_commit(&oid)?;
                Ok((oid, commit))
            })
            .collect()
    }

    /// Ids of the commits whose message is exactly `message`.
    pub fn find(&self, message: &str) -> Result<Vec<ObjectId>> {
        Ok(self
            .global_log()?
            .into_iter()
            .filter(|(_, commit)| commit.message() == message)
            .map(|(oid, _)| oid)
            .collect())
    }

    /// Every commit reachable from `revision` over all parent edges, the
    /// commit itself included.
    pub fn ancestors_of(&self, revision: &str) -> Result<HashSet<ObjectId>> {
        self.ensure_initialized()?;
        let oid = Revision::try_parse(revision)?.resolve(self)?;

        let commit_cache = CommitCache::new();
        let database = self.database();

        BCAFinder::new(|oid: &ObjectId| commit_cache.get_or_load_slim_commit(database, oid))
            .ancestors_of(&oid)
    }
}
