use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use crate::errors::Result;

impl Repository {
    pub fn status(&self) -> Result<StatusInfo> {
        self.ensure_initialized()?;
        let index = self.load_index()?;

        Status::new(self).initialize(&index)
    }
}
