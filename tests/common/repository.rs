use crate::common::command::repository_dir;
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use gitlet::areas::repository::Repository;
use gitlet::artifacts::objects::object_id::ObjectId;
use rstest::fixture;

/// A freshly initialized repository and the directory holding it
pub struct TestRepository {
    pub dir: TempDir,
    pub repository: Repository,
}

impl TestRepository {
    pub fn write(&self, path: &str, content: &str) {
        write_file(FileSpec::new(self.dir.path().join(path), content.to_string()));
    }

    pub fn read(&self, path: &str) -> String {
        crate::common::file::read_file(&self.dir.path().join(path))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.dir.path().join(path).exists()
    }

    /// Write, stage and commit a single file.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> ObjectId {
        self.write(path, content);
        self.repository.add(path).expect("Failed to add file");
        self.repository.commit(message).expect("Failed to commit")
    }

    pub fn head(&self) -> ObjectId {
        self.repository.head_oid().expect("Failed to read HEAD")
    }
}

#[fixture]
pub fn test_repository(repository_dir: TempDir) -> TestRepository {
    let repository = Repository::new(repository_dir.path()).expect("Failed to open repository");
    repository.init().expect("Failed to initialize repository");

    TestRepository {
        dir: repository_dir,
        repository,
    }
}

/// One commit tracking `a.txt` on top of the initial commit
#[fixture]
pub fn linear_history(test_repository: TestRepository) -> TestRepository {
    test_repository.commit_file("a.txt", "A1\n", "c1");
    test_repository
}
