//! Temporary project directories populated with the core fixture documents

use std::path::PathBuf;
use tempfile::TempDir;

pub const SCHEMA: &str = include_str!("../../polymsg-core/tests/fixtures/schema.json");
pub const NEW_ADDRESS: &str =
    include_str!("../../polymsg-core/tests/fixtures/messages/address/new-address.json");
pub const NEW_CONTACT: &str =
    include_str!("../../polymsg-core/tests/fixtures/messages/contact/new-contact.json");

pub struct Project {
    dir: TempDir,
}

impl Project {
    /// `schema.json` plus the two fixture messages under `messages/`
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().unwrap(),
        };
        project.write("schema.json", SCHEMA);
        project.write("messages/address/new-address.json", NEW_ADDRESS);
        project.write("messages/contact/new-contact.json", NEW_CONTACT);
        project
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative)).unwrap()
    }
}
