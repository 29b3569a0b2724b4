use std::io::{Cursor, Write};

use zip::write::{FileOptions, ZipWriter};

use gallery_ingest::models::Label;
use gallery_ingest::repositories::Catalog;
use gallery_ingest::services::AuthService;
use gallery_ingest::state::AppState;

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub email: String,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Token for the configured admin
    pub fn admin(&self) -> TestAuth {
        let email = self.state.config.admin.email.clone();
        let token = AuthService::generate_token(&email, &self.state.config).unwrap();

        TestAuth { email, token }
    }

    pub async fn create_label(&self, name: &str) -> Label {
        self.state.catalog.create_label(name).await.unwrap()
    }
}

/// Build a zip archive in memory. Names ending in `/` become directories.
#[allow(dead_code)]
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap();
    }
    buffer
}
