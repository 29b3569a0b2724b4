mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};

use common::{test_config, zip_archive, Factory, TestApp};

fn archive_part(data: Vec<u8>, file_name: &str) -> Part {
    Part::bytes(data)
        .file_name(file_name)
        .mime_type("application/zip")
}

/// Bytes that deflate cannot shrink
fn noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x9e37_79b9;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn trip_archive() -> Vec<u8> {
    zip_archive(&[
        ("a.jpg", b"jpeg-bytes"),
        ("notes.txt", b"not an image"),
        ("b/", b""),
        ("b/c.png", b"png-bytes"),
    ])
}

fn upload_form(name: &str, archive: Part, labels: &[i64]) -> MultipartForm {
    let mut form = MultipartForm::new()
        .add_text("name", name)
        .add_part("archive", archive);
    for label in labels {
        form = form.add_text("labels", label.to_string());
    }
    form
}

#[tokio::test]
async fn test_upload_trip_archive() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.admin();
    let beach = factory.create_label("beach").await;
    let family = factory.create_label("family").await;

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.zip"),
            &[beach.id, family.id],
        ))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["uploadedCount"], 2);

    let collections = app.catalog.collections().await;
    assert_eq!(collections.len(), 1);
    assert_eq!(collections[0].name, "Trip");

    let collection_id = collections[0].id;
    let mut links: Vec<i64> = app
        .catalog
        .links()
        .await
        .into_iter()
        .map(|l| l.label_id)
        .collect();
    links.sort();
    assert_eq!(links, vec![beach.id, family.id]);

    let assets = app.catalog.assets().await;
    let names: Vec<&str> = assets.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "c.png"]);
    assert_eq!(assets[0].content_type, "image/jpeg");
    assert_eq!(assets[1].content_type, "image/png");
    assert_eq!(assets[1].size_bytes, 9);

    let object = app
        .storage
        .get(&format!("collection-{}/c.png", collection_id))
        .await
        .unwrap();
    assert_eq!(object.data.as_ref(), b"png-bytes");
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/collections")
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.zip"),
            &[1],
        ))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(app.catalog.collections().await.is_empty());
    assert_eq!(app.storage.upload_count().await, 0);
}

#[tokio::test]
async fn test_upload_missing_name() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();

    let form = MultipartForm::new()
        .add_part("archive", archive_part(trip_archive(), "trip.zip"))
        .add_text("labels", "1");

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Name is required");
}

#[tokio::test]
async fn test_upload_missing_archive() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();

    let form = MultipartForm::new()
        .add_text("name", "Trip")
        .add_text("labels", "1");

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Please select a ZIP file");
}

#[tokio::test]
async fn test_upload_not_a_zip_name() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.rar"),
            &[1],
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Only ZIP files are allowed");
}

#[tokio::test]
async fn test_upload_without_labels() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.zip"),
            &[],
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Please select at least one label");
}

#[tokio::test]
async fn test_upload_non_numeric_label() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();

    let form = MultipartForm::new()
        .add_text("name", "Trip")
        .add_part("archive", archive_part(trip_archive(), "trip.zip"))
        .add_text("labels", "beach");

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid label id: beach");
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let mut config = test_config();
    config.max_upload_bytes = 1024;
    let app = TestApp::with_config(config).await;
    let auth = Factory::new(&app.state).admin();

    let big = zip_archive(&[("big.png", &noise(8192))]);
    assert!(big.len() > 1024);

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form("Trip", archive_part(big, "big.zip"), &[1]))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "File size must be less than 1024 bytes");
    assert!(app.catalog.collections().await.is_empty());
}

#[tokio::test]
async fn test_upload_body_over_transport_limit() {
    let mut config = test_config();
    config.max_upload_bytes = 1024;
    let app = TestApp::with_config(config).await;
    let auth = Factory::new(&app.state).admin();

    // Larger than the archive limit plus form overhead
    let huge = vec![0u8; 3 * 1024 * 1024];

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form("Trip", archive_part(huge, "huge.zip"), &[1]))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.catalog.collections().await.is_empty());
}

#[tokio::test]
async fn test_upload_malformed_archive() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(b"this is not a zip".to_vec(), "trip.zip"),
            &[1],
        ))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to read ZIP archive"));
    assert!(app.catalog.collections().await.is_empty());
}

#[tokio::test]
async fn test_upload_archive_without_images() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();
    let data = zip_archive(&[("readme.md", b"# hi"), ("docs/", b"")]);

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form("Trip", archive_part(data, "trip.zip"), &[1]))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No image files found in the ZIP archive");
    assert!(app.catalog.collections().await.is_empty());
    assert_eq!(app.storage.upload_count().await, 0);
}

#[tokio::test]
async fn test_upload_collection_insert_failure() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();
    app.catalog.fail_collection_inserts().await;

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.zip"),
            &[1],
        ))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to create collection"));
    assert_eq!(app.storage.upload_count().await, 0);
}

#[tokio::test]
async fn test_upload_with_unknown_label_still_succeeds() {
    let app = TestApp::new().await;
    let auth = Factory::new(&app.state).admin();

    // Label 999 does not exist, so the link batch fails as a whole
    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.zip"),
            &[999],
        ))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["uploadedCount"], 2);
    assert_eq!(app.catalog.collections().await.len(), 1);
    assert!(app.catalog.links().await.is_empty());
}

#[tokio::test]
async fn test_upload_every_entry_failing() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.admin();
    let label = factory.create_label("beach").await;
    app.storage.fail_all_uploads().await;

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.zip"),
            &[label.id],
        ))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to upload any images");

    // The empty collection and its label links stay behind
    assert_eq!(app.catalog.collections().await.len(), 1);
    assert_eq!(app.catalog.links().await.len(), 1);
    assert!(app.catalog.assets().await.is_empty());
}

#[tokio::test]
async fn test_upload_partial_failure_counts_survivors() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.admin();
    let label = factory.create_label("beach").await;
    app.catalog.fail_asset_insert("c.png").await;

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form(
            "Trip",
            archive_part(trip_archive(), "trip.zip"),
            &[label.id],
        ))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["uploadedCount"], 1);

    // The object whose metadata insert failed was removed again
    let collection_id = app.catalog.collections().await[0].id;
    assert_eq!(
        app.storage.keys().await,
        vec![format!("collection-{}/a.jpg", collection_id)]
    );
}

#[tokio::test]
async fn test_resubmission_creates_second_collection() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.admin();
    let label = factory.create_label("beach").await;

    for _ in 0..2 {
        let response = app
            .server
            .post("/api/collections")
            .add_header("Authorization", auth.auth_header())
            .multipart(upload_form(
                "Trip",
                archive_part(trip_archive(), "trip.zip"),
                &[label.id],
            ))
            .await;
        response.assert_status(StatusCode::OK);
    }

    let collections = app.catalog.collections().await;
    assert_eq!(collections.len(), 2);
    assert_ne!(collections[0].id, collections[1].id);
    assert_eq!(app.catalog.assets().await.len(), 4);
    assert_eq!(app.storage.keys().await.len(), 4);
}

#[tokio::test]
async fn test_upload_skips_entry_that_inflates_past_ceiling() {
    let mut config = test_config();
    config.max_entry_bytes = 1024;
    let app = TestApp::with_config(config).await;
    let factory = Factory::new(&app.state);
    let auth = factory.admin();
    let label = factory.create_label("beach").await;

    // Compresses to a few bytes, inflates to 1 MiB
    let zeros = vec![0u8; 1024 * 1024];
    let data = zip_archive(&[("a.jpg", b"jpeg-bytes"), ("bomb.png", &zeros)]);

    let response = app
        .server
        .post("/api/collections")
        .add_header("Authorization", auth.auth_header())
        .multipart(upload_form("Trip", archive_part(data, "trip.zip"), &[label.id]))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["uploadedCount"], 1);

    let names: Vec<String> = app
        .catalog
        .assets()
        .await
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["a.jpg"]);
    assert_eq!(app.storage.upload_count().await, 1);
}
