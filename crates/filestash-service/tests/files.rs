//! Uploads, listings, and owner downloads.

mod common;

use bytes::Bytes;

use filestash_core::error::ErrorKind;
use filestash_core::types::UserId;
use filestash_service::UploadedFile;

use common::{Harness, MAX_FILE_SIZE, unzip, upload};

#[tokio::test]
async fn test_upload_records_metadata_and_bytes() {
    let h = Harness::new().await;
    let owner = h.user().await;

    let (group, files) = h.upload(owner, &[("a.txt", "alpha"), ("b.txt", "bravo!")]).await;

    assert_eq!(group.user_id, owner);
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].original_filename, "b.txt");
    assert_eq!(files[1].size_bytes, 6);

    let download = h.downloads.download_file(files[0].id, owner).await.expect("download");
    assert_eq!(&download.data[..], b"alpha");
}

#[tokio::test]
async fn test_upload_validation() {
    let h = Harness::new().await;
    let owner = h.user().await;

    let err = h.uploads.upload(owner, Vec::new()).await.expect_err("empty");
    assert_eq!(err.kind, ErrorKind::Validation);

    let big = UploadedFile {
        filename: "big.bin".to_string(),
        content_type: None,
        data: Bytes::from(vec![0u8; MAX_FILE_SIZE as usize + 1]),
    };
    let err = h.uploads.upload(owner, vec![upload("ok.txt", "ok"), big]).await.expect_err("too big");
    assert_eq!(err.kind, ErrorKind::PayloadTooLarge);

    let err = h
        .uploads
        .upload(UserId::new(), vec![upload("a.txt", "a")])
        .await
        .expect_err("no user");
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert!(h.files.list_groups(owner).await.expect("list").is_empty());
}

#[tokio::test]
async fn test_missing_content_type_defaults() {
    let h = Harness::new().await;
    let owner = h.user().await;
    let file = UploadedFile {
        filename: "blob".to_string(),
        content_type: None,
        data: Bytes::from_static(b"\x01\x02"),
    };
    let (_, files) = h.uploads.upload(owner, vec![file]).await.expect("upload");
    assert_eq!(files[0].content_type, "application/octet-stream");
}

#[tokio::test]
async fn test_listings_are_per_user() {
    let h = Harness::new().await;
    let alice = h.user().await;
    let bob = h.user().await;
    let (a_group, _) = h.upload(alice, &[("1", "1"), ("2", "2")]).await;
    h.upload(bob, &[("3", "3")]).await;

    assert_eq!(h.files.list_files(alice).await.expect("list").len(), 2);
    assert_eq!(h.files.list_groups(bob).await.expect("list").len(), 1);
    assert_eq!(h.files.files_in_group(a_group.id, alice).await.expect("list").len(), 2);

    let err = h.files.files_in_group(a_group.id, bob).await.expect_err("not owner");
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let err = h.files.list_files(UserId::new()).await.expect_err("no user");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_owner_group_download() {
    let h = Harness::new().await;
    let owner = h.user().await;
    let stranger = h.user().await;
    let (group, _) = h.upload(owner, &[("same.txt", "1"), ("same.txt", "2")]).await;

    let archive = h.downloads.download_group(group.id, owner).await.expect("download");
    let names: Vec<String> = unzip(&archive.data).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"same.txt".to_string()));
    assert!(names.contains(&"same (1).txt".to_string()));

    let err = h.downloads.download_group(group.id, stranger).await.expect_err("stranger");
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_inactive_user_is_not_found() {
    let h = Harness::new().await;
    let user = h.user().await;
    h.catalog.set_user_active(user, false).expect("disable");

    let err = h.users.get_user(user).await.expect_err("inactive");
    assert_eq!(err.kind, ErrorKind::NotFound);
}
