use std::{fs, sync::Arc, time::Duration};

use tempfile::tempdir;

use crate::modules::{
    error::code::ErrorCode,
    fileset::{flatten, memory::MemFile, LocalFile},
    smtp::{MessageAssembly, OutboxTransmitter, SmtpConfig, SmtpTransmitter},
    transfer::{JobState, MailRequest, TransferJob},
};

#[tokio::test]
async fn test_assembly_renders_headers_and_attachments() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
    fs::write(dir.path().join("photo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    let files = vec![
        LocalFile::handle(dir.path().join("notes.txt")).unwrap(),
        LocalFile::handle(dir.path().join("photo.png")).unwrap(),
    ];
    let request = Arc::new(
        MailRequest::new("bob@example.com", "Holiday", "See attached", files.clone()).unwrap(),
    );

    let mut assembly = MessageAssembly::new("me@example.com", request);
    for file in &files {
        assembly.attach(file).await.unwrap();
    }
    assert_eq!(assembly.attachment_count(), 2);

    let mut rendered = Vec::new();
    assembly.write_eml(&mut rendered).unwrap();
    let eml = String::from_utf8_lossy(&rendered).into_owned();
    assert!(eml.contains("Subject: Holiday"));
    assert!(eml.contains("bob@example.com"));
    assert!(eml.contains("me@example.com"));
    assert!(eml.contains("notes.txt"));
    assert!(eml.contains("photo.png"));
    assert!(eml.contains("image/png"));
}

#[tokio::test]
async fn test_attach_missing_file_fails() {
    let file = MemFile::file("/definitely/not/here.bin", 3);
    let request =
        Arc::new(MailRequest::new("bob@example.com", "", "", vec![file.clone()]).unwrap());
    let mut assembly = MessageAssembly::new("me@example.com", request);
    let err = assembly.attach(&file).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_outbox_job_writes_one_message() {
    let input = tempdir().unwrap();
    let outbox = tempdir().unwrap();
    fs::write(input.path().join("a.txt"), b"alpha").unwrap();
    fs::write(input.path().join("b.txt"), b"beta").unwrap();
    let files = vec![
        LocalFile::handle(input.path().join("a.txt")).unwrap(),
        LocalFile::handle(input.path().join("b.txt")).unwrap(),
    ];

    let transmitter = OutboxTransmitter::new(outbox.path().to_path_buf(), "me@example.com".into());
    let job = TransferJob::new(
        42,
        MailRequest::new("bob@example.com", "files", "", files).unwrap(),
        Arc::new(transmitter),
    );
    let handle = job.handle();
    job.start().unwrap();
    assert_eq!(handle.wait().await, JobState::Finished);
    assert_eq!(handle.progress().bytes_sent, 9);

    let written: Vec<_> = fs::read_dir(outbox.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(written.len(), 1);
    let name = written[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.ends_with("-42.eml"), "unexpected outbox file {}", name);
}

#[tokio::test]
async fn test_outbox_job_fails_on_unreadable_file() {
    let outbox = tempdir().unwrap();
    let files = vec![MemFile::file("/missing/a.txt", 1)];
    let transmitter = OutboxTransmitter::new(outbox.path().to_path_buf(), "me@example.com".into());
    let job = TransferJob::new(
        1,
        MailRequest::new("bob@example.com", "", "", files).unwrap(),
        Arc::new(transmitter),
    );
    let handle = job.handle();
    job.start().unwrap();

    assert_eq!(handle.wait().await, JobState::Failed);
    assert_eq!(handle.progress().files_sent, 0);
    assert_eq!(fs::read_dir(outbox.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_smtp_job_fails_when_relay_is_unreachable() {
    let _ = rustls::crypto::CryptoProvider::install_default(
        rustls::crypto::ring::default_provider(),
    );
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
    let files = vec![LocalFile::handle(dir.path().join("a.txt")).unwrap()];

    let transmitter = SmtpTransmitter::new(SmtpConfig {
        host: "127.0.0.1".into(),
        port: 1,
        implicit_tls: true,
        credentials: None,
        timeout: Duration::from_secs(2),
        from: "me@example.com".into(),
    });
    let job = TransferJob::new(
        1,
        MailRequest::new("bob@example.com", "", "", files).unwrap(),
        Arc::new(transmitter),
    );
    let handle = job.handle();
    job.start().unwrap();

    let state = tokio::time::timeout(Duration::from_secs(10), handle.wait())
        .await
        .unwrap();
    assert_eq!(state, JobState::Failed);
    // The file itself was accepted; only delivery failed.
    assert_eq!(handle.progress().files_sent, 1);
    assert_eq!(handle.failure().unwrap().file, None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_outbox_job_attaches_directory_link_as_its_target() {
    let input = tempdir().unwrap();
    let outbox = tempdir().unwrap();
    let root = input.path();
    fs::write(root.join("a.txt"), b"alpha").unwrap();
    fs::create_dir(root.join("real")).unwrap();
    fs::write(root.join("real/x.txt"), b"xx").unwrap();
    std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

    let set = flatten(&[LocalFile::handle(root).unwrap()]).unwrap();
    let files: Vec<_> = set.entries().iter().map(|e| e.file().clone()).collect();
    assert_eq!(files.len(), 3);
    // The link part carries the target path, which is what its size measures.
    assert_eq!(files[1].name(), "link");
    assert_eq!(files[1].size(), files_link_size(root));

    let transmitter = OutboxTransmitter::new(outbox.path().to_path_buf(), "me@example.com".into());
    let request = MailRequest::new("bob@example.com", "tree", "", files).unwrap();
    let total_bytes = request.total_bytes();
    let job = TransferJob::new(7, request, Arc::new(transmitter));
    let handle = job.handle();
    job.start().unwrap();

    assert_eq!(handle.wait().await, JobState::Finished);
    let progress = handle.progress();
    assert_eq!(progress.files_sent, 3);
    assert_eq!(progress.bytes_sent, total_bytes);
    assert_eq!(total_bytes, 5 + files_link_size(root) + 2);

    let written: Vec<_> = fs::read_dir(outbox.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(written.len(), 1);
    let eml = fs::read_to_string(&written[0]).unwrap();
    assert!(eml.contains("link"));
    assert!(eml.contains("x.txt"));
}

#[cfg(unix)]
fn files_link_size(root: &std::path::Path) -> u64 {
    root.join("real").as_os_str().len() as u64
}

#[cfg(unix)]
#[tokio::test]
async fn test_file_link_is_sized_and_sent_as_its_target() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("data.bin"), [7u8; 64]).unwrap();
    std::os::unix::fs::symlink(dir.path().join("data.bin"), dir.path().join("alias.bin")).unwrap();

    let link = LocalFile::handle(dir.path().join("alias.bin")).unwrap();
    assert!(link.is_symlink());
    assert!(!link.is_directory());
    assert_eq!(link.size(), 64);

    let request = Arc::new(MailRequest::new("bob@example.com", "", "", vec![link.clone()]).unwrap());
    let mut assembly = MessageAssembly::new("me@example.com", request);
    assembly.attach(&link).await.unwrap();
    assert_eq!(assembly.attachment_count(), 1);
}
