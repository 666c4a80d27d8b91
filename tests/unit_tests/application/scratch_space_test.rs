use tempfile::TempDir;
use vidscribe::application::services::ScratchSpace;

#[tokio::test]
async fn given_missing_root_when_persisting_then_directory_is_created_and_file_written() {
    let dir = TempDir::new().unwrap();
    let scratch = ScratchSpace::new(dir.path().join("uploads"));

    let file = scratch.persist("a-video.mp4", b"video bytes").await.unwrap();

    assert_eq!(file.path(), dir.path().join("uploads").join("a-video.mp4"));
    assert_eq!(std::fs::read(file.path()).unwrap(), b"video bytes");
}

#[tokio::test]
async fn given_persisted_file_when_guard_dropped_then_file_is_removed() {
    let dir = TempDir::new().unwrap();
    let scratch = ScratchSpace::new(dir.path());

    let file = scratch.persist("clip.mp4", b"x").await.unwrap();
    let path = file.path().to_path_buf();
    drop(file);

    assert!(!path.exists());
}

#[tokio::test]
async fn given_reserved_path_when_nothing_was_written_then_removal_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let scratch = ScratchSpace::new(dir.path());

    let file = scratch.reserve("temp-audio-1.wav").await.unwrap();

    assert!(!file.path().exists());
    assert!(!file.remove().unwrap());
}

#[tokio::test]
async fn given_removed_file_when_removing_again_then_reports_nothing_removed() {
    let dir = TempDir::new().unwrap();
    let scratch = ScratchSpace::new(dir.path());
    let file = scratch.persist("clip.mp4", b"x").await.unwrap();

    assert!(file.remove().unwrap());
    assert!(!file.remove().unwrap());
}
