use vidscribe::domain::SanitizedFilename;

fn sanitize(raw: &str) -> String {
    SanitizedFilename::new(raw).unwrap().as_str().to_string()
}

#[test]
fn given_empty_filename_when_sanitizing_then_returns_none() {
    assert!(SanitizedFilename::new("").is_none());
}

#[test]
fn given_plain_filename_when_sanitizing_then_name_is_unchanged() {
    assert_eq!(sanitize("lecture.mp4"), "lecture.mp4");
}

#[test]
fn given_spaces_when_sanitizing_then_whitespace_runs_become_underscores() {
    assert_eq!(sanitize("my   first video.mp4"), "my_first_video.mp4");
}

#[test]
fn given_path_traversal_when_sanitizing_then_directories_are_flattened() {
    assert_eq!(sanitize("../../etc/passwd"), "etc_passwd");
    assert_eq!(sanitize("C:\\Users\\me\\clip.mov"), "C_Users_me_clip.mov");
}

#[test]
fn given_accented_characters_when_sanitizing_then_ascii_base_letters_remain() {
    assert_eq!(sanitize("über café.mov"), "uber_cafe.mov");
}

#[test]
fn given_punctuation_when_sanitizing_then_unsafe_characters_are_dropped() {
    assert_eq!(sanitize("clip (1)!.mp4"), "clip_1.mp4");
}

#[test]
fn given_leading_dots_when_sanitizing_then_hidden_prefix_is_removed() {
    assert_eq!(sanitize("  .hidden.mp4 "), "hidden.mp4");
}

#[test]
fn given_name_without_ascii_when_sanitizing_then_falls_back_to_upload() {
    assert_eq!(sanitize("日本語"), "upload");
    assert_eq!(sanitize("../.."), "upload");
}
