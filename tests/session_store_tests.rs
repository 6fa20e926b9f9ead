// Integration tests for the session store: storage key derivation, segment
// layout, and the append-only transcript file.

use anyhow::Result;
use scribe_server::session::SessionStore;
use tempfile::TempDir;

fn test_store(tmp: &TempDir) -> SessionStore {
    SessionStore::new(tmp.path().join("segments"), tmp.path().join("sessions"))
}

#[test]
fn storage_key_is_stable_and_filesystem_safe() {
    let a = SessionStore::storage_key("demo");
    let b = SessionStore::storage_key("demo");
    assert_eq!(a, b, "Key derivation must be deterministic");

    // base64url body + 8 hex chars of hash suffix
    let (body, suffix) = a.rsplit_once('_').expect("key should contain a suffix");
    assert!(!body.is_empty());
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));

    // Unsafe characters never reach the filesystem
    for id in ["../../etc/passwd", "a b/c", "meeting: standup?"] {
        let key = SessionStore::storage_key(id);
        assert!(
            key.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "Key {:?} for {:?} contains unsafe characters",
            key,
            id
        );
    }
}

#[test]
fn storage_key_distinguishes_similar_ids() {
    assert_ne!(
        SessionStore::storage_key("a/b"),
        SessionStore::storage_key("a_b")
    );
    assert_ne!(
        SessionStore::storage_key("demo"),
        SessionStore::storage_key("demo ")
    );
}

#[test]
fn segment_file_names_sort_numerically() {
    let early = SessionStore::segment_file_name(2);
    let late = SessionStore::segment_file_name(10);

    assert!(
        early < late,
        "Zero padding must make lexicographic order equal numeric order"
    );
    assert_eq!(early, "segment-000002.webm");
}

#[tokio::test]
async fn write_segment_overwrites_duplicate_ordinal() -> Result<()> {
    let tmp = TempDir::new()?;
    let store = test_store(&tmp);
    let key = SessionStore::storage_key("overwrite-test");

    store.write_segment(&key, 0, b"first write").await?;
    let path = store.write_segment(&key, 0, b"second write").await?;

    let segments = store.list_segments(&key).await?;
    assert_eq!(segments.len(), 1, "Duplicate ordinal must not create a second file");

    let bytes = store.read_segment(&path).await?;
    assert_eq!(bytes, b"second write", "Last write wins");

    Ok(())
}

#[tokio::test]
async fn list_segments_returns_ordinal_order() -> Result<()> {
    let tmp = TempDir::new()?;
    let store = test_store(&tmp);
    let key = SessionStore::storage_key("order-test");

    // Arrival order deliberately scrambled, with a two-digit ordinal to
    // catch naive string sorting
    store.write_segment(&key, 10, b"ten").await?;
    store.write_segment(&key, 2, b"two").await?;
    store.write_segment(&key, 0, b"zero").await?;

    let segments = store.list_segments(&key).await?;
    let names: Vec<String> = segments
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        vec![
            "segment-000000.webm",
            "segment-000002.webm",
            "segment-000010.webm"
        ]
    );

    Ok(())
}

#[tokio::test]
async fn list_segments_of_unknown_session_is_empty() -> Result<()> {
    let tmp = TempDir::new()?;
    let store = test_store(&tmp);

    let segments = store.list_segments("no-such-key").await?;
    assert!(segments.is_empty());

    Ok(())
}

#[tokio::test]
async fn init_transcript_writes_header_and_truncates() -> Result<()> {
    let tmp = TempDir::new()?;
    let store = test_store(&tmp);
    let key = SessionStore::storage_key("header-test");

    let file = store.init_transcript(&key, "Weekly Standup").await?;
    assert_eq!(file, format!("{}.txt", key));

    store.append_cue(&key, 0, "segment-000000.webm", "hello").await?;

    // Re-initializing resets to a fresh header
    store.init_transcript(&key, "Weekly Standup").await?;

    let transcript = store.read_transcript(&key).await?;
    assert!(transcript.starts_with("Session: Weekly Standup\nSaved: "));
    assert!(
        !transcript.contains("[segment 0"),
        "Save must truncate to a fresh header"
    );

    Ok(())
}

#[tokio::test]
async fn begin_pass_appends_separator_to_existing_transcript() -> Result<()> {
    let tmp = TempDir::new()?;
    let store = test_store(&tmp);
    let key = SessionStore::storage_key("pass-test");

    store.begin_pass(&key, "pass-test").await?;
    store.begin_pass(&key, "pass-test").await?;

    let transcript = store.read_transcript(&key).await?;
    assert!(transcript.starts_with("Session: pass-test\n"));
    assert_eq!(
        transcript.matches("--- new processing pass:").count(),
        1,
        "Second pass appends a separator instead of a second header"
    );

    Ok(())
}

#[tokio::test]
async fn transcript_blocks_append_in_order() -> Result<()> {
    let tmp = TempDir::new()?;
    let store = test_store(&tmp);
    let key = SessionStore::storage_key("blocks-test");

    store.begin_pass(&key, "blocks-test").await?;
    store.append_cue(&key, 0, "segment-000000.webm", "first entry").await?;
    store.append_error_marker(&key, 1, "decode failed").await?;
    store.append_summary(&key, "[SUMMARY]\nshort").await?;

    let transcript = store.read_transcript(&key).await?;

    let cue = transcript.find("[segment 0 - segment-000000.webm]\nfirst entry").unwrap();
    let marker = transcript.find("[segment 1 processing error] decode failed").unwrap();
    let summary = transcript.find("[SUMMARY]").unwrap();

    assert!(cue < marker && marker < summary);

    Ok(())
}

#[tokio::test]
async fn read_transcript_of_unknown_session_is_missing() {
    let tmp = TempDir::new().unwrap();
    let store = test_store(&tmp);

    let err = store.read_transcript("absent").await.unwrap_err();
    assert!(matches!(
        err,
        scribe_server::StoreError::TranscriptMissing
    ));
}

#[tokio::test]
async fn list_sessions_returns_storage_keys() -> Result<()> {
    let tmp = TempDir::new()?;
    let store = test_store(&tmp);

    let key_a = SessionStore::storage_key("alpha");
    let key_b = SessionStore::storage_key("beta");
    store.write_segment(&key_a, 0, b"a").await?;
    store.write_segment(&key_b, 0, b"b").await?;

    let mut expected = vec![key_a, key_b];
    expected.sort();

    assert_eq!(store.list_sessions().await?, expected);

    Ok(())
}
