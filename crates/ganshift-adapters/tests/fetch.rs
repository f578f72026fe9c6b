//! Download behavior tests against a loopback HTTP fixture.
//!
//! The fixture accepts a fixed number of connections and answers each with a
//! canned response, which lets the tests count exactly how many requests the
//! fetcher issues.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use ganshift_adapters::artifacts::{ensure_into, ProgressCallback, RemoteArtifact};

const SKIP_CHECKSUM: &str = "0000000000000000000000000000000000000000000000000000000000000000";
/// SHA-256 of the ASCII bytes "hello world".
const HELLO_WORLD_SHA256: &str =
    "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

/// Serves one canned response per accepted connection, counting hits.
fn spawn_server(responses: Vec<(&'static str, Vec<u8>)>) -> (String, Arc<AtomicUsize>, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));

    let thread_hits = Arc::clone(&hits);
    let handle = thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            thread_hits.fetch_add(1, Ordering::SeqCst);

            // Drain the request head; GET requests fit one read.
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);

            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        }
    });

    (format!("http://{addr}"), hits, handle)
}

fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

fn artifact(url: &'static str, sha256: &'static str) -> RemoteArtifact {
    RemoteArtifact {
        name: "test_generator",
        url,
        sha256,
        filename: "test_generator.safetensors",
    }
}

#[test]
fn test_present_file_skips_network() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("test_generator.safetensors"), b"weights").unwrap();

    // Port 9 (discard) is not listening; any request attempt would error out.
    let entry = artifact("http://127.0.0.1:9/test_generator.safetensors", SKIP_CHECKSUM);
    ensure_into(dir.path(), &[entry], None).unwrap();

    let contents = std::fs::read(dir.path().join("test_generator.safetensors")).unwrap();
    assert_eq!(contents, b"weights");
}

#[test]
fn test_absent_file_downloads_once_and_streams_all_bytes() {
    // Body larger than one 8192-byte chunk.
    let body: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
    let (base, hits, handle) = spawn_server(vec![("200 OK", body.clone())]);

    let dir = tempfile::tempdir().unwrap();
    let entry = artifact(leak(format!("{base}/test_generator.safetensors")), SKIP_CHECKSUM);

    let seen: Arc<Mutex<Vec<(u64, Option<u64>)>>> = Arc::new(Mutex::new(Vec::new()));
    let progress_seen = Arc::clone(&seen);
    let progress: ProgressCallback = Box::new(move |_name, downloaded, total| {
        progress_seen.lock().unwrap().push((downloaded, total));
    });

    ensure_into(dir.path(), &[entry.clone()], Some(&progress)).unwrap();
    handle.join().unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // The written file is exactly the streamed body.
    let written = std::fs::read(dir.path().join("test_generator.safetensors")).unwrap();
    assert_eq!(written, body);
    assert!(!dir.path().join("test_generator.safetensors.part").exists());

    // Progress is monotonic in chunks no larger than the read buffer and
    // sums to the body length.
    let seen = seen.lock().unwrap();
    assert_eq!(seen.last().unwrap().0, body.len() as u64);
    assert_eq!(seen.last().unwrap().1, Some(body.len() as u64));
    let mut previous = 0;
    for (downloaded, _) in seen.iter() {
        assert!(*downloaded > previous);
        assert!(*downloaded - previous <= 8192);
        previous = *downloaded;
    }

    // A second pass sees the file and never contacts the (now closed) server.
    ensure_into(dir.path(), &[entry], None).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_http_404_fails_and_leaves_nothing_behind() {
    let (base, _hits, handle) = spawn_server(vec![("404 Not Found", b"no such release".to_vec())]);

    let dir = tempfile::tempdir().unwrap();
    let entry = artifact(leak(format!("{base}/test_generator.safetensors")), SKIP_CHECKSUM);

    let err = ensure_into(dir.path(), &[entry], None).unwrap_err();
    handle.join().unwrap();

    let message = format!("{err:#}");
    assert!(message.contains("404"), "unexpected error: {message}");
    assert!(message.contains("no such release"), "body text missing: {message}");

    assert!(!dir.path().join("test_generator.safetensors").exists());
    assert!(!dir.path().join("test_generator.safetensors.part").exists());
}

#[test]
fn test_http_500_halts_fetch() {
    let (base, _hits, handle) = spawn_server(vec![("500 Internal Server Error", Vec::new())]);

    let dir = tempfile::tempdir().unwrap();
    let entry = artifact(leak(format!("{base}/test_generator.safetensors")), SKIP_CHECKSUM);

    let err = ensure_into(dir.path(), &[entry], None).unwrap_err();
    handle.join().unwrap();

    assert!(format!("{err:#}").contains("500"));
    assert!(!dir.path().join("test_generator.safetensors").exists());
}

#[test]
fn test_checksum_mismatch_rejects_download() {
    let (base, _hits, handle) = spawn_server(vec![("200 OK", b"tampered body".to_vec())]);

    let dir = tempfile::tempdir().unwrap();
    let entry = artifact(
        leak(format!("{base}/test_generator.safetensors")),
        HELLO_WORLD_SHA256,
    );

    let err = ensure_into(dir.path(), &[entry], None).unwrap_err();
    handle.join().unwrap();

    assert!(format!("{err:#}").contains("Checksum mismatch"));
    assert!(!dir.path().join("test_generator.safetensors").exists());
    assert!(!dir.path().join("test_generator.safetensors.part").exists());
}

#[test]
fn test_checksum_match_accepts_download() {
    let (base, _hits, handle) = spawn_server(vec![("200 OK", b"hello world".to_vec())]);

    let dir = tempfile::tempdir().unwrap();
    let entry = artifact(
        leak(format!("{base}/test_generator.safetensors")),
        HELLO_WORLD_SHA256,
    );

    ensure_into(dir.path(), &[entry], None).unwrap();
    handle.join().unwrap();

    let written = std::fs::read(dir.path().join("test_generator.safetensors")).unwrap();
    assert_eq!(written, b"hello world");
}

#[test]
fn test_unreachable_host_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let entry = artifact("http://127.0.0.1:9/test_generator.safetensors", SKIP_CHECKSUM);

    assert!(ensure_into(dir.path(), &[entry], None).is_err());
    assert!(!dir.path().join("test_generator.safetensors").exists());
}
