use std::fs;
use std::io::Write;
use tempfile::TempDir;

use kbsearch_core::chunker::{chunk_document, chunk_text, ChunkingConfig};
use kbsearch_core::error::Error;
use kbsearch_core::extract::{collect_files, FileExtractor};
use kbsearch_core::traits::TextExtractor;

fn sample_text(n: usize) -> String {
    (0..n).map(|i| char::from(b'a' + (i % 26) as u8)).collect()
}

/// Undo the overlap: first chunk whole, then every later chunk minus its prefix.
fn reconstruct(chunks: &[String], size: usize, overlap: usize) -> String {
    let overlap = overlap.min(size.max(1) - 1);
    let mut out = String::new();
    for (i, c) in chunks.iter().enumerate() {
        if i == 0 { out.push_str(c); } else { out.extend(c.chars().skip(overlap)); }
    }
    out
}

#[test]
fn empty_text_yields_no_chunks() {
    assert!(chunk_text("", 800, 100).is_empty());
    assert!(chunk_document("", "a.txt", &ChunkingConfig::default()).is_empty());
}

#[test]
fn short_text_is_a_single_chunk() {
    let text = "Paris is the capital of France.";
    assert_eq!(chunk_text(text, 800, 100), vec![text.to_string()]);
    assert_eq!(chunk_text(text, text.chars().count(), 100), vec![text.to_string()]);
}

#[test]
fn chunking_is_deterministic() {
    let text = sample_text(5000);
    assert_eq!(chunk_text(&text, 800, 100), chunk_text(&text, 800, 100));
}

#[test]
fn chunks_reconstruct_text_and_end_at_text_end() {
    for &(n, size, overlap) in &[(5000usize, 800usize, 100usize), (1001, 100, 0), (37, 5, 4), (64, 8, 8), (50, 3, 100)] {
        let text = sample_text(n);
        let chunks = chunk_text(&text, size, overlap);
        assert_eq!(reconstruct(&chunks, size, overlap), text, "n={n} size={size} overlap={overlap}");
        assert!(text.ends_with(chunks.last().expect("at least one chunk").as_str()));
        assert!(chunks.iter().all(|c| c.chars().count() <= size));
    }
}

#[test]
fn chunk_count_matches_window_arithmetic() {
    for &(n, size, overlap) in &[(5000usize, 800usize, 100usize), (10, 4, 1), (9, 5, 2), (101, 10, 3)] {
        let expected = (n - overlap).div_ceil(size - overlap);
        assert_eq!(chunk_text(&sample_text(n), size, overlap).len(), expected, "n={n} size={size} overlap={overlap}");
    }
}

#[test]
fn oversized_overlap_still_makes_progress() {
    let text = sample_text(20);
    let chunks = chunk_text(&text, 4, 10);
    // effective overlap is 3: every window ends one char after the previous one
    assert_eq!(chunks.len(), 17);
    assert_eq!(chunks[0], "abcd");
    assert_eq!(chunks[1], "bcde");
    assert_eq!(chunks.last().map(String::as_str), Some("qrst"));
}

#[test]
fn chunk_document_tags_source() {
    let cfg = ChunkingConfig::new(10, 2).expect("config");
    let chunks = chunk_document(&sample_text(30), "/data/a.txt", &cfg);
    assert_eq!(chunks.len(), 4);
    assert!(chunks.iter().all(|c| c.source == "/data/a.txt"));
    assert_eq!(chunks[0].meta().get("source").map(String::as_str), Some("/data/a.txt"));
}

#[test]
fn extract_reads_text_and_markdown() {
    let tmp = TempDir::new().unwrap();
    let txt = tmp.path().join("a.txt");
    let mut f = fs::File::create(&txt).unwrap();
    writeln!(f, "Short text").unwrap();
    fs::write(tmp.path().join("b.MD"), "# Title").unwrap();

    let extractor = FileExtractor::new();
    assert_eq!(extractor.extract(&txt).expect("txt").trim(), "Short text");
    assert_eq!(extractor.extract(&tmp.path().join("b.MD")).expect("md"), "# Title");
}

#[test]
fn extract_tolerates_invalid_utf8() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("latin1.txt");
    fs::write(&path, [b'c', b'a', b'f', 0xE9]).unwrap();
    let text = FileExtractor::new().extract(&path).expect("lossy read");
    assert!(text.starts_with("caf"));
}

#[test]
fn extract_reports_missing_and_unsupported_files() {
    let tmp = TempDir::new().unwrap();
    let missing = FileExtractor::new().extract(&tmp.path().join("nope.txt"));
    assert!(matches!(missing, Err(Error::Extraction { .. })));

    let bin = tmp.path().join("image.png");
    fs::write(&bin, [0u8, 1, 2]).unwrap();
    match FileExtractor::new().extract(&bin) {
        Err(Error::Extraction { reason, .. }) => assert!(reason.contains("unsupported")),
        other => panic!("expected extraction failure, got {other:?}"),
    }
}

#[test]
fn collect_files_walks_supported_files_sorted() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("b.txt"), "bravo").unwrap();
    fs::write(dir.join("a.md"), "alpha").unwrap();
    fs::write(dir.join("nested/c.txt"), "charlie").unwrap();
    fs::write(dir.join("skip.bin"), "x").unwrap();

    let files = collect_files(dir);
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["a.md", "b.txt", "nested/c.txt"]);

    assert_eq!(collect_files(&dir.join("b.txt")), vec![dir.join("b.txt")]);
}
