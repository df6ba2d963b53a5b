//! Large files are compared by the block that ends at their midpoint.

use mediadupe::duplicates::DuplicateFinder;
use mediadupe::scanner::{Hasher, BLOCK_SIZE};
use std::fs;
use tempfile::tempdir;

const SIZE: usize = 2 * BLOCK_SIZE as usize + 1000;

fn sampled_range() -> std::ops::Range<usize> {
    let start = SIZE / 2 - BLOCK_SIZE as usize;
    start..SIZE / 2
}

fn patterned() -> Vec<u8> {
    (0..SIZE).map(|i| (i % 251) as u8).collect()
}

#[test]
fn test_bytes_outside_sample_do_not_matter() {
    let dir = tempdir().unwrap();
    let base = patterned();
    let mut edited = base.clone();
    edited[0] ^= 0xff;
    edited[SIZE - 1] ^= 0xff;
    edited[sampled_range().end] ^= 0xff;

    fs::write(dir.path().join("original.mov"), &base).unwrap();
    fs::write(dir.path().join("edited.mov"), &edited).unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1, "accepted sampling trade-off");
}

#[test]
fn test_bytes_inside_sample_do_matter() {
    let dir = tempdir().unwrap();
    let base = patterned();
    let mut edited = base.clone();
    edited[sampled_range().start] ^= 0xff;

    fs::write(dir.path().join("original.mov"), &base).unwrap();
    fs::write(dir.path().join("edited.mov"), &edited).unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_sampled_digest_equals_digest_of_block() {
    let dir = tempdir().unwrap();
    let data = patterned();
    let big = dir.path().join("big.bin");
    let block = dir.path().join("block.bin");
    fs::write(&big, &data).unwrap();
    fs::write(&block, &data[sampled_range()]).unwrap();

    let hasher = Hasher::new();
    let sampled = hasher.content_hash(&big, SIZE as u64).unwrap();
    let whole = hasher.content_hash(&block, BLOCK_SIZE).unwrap();
    assert_eq!(sampled, whole);
}

#[test]
fn test_just_below_threshold_hashes_everything() {
    let dir = tempdir().unwrap();
    let size = 2 * BLOCK_SIZE as usize - 1;
    let base = vec![1u8; size];
    let mut edited = base.clone();
    edited[0] = 2;

    fs::write(dir.path().join("a"), &base).unwrap();
    fs::write(dir.path().join("b"), &edited).unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert!(groups.is_empty());
}
