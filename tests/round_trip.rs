//! End-to-end pack and extract through the filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pakpack::{
    LocalFileReader, PakError, PakReader, default_archive_path, extract_archive, pack_directory,
};
use proptest::prelude::*;
use tempfile::TempDir;

/// Every file under `root` keyed by its `/`-joined relative path.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let rel = path
                    .strip_prefix(root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_str().unwrap().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    out
}

fn write_tree(root: &Path, files: &BTreeMap<String, Vec<u8>>) {
    for (name, data) in files {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }
}

fn open(archive: &Path) -> PakReader<LocalFileReader> {
    PakReader::open(LocalFileReader::new(archive).unwrap()).unwrap()
}

#[test]
fn test_pack_and_extract_tree() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("assets");
    let mut files = BTreeMap::new();
    files.insert("readme.txt".to_string(), b"hello pak".to_vec());
    files.insert("img/logo.bin".to_string(), (0..=255u8).collect());
    files.insert("img/empty".to_string(), Vec::new());
    files.insert("deep/a/b/c/d.dat".to_string(), vec![0xAB; 70_000]);
    write_tree(&src, &files);

    let archive = default_archive_path(&src);
    assert_eq!(archive, tmp.path().join("assets.pak"));

    let mut packed = Vec::new();
    let summary = pack_directory(&src, &archive, |e| packed.push(e.name.clone())).unwrap();
    assert_eq!(summary.entries.len(), 4);
    packed.sort();
    assert_eq!(packed, files.keys().cloned().collect::<Vec<_>>());

    let dest = tmp.path().join("out");
    extract_archive(&archive, &dest, false, |_| {}).unwrap();
    assert_eq!(snapshot(&dest), files);
}

#[test]
fn test_header_and_contiguity_invariants() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("data");
    let mut files = BTreeMap::new();
    files.insert("a".to_string(), vec![1; 10]);
    files.insert("b/c".to_string(), vec![2; 3]);
    files.insert("b/d".to_string(), Vec::new());
    write_tree(&src, &files);

    let archive = tmp.path().join("data.pak");
    pack_directory(&src, &archive, |_| {}).unwrap();

    let reader = open(&archive);
    let entries = reader.entries();
    assert_eq!(entries[0].start, 16);
    for pair in entries.windows(2) {
        assert_eq!(pair[1].start, pair[0].end);
    }

    let header = reader.header();
    assert_eq!(header.payload_end, 16 + 13);
    assert_eq!(header.payload_end, entries.last().unwrap().end);

    let len = fs::metadata(&archive).unwrap().len();
    assert_eq!(
        len,
        u64::from(header.payload_end) + u64::from(header.directory_compressed_size)
    );
}

#[test]
fn test_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("nothing");
    fs::create_dir(&src).unwrap();

    let archive = tmp.path().join("nothing.pak");
    let summary = pack_directory(&src, &archive, |_| {}).unwrap();
    assert!(summary.entries.is_empty());

    let reader = open(&archive);
    assert!(reader.entries().is_empty());
    assert_eq!(reader.header().payload_end, 16);
    assert_eq!(reader.header().directory_size, 4);

    let dest = tmp.path().join("restored");
    let written = extract_archive(&archive, &dest, false, |_| {}).unwrap();
    assert!(written.is_empty());
    assert!(dest.is_dir());
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
}

#[test]
fn test_bad_magic_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("fake.pak");
    fs::write(&archive, b"PK\x03\x04 this is a zip, not a pak").unwrap();

    let dest = tmp.path().join("fake");
    let err = extract_archive(&archive, &dest, false, |_| {}).unwrap_err();
    assert!(matches!(err, PakError::InvalidMagic { .. }));
    assert!(!dest.exists());
}

#[test]
fn test_corrupt_directory_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let mut files = BTreeMap::new();
    files.insert("x.txt".to_string(), b"xyz".to_vec());
    write_tree(&src, &files);

    let archive = tmp.path().join("src.pak");
    pack_directory(&src, &archive, |_| {}).unwrap();

    let mut bytes = fs::read(&archive).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    bytes[20] ^= 0xFF;
    fs::write(&archive, &bytes).unwrap();

    let dest = tmp.path().join("dest");
    let err = extract_archive(&archive, &dest, false, |_| {}).unwrap_err();
    assert!(matches!(err, PakError::Corrupt { .. }));
    assert!(!dest.exists());
}

#[test]
fn test_ten_thousand_empty_files() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("many");
    for i in 0..10_000 {
        let dir = src.join(format!("d{}", i % 10));
        if i < 10 {
            fs::create_dir_all(&dir).unwrap();
        }
        fs::write(dir.join(format!("f{i}")), b"").unwrap();
    }

    let archive = tmp.path().join("many.pak");
    pack_directory(&src, &archive, |_| {}).unwrap();

    let reader = open(&archive);
    assert_eq!(reader.entries().len(), 10_000);
    assert!(reader.entries().iter().all(|e| e.start == 16 && e.end == 16));

    let dest = tmp.path().join("many-out");
    extract_archive(&archive, &dest, false, |_| {}).unwrap();
    for i in [0, 1, 4_321, 9_999] {
        let path: PathBuf = dest.join(format!("d{}", i % 10)).join(format!("f{i}"));
        assert_eq!(fs::metadata(&path).unwrap().len(), 0, "{}", path.display());
    }
    assert_eq!(snapshot(&dest).len(), 10_000);
}

#[test]
fn test_backslash_names_extract_nested() {
    use pakpack::PakWriter;

    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("win.pak");
    let file = fs::File::create(&archive).unwrap();
    let mut writer = PakWriter::new(file).unwrap();
    writer.add_file("a\\b\\c.txt", b"win").unwrap();
    writer.add_file("a/d.txt", b"unix").unwrap();
    writer.finish().unwrap();

    let dest = tmp.path().join("win");
    extract_archive(&archive, &dest, false, |_| {}).unwrap();
    assert_eq!(fs::read(dest.join("a").join("b").join("c.txt")).unwrap(), b"win");
    assert_eq!(fs::read(dest.join("a").join("d.txt")).unwrap(), b"unix");
}

#[cfg(unix)]
#[test]
fn test_non_ascii_name_is_refused() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("caf\u{e9}.txt"), b"x").unwrap();

    let err = pack_directory(&src, &tmp.path().join("src.pak"), |_| {}).unwrap_err();
    assert!(matches!(err, PakError::NonAsciiName { .. }));
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_is_packed() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(tmp.path().join("real.txt"), b"linked content").unwrap();
    std::os::unix::fs::symlink("../real.txt", src.join("link.txt")).unwrap();

    let archive = tmp.path().join("src.pak");
    let summary = pack_directory(&src, &archive, |_| {}).unwrap();
    assert_eq!(summary.entries.len(), 1);
    assert_eq!(summary.entries[0].name, "link.txt");

    let dest = tmp.path().join("dest");
    extract_archive(&archive, &dest, false, |_| {}).unwrap();
    assert_eq!(fs::read(dest.join("link.txt")).unwrap(), b"linked content");
}

fn file_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,8}(\\.[a-z]{1,3})?"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_round_trip_preserves_tree(
        files in prop::collection::btree_map(
            prop::collection::vec(file_name(), 1..4).prop_map(|parts| parts.join("/")),
            prop::collection::vec(any::<u8>(), 0..512),
            0..12,
        )
    ) {
        // A name that is also a directory prefix of another name can't exist on disk.
        let names: Vec<&String> = files.keys().collect();
        prop_assume!(!names.iter().any(|a| names.iter().any(|b| b.starts_with(&format!("{a}/")))));
        // Case-insensitive filesystems would merge these.
        let lowered: std::collections::BTreeSet<String> =
            files.keys().map(|k| k.to_lowercase()).collect();
        prop_assume!(lowered.len() == files.len());

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();
        write_tree(&src, &files);

        let archive = tmp.path().join("src.pak");
        pack_directory(&src, &archive, |_| {}).unwrap();

        let dest = tmp.path().join("dest");
        extract_archive(&archive, &dest, false, |_| {}).unwrap();
        prop_assert_eq!(snapshot(&dest), files);
    }
}
