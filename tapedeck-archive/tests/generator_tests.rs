//! Manifest generator tests

mod helpers;

use helpers::*;
use tapedeck_archive::generator::{generate, write_manifest, MANIFEST_FILE};
use tapedeck_archive::{ArchiveIndex, ItemKind};
use tapedeck_common::Error;

#[test]
fn test_scan_builds_sorted_items() {
    let dir = assets_dir(&[
        "010__2020__image.jpg",
        "002__2024__VIDEO.mp4",
        "1__2019__image.png",
        "tape_01.mp4",
        "kazeta_a.png",
        "cassette_side.jpg",
        "audio01.mp3",
        ".hidden.jpg",
        "readme.txt",
    ]);

    let items = generate(dir.path()).unwrap();
    let codes: Vec<&str> = items.iter().map(|item| item.code.as_str()).collect();
    assert_eq!(codes, vec!["A-001", "A-002", "A-010"]);

    assert_eq!(items[1].title, "2");
    assert_eq!(items[1].date, "2024-01-01");
    assert_eq!(items[1].kind, ItemKind::Video);
    assert_eq!(items[1].media_src, "assets/002__2024__VIDEO.mp4");
}

#[test]
fn test_scan_ignores_subdirectories() {
    let dir = assets_dir(&["001__2020__image.jpg"]);
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    touch(&dir.path().join("nested"), "002__2020__image.jpg");

    let items = generate(dir.path()).unwrap();
    assert_eq!(items.len(), 1);
}

#[test]
fn test_fallback_items_keep_stem() {
    let dir = assets_dir(&["Beach Day.webp"]);
    let items = generate(dir.path()).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].code, "A-Beach Day");
    assert_eq!(items[0].title, "Beach Day");
    assert_eq!(items[0].date, "1970-01-01");
    assert_eq!(items[0].kind, ItemKind::Image);
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let result = generate(&dir.path().join("nope"));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_file_instead_of_directory() {
    let dir = assets_dir(&["001__2020__image.jpg"]);
    let result = generate(&dir.path().join("001__2020__image.jpg"));
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_written_manifest_loads_back() {
    let dir = assets_dir(&["003__2022__image.jpg", "004__2023__video.webm"]);
    let items = generate(dir.path()).unwrap();
    let path = write_manifest(dir.path(), &items).unwrap();
    assert_eq!(path, dir.path().join(MANIFEST_FILE));

    let text = std::fs::read_to_string(&path).unwrap();
    let mut index = ArchiveIndex::load(&text).unwrap();
    assert_eq!(index.items(), items.as_slice());
    assert!(index.activate_fragment("#4"));
    assert_eq!(index.list()[1].label(), "4 — video — 01.01.2023");

    // A rescan does not pick up the manifest itself
    assert_eq!(generate(dir.path()).unwrap().len(), 2);
}
