use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use rusty_merge::data::filter::TableView;
use rusty_merge::series::Series;
use rusty_merge::{
    build_index, extract_archive, merge_fragments, ErrorKind, Fields, Key, LoadOptions,
};
use tempfile::TempDir;

fn write_sample_zip(path: &Path) {
    let mut zip = zip::ZipWriter::new(File::create(path).expect("should create zip"));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in [
        ("a.csv", "id,value1,value2\n1,100,casa\n2,200,piso\n"),
        ("b.csv", "id,value3,value4\n3,300,solar\n4,400,piso\n"),
    ] {
        zip.start_file(name, options).expect("should start entry");
        zip.write_all(contents.as_bytes()).expect("should write entry");
    }
    zip.finish().expect("should finish zip");
}

#[test]
fn extract_then_merge_then_index() {
    //* Given
    let dir = TempDir::new().expect("should create temp dir");
    let archive = dir.path().join("test_files.zip");
    write_sample_zip(&archive);
    let data = dir.path().join("data");

    //* When
    let extracted = extract_archive(&archive, &data).expect("should extract");
    let table = merge_fragments(&data, &LoadOptions::default())
        .expect("should merge")
        .value;
    let index = build_index::<Fields>(&data, &LoadOptions::default())
        .expect("should index")
        .value;

    //* Then
    assert_eq!(extracted.len(), 2);
    assert!(extracted.iter().all(|p| p.exists()));

    assert_eq!(table.cell(0, "value4"), Some("solar"));
    assert_eq!(table.cell(1, "value4"), Some("piso"));

    assert_eq!(index.get(1).and_then(|r| r.get("value1")), Some("100"));
    assert_eq!(index.get(2).and_then(|r| r.get("value2")), Some("piso"));
}

fn write_fragments(dir: &Path, names: [&str; 3]) {
    fs::write(dir.join(names[0]), "id,name\n1,One\n2,Two\n3,Three\n").unwrap();
    fs::write(dir.join(names[1]), "id,status\n3,Ended\n4,Canceled\n").unwrap();
    fs::write(dir.join(names[2]), "id,genres\n5,Drama\n1,Comedy\n").unwrap();
}

#[test]
fn row_count_is_independent_of_file_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_fragments(first.path(), ["a.csv", "b.csv", "c.csv"]);
    write_fragments(second.path(), ["z.csv", "m.csv", "b.csv"]);

    let a = merge_fragments(first.path(), &LoadOptions::default()).unwrap().value;
    let b = merge_fragments(second.path(), &LoadOptions::default()).unwrap().value;

    assert_eq!(a.len(), 5);
    assert_eq!(b.len(), 5);
    let keys = |t: &rusty_merge::MergedTable| t.keys().iter().cloned().collect::<BTreeSet<Key>>();
    assert_eq!(keys(&a), keys(&b));
    assert_eq!(a.columns().len(), 3);
}

#[test]
fn every_fragment_column_survives() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "id,name,status\n1,One,Ended\n").unwrap();
    fs::write(dir.path().join("b.csv"), "id,status,genres\n1,Canceled,Drama\n").unwrap();

    let table = merge_fragments(dir.path(), &LoadOptions::default()).unwrap().value;

    assert_eq!(table.column_names(), ["status", "genres", "name", "status"]);
}

#[test]
fn loads_are_idempotent() {
    let dir = TempDir::new().unwrap();
    write_fragments(dir.path(), ["a.csv", "b.csv", "c.csv"]);

    let first = merge_fragments(dir.path(), &LoadOptions::default()).unwrap().value;
    let second = merge_fragments(dir.path(), &LoadOptions::default()).unwrap().value;
    assert_eq!(first, second);

    let first = build_index::<Fields>(dir.path(), &LoadOptions::default()).unwrap().value;
    let second = build_index::<Fields>(dir.path(), &LoadOptions::default()).unwrap().value;
    assert_eq!(first, second);
}

#[test]
fn index_keys_are_the_union_of_row_keys() {
    let dir = TempDir::new().unwrap();
    write_fragments(dir.path(), ["a.csv", "b.csv", "c.csv"]);

    let index = build_index::<Fields>(dir.path(), &LoadOptions::default()).unwrap().value;

    assert_eq!(index.keys().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    // c.csv is processed last and replaces the row from a.csv
    let one = index.get(1).unwrap();
    assert_eq!(one.get("genres"), Some("Comedy"));
    assert_eq!(one.get("name"), None);
}

#[test]
fn typed_index_over_series_fragments() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("TMDB_info.csv"),
        "id,name,type,number_of_seasons,first_air_date\n60140,Dark,Scripted,3,2017-12-01\n",
    )
    .unwrap();

    let index = build_index::<Series>(dir.path(), &LoadOptions::default()).unwrap().value;

    let dark = index.get(60140).expect("key 60140");
    assert_eq!(dark.name.as_deref(), Some("Dark"));
    assert_eq!(dark.number_of_seasons, Some(3));
}

#[test]
fn failures_are_classified() {
    let missing = merge_fragments(Path::new("/nonexistent/data"), &LoadOptions::default())
        .expect_err("should fail");
    assert_eq!(missing.kind(), ErrorKind::Input);

    let empty = TempDir::new().unwrap();
    let err = build_index::<Fields>(empty.path(), &LoadOptions::default()).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::Input);

    let bad = TempDir::new().unwrap();
    fs::write(bad.path().join("a.csv"), "id,name\nx,One\n").unwrap();
    let err = build_index::<Fields>(bad.path(), &LoadOptions::default()).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::KeyCoercion);
    // the loader keeps non-integer keys as text
    let table = merge_fragments(bad.path(), &LoadOptions::default()).unwrap().value;
    assert_eq!(TableView::new(&table).keys(), [&Key::Text("x".into())]);
}
