//! Shared fixtures: Boost installations, packages and a package server
#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Files every fixture package contains, relative to its root directory
pub const PACKAGE_FILES: [(&str, &str); 3] = [
    ("Jamroot", "project cpp-netlib ;\n"),
    ("libs/network/test/Jamfile.v2", "unit-test uri_test : uri_test.cpp ;\n"),
    ("include/network/version.hpp", "#define NETLIB_VERSION 0x000900\n"),
];

/// Create a Boost installation root declaring `version`
pub fn boost_root(version: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::create_dir_all(dir.path().join("boost")).unwrap();
    let header = format!(
        "#ifndef BOOST_VERSION_HPP\n\
         #define BOOST_VERSION_HPP\n\
         #define BOOST_VERSION 104700\n\
         #define BOOST_LIB_VERSION \"{}\"\n\
         #endif\n",
        version
    );
    fs::write(dir.path().join("boost/version.hpp"), header).unwrap();
    dir
}

/// Build a gzipped tarball with [`PACKAGE_FILES`] under `root/`
pub fn tarball_bytes(root: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, contents) in PACKAGE_FILES {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}/{}", root, name), contents.as_bytes())
            .unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

/// Build a zip file with [`PACKAGE_FILES`] under `root/`
pub fn zip_bytes(root: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in PACKAGE_FILES {
        writer
            .start_file(format!("{}/{}", root, name), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Serve `body` as `/downloads/<filename>`, redirected to from `/<endpoint>/<branch>`
pub async fn mount_package(
    server: &MockServer,
    endpoint: &str,
    branch: &str,
    filename: &str,
    body: Vec<u8>,
) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/{}", endpoint, branch)))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/downloads/{}", server.uri(), filename)),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/downloads/{}", filename)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// List every file below `dir` with its contents, sorted by relative path
pub fn snapshot_tree(dir: &Path) -> Vec<(String, String)> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<(String, String)>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                let relative = path.strip_prefix(base).unwrap().display().to_string();
                out.push((relative, fs::read_to_string(&path).unwrap()));
            }
        }
    }

    let mut files = Vec::new();
    walk(dir, dir, &mut files);
    files.sort();
    files
}

/// Split a report into build output and `(key, value)` metadata pairs.
///
/// The metadata block is the last six lines, preceded by two blank lines.
pub fn split_report(report: &str) -> (String, Vec<(String, String)>) {
    let lines: Vec<&str> = report.lines().collect();
    assert!(lines.len() >= 8, "report too short: {:?}", report);
    let split = lines.len() - 6;
    assert_eq!(lines[split - 2], "", "expected two blank lines: {:?}", report);
    assert_eq!(lines[split - 1], "", "expected two blank lines: {:?}", report);

    let output = lines[..split - 2].join("\n");
    let metadata = lines[split..]
        .iter()
        .map(|line| {
            let (key, value) = line
                .split_once(": ")
                .unwrap_or_else(|| panic!("not a key: value line: {:?}", line));
            (key.to_string(), value.to_string())
        })
        .collect();
    (output, metadata)
}
