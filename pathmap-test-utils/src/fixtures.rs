use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

pub fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("resources")
        .join("test-fixtures")
}

pub fn config_path(name: &str) -> PathBuf {
    fixtures_root().join("configs").join(name)
}

pub fn sample_path(name: &str) -> PathBuf {
    fixtures_root().join("samples").join(name)
}

pub fn load_fixture(relative_path: &str) -> io::Result<Vec<u8>> {
    let path = fixtures_root().join(relative_path);
    fs::read(path)
}

pub fn load_fixture_string(relative_path: &str) -> io::Result<String> {
    let path = fixtures_root().join(relative_path);
    fs::read_to_string(path)
}

pub fn load_fixture_json<T: DeserializeOwned>(relative_path: &str) -> io::Result<T> {
    let bytes = load_fixture(relative_path)?;
    serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
