pub mod fixtures;

pub use fixtures::{
    fixtures_root, load_fixture, load_fixture_json, load_fixture_string, sample_path,
    config_path,
};
