use std::fs;

use menat::data::{load_dataset, DatasetSource, FileSource};
use menat::error::DataError;
use menat::frames::{FrameIndex, FrameService, MatchThresholds};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/frames.json");

const YAML_DATASET: &str = r#"
Ryu:
  moves:
    normal:
      crouch mk:
        plnCmd: cr.MK
        cmnCmd: crouch forward
        numCmd: 2MK
        onHit: "+4"
    vtOne: {}
    vtTwo: {}
  stats:
    fDash: 19
"#;

#[test]
fn yaml_and_json_datasets_index_the_same() {
    let dir = tempfile::tempdir().unwrap();
    let yaml_path = dir.path().join("frames.yml");
    let json_path = dir.path().join("frames.json");
    fs::write(&yaml_path, YAML_DATASET).unwrap();

    let from_yaml = load_dataset(&yaml_path).unwrap();
    fs::write(&json_path, serde_json::to_string(&from_yaml).unwrap()).unwrap();
    let from_json = load_dataset(&json_path).unwrap();

    assert_eq!(from_yaml, from_json);
    assert_eq!(FrameIndex::build(&from_yaml), FrameIndex::build(&from_json));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.csv");
    fs::write(&path, "Ryu,crouch mk").unwrap();
    assert!(matches!(load_dataset(&path), Err(DataError::UnsupportedFormat(_))));
}

#[test]
fn malformed_json_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.json");
    fs::write(&path, "{\"Ryu\": ").unwrap();

    let err = load_dataset(&path).unwrap_err();
    assert!(matches!(err, DataError::Json { .. }));
    assert!(err.to_string().contains("frames.json"));
}

#[test]
fn empty_dataset_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.json");
    fs::write(&path, "{}").unwrap();
    assert!(matches!(load_dataset(&path), Err(DataError::Empty)));
}

#[test]
fn file_source_reads_fresh_copy_each_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.yaml");
    fs::write(&path, YAML_DATASET).unwrap();

    let source = FileSource::new(&path);
    assert_eq!(source.path(), path.as_path());
    assert_eq!(source.load().unwrap().len(), 1);

    let from_fixture = load_dataset(FIXTURE).unwrap();
    fs::write(&path, serde_yaml::to_string(&from_fixture).unwrap()).unwrap();
    assert_eq!(source.load().unwrap().len(), 3);
}

#[test]
fn reload_picks_up_changed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.yaml");
    fs::write(&path, YAML_DATASET).unwrap();

    let mut service =
        FrameService::load(Box::new(FileSource::new(&path)), MatchThresholds::default()).unwrap();
    assert_eq!(service.index().len(), 1);
    let first_indexed = service.indexed_at();

    let extended = format!("{YAML_DATASET}Ken:\n  moves:\n    normal: {{}}\n  stats: {{}}\n");
    fs::write(&path, extended).unwrap();
    service.reload().unwrap();

    assert_eq!(service.index().character_names().collect::<Vec<_>>(), ["Ryu", "Ken"]);
    assert!(service.indexed_at() >= first_indexed);
}
