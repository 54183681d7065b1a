use std::fs;
use std::path::PathBuf;

use distviz::session::{InputMode, Panel, Session};
use distviz::source::{load, Origin};
use distviz::LoadError;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("distviz-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn uploaded_table_feeds_the_fit() {
    let path = scratch_file("sample.csv", "height,weight\n1.2,3\n1.9,4\n2.4,5\n3.1,6\n");
    let sample = load(&path).unwrap();
    assert_eq!(sample.values(), &[1.2, 1.9, 2.4, 3.1]);
    assert_eq!(sample.origin(), Origin::Upload);

    let mut session = Session::new();
    session.set_input_mode(InputMode::Upload);
    assert_eq!(session.upload(&path).unwrap(), 4);
    match session.render().panel {
        Panel::Plot { params, .. } => assert_eq!(params.len(), 2),
        Panel::ErrorDetected => panic!("expected a plot"),
    }
    fs::remove_file(path).unwrap();
}

#[test]
fn non_numeric_upload_blocks_plotting() {
    let path = scratch_file("bad.csv", "x\n1\nn/a\n");
    let mut session = Session::new();
    session.set_input_mode(InputMode::Upload);
    assert!(matches!(
        session.upload(&path),
        Err(LoadError::NonNumeric { row: 2, .. })
    ));
    assert_eq!(session.render().panel, Panel::ErrorDetected);
    fs::remove_file(path).unwrap();
}

#[test]
fn missing_upload_is_reported() {
    let mut session = Session::new();
    let missing = std::env::temp_dir().join("distviz-no-such-file.csv");
    assert!(matches!(session.upload(missing), Err(LoadError::Io(_))));
}
