use std::path::Path;

use cilocal_core::{FilesConfig, PipelinePaths};
use tempfile::TempDir;

#[test]
fn new_joins_default_files_onto_work_dir() {
    let paths = PipelinePaths::new(Path::new("/srv/app"), &FilesConfig::default());

    assert_eq!(paths.work_dir, Path::new("/srv/app"));
    assert_eq!(paths.source, Path::new("/srv/app/.travis.yml"));
    assert_eq!(paths.script, Path::new("/srv/app/.travis.sh"));
    assert_eq!(paths.descriptor, Path::new("/srv/app/.travis.Dockerfile"));
    assert_eq!(paths.ignore, Path::new("/srv/app/.gitignore"));
    assert_eq!(paths.container_ignore, Path::new("/srv/app/.dockerignore"));
}

#[test]
fn script_in_context_is_relative_to_work_dir() {
    let files = FilesConfig {
        script: "ci/build.sh".to_owned(),
        ..Default::default()
    };
    let paths = PipelinePaths::new(Path::new("/srv/app"), &files);

    assert_eq!(paths.script_in_context(), Path::new("ci/build.sh"));
}

#[test]
fn resolve_makes_work_dir_absolute() {
    let tmp = TempDir::new().unwrap();
    let paths = PipelinePaths::resolve(tmp.path(), &FilesConfig::default()).unwrap();

    assert!(paths.work_dir.is_absolute());
    assert_eq!(paths.work_dir, tmp.path().canonicalize().unwrap());
    assert!(paths.source.starts_with(&paths.work_dir));
}

#[test]
fn resolve_fails_for_missing_dir() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");

    let err = PipelinePaths::resolve(&missing, &FilesConfig::default())
        .unwrap_err()
        .to_string();
    assert!(err.contains("failed to resolve working directory"), "got: {err}");
}
