use std::fs;
use std::path::PathBuf;

use squelch_lib::config::ConfigError;
use squelch_lib::project::ProjectModel;
use squelch_lib::selection::{resolve_manifest, select_in_project, select_loose};
use tempfile::TempDir;

fn write_file(dir: &TempDir, rel: &str, content: &str) -> PathBuf {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn resolve_manifest_appends_conventional_name_for_directories() {
    let dir = TempDir::new().unwrap();
    let manifest = write_file(&dir, "project.json", "{}");

    let resolved = resolve_manifest(dir.path()).unwrap();
    assert_eq!(resolved, manifest);
}

#[test]
fn resolve_manifest_accepts_a_direct_file_path() {
    let dir = TempDir::new().unwrap();
    let manifest = write_file(&dir, "custom.json", "{}");

    let resolved = resolve_manifest(&manifest).unwrap();
    assert_eq!(resolved, manifest);
}

#[test]
fn resolve_manifest_fails_for_missing_paths() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        resolve_manifest(&missing),
        Err(ConfigError::InvalidManifest { .. })
    ));

    // A directory without the conventional manifest file is also invalid.
    let empty = TempDir::new().unwrap();
    assert!(matches!(
        resolve_manifest(empty.path()),
        Err(ConfigError::InvalidManifest { .. })
    ));
}

#[test]
fn project_model_orders_declared_files_before_include_matches() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "src/zz.ts", "");
    write_file(&dir, "src/aa.ts", "");
    let entry = write_file(&dir, "entry.ts", "");
    let manifest = write_file(
        &dir,
        "project.json",
        r#"{ "files": ["entry.ts"], "include": ["src/**/*.ts"] }"#,
    );

    let model = ProjectModel::load(&manifest).unwrap();
    let members = model.member_paths();
    assert_eq!(members.len(), 3);
    assert_eq!(members[0], entry);
    assert!(members[1].ends_with("src/aa.ts"));
    assert!(members[2].ends_with("src/zz.ts"));
    assert!(model.is_member(&entry));
}

#[test]
fn project_model_subtracts_manifest_excludes() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "src/keep.ts", "");
    write_file(&dir, "src/vendor/skip.ts", "");
    let manifest = write_file(
        &dir,
        "project.json",
        r#"{ "include": ["src/**/*.ts"], "exclude": ["src/vendor/**"] }"#,
    );

    let model = ProjectModel::load(&manifest).unwrap();
    let members = model.member_paths();
    assert_eq!(members.len(), 1);
    assert!(members[0].ends_with("src/keep.ts"));
}

#[test]
fn project_model_fails_on_missing_declared_file() {
    let dir = TempDir::new().unwrap();
    let manifest = write_file(&dir, "project.json", r#"{ "files": ["gone.ts"] }"#);

    assert!(matches!(
        ProjectModel::load(&manifest),
        Err(ConfigError::ManifestFileNotFound { .. })
    ));
}

#[test]
fn explicit_file_outside_the_project_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "src/member.ts", "");
    let outsider = write_file(&dir, "outsider.ts", "");
    let manifest = write_file(&dir, "project.json", r#"{ "include": ["src/**/*.ts"] }"#);

    let model = ProjectModel::load(&manifest).unwrap();
    let result = select_in_project(
        model.member_paths(),
        &[outsider.to_string_lossy().into_owned()],
        &[],
    );
    assert!(matches!(result, Err(ConfigError::NotInProject { .. })));
}

#[test]
fn explicit_file_outside_the_project_but_excluded_is_fine() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "src/member.ts", "");
    let outsider = write_file(&dir, "outsider.ts", "");
    let manifest = write_file(&dir, "project.json", r#"{ "include": ["src/**/*.ts"] }"#);

    let model = ProjectModel::load(&manifest).unwrap();
    let outsider_arg = outsider.to_string_lossy().into_owned();
    let selection = select_in_project(model.member_paths(), &[outsider_arg.clone()], &[outsider_arg]).unwrap();
    assert!(selection.files.is_empty());
    assert!(selection.warnings.is_empty());
}

#[test]
fn loose_selection_takes_existing_files_and_warns_on_missing() {
    let dir = TempDir::new().unwrap();
    let real = write_file(&dir, "real.ts", "");

    let selection = select_loose(
        &[real.to_string_lossy().into_owned(), dir.path().join("ghost.ts").to_string_lossy().into_owned()],
        &[],
    )
    .unwrap();
    assert_eq!(selection.files, vec![real]);
    assert_eq!(selection.warnings.len(), 1);
    assert!(selection.warnings[0].contains("does not exist"));
}

#[test]
fn loose_selection_respects_excludes_for_explicit_files() {
    let dir = TempDir::new().unwrap();
    let real = write_file(&dir, "real.ts", "");
    let pattern = real.to_string_lossy().into_owned();

    let selection = select_loose(&[pattern.clone()], &[pattern]).unwrap();
    assert!(selection.files.is_empty());
    assert!(selection.warnings.is_empty());
}
