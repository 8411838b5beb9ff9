//! Smoke tests for the `rgsync` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use rgsync_codec::container;
use rgsync_core::{ScriptEntry, Value};

fn rgsync() -> Command {
    Command::cargo_bin("rgsync").expect("binary")
}

fn write_config(project: &Path) {
    fs::write(
        project.join("Game.yaml"),
        "rxdata_dir: Data\n\
         yaml_dir: YAML\n\
         scripts_dir: Scripts\n\
         data_ignore_list: [Scripts.rxdata]\n",
    )
    .expect("config");
}

fn seed_containers(project: &Path) -> (Vec<ScriptEntry>, Value) {
    let data = project.join("Data");
    fs::create_dir_all(&data).expect("data dir");

    let entries = vec![ScriptEntry {
        id: 0,
        label: "Main Script".to_string(),
        content: b"puts 1".to_vec(),
    }];
    fs::write(
        data.join("Scripts.rxdata"),
        container::join_scripts(&entries).expect("join"),
    )
    .expect("script container");

    let actors = Value::Array(vec![Value::Nil, Value::Str("Aluxes".into())]);
    fs::write(
        data.join("Actors.rxdata"),
        container::write_root(&actors).expect("write root"),
    )
    .expect("data container");

    (entries, actors)
}

#[test]
fn export_fails_without_config() {
    let tmp = TempDir::new().expect("tempdir");
    rgsync()
        .arg("export")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Game.yaml"));
}

#[test]
fn export_then_import_round_trips_the_containers() {
    let tmp = TempDir::new().expect("tempdir");
    write_config(tmp.path());
    let (entries, actors) = seed_containers(tmp.path());

    rgsync()
        .arg("export")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("exported"));
    assert!(tmp.path().join("Scripts/digest.txt").exists());
    assert!(tmp.path().join("Scripts/Main_Script.rb").exists());
    assert!(tmp.path().join("YAML/Actors.yaml").exists());

    fs::remove_file(tmp.path().join("Data/Scripts.rxdata")).expect("drop scripts");
    fs::remove_file(tmp.path().join("Data/Actors.rxdata")).expect("drop actors");

    rgsync()
        .arg("import")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("imported"));

    let rebuilt = container::split_scripts(
        &fs::read(tmp.path().join("Data/Scripts.rxdata")).expect("container"),
    )
    .expect("split");
    assert_eq!(rebuilt, entries);

    let rebuilt_actors = container::read_root(
        &fs::read(tmp.path().join("Data/Actors.rxdata")).expect("actors"),
    )
    .expect("read root");
    assert_eq!(rebuilt_actors, actors);
}

#[test]
fn start_fails_without_an_editor() {
    let tmp = TempDir::new().expect("tempdir");
    write_config(tmp.path());
    seed_containers(tmp.path());

    rgsync()
        .arg("start")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("editor"));
}

#[cfg(unix)]
#[test]
fn start_runs_the_editor_and_clears_the_marker() {
    let tmp = TempDir::new().expect("tempdir");
    write_config(tmp.path());
    seed_containers(tmp.path());

    rgsync()
        .arg("start")
        .arg(tmp.path())
        .arg("--editor")
        .arg("touch edited.flag")
        .assert()
        .success()
        .stdout(predicate::str::contains("session finished"));

    assert!(tmp.path().join("edited.flag").exists());
    assert!(!tmp.path().join("timestamp.json").exists());
}
