//! Subcommand handlers run against temporary data directories.

use clap::Parser;
use plugin_config::cli::Cli;
use plugin_config::{execute, ConfigFile};
use serde_yaml::Value;
use tempfile::TempDir;

const BUNDLED: &str = "motd: Welcome\nserver:\n  slots: 20\n";

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("plugin-config").chain(args.iter().copied()))
}

fn path_str(dir: &TempDir) -> &str {
    dir.path().to_str().unwrap()
}

fn resources_with_default() -> TempDir {
    let resources = tempfile::tempdir().unwrap();
    std::fs::write(resources.path().join("config.yml"), BUNDLED).unwrap();
    resources
}

#[tokio::test]
async fn set_get_and_show_resolve_under_data_dir() {
    let data = tempfile::tempdir().unwrap();
    let dir = path_str(&data);

    execute(&cli(&["--data-dir", dir, "-f", "settings.yml", "set", "server.slots", "40"]))
        .await
        .unwrap();

    let file = data.path().join("settings.yml");
    assert!(file.is_file());
    let config = ConfigFile::new(&file);
    config.load().unwrap();
    assert_eq!(config.get("server.slots"), Some(Value::from(40)));

    execute(&cli(&["--data-dir", dir, "-f", "settings.yml", "get", "server.slots"]))
        .await
        .unwrap();
    execute(&cli(&["--data-dir", dir, "-f", "settings.yml", "show"]))
        .await
        .unwrap();
    execute(&cli(&["--data-dir", dir, "-f", "settings.yml", "show", "--json"]))
        .await
        .unwrap();

    // Without the data dir the same relative file is not found.
    let err = execute(&cli(&["-f", "settings-elsewhere.yml", "get", "server.slots"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No value at 'server.slots'"));
}

#[tokio::test]
async fn get_missing_path_fails() {
    let data = tempfile::tempdir().unwrap();
    std::fs::write(data.path().join("config.yml"), BUNDLED).unwrap();

    let err = execute(&cli(&["--data-dir", path_str(&data), "get", "server.name"]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No value at 'server.name'"));
}

#[tokio::test]
async fn set_with_empty_segment_fails_and_keeps_file() {
    let data = tempfile::tempdir().unwrap();
    let file = data.path().join("config.yml");
    std::fs::write(&file, BUNDLED).unwrap();

    let err = execute(&cli(&["--data-dir", path_str(&data), "set", "server..slots", "1"]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("server..slots"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), BUNDLED);
}

#[tokio::test]
async fn unset_removes_value_and_keeps_order() {
    let data = tempfile::tempdir().unwrap();
    let file = data.path().join("config.yml");
    std::fs::write(&file, "a: 1\nb: 2\nc: 3\n").unwrap();

    execute(&cli(&["--data-dir", path_str(&data), "unset", "a"]))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "b: 2\nc: 3\n");
}

#[tokio::test]
async fn unset_missing_path_fails_without_writing() {
    let data = tempfile::tempdir().unwrap();

    let err = execute(&cli(&["--data-dir", path_str(&data), "unset", "server.slots"]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("No value at 'server.slots'"));
    assert!(!data.path().join("config.yml").exists());
}

#[tokio::test]
async fn clear_empties_the_file() {
    let data = tempfile::tempdir().unwrap();
    let file = data.path().join("config.yml");
    std::fs::write(&file, BUNDLED).unwrap();

    execute(&cli(&["--data-dir", path_str(&data), "clear"]))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "");
}

#[tokio::test]
async fn init_requires_data_dir_and_resources() {
    let data = tempfile::tempdir().unwrap();
    let resources = resources_with_default();

    let err = execute(&cli(&["--resources", path_str(&resources), "init"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--data-dir"));

    let err = execute(&cli(&["--data-dir", path_str(&data), "init"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("--resources"));

    assert!(!data.path().join("config.yml").exists());
}

#[tokio::test]
async fn init_copies_default_and_only_replaces_when_asked() {
    let data = tempfile::tempdir().unwrap();
    let resources = resources_with_default();
    let file = data.path().join("config.yml");
    let init = cli(&["--data-dir", path_str(&data), "--resources", path_str(&resources), "init"]);
    let init_replace = cli(&[
        "--data-dir",
        path_str(&data),
        "--resources",
        path_str(&resources),
        "init",
        "--replace",
    ]);

    execute(&init).await.unwrap();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), BUNDLED);

    std::fs::write(&file, "motd: Edited\n").unwrap();
    execute(&init).await.unwrap();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "motd: Edited\n");

    execute(&init_replace).await.unwrap();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), BUNDLED);
}

#[tokio::test]
async fn init_unknown_resource_fails() {
    let data = tempfile::tempdir().unwrap();
    let resources = resources_with_default();

    let err = execute(&cli(&[
        "--data-dir",
        path_str(&data),
        "--resources",
        path_str(&resources),
        "-f",
        "missing.yml",
        "init",
    ]))
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("missing.yml"));
}
