use super::*;
use std::fs;
use tempfile::TempDir;

fn flags() -> GlobalFlags {
    GlobalFlags {
        verbose: false,
        quiet: false,
        config: None,
        fixture: None,
        modalias_dir: None,
        format: None,
    }
}

fn defaults() -> Settings {
    Settings::load_from("/nonexistent/ldm/settings.kdl").expect("defaults")
}

#[test]
fn format_flag_overrides_setting() {
    let mut global = flags();
    assert_eq!(resolve_format(&global, &defaults()), "table");

    global.format = Some("json".to_string());
    assert_eq!(resolve_format(&global, &defaults()), "json");
}

#[test]
fn modalias_dir_flag_overrides_setting() {
    let mut global = flags();
    assert_eq!(
        resolve_modalias_dir(&global, &defaults()),
        PathBuf::from(crate::constants::DEFAULT_MODALIAS_DIR)
    );

    global.modalias_dir = Some(PathBuf::from("/tmp/db"));
    assert_eq!(resolve_modalias_dir(&global, &defaults()), PathBuf::from("/tmp/db"));
}

#[test]
fn build_manager_from_fixture_loads_databases() {
    let tmp = TempDir::new().unwrap();
    let fixture = tmp.path().join("machine.kdl");
    fs::write(
        &fixture,
        r#"device "/pci0000:00" {
    device "/pci0000:00/0000:01:00.0" types="pci gpu" vendor="10de" product="1c03" modalias="pci:v000010DEd00001C03sv*"
}
"#,
    )
    .unwrap();
    let db = tmp.path().join("db");
    fs::create_dir(&db).unwrap();
    fs::write(db.join("nvidia.modaliases"), "alias pci:v000010DE* nvidia nvidia 1\n").unwrap();

    let mut global = flags();
    global.fixture = Some(fixture);
    global.modalias_dir = Some(db);

    let manager = build_manager(&global, &defaults()).expect("manager");
    assert_eq!(manager.tree().len(), 2);
    assert_eq!(manager.plugins().len(), 1);
    assert_eq!(manager.flags(), ManagerFlags::NO_MONITOR);
}

#[test]
fn build_manager_tolerates_missing_modalias_dir() {
    let tmp = TempDir::new().unwrap();
    let fixture = tmp.path().join("machine.kdl");
    fs::write(&fixture, "device \"/pci0000:00\"\n").unwrap();

    let mut global = flags();
    global.fixture = Some(fixture);
    global.modalias_dir = Some(tmp.path().join("missing"));

    let manager = build_manager(&global, &defaults()).expect("manager");
    assert!(manager.plugins().is_empty());
}
