use super::*;
use crate::source::DeviceRecord;
use std::fs;
use tempfile::TempDir;

const GTX_765M: &str = "pci:v000010DEd000011E2sv00001558sd00005105bc03sc00i00";

fn machine() -> Vec<DeviceRecord> {
    vec![
        DeviceRecord::new("/pci0000:00"),
        DeviceRecord::new("/pci0000:00/0000:01:00.0")
            .with_parent("/pci0000:00")
            .with_name("GK106M")
            .with_type(DeviceType::PCI | DeviceType::GPU)
            .with_ids(0x10DE, 0x11E2)
            .with_modalias(GTX_765M),
        DeviceRecord::new("/pci0000:00/0000:00:14.0")
            .with_parent("/pci0000:00")
            .with_name("xHCI")
            .with_type(DeviceType::PCI),
    ]
}

fn manager() -> Manager {
    Manager::with_source(&machine(), ManagerFlags::empty()).expect("manager")
}

fn write_db(dir: &Path, file: &str, content: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, content).expect("write database");
    path
}

fn gpu(manager: &Manager) -> &Device {
    manager.get_devices(DeviceType::GPU)[0]
}

fn packages(providers: &[Provider]) -> Vec<&str> {
    providers.iter().map(|p| p.package()).collect()
}

#[test]
fn test_unknown_flag_bits_are_ignored() {
    let manager = Manager::with_source(&machine(), 0xFFFF_FFFFu32).expect("manager");
    assert_eq!(manager.flags(), ManagerFlags::NO_MONITOR);
}

#[test]
fn test_backend_failure_is_propagated() {
    let records = vec![DeviceRecord::new("/a").with_parent("/missing")];
    let err = Manager::with_source(&records, ManagerFlags::empty()).unwrap_err();
    assert!(matches!(err, LdmError::Backend(_)));
}

#[test]
fn test_equal_priority_falls_back_to_registration_order() {
    let tmp = TempDir::new().unwrap();
    let b = write_db(tmp.path(), "b.modaliases", "alias pci:v000010DE* nvidia beta 10\n");
    let a = write_db(tmp.path(), "a.modaliases", "alias pci:v000010DE* nvidia alpha 10\n");

    let mut manager = manager();
    manager.add_plugin_for_path(&b).unwrap();
    manager.add_plugin_for_path(&a).unwrap();

    let providers = manager.get_providers(gpu(&manager));
    assert_eq!(packages(&providers), vec!["beta", "alpha"]);
}

#[test]
fn test_priority_beats_registration_order() {
    let tmp = TempDir::new().unwrap();
    let low = write_db(tmp.path(), "low.modaliases", "alias pci:v000010DE* nvidia low 1\n");
    let high = write_db(tmp.path(), "high.modaliases", "alias pci:v000010DE* nvidia high 99\n");

    let mut manager = manager();
    manager.add_plugin_for_path(&low).unwrap();
    manager.add_plugin_for_path(&high).unwrap();

    let providers = manager.get_providers(gpu(&manager));
    assert_eq!(packages(&providers), vec!["high", "low"]);
    assert_eq!(providers[0].plugin(), "high");
}

#[test]
fn test_same_plugin_equal_priority_orders_by_package() {
    let tmp = TempDir::new().unwrap();
    let db = write_db(
        tmp.path(),
        "multi.modaliases",
        "alias pci:* drv zulu 5\nalias pci:* drv bravo 5\n",
    );

    let mut manager = manager();
    manager.add_plugin_for_path(&db).unwrap();

    let providers = manager.get_providers(gpu(&manager));
    assert_eq!(packages(&providers), vec!["bravo", "zulu"]);
}

#[test]
fn test_get_providers_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    write_db(tmp.path(), "one.modaliases", "alias pci:* drv one 3\nalias pci:* drv two 3\n");
    write_db(tmp.path(), "two.modaliases", "alias pci:* drv three 3\n");

    let mut manager = manager();
    manager.add_plugins_for_directory(tmp.path()).unwrap();

    let first = manager.get_providers(gpu(&manager));
    let second = manager.get_providers(gpu(&manager));
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_plugin_is_rejected_without_mutation() {
    let tmp = TempDir::new().unwrap();
    let db = write_db(tmp.path(), "nvidia.modaliases", "alias pci:* nvidia nvidia 1\n");

    let mut manager = manager();
    manager.add_plugin_for_path(&db).unwrap();
    let err = manager.add_plugin_for_path(&db).unwrap_err();

    assert!(matches!(err, LdmError::PluginExists(name) if name == "nvidia"));
    assert_eq!(manager.plugins().len(), 1);
}

#[test]
fn test_failed_path_load_leaves_plugins_untouched() {
    let tmp = TempDir::new().unwrap();
    let good = write_db(tmp.path(), "good.modaliases", "alias pci:* drv good 1\n");
    let bad = write_db(tmp.path(), "bad.modaliases", "alias pci:* drv\n");

    let mut manager = manager();
    manager.add_plugin_for_path(&good).unwrap();

    assert!(matches!(
        manager.add_plugin_for_path(&bad),
        Err(LdmError::Database { .. })
    ));
    assert!(matches!(
        manager.add_plugin_for_path(tmp.path().join("missing.modaliases")),
        Err(LdmError::Io { .. })
    ));
    assert_eq!(manager.plugins().len(), 1);
}

#[test]
fn test_directory_registers_in_file_name_order() {
    let tmp = TempDir::new().unwrap();
    write_db(tmp.path(), "c.modaliases", "");
    write_db(tmp.path(), "a.modaliases", "");
    write_db(tmp.path(), "b.modaliases", "");
    write_db(tmp.path(), ".hidden.modaliases", "garbage that would not parse\n");
    fs::create_dir(tmp.path().join("nested")).unwrap();

    let mut manager = manager();
    let added = manager.add_plugins_for_directory(tmp.path()).unwrap();

    assert_eq!(added, 3);
    let names: Vec<&str> = manager.plugins().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_directory_is_atomic_on_malformed_file() {
    let tmp = TempDir::new().unwrap();
    write_db(tmp.path(), "a.modaliases", "alias pci:* drv a 1\n");
    write_db(tmp.path(), "b.modaliases", "alias pci:* drv b\n");
    write_db(tmp.path(), "c.modaliases", "alias pci:* drv c 1\n");

    let mut manager = manager();
    let err = manager.add_plugins_for_directory(tmp.path()).unwrap_err();

    assert!(matches!(err, LdmError::Database { line: 1, .. }));
    assert!(manager.plugins().is_empty());
}

#[test]
fn test_directory_conflicting_with_registered_plugin_is_atomic() {
    let tmp = TempDir::new().unwrap();
    let a = write_db(tmp.path(), "a.modaliases", "alias pci:* drv a 1\n");
    write_db(tmp.path(), "b.modaliases", "alias pci:* drv b 1\n");

    let mut manager = manager();
    manager.add_plugin_for_path(&a).unwrap();

    let err = manager.add_plugins_for_directory(tmp.path()).unwrap_err();
    assert!(matches!(err, LdmError::PluginExists(_)));
    assert_eq!(manager.plugins().len(), 1);
}

#[test]
fn test_missing_directory_is_io_error() {
    let mut manager = manager();
    let err = manager
        .add_plugins_for_directory("/nonexistent/modaliases")
        .unwrap_err();
    assert!(matches!(err, LdmError::Io { .. }));
}

#[test]
fn test_get_all_providers_skips_unmatched_devices() {
    let tmp = TempDir::new().unwrap();
    write_db(tmp.path(), "nvidia.modaliases", "alias pci:v000010DE* nvidia nvidia 1\n");

    let mut manager = manager();
    manager.add_plugins_for_directory(tmp.path()).unwrap();

    let all = manager.get_all_providers(DeviceType::PCI);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].0.name(), "GK106M");
    assert_eq!(packages(&all[0].1), vec!["nvidia"]);
}

#[test]
fn test_queries_from_many_threads() {
    let tmp = TempDir::new().unwrap();
    write_db(tmp.path(), "nvidia.modaliases", "alias pci:v000010DE* nvidia nvidia 1\n");

    let mut manager = manager();
    manager.add_plugins_for_directory(tmp.path()).unwrap();
    let expected = manager.get_providers(gpu(&manager));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(manager.get_providers(gpu(&manager)), expected);
            });
        }
    });
}
