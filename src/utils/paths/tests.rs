use super::*;

#[test]
fn settings_file_uses_expected_filename() {
    let path = settings_file().expect("settings_file should resolve");
    assert_eq!(
        path.file_name().and_then(|f| f.to_str()),
        Some(SETTINGS_FILE_NAME)
    );
}

#[test]
fn settings_file_lives_in_config_dir() {
    let dir = config_dir().expect("config_dir should resolve");
    let path = settings_file().expect("settings_file should resolve");
    assert_eq!(path.parent(), Some(dir.as_path()));
}
