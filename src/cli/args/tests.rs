use super::{Cli, Command};
use crate::constants::PROJECT_NAME;
use crate::device::DeviceType;
use clap::{CommandFactory, Parser};

#[test]
fn parser_accepts_type_list() {
    let parsed = Cli::try_parse_from([PROJECT_NAME, "devices", "--type", "usb,hid"])
        .expect("devices --type should parse");
    match parsed.command {
        Command::Devices { device_type } => {
            assert_eq!(device_type, Some(DeviceType::USB | DeviceType::HID));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parser_rejects_unknown_type() {
    let parsed = Cli::try_parse_from([PROJECT_NAME, "providers", "--type", "toaster"]);
    assert!(parsed.is_err());
}

#[test]
fn parser_rejects_unknown_format() {
    let parsed = Cli::try_parse_from([PROJECT_NAME, "gpu", "--format", "yaml"]);
    assert!(parsed.is_err());
}

#[test]
fn global_flags_work_after_subcommand() {
    let parsed = Cli::try_parse_from([
        PROJECT_NAME,
        "gpu",
        "--fixture",
        "machine.kdl",
        "--format",
        "json",
        "-q",
    ])
    .expect("global flags should parse after subcommand");
    assert!(parsed.global.quiet);
    assert_eq!(parsed.global.format.as_deref(), Some("json"));
    assert!(parsed.global.fixture.is_some());
}

#[test]
fn command_definition_is_valid() {
    Cli::command().debug_assert();
}
