use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn script_cmd(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("signout_cli").unwrap();
    cmd.env("SIGNOUT_CLI_SCRIPT", "1")
        .env("SIGNOUT_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_builds_plain_report() {
    let home = tempfile::tempdir().unwrap();
    let script = "\
date 2024-03-15
add \"Pending transfer\"
set \"Pending transfer\" 1 Number 3
set \"Pending transfer\" 1 Name Doe
set \"Pending transfer\" 1 MRN 12345
text EOU \"Smith\\n\\nJones\"
number EOU
report --plain
exit
";

    script_cmd(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(
            contains("SIGNOUT LIST\nDate: 2024-03-15\n")
                .and(contains("PENDING TRANSFER\n3. | Name: Doe | MRN: 12345\n\n"))
                .and(contains("EOU\n1. Smith\n\n2. Jones\n\n"))
                .and(contains("VENT\nNone\n")),
        );
}

#[test]
fn rejected_commands_report_and_continue() {
    let home = tempfile::tempdir().unwrap();
    let script = "\
add EOU
add Vnet
remove Vent 2
none Vent
add Vent
show Vent
exit
";

    script_cmd(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(
            contains("cannot add an entry to free-text category `EOU`")
                .and(contains("Unknown category `Vnet`"))
                .and(contains("Did you mean \"Vent\"?"))
                .and(contains("`Vent` has no entry #2 (0 entries)."))
                .and(contains("Vent marked as none."))
                .and(contains("Added entry #1 to Vent.")),
        );
}

#[test]
fn closed_dropdown_rejects_unknown_option() {
    let home = tempfile::tempdir().unwrap();
    let script = "\
add Unseen
set Unseen 1 Group ICU
set Unseen 1 Group wcc
report --plain
";

    script_cmd(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(
            contains("`ICU` is not an option for `Group`")
                .and(contains("UNSEEN\nGroup: WCC\n")),
        );
}

#[test]
fn unknown_command_gets_suggestion() {
    let home = tempfile::tempdir().unwrap();
    script_cmd(&home)
        .write_stdin("reprot\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `reprot`").and(contains("Suggestion: `report`?")));
}

#[test]
fn config_is_persisted_under_home() {
    let home = tempfile::tempdir().unwrap();
    script_cmd(&home)
        .write_stdin("config set high_contrast_mode on\nexit\n")
        .assert()
        .success()
        .stdout(contains("Configuration updated."));

    let json = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(json.contains("\"high_contrast_mode\": true"));
}

#[test]
fn rust_log_raises_crate_log_level() {
    let home = tempfile::tempdir().unwrap();
    script_cmd(&home)
        .env("RUST_LOG", "signout_core=debug")
        .write_stdin("add Vent\nexit\n")
        .assert()
        .success()
        .stderr(contains("entry added"));

    script_cmd(&home)
        .write_stdin("add Vent\nexit\n")
        .assert()
        .success()
        .stderr(contains("entry added").not());
}
