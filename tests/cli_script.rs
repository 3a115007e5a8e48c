use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn shell(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("bittrip_cli").unwrap();
    cmd.env("BITTRIP_CLI_SCRIPT", "1").env("BITTRIP_HOME", home);
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = tempdir().unwrap();
    let trip = home.path().join("trip.json");
    let input = format!(
        "# plan a short trip\n\
         trip-new \"Costa Rica\"\n\
         budget 2000\n\
         share 1 40\n\
         trip-dates 2025-08-01 2025-08-03\n\
         activity-add 2 Zipline 65 entertainment\n\
         trip-save {}\n\
         exit\n",
        trip.display()
    );

    shell(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Total budget set to $2,000.00"))
        .stdout(contains("New trip draft `Costa Rica` created"))
        .stdout(contains("saved to"));

    let json = std::fs::read_to_string(&trip).unwrap();
    assert!(json.contains("\"Costa Rica\""));
    assert!(json.contains("\"Zipline\""));
    assert!(json.contains("2000.0"));
}

#[test]
fn bad_commands_are_reported_without_stopping() {
    let home = tempdir().unwrap();
    shell(home.path())
        .write_stdin("buget 100\nshare 9 10\nbudget-show\n")
        .assert()
        .success()
        .stdout(contains("Did you mean `budget`?"))
        .stdout(contains("category #9 does not exist"))
        .stdout(contains("Accommodation"));
}

#[test]
fn config_changes_apply_to_new_sessions() {
    let home = tempdir().unwrap();
    shell(home.path())
        .write_stdin("config-set default_budget 750\n")
        .assert()
        .success();

    shell(home.path())
        .write_stdin("budget-show\n")
        .assert()
        .success()
        .stdout(contains("Budget $750.00"));
}
