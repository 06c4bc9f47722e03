use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("lince").unwrap();
    cmd.env_remove("LINCE_CAPACITY")
        .env_remove("LINCE_DUMP_CELLS")
        .env_remove("LINCE_CONFIG");
    cmd
}

fn write_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn config_file_sets_capacity() {
    let config = write_file("[tape]\ncapacity = 2\n");
    let program = write_file(">>");
    cargo_bin()
        .arg(program.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .code(3);
}

#[test]
fn env_overrides_config_file() {
    let config = write_file("[tape]\ncapacity = 2\n");
    let program = write_file(">>");
    cargo_bin()
        .env("LINCE_CONFIG", config.path())
        .env("LINCE_CAPACITY", "5")
        .arg(program.path())
        .assert()
        .success();
}

#[test]
fn flag_overrides_env() {
    let program = write_file("+");
    cargo_bin()
        .env("LINCE_DUMP_CELLS", "5")
        .arg(program.path())
        .args(["--debug", "--dump-cells", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("000 001 \n"));
}

#[test]
fn malformed_config_is_ignored() {
    let config = write_file("[tape\ncapacity = ");
    let program = write_file("+.");
    cargo_bin()
        .arg(program.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::eq(&[1u8][..]));
}

#[test]
fn logging_goes_to_stderr() {
    let program = write_file("+.");
    cargo_bin()
        .env("LINCE_LOG", "debug")
        .arg(program.path())
        .assert()
        .success()
        .stdout(predicate::eq(&[1u8][..]))
        .stderr(predicate::str::contains("validation passed"));
}

#[test]
fn config_file_is_found_in_the_user_config_dir() {
    let home = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(home.path().join(".config")).unwrap();
    std::fs::write(home.path().join(".config/lince.toml"), "[tape]\ncapacity = 2\n").unwrap();
    let program = write_file(">>");
    cargo_bin()
        .env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .arg(program.path())
        .assert()
        .code(3);
}
