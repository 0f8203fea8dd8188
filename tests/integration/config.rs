use predicates::prelude::*;

use crate::common::{FIXTURE_MILLIS, TestProject};

const CONFIG: &str = r#"
default_zone = "EST"

[templates]
query = "?a=b{?}&c={}{?}&e={}"
clock = "{date(HH:mm)}"
"#;

#[test]
fn test_named_template_from_home_config() {
    let project = TestProject::new().unwrap();
    project.write_home_config(CONFIG).unwrap();

    project
        .command()
        .args(["render", "--name", "query", "", "f"])
        .assert()
        .success()
        .stdout("?a=b&e=f\n");
}

#[test]
fn test_default_zone_from_config() {
    let project = TestProject::new().unwrap();
    project.write_home_config(CONFIG).unwrap();
    let millis = format!("int:{FIXTURE_MILLIS}");

    project
        .command()
        .args(["render", "--name", "clock", &millis])
        .assert()
        .success()
        .stdout("11:52\n");

    // --zone overrides the configured default
    project
        .command()
        .args(["render", "--zone", "HST", "--name", "clock", &millis])
        .assert()
        .success()
        .stdout("06:52\n");
}

#[test]
fn test_region_default_zone_from_config() {
    let project = TestProject::new().unwrap();
    project
        .write_home_config("default_zone = \"America/New_York\"\n[templates]\nclock = \"{date(HH:mm VV)}\"\n")
        .unwrap();

    project
        .command()
        .args(["render", "--name", "clock", &format!("int:{FIXTURE_MILLIS}")])
        .assert()
        .success()
        .stdout("12:52 America/New_York\n");
}

#[test]
fn test_config_flag_and_env_var() {
    let project = TestProject::new().unwrap();
    let flag = project.write_file("flag.toml", "[templates]\nwho = \"flag {}\"\n").unwrap();
    let env = project.write_file("env.toml", "[templates]\nwho = \"env {}\"\n").unwrap();

    project
        .command()
        .env("EXPANDER_CONFIG", &env)
        .args(["render", "--name", "who", "x"])
        .assert()
        .success()
        .stdout("env x\n");

    project
        .command()
        .env("EXPANDER_CONFIG", &env)
        .args(["--config", flag.to_str().unwrap(), "render", "--name", "who", "x"])
        .assert()
        .success()
        .stdout("flag x\n");
}

#[test]
fn test_missing_default_config_is_fine() {
    let project = TestProject::new().unwrap();
    project.render(&["{}", "ok"]).assert().success().stdout("ok\n");
}

#[test]
fn test_missing_explicit_config_fails() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["--config", "absent.toml", "render", "{}", "x"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_unknown_template_name() {
    let project = TestProject::new().unwrap();
    project.write_home_config(CONFIG).unwrap();
    project
        .command()
        .args(["render", "--name", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template 'missing' not found"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_invalid_config_toml() {
    let project = TestProject::new().unwrap();
    project.write_home_config("default_zone = [").unwrap();
    project
        .command()
        .args(["render", "{}", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_invalid_default_zone() {
    let project = TestProject::new().unwrap();
    project.write_home_config("default_zone = \"Mars\"").unwrap();
    project
        .command()
        .args(["render", "{}", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_zone"));
}
