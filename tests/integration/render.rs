use predicates::prelude::*;

use crate::common::{FIXTURE_MILLIS, TestProject};

#[test]
fn test_render_positional_params() {
    let project = TestProject::new().unwrap();
    project.render(&["a{}b{}c", "0", "1"]).assert().success().stdout("a0b1c\n");
}

#[test]
fn test_render_missing_and_extra_params() {
    let project = TestProject::new().unwrap();
    project.render(&["[{}][{}]", "x"]).assert().success().stdout("[x][]\n");
    project.render(&["[{}]", "x", "y", "z"]).assert().success().stdout("[x]\n");
}

#[test]
fn test_render_operators() {
    let project = TestProject::new().unwrap();
    project.render(&["{[4,8]}|{1,[4:4]}|{1,[4,-2]}", "hamburger"])
        .assert()
        .success()
        .stdout("urge|urge|urge\n");
    project.render(&["{trim,upper,urlencode}", "  a b&c  "])
        .assert()
        .success()
        .stdout("A+B%26C\n");
    project.render(&["{[/(\\w+)@/1]}", "joe@example.com"]).assert().success().stdout("joe\n");
}

#[test]
fn test_render_typed_params() {
    let project = TestProject::new().unwrap();
    project.render(&["{%05.1f} {%x} [{}]", "float:3.14159", "int:255", "null:"])
        .assert()
        .success()
        .stdout("003.1 ff []\n");

    let millis = format!("millis:{FIXTURE_MILLIS}");
    project.render(&["{date(yyyy-MM-dd HH:mm)}", &millis])
        .assert()
        .success()
        .stdout("2020-05-05 16:52\n");
    project.render(&["{date(HH:mm)[EST]}", "instant:2020-05-05T16:52:02Z"])
        .assert()
        .success()
        .stdout("11:52\n");
}

#[test]
fn test_render_json_params() {
    let project = TestProject::new().unwrap();
    project.render(&["{}|{%03d}|{%.2f}|{}|{}", "--json", r#"["x", 7, 2.5, null, false]"#])
        .assert()
        .success()
        .stdout("x|007|2.50||false\n");
}

#[test]
fn test_render_conditional_blocks() {
    let project = TestProject::new().unwrap();
    let template = "?a=b{?}&c={}{?}&e={}";
    project.render(&[template, "d", "f"]).assert().success().stdout("?a=b&c=d&e=f\n");
    project.render(&[template, "", "f"]).assert().success().stdout("?a=b&e=f\n");
    project.render(&[template, "d", ""]).assert().success().stdout("?a=b&c=d\n");
}

#[test]
fn test_render_escapes() {
    let project = TestProject::new().unwrap();
    project.render(&[r"a\{}b", "0"]).assert().success().stdout("a{}b\n");
    project.render(&[r"a\\{}b", "0"]).assert().success().stdout("a\\0b\n");
    project.render(&["{nope}{}", "x"]).assert().success().stdout("{nope}x\n");
}

#[test]
fn test_render_from_file() {
    let project = TestProject::new().unwrap();
    let path = project.write_file("greeting.txt", "Hello, {}!").unwrap();
    project.render(&["--file", path.to_str().unwrap(), "world"])
        .assert()
        .success()
        .stdout("Hello, world!\n");
}

#[test]
fn test_render_from_stdin() {
    let project = TestProject::new().unwrap();
    project.render(&["--file", "-", "--no-newline", "x"])
        .write_stdin("<{upper}>")
        .assert()
        .success()
        .stdout("<X>");
}

#[test]
fn test_render_now_uses_requested_zone() {
    let project = TestProject::new().unwrap();
    project.render(&["{now(yyyy)}"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d{4}\n$").unwrap());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let project = TestProject::new().unwrap();
    project.command()
        .args(["--verbose", "render", "{}", "x"])
        .assert()
        .success()
        .stdout("x\n")
        .stderr(predicate::str::contains("expanding template"));
}

#[test]
fn test_quiet_output_is_only_the_result() {
    let project = TestProject::new().unwrap();
    project.command()
        .args(["--quiet", "render", "{}", "x"])
        .assert()
        .success()
        .stdout("x\n")
        .stderr(predicate::str::is_empty());
}
