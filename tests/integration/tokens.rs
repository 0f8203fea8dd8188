use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_tokens_lists_each_token() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["tokens", r"a{?}{2,trim}\{}{.}"])
        .assert()
        .success()
        .stdout(concat!(
            "literal \"a\"\n",
            "conditional-open\n",
            "replacement {2,trim} escape=0 base=Position(2) operators=1\n",
            "replacement {} escape=1 base=Next operators=0\n",
            "conditional-close\n",
        ));
}

#[test]
fn test_tokens_shows_invalid_tokens_as_literals() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["tokens", "{[1,x]}"])
        .assert()
        .success()
        .stdout("literal \"{[1,x]}\"\n");
}

#[test]
fn test_tokens_from_file() {
    let project = TestProject::new().unwrap();
    let path = project.write_file("t.txt", "{now(HH)[EST]}").unwrap();
    project
        .command()
        .args(["tokens", "--file", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("base=Now operators=1"));
}

#[test]
fn test_tokens_of_empty_template() {
    let project = TestProject::new().unwrap();
    project.command().args(["tokens", ""]).assert().success().stdout("");
}
