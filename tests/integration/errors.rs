use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_format_mismatch_reports_error() {
    let project = TestProject::new().unwrap();
    project
        .render(&["{%d}", "abc"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "error: Format specifier '%d' cannot be applied to a text value",
        ))
        .stderr(predicate::str::contains("suggestion:"));
}

#[test]
fn test_engine_errors() {
    let project = TestProject::new().unwrap();
    let cases = [
        (&["{1,[{}]}", "x"][..], "Invalid integer 'x'"),
        (&["{urldecode}", "100%"][..], "Malformed percent-encoding"),
        (&["{[/(/]}", "x"][..], "Invalid regular expression"),
        (&["{date(x)[Mars]}", "int:0"][..], "Unknown time zone 'Mars'"),
        (&["{date(bbb)}", "int:0"][..], "Invalid date pattern"),
        (&["{%-d}", "int:1"][..], "Invalid format specifier"),
    ];
    for (args, message) in cases {
        project.render(args).assert().failure().stderr(predicate::str::contains(message));
    }
}

#[test]
fn test_base64_decode_is_lenient() {
    let project = TestProject::new().unwrap();
    project
        .render(&["[{b64decode}]", "cats and dogs"])
        .assert()
        .success()
        .stdout("[cats and dogs]\n");
}

#[test]
fn test_invalid_parameters() {
    let project = TestProject::new().unwrap();
    project
        .render(&["{}", "int:four"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameter 'int:four'"));
    project
        .render(&["{}", "--json", "{\"a\": 1}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a JSON array"));
    project
        .render(&["{}", "--json", "[1,"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameter '--json'"));
}

#[test]
fn test_missing_template_file() {
    let project = TestProject::new().unwrap();
    project
        .render(&["--file", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read template file"))
        .stderr(predicate::str::contains("Check that the template file exists"));
}

#[test]
fn test_no_template() {
    let project = TestProject::new().unwrap();
    project
        .render(&[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No template given"));
}

#[test]
fn test_usage_errors() {
    let project = TestProject::new().unwrap();
    project.command().assert().failure();
    project.command().args(["render", "-f", "a", "-n", "b"]).assert().failure();
}
