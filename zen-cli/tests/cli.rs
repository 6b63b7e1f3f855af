use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn expand_prints_template_syntax() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.arg("expand").arg("p.a");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<p class=\"a\">$END$</p>"));
}

#[test]
fn expand_plain_text_output() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.arg("expand").arg("ul>li*2").arg("--format").arg("text");

    cmd.assert()
        .success()
        .stdout(predicate::eq("<ul>\n\t<li></li>\n\t<li></li>\n</ul>\n"));
}

#[test]
fn expand_in_haml_context() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.args(["--context", "haml", "expand", "p.a", "--format", "text"]);

    cmd.assert().success().stdout(predicate::eq("%p.a\n"));
}

#[test]
fn expand_json_reports_placeholders() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.args(["expand", "a[href]", "--format", "json"]);

    let output_pred = predicate::str::contains("\"placeholders\"")
        .and(predicate::str::contains("\"HREF\""))
        .and(predicate::str::contains("\"end_offset\""));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn invalid_abbreviation_fails() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.arg("expand").arg("div{x");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a valid abbreviation"));
}

#[test]
fn wrap_reads_stdin_line_by_line() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.args(["wrap", "ul>li*", "--format", "text"])
        .write_stdin("one\ntwo\n");

    let output_pred =
        predicate::str::contains("<li>one</li>").and(predicate::str::contains("<li>two</li>"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn wrap_reads_input_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "hello").expect("write temp file");

    let mut cmd = cargo_bin_cmd!("zen");
    cmd.args(["wrap", "p", "--format", "text", "--input"])
        .arg(file.path());

    cmd.assert().success().stdout(predicate::eq("<p>hello</p>\n"));
}

#[test]
fn tokens_are_listed() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.arg("tokens").arg("a>b");

    cmd.assert().success().stdout(predicate::str::contains(
        "<identifier:a><operator:>><identifier:b>",
    ));
}

#[test]
fn check_rejects_dangling_operator() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.arg("check").arg("ul>");

    cmd.assert().failure();
}

#[test]
fn check_accepts_valid_abbreviation() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.arg("check").arg("ul>li*3");

    cmd.assert().success().stdout(predicate::str::contains("ok"));
}

#[test]
fn list_shows_strategies() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.arg("list");

    let output_pred = predicate::str::contains("markup")
        .and(predicate::str::contains("haml"))
        .and(predicate::str::contains("|xsl"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn config_file_changes_indent() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(file, "[formatting]\nindent = \"  \"").expect("write temp file");

    let mut cmd = cargo_bin_cmd!("zen");
    cmd.args(["expand", "ul>li", "--format", "text", "--config"])
        .arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::eq("<ul>\n  <li></li>\n</ul>\n"));
}

#[test]
fn debug_logging_reports_dispatch_and_failure() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.env("ZEN_LOG", "debug").args(["check", "ul>"]);

    let output_pred = predicate::str::contains("dispatching command")
        .and(predicate::str::contains("command failed"));

    cmd.assert().failure().stderr(output_pred);
}

#[test]
fn default_logging_stays_quiet() {
    let mut cmd = cargo_bin_cmd!("zen");
    cmd.env_remove("ZEN_LOG").args(["check", "ul>li"]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("dispatching command").not());
}
