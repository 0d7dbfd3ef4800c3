use std::path::Path;
use std::process::Command;

fn cfgcheck() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cfgcheck"))
}

const DUMP: &str = r#"begin_compilation
  name "int Main.run()"
  method "int Main.run()"
  date 1700000000
end_compilation
begin_cfg
  name "constant_folding (after)"
  block_0
    v1 IntConstant 11
    v2 Return v1
end_cfg
begin_cfg
  name "dead_code_elimination (after)"
  block_0
    v2 Return v1
end_cfg
"#;

const PASSING_SOURCE: &str = r#"public class Main {
  // CHECK-START: int Main.run() constant_folding (after)
  // CHECK: [[C:v[0-9]+]] IntConstant {{11|22}}
  // CHECK: Return [[C]]
  int run() { return 11; }
}
"#;

const FAILING_SOURCE: &str = r#"public class Main {
  // CHECK-START: int Main.run() constant_folding (after)
  // CHECK: IntConstant 42
  int run() { return 11; }
}
"#;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

// --- checking ---

#[test]
fn passing_assertions_exit_zero() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(dir.path(), "Main.java", PASSING_SOURCE);

    let output = cfgcheck().args([&dump, &source]).output().unwrap();
    assert!(output.status.success(), "expected success: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("TEST int Main.run() constant_folding (after)... PASSED"),
        "expected progress line, got: {stdout}"
    );
}

#[test]
fn failing_assertion_exits_nonzero_with_diagnostic() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(dir.path(), "Main.java", FAILING_SOURCE);

    let output = cfgcheck().args([&dump, &source]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[cfgcheck] error") && stderr.contains("could not match"),
        "expected match diagnostic on stderr, got: {stderr}"
    );
    assert!(
        stderr.contains("Main.java:3"),
        "expected file:line context, got: {stderr}"
    );
}

#[test]
fn failing_case_reports_failed_on_stdout() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(dir.path(), "Main.java", FAILING_SOURCE);

    let output = cfgcheck().args([&dump, &source]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("TEST int Main.run() constant_folding (after)... FAILED!"),
        "expected FAILED! progress line on stdout, got: {stdout}"
    );
}

#[test]
fn quiet_suppresses_progress_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(dir.path(), "Main.java", PASSING_SOURCE);

    let output = cfgcheck().args(["--quiet", &dump, &source]).output().unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    // The FAILED! announcement is suppressed too; only stderr reports.
    let failing = write(dir.path(), "Failing.java", FAILING_SOURCE);
    let output = cfgcheck().args(["--quiet", &dump, &failing]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_pass_group_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(
        dir.path(),
        "Main.java",
        "// CHECK-START: int Main.run() no_such_pass\n// CHECK: foo\n",
    );

    let output = cfgcheck().args([&dump, &source]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no_such_pass") && stderr.contains("not found"),
        "expected missing-group diagnostic, got: {stderr}"
    );
}

#[test]
fn not_assertion_violation_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(
        dir.path(),
        "Main.java",
        "// CHECK-START: int Main.run() constant_folding (after)\n// CHECK-NOT: IntConstant\n",
    );

    let output = cfgcheck().args([&dump, &source]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("forbidden"),
        "expected forbidden-match diagnostic, got: {stderr}"
    );
}

#[test]
fn custom_check_prefix() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(
        dir.path(),
        "Main.java",
        "// MYTEST-START: int Main.run() constant_folding (after)\n// MYTEST: IntConstant 11\n",
    );

    let output = cfgcheck()
        .args(["--check-prefix", "MYTEST", &dump, &source])
        .output()
        .unwrap();
    assert!(output.status.success(), "expected success: {output:?}");
}

#[test]
fn assertion_before_start_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let source = write(dir.path(), "Main.java", "// CHECK: IntConstant 11\n");

    let output = cfgcheck().args([&dump, &source]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Main.java:1"),
        "expected file:line context, got: {stderr}"
    );
}

// --- directory discovery ---

#[test]
fn directory_source_checks_every_java_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);

    let src_dir = dir.path().join("tests");
    std::fs::create_dir_all(src_dir.join("nested")).unwrap();
    write(&src_dir, "A.java", PASSING_SOURCE);
    write(&src_dir.join("nested"), "B.java", PASSING_SOURCE);
    // Non-java files are ignored even if they carry directives.
    write(&src_dir, "ignored.txt", FAILING_SOURCE);

    let output = cfgcheck()
        .args([&dump, &src_dir.display().to_string()])
        .output()
        .unwrap();
    assert!(output.status.success(), "expected success: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("PASSED").count(), 2, "got: {stdout}");
}

#[test]
fn directory_without_java_files_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);
    let src_dir = dir.path().join("empty");
    std::fs::create_dir_all(&src_dir).unwrap();

    let output = cfgcheck()
        .args([&dump, &src_dir.display().to_string()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no assertion files"),
        "expected discovery error, got: {stderr}"
    );
}

// --- listing modes ---

#[test]
fn list_groups_prints_composite_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);

    let output = cfgcheck().args(["--list-groups", &dump]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        vec![
            "int Main.run() constant_folding (after)",
            "int Main.run() dead_code_elimination (after)",
        ]
    );
}

#[test]
fn dump_group_prints_the_body() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);

    let output = cfgcheck()
        .args(["--dump-group", "int Main.run() dead_code_elimination (after)", &dump])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "block_0\nv2 Return v1");
}

#[test]
fn dump_group_unknown_name_exits_nonzero() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);

    let output = cfgcheck()
        .args(["--dump-group", "nope", &dump])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("\"nope\" not found"),
        "expected missing-group error, got: {stderr}"
    );
}

// --- input errors ---

#[test]
fn missing_dump_file_is_an_error() {
    let output = cfgcheck()
        .args(["/nonexistent/art.cfg", "/nonexistent/Main.java"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to read dump file"),
        "expected read error, got: {stderr}"
    );
}

#[test]
fn missing_source_argument_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", DUMP);

    let output = cfgcheck().args([&dump]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing source"),
        "expected missing-source error, got: {stderr}"
    );
}

#[test]
fn malformed_dump_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let dump = write(dir.path(), "art.cfg", "stray line\n");
    let source = write(dir.path(), "Main.java", PASSING_SOURCE);

    let output = cfgcheck().args([&dump, &source]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("art.cfg:1"),
        "expected file:line context, got: {stderr}"
    );
}
