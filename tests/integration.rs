use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_doxnorm")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout_json(assert: assert_cmd::assert::Assert) -> Value {
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(&output).unwrap()
}

fn names(entries: &Value) -> Vec<&str> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

// -- stdin mode --

#[test]
fn stdin_mode_animal() {
    let input = std::fs::read_to_string(fixture_path("animal.js")).unwrap();

    let assert = cmd()
        .args(["--name", "animal.js"])
        .write_stdin(input)
        .assert()
        .success();
    let entries = stdout_json(assert);

    assert_eq!(names(&entries), vec!["Animal", "speak", "reset", "createAnimal"]);

    let class = &entries[0];
    assert_eq!(class["uid"], "animal.js-animal");
    assert_eq!(class["type"], "class");
    assert_eq!(class["isAbstract"], false);
    assert_eq!(class["description"], "A living creature.");
    assert_eq!(class["extends"], "Mammal");
    assert_eq!(class["display"], "Animal(name, [sound, options])");
    assert_eq!(class["props"][0]["name"], "legs");
    assert_eq!(class["props"][0]["types"][0], "Number");

    let params = class["params"].as_array().unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params[0]["name"], "name");
    assert_eq!(params[0]["isOptional"], false);
    assert!(params[0].get("default").is_none());
    assert_eq!(params[1]["name"], "sound");
    assert_eq!(params[1]["default"], "bark");
    assert_eq!(params[2]["name"], "options");
    assert!(params[2].get("default").is_none());
    assert_eq!(params[2]["props"][0]["name"], "age");
    assert_eq!(params[2]["props"][1]["name"], "wild");
    assert_eq!(params[2]["props"][1]["default"], "false");

    let speak = &entries[1];
    assert_eq!(speak["uid"], "animal.js-speak");
    assert_eq!(speak["type"], "method");
    assert_eq!(speak["params"], "");
    assert_eq!(speak["tags"]["example"][0], "animal.speak();");
    assert_eq!(speak["tags"]["return"][0]["types"][0], "String");
    assert_eq!(speak["tags"]["return"][0]["description"], "The noise.");

    let reset = &entries[2];
    assert_eq!(reset["isPrivate"], true);
    assert_eq!(reset["description"], "");

    let create = &entries[3];
    assert_eq!(create["type"], "function");
    assert_eq!(create["isPrivate"], true);
    assert_eq!(create["params"], "name, [sound, legs]");
    assert_eq!(create["tags"]["param"][2]["name"], "legs");
    assert_eq!(create["tags"]["param"][2]["isOptional"], true);
    assert!(create["tags"]["param"][2].get("default").is_none());
    assert_eq!(create["tags"]["return"][0]["types"][0], "Animal");
}

#[test]
fn stdin_mode_default_name() {
    let assert = cmd()
        .write_stdin("/** Say hi. */\nfunction hi() {}\n")
        .assert()
        .success();
    let entries = stdout_json(assert);
    assert_eq!(entries[0]["uid"], "stdin.js-hi");
}

#[test]
fn stdin_mode_missing_class_fails() {
    let input = std::fs::read_to_string(fixture_path("orphan.js")).unwrap();

    cmd()
        .args(["--name", "orphan.js"])
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "cannot have constructor dox without class dox in orphan.js",
        ));
}

#[test]
fn stdin_mode_preparsed_records() {
    let input = std::fs::read_to_string(fixture_path("animal-records.json")).unwrap();

    let assert = cmd()
        .args(["--preparsed", "--name", "animal.js"])
        .write_stdin(input)
        .assert()
        .success();
    let entries = stdout_json(assert);

    assert_eq!(names(&entries), vec!["Animal", "speak"]);
    assert_eq!(entries[0]["display"], "Animal(name, [sound])");
    assert_eq!(entries[0]["extends"], "Mammal");
    assert_eq!(entries[0]["params"][1]["default"], "bark");
    assert_eq!(entries[1]["tags"]["return"][0]["description"], "The noise.");
}

#[test]
fn stdin_mode_invalid_records_fail() {
    cmd()
        .arg("--preparsed")
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid comment records"));
}

#[test]
fn stdin_mode_compact() {
    let assert = cmd()
        .arg("--compact")
        .write_stdin("/** Say hi. */\nfunction hi() {}\n")
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output.trim_end().lines().count(), 1);
}

// -- prototype-style sources --

#[test]
fn facade_class_and_constructor_in_one_block() {
    let input = std::fs::read_to_string(fixture_path("facade.js")).unwrap();

    let assert = cmd()
        .args(["--name", "facade.js"])
        .write_stdin(input)
        .assert()
        .success();
    let entries = stdout_json(assert);

    assert_eq!(names(&entries), vec!["Facade", "get", "TIMEOUT"]);

    let class = &entries[0];
    assert_eq!(class["isAbstract"], true);
    assert_eq!(class["display"], "Facade(url, [config])");
    assert!(class.get("extends").is_none());
    let props = class["params"][1]["props"].as_array().unwrap();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0]["name"], "timeout");
    assert_eq!(props[0]["default"], "30");
    assert_eq!(props[1]["name"], "retries");

    assert_eq!(entries[1]["type"], "method");
    assert_eq!(entries[1]["params"], "key, [done]");
    assert_eq!(entries[2]["type"], "property");
    assert_eq!(entries[2]["uid"], "facade.js-timeout");
}

#[test]
fn bang_blocks_are_ignored_with_single_star() {
    let input = std::fs::read_to_string(fixture_path("facade.js")).unwrap();

    let assert = cmd()
        .args(["--name", "facade.js", "--include-single-star"])
        .write_stdin(input)
        .assert()
        .success();
    let entries = stdout_json(assert);

    assert_eq!(names(&entries), vec!["Facade", "get", "TIMEOUT"]);
}

// -- file mode --

#[test]
fn file_mode_writes_per_file_json() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("animal.js"))
        .arg(fixture_path("facade.js"))
        .assert()
        .success();

    let animal: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("animal.json")).unwrap()).unwrap();
    assert_eq!(animal[0]["name"], "Animal");
    assert!(animal[0]["uid"].as_str().unwrap().ends_with("animal.js-animal"));

    assert!(dir.path().join("facade.json").exists());
}

#[test]
fn file_mode_prints_combined_document() {
    let assert = cmd()
        .arg(fixture_path("facade.js"))
        .arg(fixture_path("animal.js"))
        .assert()
        .success();
    let files = stdout_json(assert);

    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 2);
    // Sorted by path
    assert!(files[0]["name"].as_str().unwrap().ends_with("animal.js"));
    assert!(files[1]["name"].as_str().unwrap().ends_with("facade.js"));
    assert_eq!(files[1]["methods"][0]["name"], "Facade");
}

#[test]
fn file_mode_glob() {
    let pattern = format!("{}/tests/fixtures/a*.js", env!("CARGO_MANIFEST_DIR"));

    let assert = cmd().arg(pattern).assert().success();
    let files = stdout_json(assert);

    assert_eq!(files.as_array().unwrap().len(), 1);
    assert!(files[0]["name"].as_str().unwrap().ends_with("animal.js"));
}

#[test]
fn file_mode_preparsed_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::copy(
        fixture_path("animal-records.json"),
        dir.path().join("animal-records.json"),
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let assert = cmd()
        .arg("--preparsed")
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success();
    let files = stdout_json(assert);

    assert_eq!(files.as_array().unwrap().len(), 1);
    assert_eq!(files[0]["methods"][0]["display"], "Animal(name, [sound])");
}

#[test]
fn file_mode_missing_class_names_file() {
    cmd()
        .arg(fixture_path("animal.js"))
        .arg(fixture_path("orphan.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("orphan.js"))
        .stderr(predicate::str::contains("cannot have constructor dox without class dox"));
}

#[test]
fn file_mode_no_match_is_empty() {
    let pattern = format!("{}/tests/fixtures/*.nothing", env!("CARGO_MANIFEST_DIR"));

    let assert = cmd().arg(pattern).assert().success();
    let files = stdout_json(assert);
    assert_eq!(files, serde_json::json!([]));
}

#[test]
fn file_mode_colliding_outputs_fail() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::create_dir(src.path().join("a")).unwrap();
    std::fs::create_dir(src.path().join("b")).unwrap();
    let doc = "/** Say hi. */\nfunction hi() {}\n";
    std::fs::write(src.path().join("a/index.js"), doc).unwrap();
    std::fs::write(src.path().join("b/index.js"), doc).unwrap();

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .arg(src.path().join("a/index.js"))
        .arg(src.path().join("b/index.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("index.json"));

    assert!(!out.path().join("index.json").exists());
}

#[test]
fn file_mode_glob_filters_by_mode() {
    let pattern = format!("{}/tests/fixtures/*", env!("CARGO_MANIFEST_DIR"));

    let assert = cmd().arg("--preparsed").arg(&pattern).assert().success();
    let files = stdout_json(assert);
    assert_eq!(files.as_array().unwrap().len(), 1);
    assert!(files[0]["name"].as_str().unwrap().ends_with("animal-records.json"));

    cmd()
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("orphan.js"));
}
