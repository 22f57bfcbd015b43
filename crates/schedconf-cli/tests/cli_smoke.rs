use schedconf_store::config_lock_path;
use serde_json::{Value, json};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "schedconf-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_schedconf<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_schedconf");
    Command::new(bin)
        .args(args)
        .output()
        .expect("schedconf command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).expect("config should be readable");
    serde_json::from_str(&text).expect("config should be JSON")
}

fn write_sample_config(path: &Path) {
    let payload = json!({
        "config": {
            "rooms": ["Roddy 136", "Roddy 140"],
            "labs": ["Linux", "Mac"],
            "courses": [
                {
                    "course_id": "CMSC 140",
                    "credits": 4,
                    "room": ["Roddy 136"],
                    "lab": ["Linux"],
                    "faculty": ["Kunkle"],
                    "conflicts": []
                },
                {
                    "course_id": "CMSC 161",
                    "credits": 4,
                    "room": ["Roddy 140"],
                    "lab": ["Linux", "Mac"],
                    "faculty": ["Kunkle", "Hobbs"],
                    "conflicts": []
                },
                {
                    "course_id": "CMSC 170",
                    "credits": 3,
                    "room": ["Roddy 136"],
                    "lab": [],
                    "faculty": ["Hobbs"],
                    "conflicts": []
                }
            ],
            "faculty": [
                {
                    "name": "Kunkle",
                    "maximum_credits": 12,
                    "minimum_credits": 4,
                    "unique_course_limit": 3,
                    "times": { "MON": ["09:00-17:00"] },
                    "lab_preferences": { "Linux": 9 }
                },
                {
                    "name": "Hobbs",
                    "maximum_credits": 10,
                    "minimum_credits": 0,
                    "unique_course_limit": 2
                }
            ]
        },
        "limit": 10,
        "time_slot_config": { "MWF": [{ "start": "08:00", "spacing": 60 }] }
    });
    fs::write(
        path,
        serde_json::to_string_pretty(&payload).expect("sample should serialize"),
    )
    .expect("sample config should be written");
}

fn config_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn init_creates_file_and_refuses_to_overwrite() {
    let tmp = TempDirGuard::new("init");
    let path = tmp.path().join("schedconf.json");
    let config = config_arg(&path);

    let output = run_schedconf(["init", "--config", config.as_str(), "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["action"], "init");
    assert_eq!(payload["limit"], 10);
    assert_eq!(read_json(&path)["config"]["rooms"], json!([]));

    let output = run_schedconf(["init", "--config", config.as_str()]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("already exists"));
}

#[test]
fn room_add_and_list_round_trip_through_file() {
    let tmp = TempDirGuard::new("room-add");
    let path = tmp.path().join("schedconf.json");
    let config = config_arg(&path);
    assert_success(&run_schedconf(["init", "--config", config.as_str()]));

    let output = run_schedconf(["room", "add", "Roddy 136", "--config", config.as_str()]);
    assert_success(&output);
    assert!(stdout_text(&output).contains("Added: Roddy 136"));

    let output = run_schedconf(["room", "list", "--config", config.as_str(), "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["action"], "room.list");
    assert_eq!(payload["items"], json!(["Roddy 136"]));

    let output = run_schedconf(["room", "add", "Roddy 136", "--config", config.as_str()]);
    assert_failure(&output);
    assert!(!config_lock_path(&path).exists());
}

#[test]
fn lab_delete_scrubs_courses_and_preferences() {
    let tmp = TempDirGuard::new("lab-delete");
    let path = tmp.path().join("schedconf.json");
    write_sample_config(&path);
    let config = config_arg(&path);

    let output = run_schedconf(["lab", "delete", "Linux", "--config", config.as_str(), "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["action"], "lab.delete");
    assert_eq!(payload["cascade"]["coursesTouched"], 2);
    assert_eq!(payload["cascade"]["facultyTouched"], 1);

    let persisted = read_json(&path);
    assert_eq!(persisted["config"]["labs"], json!(["Mac"]));
    assert_eq!(persisted["config"]["courses"][0]["lab"], json!([]));
    assert_eq!(persisted["config"]["courses"][1]["lab"], json!(["Mac"]));
    assert!(
        persisted["config"]["faculty"][0]
            .get("lab_preferences")
            .and_then(Value::as_object)
            .is_none_or(|prefs| prefs.is_empty())
    );
    assert_eq!(persisted["time_slot_config"]["MWF"][0]["spacing"], 60);
}

#[test]
fn course_add_with_unknown_room_is_rejected_and_file_untouched() {
    let tmp = TempDirGuard::new("unknown-room");
    let path = tmp.path().join("schedconf.json");
    write_sample_config(&path);
    let before = fs::read(&path).expect("sample should exist");
    let config = config_arg(&path);

    let output = run_schedconf([
        "course",
        "add",
        "CMSC 250",
        "--credits",
        "3",
        "--room",
        "Roddy 999",
        "--config",
        config.as_str(),
    ]);
    assert_failure(&output);
    let stderr = stderr_text(&output);
    assert!(stderr.contains("error: failed to add course"));
    assert!(stderr.contains("course.room.unknown"));
    assert_eq!(fs::read(&path).expect("file should remain"), before);
    assert!(!config_lock_path(&path).exists());
}

#[test]
fn conflict_add_then_modify_keeps_edges_symmetric() {
    let tmp = TempDirGuard::new("conflict");
    let path = tmp.path().join("schedconf.json");
    write_sample_config(&path);
    let config = config_arg(&path);

    let output = run_schedconf([
        "conflict",
        "add",
        "CMSC 140",
        "CMSC 161",
        "--config",
        config.as_str(),
        "--json",
    ]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["conflicts"]["CMSC 140"], json!([["CMSC 161"]]));
    assert_eq!(payload["conflicts"]["CMSC 161"], json!([["CMSC 140"]]));

    let output = run_schedconf([
        "conflict",
        "modify",
        "CMSC 140",
        "CMSC 161",
        "CMSC 170",
        "--mode",
        "replace-second",
        "--config",
        config.as_str(),
    ]);
    assert_success(&output);
    assert!(stdout_text(&output).contains("With: CMSC 140 <-> CMSC 170"));

    let courses = &read_json(&path)["config"]["courses"];
    assert_eq!(courses[0]["conflicts"], json!(["CMSC 170"]));
    assert_eq!(courses[1]["conflicts"], json!([]));
    assert_eq!(courses[2]["conflicts"], json!(["CMSC 140"]));

    let output = run_schedconf(["check", "--config", config.as_str()]);
    assert_success(&output);
    assert!(stdout_text(&output).contains("[config-check] OK"));
}

#[test]
fn faculty_rename_rewrites_course_listings() {
    let tmp = TempDirGuard::new("faculty-rename");
    let path = tmp.path().join("schedconf.json");
    write_sample_config(&path);
    let config = config_arg(&path);

    let output = run_schedconf([
        "faculty",
        "rename",
        "kunkle",
        "Kunkel",
        "--config",
        config.as_str(),
        "--json",
    ]);
    assert_success(&output);
    assert_eq!(parse_json_stdout(&output)["cascade"]["coursesTouched"], 2);

    let courses = &read_json(&path)["config"]["courses"];
    assert_eq!(courses[0]["faculty"], json!(["Kunkel"]));
    assert_eq!(courses[1]["faculty"], json!(["Kunkel", "Hobbs"]));
}

#[test]
fn faculty_times_and_preferences_are_persisted() {
    let tmp = TempDirGuard::new("faculty-times");
    let path = tmp.path().join("schedconf.json");
    write_sample_config(&path);
    let config = config_arg(&path);

    assert_success(&run_schedconf([
        "faculty",
        "set-times",
        "Hobbs",
        "tue",
        "13:00-15:00",
        "09:00-11:00",
        "--config",
        config.as_str(),
    ]));
    assert_success(&run_schedconf([
        "faculty",
        "prefer",
        "Hobbs",
        "room",
        "Roddy 140",
        "7",
        "--config",
        config.as_str(),
    ]));

    let hobbs = &read_json(&path)["config"]["faculty"][1];
    assert_eq!(hobbs["times"]["TUE"], json!(["09:00-11:00", "13:00-15:00"]));
    assert_eq!(hobbs["room_preferences"]["Roddy 140"], 7);

    let output = run_schedconf([
        "faculty",
        "prefer",
        "Hobbs",
        "room",
        "Roddy 140",
        "11",
        "--config",
        config.as_str(),
    ]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("faculty.preference.range"));
}

#[test]
fn faculty_delete_repairs_duplicate_listing() {
    let tmp = TempDirGuard::new("repair");
    let path = tmp.path().join("schedconf.json");
    let payload = json!({
        "config": {
            "rooms": ["Roddy 136"],
            "courses": [
                {
                    "course_id": "CMSC 140",
                    "credits": 4,
                    "room": ["Roddy 136"],
                    "faculty": ["Kunkle", "Hobbs", "Kunkle"]
                }
            ],
            "faculty": [
                { "name": "Kunkle", "maximum_credits": 12, "minimum_credits": 0, "unique_course_limit": 3 },
                { "name": "Hobbs", "maximum_credits": 12, "minimum_credits": 0, "unique_course_limit": 3 }
            ]
        }
    });
    fs::write(&path, payload.to_string()).expect("fixture should write");
    let config = config_arg(&path);

    let output = run_schedconf(["check", "--config", config.as_str()]);
    assert_failure(&output);
    assert!(stdout_text(&output).contains("course.reference.duplicate"));

    let output = run_schedconf(["faculty", "delete", "Kunkle", "--config", config.as_str(), "--json"]);
    assert_success(&output);
    assert_eq!(parse_json_stdout(&output)["cascade"]["coursesTouched"], 1);

    let persisted = read_json(&path);
    assert_eq!(persisted["config"]["courses"][0]["faculty"], json!(["Hobbs"]));
    assert_eq!(persisted["config"]["faculty"].as_array().map(Vec::len), Some(1));
    assert_success(&run_schedconf(["check", "--config", config.as_str()]));
    assert!(!config_lock_path(&path).exists());
}

#[test]
fn check_reports_failure_classes_for_malformed_file() {
    let tmp = TempDirGuard::new("check");
    let path = tmp.path().join("schedconf.json");
    let payload = json!({
        "config": {
            "rooms": ["Roddy 136"],
            "courses": [
                { "course_id": "CMSC 140", "credits": 4, "room": ["Roddy 999"] }
            ]
        }
    });
    fs::write(&path, payload.to_string()).expect("fixture should write");

    let output = run_schedconf(["check", "--config", config_arg(&path).as_str(), "--json"]);
    assert_failure(&output);
    let report = parse_json_stdout(&output);
    assert_eq!(report["action"], "check");
    assert_eq!(report["result"], "rejected");
    assert_eq!(report["failureClasses"], json!(["course.room.unknown"]));
}

#[test]
fn held_lock_blocks_mutation() {
    let tmp = TempDirGuard::new("lock");
    let path = tmp.path().join("schedconf.json");
    write_sample_config(&path);
    let before = fs::read(&path).expect("sample should exist");
    let lock = config_lock_path(&path);
    fs::write(&lock, "pid=0\n").expect("lock fixture should write");

    let output = run_schedconf(["room", "add", "Roddy 150", "--config", config_arg(&path).as_str()]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("lock busy"));
    assert_eq!(fs::read(&path).expect("file should remain"), before);
    assert!(lock.exists());
}
