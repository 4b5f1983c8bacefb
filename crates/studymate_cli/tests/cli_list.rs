use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};
use time::{Duration, OffsetDateTime, UtcOffset};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("studymate-{nanos}-{file_name}"))
}

fn local_dates() -> (String, String, String) {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let today = OffsetDateTime::now_utc().to_offset(offset).date();
    (
        (today - Duration::days(1)).to_string(),
        today.to_string(),
        (today + Duration::days(1)).to_string(),
    )
}

fn seed_store(store_path: &Path, tasks: serde_json::Value) {
    let content = serde_json::json!({
        "schema_version": 1,
        "entries": { "tasks": serde_json::to_string(&tasks).unwrap() }
    });
    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn seed_sample(store_path: &Path) {
    let (yesterday, today, tomorrow) = local_dates();
    seed_store(
        store_path,
        serde_json::json!([
            {
                "id": "1",
                "title": "Read chapter 3",
                "dueDate": today,
                "priority": "Low",
                "completed": false,
                "subject": "Physics",
                "color": "#FFC107"
            },
            {
                "id": "2",
                "title": "Essay draft",
                "dueDate": tomorrow,
                "priority": "High",
                "completed": false,
                "subject": "English",
                "color": "#03A9F4"
            },
            {
                "id": "3",
                "title": "Read poems",
                "dueDate": yesterday,
                "priority": "High",
                "completed": true,
                "subject": "English",
                "color": "#00BCD4"
            }
        ]),
    );
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_studymate"))
        .args(args)
        .env("STUDYMATE_STORE_PATH", store_path)
        .env("STUDYMATE_CONFIG_PATH", store_path.with_extension("config.json"))
        .env("STUDYMATE_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run studymate")
}

fn listed_ids(output: &Output) -> Vec<String> {
    assert!(
        output.status.success(),
        "list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let tasks: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    tasks
        .iter()
        .map(|task| task["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn list_plain_text_shows_all_tasks() {
    let store_path = temp_path("cli-list-plain.json");
    seed_sample(&store_path);

    let output = run(&store_path, &["list"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Read chapter 3"));
    assert!(stdout.contains("Essay draft"));
    assert!(stdout.contains("Read poems"));
}

#[test]
fn list_combines_filters() {
    let store_path = temp_path("cli-list-filters.json");
    seed_sample(&store_path);

    let incomplete = run(&store_path, &["list", "--status", "incomplete", "--json"]);
    let english_high = run(
        &store_path,
        &["list", "--subject", "english", "--priority", "high", "--json"],
    );
    let searched = run(&store_path, &["list", "--search", "READ", "--json"]);
    let upcoming = run(&store_path, &["list", "--date", "upcoming", "--json"]);
    let past = run(&store_path, &["list", "--date", "past", "--json"]);
    let nothing = run(
        &store_path,
        &["list", "--date", "today", "--status", "completed", "--json"],
    );
    std::fs::remove_file(&store_path).ok();

    assert_eq!(listed_ids(&incomplete), ["1", "2"]);
    assert_eq!(listed_ids(&english_high), ["2", "3"]);
    assert_eq!(listed_ids(&searched), ["1", "3"]);
    assert_eq!(listed_ids(&upcoming), ["2"]);
    assert_eq!(listed_ids(&past), ["3"]);
    assert!(listed_ids(&nothing).is_empty());
}

#[test]
fn list_sorts_by_key() {
    let store_path = temp_path("cli-list-sort.json");
    seed_sample(&store_path);

    let by_priority = run(&store_path, &["list", "--sort", "priority", "--json"]);
    let by_due = run(&store_path, &["list", "--sort", "due-date", "--json"]);
    let by_color = run(&store_path, &["list", "--sort", "color", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert_eq!(listed_ids(&by_priority), ["2", "3", "1"]);
    assert_eq!(listed_ids(&by_due), ["3", "1", "2"]);
    assert_eq!(listed_ids(&by_color), ["3", "2", "1"]);
}

#[test]
fn list_groups_by_due_date() {
    let store_path = temp_path("cli-list-group.json");
    seed_sample(&store_path);
    let (yesterday, today, tomorrow) = local_dates();

    let output = run(&store_path, &["list", "--group", "chronological", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let groups: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let dates: Vec<&str> = groups
        .iter()
        .map(|group| group["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, [yesterday.as_str(), today.as_str(), tomorrow.as_str()]);
    assert_eq!(groups[0]["tasks"][0]["id"], "3");
}

#[test]
fn list_on_missing_store_is_empty() {
    let store_path = temp_path("cli-list-missing.json");

    let output = run(&store_path, &["list", "--json"]);

    assert!(listed_ids(&output).is_empty());
    assert!(!store_path.exists());
}

#[test]
fn subjects_marks_the_ones_in_use() {
    let store_path = temp_path("cli-subjects.json");
    seed_sample(&store_path);

    let output = run(&store_path, &["subjects", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["in_use"], serde_json::json!(["Physics", "English"]));
    assert_eq!(payload["catalog"].as_array().unwrap().len(), 11);
    assert_eq!(payload["palette"].as_array().unwrap().len(), 15);
    assert_eq!(payload["palette"][0], payload["catalog"][0]["color"]);
}

#[test]
fn subjects_plain_text_lists_palette() {
    let store_path = temp_path("cli-subjects-plain.json");

    let output = run(&store_path, &["subjects"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Colors"));
    assert!(stdout.contains("#F44336"));
}

#[test]
fn list_subject_all_sentinel_ignores_case() {
    let store_path = temp_path("cli-list-subject-all.json");
    seed_sample(&store_path);

    let capitalised = run(&store_path, &["list", "--subject", "All", "--json"]);
    let padded = run(&store_path, &["list", "--subject", " ALL ", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert_eq!(listed_ids(&capitalised), ["1", "2", "3"]);
    assert_eq!(listed_ids(&padded), ["1", "2", "3"]);
}
