use crate::cli::{ConflictCommands, RetargetModeArg};
use crate::support::{mutate_or_exit, print_json};
use schedconf_store::{Configuration, RetargetMode};
use serde_json::json;

pub fn run(command: ConflictCommands) {
    match command {
        ConflictCommands::Add { a, b, config, json } => run_add(a, b, config, json),
        ConflictCommands::Remove {
            a,
            b,
            section_a,
            section_b,
            config,
            json,
        } => run_remove(a, b, section_a, section_b, config, json),
        ConflictCommands::Modify {
            a,
            b,
            c,
            mode,
            config,
            json,
        } => run_modify(a, b, c, map_mode(mode), config, json),
    }
}

fn conflicts_of(config: &Configuration, course_id: &str) -> Vec<Vec<String>> {
    config
        .sections_of(course_id)
        .map(|(_, section)| section.conflicts.iter().map(str::to_string).collect())
        .collect()
}

fn run_add(a: String, b: String, config: String, json_output: bool) {
    let ((), updated, path) = mutate_or_exit(&config, "add conflict", |c| c.add_conflict(&a, &b));

    if json_output {
        print_json(&json!({
            "action": "conflict.add",
            "configPath": path.display().to_string(),
            "a": a,
            "b": b,
            "conflicts": {
                (a.as_str()): conflicts_of(&updated, &a),
                (b.as_str()): conflicts_of(&updated, &b),
            },
        }));
    } else {
        println!(
            "schedconf conflict add\n  Added: {} <-> {}\n  Path: {}",
            a,
            b,
            path.display()
        );
    }
}

fn run_remove(
    a: String,
    b: String,
    section_a: usize,
    section_b: usize,
    config: String,
    json_output: bool,
) {
    let ((), _, path) = mutate_or_exit(&config, "remove conflict", |c| {
        c.remove_conflict(&a, &b, section_a, section_b)
    });

    if json_output {
        print_json(&json!({
            "action": "conflict.remove",
            "configPath": path.display().to_string(),
            "a": a,
            "b": b,
            "sectionA": section_a,
            "sectionB": section_b,
        }));
    } else {
        println!(
            "schedconf conflict remove\n  Removed: {} #{} <-> {} #{}\n  Path: {}",
            a,
            section_a,
            b,
            section_b,
            path.display()
        );
    }
}

fn run_modify(
    a: String,
    b: String,
    c: String,
    mode: RetargetMode,
    config: String,
    json_output: bool,
) {
    let ((), _, path) = mutate_or_exit(&config, "modify conflict", |config| {
        config.retarget_conflict(&a, &b, &c, mode)
    });
    let (first, second) = match mode {
        RetargetMode::ReplaceFirst => (c.as_str(), b.as_str()),
        RetargetMode::ReplaceSecond => (a.as_str(), c.as_str()),
    };

    if json_output {
        print_json(&json!({
            "action": "conflict.modify",
            "configPath": path.display().to_string(),
            "from": [a, b],
            "to": [first, second],
        }));
    } else {
        println!(
            "schedconf conflict modify\n  Replaced: {} <-> {}\n  With: {} <-> {}\n  Path: {}",
            a,
            b,
            first,
            second,
            path.display()
        );
    }
}

fn map_mode(arg: RetargetModeArg) -> RetargetMode {
    match arg {
        RetargetModeArg::ReplaceFirst => RetargetMode::ReplaceFirst,
        RetargetModeArg::ReplaceSecond => RetargetMode::ReplaceSecond,
    }
}
