use crate::cli::{FacultyCommands, PreferenceKindArg};
use crate::support::{join_or_dash, load_config_or_exit, mutate_or_exit, print_json};
use schedconf_store::{
    DEFAULT_MAXIMUM_DAYS, Day, Faculty, FacultyLimits, PreferenceKind, TimeRange,
};
use serde_json::json;

pub fn run(command: FacultyCommands) {
    match command {
        FacultyCommands::Add {
            name,
            max_credits,
            min_credits,
            unique_course_limit,
            max_days,
            config,
            json,
        } => {
            let mut faculty = Faculty::new(name, max_credits, min_credits, unique_course_limit);
            faculty.maximum_days = max_days.unwrap_or(DEFAULT_MAXIMUM_DAYS);
            run_add(faculty, config, json)
        }
        FacultyCommands::Delete { name, config, json } => run_delete(name, config, json),
        FacultyCommands::Rename {
            old,
            new,
            config,
            json,
        } => run_rename(old, new, config, json),
        FacultyCommands::SetLimits {
            name,
            max_credits,
            min_credits,
            unique_course_limit,
            max_days,
            config,
            json,
        } => run_set_limits(
            name,
            FacultyLimits {
                maximum_credits: max_credits,
                minimum_credits: min_credits,
                unique_course_limit,
                maximum_days: max_days,
            },
            config,
            json,
        ),
        FacultyCommands::SetTimes {
            name,
            day,
            ranges,
            config,
            json,
        } => run_set_times(name, day, ranges, config, json),
        FacultyCommands::Prefer {
            name,
            kind,
            key,
            weight,
            config,
            json,
        } => run_prefer(name, map_preference_kind(kind), key, Some(weight), config, json),
        FacultyCommands::Unprefer {
            name,
            kind,
            key,
            config,
            json,
        } => run_prefer(name, map_preference_kind(kind), key, None, config, json),
        FacultyCommands::List { config, json } => run_list(config, json),
    }
}

fn run_add(faculty: Faculty, config: String, json_output: bool) {
    let name = faculty.name.clone();
    let ((), _, path) = mutate_or_exit(&config, "add faculty", |c| c.add_faculty(faculty));

    if json_output {
        print_json(&json!({
            "action": "faculty.add",
            "configPath": path.display().to_string(),
            "name": name,
        }));
    } else {
        println!(
            "schedconf faculty add\n  Added: {}\n  Path: {}",
            name,
            path.display()
        );
    }
}

fn run_delete(name: String, config: String, json_output: bool) {
    let (report, _, path) =
        mutate_or_exit(&config, "delete faculty", |c| c.delete_faculty(&name));

    if json_output {
        print_json(&json!({
            "action": "faculty.delete",
            "configPath": path.display().to_string(),
            "name": name,
            "cascade": {
                "coursesTouched": report.courses_touched,
                "recordsRemoved": report.records_removed,
            },
        }));
    } else {
        println!(
            "schedconf faculty delete\n  Deleted: {}\n  Courses updated: {}\n  Path: {}",
            name,
            report.courses_touched,
            path.display()
        );
    }
}

fn run_rename(old: String, new: String, config: String, json_output: bool) {
    let (report, _, path) =
        mutate_or_exit(&config, "rename faculty", |c| c.rename_faculty(&old, &new));

    if json_output {
        print_json(&json!({
            "action": "faculty.rename",
            "configPath": path.display().to_string(),
            "old": old,
            "new": new,
            "cascade": {
                "coursesTouched": report.courses_touched,
            },
        }));
    } else {
        println!(
            "schedconf faculty rename\n  Renamed: {} -> {}\n  Courses updated: {}\n  Path: {}",
            old,
            new,
            report.courses_touched,
            path.display()
        );
    }
}

fn run_set_limits(name: String, limits: FacultyLimits, config: String, json_output: bool) {
    let ((), updated, path) = mutate_or_exit(&config, "set faculty limits", |c| {
        c.set_faculty_limits(&name, limits)
    });
    let Some(faculty) = updated.faculty_member(&name) else {
        eprintln!("error: faculty {name} missing after update");
        std::process::exit(1);
    };

    if json_output {
        print_json(&json!({
            "action": "faculty.set-limits",
            "configPath": path.display().to_string(),
            "name": faculty.name,
            "maximumCredits": faculty.maximum_credits,
            "minimumCredits": faculty.minimum_credits,
            "uniqueCourseLimit": faculty.unique_course_limit,
            "maximumDays": faculty.maximum_days,
        }));
    } else {
        println!(
            "schedconf faculty set-limits\n  Faculty: {}\n  Credits: {}-{}\n  Unique courses: {}\n  Days: {}\n  Path: {}",
            faculty.name,
            faculty.minimum_credits,
            faculty.maximum_credits,
            faculty.unique_course_limit,
            faculty.maximum_days,
            path.display()
        );
    }
}

fn run_set_times(
    name: String,
    day: String,
    ranges: Vec<String>,
    config: String,
    json_output: bool,
) {
    let day: Day = day.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    let ranges: Vec<TimeRange> = ranges
        .iter()
        .map(|raw| raw.parse::<TimeRange>())
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });

    let ((), updated, path) = mutate_or_exit(&config, "set faculty times", |c| {
        c.set_faculty_times(&name, day, ranges)
    });
    let stored: Vec<String> = updated
        .faculty_member(&name)
        .and_then(|faculty| faculty.times.get(&day))
        .map(|ranges| ranges.iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    if json_output {
        print_json(&json!({
            "action": "faculty.set-times",
            "configPath": path.display().to_string(),
            "name": name,
            "day": day.as_str(),
            "ranges": stored,
        }));
    } else {
        println!(
            "schedconf faculty set-times\n  Faculty: {}\n  {}: {}\n  Path: {}",
            name,
            day.as_str(),
            join_or_dash(stored.iter().map(String::as_str)),
            path.display()
        );
    }
}

fn run_prefer(
    name: String,
    kind: PreferenceKind,
    key: String,
    weight: Option<u8>,
    config: String,
    json_output: bool,
) {
    let (action, what) = match weight {
        Some(_) => ("faculty.prefer", "set preference"),
        None => ("faculty.unprefer", "clear preference"),
    };
    let ((), _, path) = mutate_or_exit(&config, what, |c| match weight {
        Some(weight) => c.set_preference(&name, kind, &key, weight),
        None => c.clear_preference(&name, kind, &key),
    });

    if json_output {
        print_json(&json!({
            "action": action,
            "configPath": path.display().to_string(),
            "name": name,
            "kind": kind.as_str(),
            "key": key,
            "weight": weight,
        }));
    } else {
        let detail = match weight {
            Some(weight) => format!("{key} = {weight}"),
            None => format!("{key} cleared"),
        };
        println!(
            "schedconf {}\n  Faculty: {}\n  {} preference: {}\n  Path: {}",
            action.replace('.', " "),
            name,
            kind.as_str(),
            detail,
            path.display()
        );
    }
}

fn run_list(config: String, json_output: bool) {
    let (config, path) = load_config_or_exit(&config);

    if json_output {
        print_json(&json!({
            "action": "faculty.list",
            "configPath": path.display().to_string(),
            "count": config.faculty().len(),
            "items": config.faculty(),
        }));
    } else {
        println!("schedconf faculty list ({})", config.faculty().len());
        for faculty in config.faculty() {
            let days: Vec<&str> = faculty.times.keys().map(Day::as_str).collect();
            println!(
                "  {} [{}-{} cr, {} unique, {} day(s)] available: {}",
                faculty.name,
                faculty.minimum_credits,
                faculty.maximum_credits,
                faculty.unique_course_limit,
                faculty.maximum_days,
                join_or_dash(days),
            );
        }
    }
}

fn map_preference_kind(arg: PreferenceKindArg) -> PreferenceKind {
    match arg {
        PreferenceKindArg::Course => PreferenceKind::Course,
        PreferenceKindArg::Room => PreferenceKind::Room,
        PreferenceKindArg::Lab => PreferenceKind::Lab,
    }
}
