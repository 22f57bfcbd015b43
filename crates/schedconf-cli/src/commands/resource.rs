use crate::cli::ResourceCommands;
use crate::support::{ResourceKind, load_config_or_exit, mutate_or_exit, print_json};
use schedconf_store::{CascadeReport, Configuration};
use serde_json::json;

pub fn run(kind: ResourceKind, command: ResourceCommands) {
    match command {
        ResourceCommands::Add { name, config, json } => run_add(kind, name, config, json),
        ResourceCommands::Rename {
            old,
            new,
            config,
            json,
        } => run_rename(kind, old, new, config, json),
        ResourceCommands::Delete { name, config, json } => run_delete(kind, name, config, json),
        ResourceCommands::List { config, json } => run_list(kind, config, json),
    }
}

fn names(kind: ResourceKind, config: &Configuration) -> &[String] {
    match kind {
        ResourceKind::Room => config.rooms(),
        ResourceKind::Lab => config.labs(),
    }
}

fn cascade_json(report: &CascadeReport) -> serde_json::Value {
    json!({
        "coursesTouched": report.courses_touched,
        "facultyTouched": report.faculty_touched,
        "recordsRemoved": report.records_removed,
    })
}

fn run_add(kind: ResourceKind, name: String, config: String, json_output: bool) {
    let ((), _, path) = mutate_or_exit(&config, &format!("add {}", kind.as_str()), |c| {
        match kind {
            ResourceKind::Room => c.add_room(&name),
            ResourceKind::Lab => c.add_lab(&name),
        }
    });

    if json_output {
        print_json(&json!({
            "action": format!("{}.add", kind.as_str()),
            "configPath": path.display().to_string(),
            "name": name,
        }));
    } else {
        println!(
            "schedconf {} add\n  Added: {}\n  Path: {}",
            kind.as_str(),
            name,
            path.display()
        );
    }
}

fn run_rename(kind: ResourceKind, old: String, new: String, config: String, json_output: bool) {
    let (report, _, path) = mutate_or_exit(&config, &format!("rename {}", kind.as_str()), |c| {
        match kind {
            ResourceKind::Room => c.rename_room(&old, &new),
            ResourceKind::Lab => c.rename_lab(&old, &new),
        }
    });

    if json_output {
        print_json(&json!({
            "action": format!("{}.rename", kind.as_str()),
            "configPath": path.display().to_string(),
            "old": old,
            "new": new,
            "cascade": cascade_json(&report),
        }));
    } else {
        println!(
            "schedconf {} rename\n  Renamed: {} -> {}\n  Courses updated: {}\n  Faculty updated: {}\n  Path: {}",
            kind.as_str(),
            old,
            new,
            report.courses_touched,
            report.faculty_touched,
            path.display()
        );
    }
}

fn run_delete(kind: ResourceKind, name: String, config: String, json_output: bool) {
    let (report, _, path) = mutate_or_exit(&config, &format!("delete {}", kind.as_str()), |c| {
        match kind {
            ResourceKind::Room => c.delete_room(&name),
            ResourceKind::Lab => c.delete_lab(&name),
        }
    });

    if json_output {
        print_json(&json!({
            "action": format!("{}.delete", kind.as_str()),
            "configPath": path.display().to_string(),
            "name": name,
            "cascade": cascade_json(&report),
        }));
    } else {
        println!(
            "schedconf {} delete\n  Deleted: {}\n  Courses updated: {}\n  Faculty updated: {}\n  Path: {}",
            kind.as_str(),
            name,
            report.courses_touched,
            report.faculty_touched,
            path.display()
        );
    }
}

fn run_list(kind: ResourceKind, config: String, json_output: bool) {
    let (config, path) = load_config_or_exit(&config);
    let names = names(kind, &config);

    if json_output {
        print_json(&json!({
            "action": format!("{}.list", kind.as_str()),
            "configPath": path.display().to_string(),
            "count": names.len(),
            "items": names,
        }));
    } else {
        println!("schedconf {} list ({})", kind.as_str(), names.len());
        for name in names {
            println!("  {name}");
        }
    }
}
