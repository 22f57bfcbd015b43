use crate::cli::{CourseCommands, ReferenceKindArg};
use crate::support::{join_or_dash, load_config_or_exit, mutate_or_exit, print_json};
use schedconf_store::{Course, CourseSelector, ReferenceKind};
use serde_json::json;

pub fn run(command: CourseCommands) {
    match command {
        CourseCommands::Add {
            course_id,
            credits,
            rooms,
            labs,
            faculty,
            conflicts,
            config,
            json,
        } => {
            let mut course = Course::new(course_id, credits);
            course.room = rooms.into_iter().collect();
            course.lab = labs.into_iter().collect();
            course.faculty = faculty.into_iter().collect();
            course.conflicts = conflicts.into_iter().collect();
            run_add(course, config, json)
        }
        CourseCommands::Delete {
            course_id,
            section,
            config,
            json,
        } => run_delete(course_id, section, config, json),
        CourseCommands::Rename {
            old,
            new,
            config,
            json,
        } => run_rename(old, new, config, json),
        CourseCommands::SetCredits {
            section,
            credits,
            config,
            json,
        } => run_set_credits(section, credits, config, json),
        CourseCommands::Attach {
            section,
            kind,
            name,
            config,
            json,
        } => run_reference(true, section, map_reference_kind(kind), name, config, json),
        CourseCommands::Detach {
            section,
            kind,
            name,
            config,
            json,
        } => run_reference(false, section, map_reference_kind(kind), name, config, json),
        CourseCommands::List { config, json } => run_list(config, json),
    }
}

fn run_add(course: Course, config: String, json_output: bool) {
    let course_id = course.course_id.clone();
    let (index, _, path) = mutate_or_exit(&config, "add course", |c| c.add_course(course));

    if json_output {
        print_json(&json!({
            "action": "course.add",
            "configPath": path.display().to_string(),
            "courseId": course_id,
            "section": index,
        }));
    } else {
        println!(
            "schedconf course add\n  Added: {} (section #{})\n  Path: {}",
            course_id,
            index,
            path.display()
        );
    }
}

fn run_delete(course_id: String, section: Option<usize>, config: String, json_output: bool) {
    let selector = match section {
        Some(index) => CourseSelector::Section(index),
        None => CourseSelector::AllSections,
    };
    let (report, _, path) = mutate_or_exit(&config, "delete course", |c| {
        c.delete_course(&course_id, selector)
    });

    if json_output {
        print_json(&json!({
            "action": "course.delete",
            "configPath": path.display().to_string(),
            "courseId": course_id,
            "section": section,
            "cascade": {
                "coursesTouched": report.courses_touched,
                "facultyTouched": report.faculty_touched,
                "recordsRemoved": report.records_removed,
            },
        }));
    } else {
        println!(
            "schedconf course delete\n  Deleted: {} ({} section(s))\n  Conflict lists updated: {}\n  Faculty updated: {}\n  Path: {}",
            course_id,
            report.records_removed,
            report.courses_touched,
            report.faculty_touched,
            path.display()
        );
    }
}

fn run_rename(old: String, new: String, config: String, json_output: bool) {
    let (report, _, path) =
        mutate_or_exit(&config, "rename course", |c| c.rename_course(&old, &new));

    if json_output {
        print_json(&json!({
            "action": "course.rename",
            "configPath": path.display().to_string(),
            "old": old,
            "new": new,
            "cascade": {
                "coursesTouched": report.courses_touched,
                "facultyTouched": report.faculty_touched,
            },
        }));
    } else {
        println!(
            "schedconf course rename\n  Renamed: {} -> {}\n  Conflict lists updated: {}\n  Faculty updated: {}\n  Path: {}",
            old,
            new,
            report.courses_touched,
            report.faculty_touched,
            path.display()
        );
    }
}

fn run_set_credits(section: usize, credits: u32, config: String, json_output: bool) {
    let ((), updated, path) = mutate_or_exit(&config, "set credits", |c| {
        c.set_course_credits(section, credits)
    });
    let course_id = updated
        .section(section)
        .map(|course| course.course_id.clone())
        .unwrap_or_default();

    if json_output {
        print_json(&json!({
            "action": "course.set-credits",
            "configPath": path.display().to_string(),
            "section": section,
            "courseId": course_id,
            "credits": credits,
        }));
    } else {
        println!(
            "schedconf course set-credits\n  Section: #{} ({})\n  Credits: {}\n  Path: {}",
            section,
            course_id,
            credits,
            path.display()
        );
    }
}

fn run_reference(
    attach: bool,
    section: usize,
    kind: ReferenceKind,
    name: String,
    config: String,
    json_output: bool,
) {
    let verb = if attach { "attach" } else { "detach" };
    let (changed, _, path) = mutate_or_exit(&config, &format!("{verb} reference"), |c| {
        if attach {
            c.attach_course_reference(section, kind, &name)
        } else {
            c.detach_course_reference(section, kind, &name).map(|()| true)
        }
    });
    let kind_label = reference_kind_label(kind);

    if json_output {
        print_json(&json!({
            "action": format!("course.{verb}"),
            "configPath": path.display().to_string(),
            "section": section,
            "kind": kind_label,
            "name": name,
            "changed": changed,
        }));
    } else {
        println!(
            "schedconf course {verb}\n  Section: #{}\n  {}: {}{}\n  Path: {}",
            section,
            kind_label,
            name,
            if changed { "" } else { " (already present)" },
            path.display()
        );
    }
}

fn run_list(config: String, json_output: bool) {
    let (config, path) = load_config_or_exit(&config);

    if json_output {
        let items: Vec<_> = config
            .courses()
            .iter()
            .enumerate()
            .map(|(index, course)| {
                json!({
                    "section": index,
                    "course": course,
                })
            })
            .collect();
        print_json(&json!({
            "action": "course.list",
            "configPath": path.display().to_string(),
            "count": items.len(),
            "items": items,
        }));
    } else {
        println!("schedconf course list ({})", config.courses().len());
        for (index, course) in config.courses().iter().enumerate() {
            println!(
                "  #{index} {} [{} cr] rooms: {} labs: {} faculty: {} conflicts: {}",
                course.course_id,
                course.credits,
                join_or_dash(course.room.iter()),
                join_or_dash(course.lab.iter()),
                join_or_dash(course.faculty.iter()),
                join_or_dash(course.conflicts.iter()),
            );
        }
    }
}

fn map_reference_kind(arg: ReferenceKindArg) -> ReferenceKind {
    match arg {
        ReferenceKindArg::Room => ReferenceKind::Room,
        ReferenceKindArg::Lab => ReferenceKind::Lab,
        ReferenceKindArg::Faculty => ReferenceKind::Faculty,
    }
}

fn reference_kind_label(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Room => "room",
        ReferenceKind::Lab => "lab",
        ReferenceKind::Faculty => "faculty",
    }
}
