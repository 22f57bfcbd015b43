use crate::support::{load_config_or_exit, print_json};
use serde_json::json;

pub fn run(config: String, json_output: bool) {
    let (config, path) = load_config_or_exit(&config);
    let distinct_courses = config.course_ids().len();

    if json_output {
        print_json(&json!({
            "action": "show",
            "configPath": path.display().to_string(),
            "rooms": config.rooms().len(),
            "labs": config.labs().len(),
            "sections": config.courses().len(),
            "courses": distinct_courses,
            "faculty": config.faculty().len(),
            "limit": config.limit,
            "hasTimeSlotConfig": !config.time_slot_config.is_null(),
        }));
    } else {
        println!("schedconf show");
        println!("  Path: {}", path.display());
        println!("  Rooms: {}", config.rooms().len());
        println!("  Labs: {}", config.labs().len());
        println!(
            "  Courses: {} ({} section(s))",
            distinct_courses,
            config.courses().len()
        );
        println!("  Faculty: {}", config.faculty().len());
        println!("  Schedule limit: {}", config.limit);
    }
}
