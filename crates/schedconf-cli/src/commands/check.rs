use crate::support::print_json;
use schedconf_store::{ValidationReport, check_config, read_config_unchecked};
use serde_json::json;
use std::path::PathBuf;

fn print_report(report: &ValidationReport) {
    println!(
        "[config-check] {} (rooms={}, labs={}, sections={}, faculty={}, errors={}, warnings={})",
        if report.accepted() { "OK" } else { "FAIL" },
        report.summary.room_count,
        report.summary.lab_count,
        report.summary.course_count,
        report.summary.faculty_count,
        report.summary.error_count,
        report.summary.warning_count
    );
    for finding in &report.errors {
        println!(
            "  - {} {} ({})",
            finding.entity, finding.class, finding.message
        );
    }
    for finding in &report.warnings {
        println!(
            "  - WARN {} {} ({})",
            finding.entity, finding.class, finding.message
        );
    }
}

pub fn run(config: String, json_output: bool) {
    let path = PathBuf::from(config);
    if !path.exists() {
        eprintln!("error: configuration file not found: {}", path.display());
        std::process::exit(1);
    }
    let config = read_config_unchecked(&path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        std::process::exit(1);
    });
    let report = check_config(&config);

    if json_output {
        print_json(&json!({
            "action": "check",
            "configPath": path.display().to_string(),
            "checkKind": report.check_kind,
            "result": report.result,
            "failureClasses": report.failure_classes,
            "warningClasses": report.warning_classes,
            "errors": report.errors,
            "warnings": report.warnings,
            "summary": report.summary,
        }));
    } else {
        print_report(&report);
    }

    if !report.accepted() {
        std::process::exit(1);
    }
}
