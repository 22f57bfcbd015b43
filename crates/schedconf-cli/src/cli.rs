use clap::{Parser, Subcommand, ValueEnum};

pub const DEFAULT_CONFIG_PATH: &str = "schedconf.json";

/// schedconf: maintain the course-scheduling configuration file.
#[derive(Parser)]
#[command(name = "schedconf", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty configuration file
    Init {
        /// Path to the configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a configuration file
    Show {
        /// Path to the configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the integrity report; exits 1 when the configuration is rejected
    Check {
        /// Path to the configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage rooms
    Room {
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Manage labs
    Lab {
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Manage course sections
    Course {
        #[command(subcommand)]
        command: CourseCommands,
    },

    /// Manage faculty records
    Faculty {
        #[command(subcommand)]
        command: FacultyCommands,
    },

    /// Manage conflict edges between courses
    Conflict {
        #[command(subcommand)]
        command: ConflictCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ResourceCommands {
    /// Add a name to the canonical list
    Add {
        name: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Rename everywhere it is referenced
    Rename {
        old: String,
        new: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Delete and scrub every reference
    Delete {
        name: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// List the canonical names
    List {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum CourseCommands {
    /// Append a new section
    Add {
        /// Course identifier (may repeat across sections)
        course_id: String,

        #[arg(long)]
        credits: u32,

        /// Room the section may use (repeatable)
        #[arg(long = "room")]
        rooms: Vec<String>,

        /// Lab the section may use (repeatable)
        #[arg(long = "lab")]
        labs: Vec<String>,

        /// Faculty who may teach the section (repeatable)
        #[arg(long = "faculty")]
        faculty: Vec<String>,

        /// Course this section conflicts with (repeatable)
        #[arg(long = "conflict")]
        conflicts: Vec<String>,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Delete every section of a course, or one section by position
    Delete {
        course_id: String,

        /// Section position in the course list
        #[arg(long)]
        section: Option<usize>,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Rename a course id everywhere it is referenced
    Rename {
        old: String,
        new: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Set the credit count of one section
    SetCredits {
        section: usize,
        credits: u32,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Add a room, lab or faculty reference to one section
    Attach {
        section: usize,
        kind: ReferenceKindArg,
        name: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Remove a room, lab or faculty reference from one section
    Detach {
        section: usize,
        kind: ReferenceKindArg,
        name: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// List every section with its position
    List {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum FacultyCommands {
    /// Add a faculty record
    Add {
        name: String,

        #[arg(long)]
        max_credits: u32,

        #[arg(long, default_value_t = 0)]
        min_credits: u32,

        #[arg(long)]
        unique_course_limit: u32,

        #[arg(long)]
        max_days: Option<u32>,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Delete a faculty record and every listing of it
    Delete {
        name: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Rename a faculty member everywhere they are listed
    Rename {
        old: String,
        new: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Update numeric limits; omitted flags keep their value
    SetLimits {
        name: String,

        #[arg(long)]
        max_credits: Option<u32>,

        #[arg(long)]
        min_credits: Option<u32>,

        #[arg(long)]
        unique_course_limit: Option<u32>,

        #[arg(long)]
        max_days: Option<u32>,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Replace availability for one day (no ranges clears the day)
    SetTimes {
        name: String,

        /// MON, TUE, WED, THU, FRI, SAT or SUN
        day: String,

        /// Ranges as HH:MM-HH:MM
        ranges: Vec<String>,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Set a preference weight (0-10)
    Prefer {
        name: String,
        kind: PreferenceKindArg,
        key: String,
        weight: u8,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Remove a preference entry
    Unprefer {
        name: String,
        kind: PreferenceKindArg,
        key: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// List faculty records
    List {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConflictCommands {
    /// Add a symmetric conflict between every section of two courses
    Add {
        a: String,
        b: String,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Remove the edge between two specific sections
    Remove {
        a: String,
        b: String,
        section_a: usize,
        section_b: usize,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },

    /// Move one endpoint of an existing edge to another course
    Modify {
        a: String,
        b: String,
        c: String,

        #[arg(long, default_value = "replace-first")]
        mode: RetargetModeArg,

        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReferenceKindArg {
    #[value(name = "room")]
    Room,
    #[value(name = "lab")]
    Lab,
    #[value(name = "faculty")]
    Faculty,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PreferenceKindArg {
    #[value(name = "course")]
    Course,
    #[value(name = "room")]
    Room,
    #[value(name = "lab")]
    Lab,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RetargetModeArg {
    #[value(name = "replace-first")]
    ReplaceFirst,
    #[value(name = "replace-second")]
    ReplaceSecond,
}
