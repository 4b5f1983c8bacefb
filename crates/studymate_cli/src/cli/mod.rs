use clap::{Args, Parser, Subcommand};
use studymate_core::config::ConfigOverrides;
use studymate_core::model::Priority;
use studymate_core::query::{DateFilter, GroupOrder, PriorityFilter, SortKey, StatusFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Study planner: tasks, schedules and a countdown timer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: studymate add "Algebra worksheet" --due 2025-03-04 --subject Mathematics
    Add {
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Edit fields of a task
    ///
    /// Example: studymate edit task-1 --priority high --reminder 18:30
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task
    ///
    /// Example: studymate delete task-1
    Delete { id: String },
    /// Show details of a task
    ///
    /// Example: studymate show task-1
    Show { id: String },
    /// Flip a task between completed and incomplete
    ///
    /// Example: studymate toggle task-1
    Toggle { id: String },
    /// Mark a task as completed
    ///
    /// Example: studymate done task-1
    Done { id: String },
    /// List tasks with filters, sorting and grouping
    ///
    /// Example: studymate list --status incomplete --date upcoming --sort priority
    /// Example: studymate list --subject Physics --subject Biology --group chronological
    List(ListArgs),
    /// Show past, today's and upcoming tasks
    ///
    /// Example: studymate schedule
    Schedule {
        /// Only tasks whose title contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// List the subject catalog, the subjects in use and the color palette
    Subjects,
    /// Run the countdown study timer
    ///
    /// Example: studymate timer 25m
    /// Example: studymate timer 1h30m
    /// Example: studymate timer 00:45:00
    Timer { duration: String },
    /// Show or update the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Print a time-of-day greeting
    Greet,
    /// Send notifications for reminders that are due
    ///
    /// Example: studymate remind
    Remind,
}

#[derive(Args, Debug, Default)]
pub struct TaskFields {
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Subject from the catalog
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Reminder time of day (HH:MM)
    #[arg(long)]
    pub reminder: Option<String>,
    /// low, medium or high
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Hex color tag (#RRGGBB)
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// all, completed or incomplete
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,
    /// all, low, medium or high
    #[arg(long, default_value = "all")]
    pub priority: PriorityFilter,
    /// Keep tasks of these subjects (repeatable)
    #[arg(long = "subject")]
    pub subjects: Vec<String>,
    /// all, past, today or upcoming
    #[arg(long, default_value = "all")]
    pub date: DateFilter,
    /// Case-insensitive title search
    #[arg(long)]
    pub search: Option<String>,
    /// color, priority or due-date
    #[arg(long)]
    pub sort: Option<SortKey>,
    /// Group by due date: insertion or chronological (the default)
    #[arg(long, num_args = 0..=1, default_missing_value = "chronological")]
    pub group: Option<GroupOrder>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show the stored name and email
    Show,
    /// Update name and/or email; pass an empty value to clear
    ///
    /// Example: studymate profile set --name Ada --email ada@example.com
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    ShowQuotes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "show_quotes" | "quotes" => ConfigOverrideTarget::ShowQuotes,
        other => return Err(format!("unknown config field '{other}'")),
    };
    Ok(ParsedConfigOverride { target, value })
}

/// Collects every `--config-override` into one set of overrides; later
/// values win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::ShowQuotes => {
                overrides.show_quotes = Some(parse_flag_value(&parsed.value)?);
            }
        }
    }
    Ok(overrides)
}

fn parse_flag_value(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
