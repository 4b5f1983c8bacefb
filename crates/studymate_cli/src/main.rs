use clap::Parser;
use clap::error::ErrorKind;
use std::io::Write;
use std::ops::ControlFlow;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use studymate_cli::cli::{Cli, Command, ListArgs, ProfileCommand, TaskFields, collect_overrides};
use studymate_core::config::{self, Config, Palette, palette_for_theme};
use studymate_core::error::AppError;
use studymate_core::model::{PALETTE, SUBJECTS, Task, TaskDraft, TaskPatch, find_subject, format_due_date};
use studymate_core::notify::notifier_from_env;
use studymate_core::query::{
    self, DateGroup, SubjectFilter, TaskFilter, group_by_due_date, partition_by_bucket, sort_tasks,
    subjects_in_use,
};
use studymate_core::storage::JsonFileStore;
use studymate_core::timer::{self, CountdownTimer, format_clock, parse_duration, pick_quote};
use studymate_core::{TaskStore, profile, reminders};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Reminder")]
    reminder: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            due: format_due_date(task.due_date),
            reminder: task.reminder_time.clone().unwrap_or_else(|| "-".to_string()),
            priority: task.priority.to_string(),
            subject: task.subject.clone(),
            status: status_label(task).to_string(),
        }
    }
}

struct Context {
    store: TaskStore<JsonFileStore>,
    config: Config,
    palette: Palette,
    json: bool,
}

fn status_label(task: &Task) -> &'static str {
    if task.completed { "completed" } else { "incomplete" }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))
}

fn print_table(tasks: &[&Task]) {
    let rows: Vec<TaskRow> = tasks.iter().map(|&task| TaskRow::from(task)).collect();
    println!("{}", Table::new(rows));
}

fn print_task_details(task: &Task, palette: &Palette) {
    println!("{}", palette.accentize(&task.title));
    println!("id:          {}", task.id);
    println!("due:         {}", format_due_date(task.due_date));
    println!(
        "reminder:    {}",
        task.reminder_time.as_deref().unwrap_or("-")
    );
    println!("priority:    {}", task.priority);
    println!("subject:     {}", task.subject);
    println!("color:       {}", task.color);
    println!("status:      {}", status_label(task));
    if let Some(description) = task.description.as_deref() {
        println!("description: {}", palette.mutedize(description));
    }
}

fn report_task(ctx: &Context, verb: &str, task: &Task) -> Result<(), AppError> {
    if ctx.json {
        println!("{}", to_json(task)?);
    } else {
        println!("{verb} task: {} ({})", task.title, task.id);
    }
    Ok(())
}

fn draft_from(title: Option<String>, fields: TaskFields) -> TaskDraft {
    TaskDraft {
        title: title.unwrap_or_default(),
        description: fields.description,
        due_date: fields.due,
        reminder_time: fields.reminder,
        priority: fields.priority.unwrap_or_default(),
        subject: fields.subject,
        color: fields.color,
    }
}

fn patch_from(title: Option<String>, fields: TaskFields) -> TaskPatch {
    TaskPatch {
        title,
        description: fields.description,
        due_date: fields.due,
        reminder_time: fields.reminder,
        priority: fields.priority,
        completed: None,
        subject: fields.subject,
        color: fields.color,
    }
}

fn filter_from(args: &ListArgs) -> TaskFilter {
    let wants_all = args
        .subjects
        .iter()
        .any(|subject| subject.trim().eq_ignore_ascii_case("all"));
    let subjects = if args.subjects.is_empty() || wants_all {
        SubjectFilter::All
    } else {
        SubjectFilter::AnyOf(
            args.subjects
                .iter()
                .map(|raw| match find_subject(raw) {
                    Some(subject) => subject.name.to_string(),
                    None => raw.trim().to_string(),
                })
                .collect(),
        )
    };

    TaskFilter {
        status: args.status,
        priority: args.priority,
        subjects,
        date: args.date,
        search: args.search.clone().unwrap_or_default(),
    }
}

fn print_groups(ctx: &Context, groups: &[DateGroup<'_>]) -> Result<(), AppError> {
    if ctx.json {
        let payload: Vec<serde_json::Value> = groups
            .iter()
            .map(|group| {
                serde_json::json!({
                    "date": format_due_date(group.date),
                    "tasks": group.tasks,
                })
            })
            .collect();
        println!("{}", to_json(&payload)?);
        return Ok(());
    }

    for group in groups {
        println!("{}", ctx.palette.accentize(&format_due_date(group.date)));
        print_table(&group.tasks);
    }
    Ok(())
}

fn run_list(ctx: &Context, args: &ListArgs) -> Result<(), AppError> {
    let tasks = ctx.store.load();
    let mut view = filter_from(args).apply(&tasks, query::today_local());
    if let Some(key) = args.sort {
        sort_tasks(&mut view, key);
    }

    if let Some(order) = args.group {
        let groups = group_by_due_date(view, order);
        return print_groups(ctx, &groups);
    }

    if ctx.json {
        println!("{}", to_json(&view)?);
    } else if view.is_empty() {
        println!("{}", ctx.palette.mutedize("No tasks match."));
    } else {
        print_table(&view);
    }
    Ok(())
}

fn run_schedule(ctx: &Context, search: Option<String>) -> Result<(), AppError> {
    let tasks = ctx.store.load();
    let filter = TaskFilter {
        search: search.unwrap_or_default(),
        ..TaskFilter::default()
    };
    let view = filter.apply(&tasks, query::today_local());
    let schedule = partition_by_bucket(view, query::today_local());

    if ctx.json {
        let payload = serde_json::json!({
            "past": schedule.past,
            "today": schedule.today,
            "upcoming": schedule.upcoming,
        });
        println!("{}", to_json(&payload)?);
        return Ok(());
    }

    let sections = [
        ("Past Tasks", &schedule.past, "You have no past tasks."),
        ("Today's Tasks", &schedule.today, "You have no tasks scheduled for today."),
        ("Upcoming Tasks", &schedule.upcoming, "You have no upcoming tasks."),
    ];
    for (title, section, empty_message) in sections {
        println!("{}", ctx.palette.accentize(title));
        if section.is_empty() {
            println!("{}", ctx.palette.mutedize(empty_message));
        } else {
            print_table(section);
        }
    }
    Ok(())
}

fn run_subjects(ctx: &Context) -> Result<(), AppError> {
    let tasks = ctx.store.load();
    let in_use = subjects_in_use(&tasks);

    if ctx.json {
        let catalog: Vec<serde_json::Value> = SUBJECTS
            .iter()
            .map(|subject| serde_json::json!({ "name": subject.name, "color": subject.color }))
            .collect();
        let payload = serde_json::json!({
            "catalog": catalog,
            "in_use": in_use,
            "palette": PALETTE,
        });
        println!("{}", to_json(&payload)?);
        return Ok(());
    }

    for subject in SUBJECTS {
        let marker = if in_use.contains(&subject.name) { "*" } else { " " };
        println!("{marker} {:<12} {}", subject.name, ctx.palette.mutedize(subject.color));
    }
    println!("{}", ctx.palette.accentize("Colors"));
    println!("{}", ctx.palette.mutedize(&PALETTE.join(" ")));
    Ok(())
}

fn run_timer(ctx: &Context, duration: &str) -> Result<(), AppError> {
    let (hours, minutes, seconds) = parse_duration(duration)?;
    let mut countdown = CountdownTimer::new();
    countdown.configure(hours, minutes, seconds)?;

    if ctx.config.show_quotes && !ctx.json {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        println!("{}", ctx.palette.mutedize(pick_quote(seed)));
    }

    let notifier = notifier_from_env()?;
    let json = ctx.json;
    let state = timer::run_countdown(
        &mut countdown,
        Duration::from_secs(1),
        notifier.as_ref(),
        |countdown| {
            if !json {
                print!(
                    "\r{} {:>3.0}%",
                    format_clock(countdown.remaining_secs()),
                    countdown.progress() * 100.0
                );
                let _ = std::io::stdout().flush();
            }
            ControlFlow::Continue(())
        },
    )?;

    if json {
        let payload = serde_json::json!({
            "total_secs": countdown.total_secs(),
            "remaining_secs": countdown.remaining_secs(),
            "completed": state == timer::TimerState::Completed,
        });
        println!("{}", to_json(&payload)?);
    } else {
        println!();
        println!("Well Done! Your timer has finished.");
    }
    Ok(())
}

fn run_profile(ctx: &mut Context, command: ProfileCommand) -> Result<(), AppError> {
    let profile = match command {
        ProfileCommand::Show => profile::load_profile(ctx.store.store()),
        ProfileCommand::Set { name, email } => {
            if name.is_none() && email.is_none() {
                return Err(AppError::invalid_input("nothing to update"));
            }
            profile::save_profile(ctx.store.store_mut(), name.as_deref(), email.as_deref())?
        }
    };

    if ctx.json {
        println!("{}", to_json(&profile)?);
    } else {
        println!("name:  {}", profile.name.as_deref().unwrap_or("-"));
        println!("email: {}", profile.email.as_deref().unwrap_or("-"));
    }
    Ok(())
}

fn run_greet(ctx: &Context) -> Result<(), AppError> {
    let profile = profile::load_profile(ctx.store.store());
    let hour = reminders::local_now().hour();
    let greeting = profile::greeting(hour, profile.name.as_deref());

    if ctx.json {
        println!("{}", to_json(&serde_json::json!({ "greeting": greeting }))?);
    } else {
        println!("{}", ctx.palette.accentize(&greeting));
    }
    Ok(())
}

fn run_remind(ctx: &Context) -> Result<(), AppError> {
    let tasks = ctx.store.load();
    let notifier = notifier_from_env()?;
    let outcome = reminders::notify_due_reminders(&tasks, reminders::local_now(), notifier.as_ref());

    if ctx.json {
        let failures: Vec<serde_json::Value> = outcome
            .failures
            .iter()
            .map(|failure| {
                serde_json::json!({
                    "id": failure.task_id,
                    "error": failure.error.to_string(),
                })
            })
            .collect();
        let payload = serde_json::json!({ "notified": outcome.notified, "failures": failures });
        println!("{}", to_json(&payload)?);
    } else {
        for task in &outcome.notified {
            println!("Reminded: {} ({})", task.title, task.id);
        }
        for failure in &outcome.failures {
            eprintln!("ERROR: {} ({})", failure.error, failure.task_id);
        }
        if outcome.notified.is_empty() && outcome.failures.is_empty() {
            println!("{}", ctx.palette.mutedize("No reminders due."));
        }
    }
    Ok(())
}

fn run_command(ctx: &mut Context, command: Command) -> Result<(), AppError> {
    match command {
        Command::Add { title, fields } => {
            let task = ctx.store.add(draft_from(title, fields))?;
            report_task(ctx, "Added", &task)?;
        }
        Command::Edit { id, title, fields } => {
            let task = ctx.store.update(&id, &patch_from(title, fields))?;
            report_task(ctx, "Updated", &task)?;
        }
        Command::Delete { id } => {
            let task = ctx.store.delete(&id)?;
            report_task(ctx, "Deleted", &task)?;
        }
        Command::Show { id } => {
            let task = ctx.store.get(&id)?;
            if ctx.json {
                println!("{}", to_json(&task)?);
            } else {
                print_task_details(&task, &ctx.palette);
            }
        }
        Command::Toggle { id } => {
            let task = ctx.store.toggle_complete(&id)?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            report_task(ctx, verb, &task)?;
        }
        Command::Done { id } => {
            let task = ctx.store.mark_complete(&id)?;
            report_task(ctx, "Completed", &task)?;
        }
        Command::List(args) => run_list(ctx, &args)?,
        Command::Schedule { search } => run_schedule(ctx, search)?,
        Command::Subjects => run_subjects(ctx)?,
        Command::Timer { duration } => run_timer(ctx, &duration)?,
        Command::Profile { command } => run_profile(ctx, command)?,
        Command::Greet => run_greet(ctx)?,
        Command::Remind => run_remind(ctx)?,
    }

    Ok(())
}

fn build_context(cli: &Cli) -> Result<Context, AppError> {
    let overrides = collect_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: {err}");
    }
    let config = config::merge_overrides(&loaded.config, &overrides);
    let palette = palette_for_theme(config.theme.as_deref());

    let store = JsonFileStore::open_default()?;
    tracing::debug!(path = %store.path().display(), theme = ?config.theme, "opened store");

    Ok(Context {
        store: TaskStore::new(store),
        config,
        palette,
        json: cli.json,
    })
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let result = build_context(&cli).and_then(|mut ctx| run_command(&mut ctx, cli.command));
    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
