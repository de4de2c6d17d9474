//! Command-line arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use flownest_core::RecordId;
use std::path::PathBuf;

/// `flownest` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "flownest",
    about = "Local productivity dashboard: tasks, habits, goals, reflections, calendar and a pomodoro timer",
    version
)]
pub struct Cli {
    /// SQLite store file.
    #[arg(long, env = "FLOWNEST_DB", value_name = "path")]
    pub db: Option<PathBuf>,
    /// Use a throwaway in-memory store.
    #[arg(long, conflicts_with = "db")]
    pub ephemeral: bool,
    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(long, env = "FLOWNEST_LOG_DIR", value_name = "dir")]
    pub log_dir: Option<PathBuf>,
    /// trace, debug, info, warn or error.
    #[arg(long, env = "FLOWNEST_LOG_LEVEL", value_name = "level")]
    pub log_level: Option<String>,
    /// Key for the generative quote source.
    #[arg(long, env = "FLOWNEST_GEMINI_API_KEY", value_name = "key", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// To-do list.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Weekly habit grid.
    #[command(subcommand)]
    Habit(HabitCommand),
    /// Weekly and monthly goals.
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Daily reflections.
    #[command(subcommand)]
    Reflect(ReflectCommand),
    /// Calendar events and day/month views.
    #[command(subcommand)]
    Event(EventCommand),
    /// Today's time blocks.
    #[command(subcommand)]
    Block(BlockCommand),
    /// Run a pomodoro countdown in the foreground.
    Pomodoro(PomodoroArgs),
    /// Focus score from tasks and habits.
    Score,
    /// Task, habit, priority and goal breakdowns as JSON.
    Analytics,
    /// This week's summary.
    Weekly {
        /// Also write the summary as JSON into this directory.
        #[arg(long, value_name = "dir")]
        export: Option<PathBuf>,
    },
    /// Latest activity across tasks, goals and reflections.
    Activity,
    /// Totals for the profile page.
    Profile,
    /// Download all records as a JSON file.
    Export {
        #[arg(long, value_name = "dir", default_value = ".")]
        dir: PathBuf,
    },
    /// Fetch inspirational quotes.
    Quote {
        #[arg(long, value_enum, default_value_t = QuoteSourceArg::Zen)]
        source: QuoteSourceArg,
    },
    /// Today's motivation quote.
    Motivation {
        /// Pick a different quote for today.
        #[arg(long)]
        refresh: bool,
    },
    /// Device preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
    /// Local accounts.
    #[command(subcommand)]
    Account(AccountCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum QuoteSourceArg {
    Zen,
    Generative,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    Add {
        text: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        due: Option<NaiveDate>,
    },
    List,
    /// Toggle completion.
    Done { id: RecordId },
    Edit {
        id: RecordId,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long)]
        clear_due: bool,
    },
    Rm { id: RecordId },
}

#[derive(Debug, Subcommand)]
pub enum HabitCommand {
    Add { name: String },
    List,
    /// Flip one weekday cell (0-6 or Mon..Sun).
    Toggle { id: RecordId, day: String },
    Rename { id: RecordId, name: String },
    Rm { id: RecordId },
}

#[derive(Debug, Subcommand)]
pub enum GoalCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 100.0)]
        target: f64,
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        /// weekly or monthly.
        #[arg(long = "type", default_value = "weekly")]
        goal_type: String,
        #[arg(long, default_value = "personal")]
        category: String,
    },
    List,
    /// Set the current value.
    Progress { id: RecordId, value: f64 },
    Edit {
        id: RecordId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long = "type")]
        goal_type: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    Rm { id: RecordId },
}

#[derive(Debug, Subcommand)]
pub enum ReflectCommand {
    Add { text: String },
    /// Titled weekly reflection with a mood.
    Weekly {
        title: String,
        text: String,
        /// happy, excited, neutral, tired or sad.
        #[arg(long, default_value = "neutral")]
        mood: String,
    },
    /// Show today's mood, or set it.
    Mood { value: Option<String> },
    List {
        /// Only the newest five.
        #[arg(long)]
        recent: bool,
    },
    Rm { id: RecordId },
}

#[derive(Debug, Subcommand)]
pub enum EventCommand {
    Add {
        title: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        #[arg(long, value_name = "HH:MM")]
        time: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Rm { id: RecordId },
    /// Tasks, habits and events on one date (default today).
    Day {
        #[arg(value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },
    /// Per-day markers for a month (default this month).
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
pub enum BlockCommand {
    Add {
        title: String,
        #[arg(value_name = "HH:MM")]
        start: String,
        #[arg(value_name = "HH:MM")]
        end: String,
        /// blue, green, purple or orange.
        #[arg(long, default_value = "blue")]
        color: String,
    },
    List,
    Rm { id: RecordId },
}

#[derive(Debug, Args)]
pub struct PomodoroArgs {
    /// pomodoro, short-break or long-break.
    #[arg(long, default_value = "pomodoro")]
    pub mode: String,
    /// none, rain, cafe or white-noise.
    #[arg(long, default_value = "none")]
    pub sound: String,
    #[arg(long, default_value_t = 0.5)]
    pub volume: f32,
    /// Tick interval in milliseconds.
    #[arg(long, default_value_t = 1000, hide = true)]
    pub interval_ms: u64,
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    Show,
    /// on, off or toggle.
    DarkMode { value: Option<String> },
    /// Flip a home-page widget (todo, pomodoro, habit).
    Widget { name: String },
    /// Set timer durations in minutes.
    Pomodoro {
        #[arg(long)]
        work: Option<u32>,
        #[arg(long)]
        short: Option<u32>,
        #[arg(long)]
        long: Option<u32>,
    },
    /// Flip a notification channel (email, push, reminders).
    Notify { channel: String },
    /// Restore widget, timer and notification defaults.
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    Signup {
        email: String,
        #[arg(long, env = "FLOWNEST_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    Signin {
        email: String,
        #[arg(long, env = "FLOWNEST_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Signout,
    Rename { name: String },
    Whoami,
}
