//! Subcommand handlers.

use crate::args::{
    AccountCommand, BlockCommand, Command, EventCommand, GoalCommand, HabitCommand,
    PomodoroArgs, PrefsCommand, QuoteSourceArg, ReflectCommand, TaskCommand,
};
use crate::error::CliError;
use chrono::{Datelike, Local, NaiveDate, Utc};
use flownest_core::model::goal::GoalType;
use flownest_core::model::habit::{Habit, DAY_LABELS};
use flownest_core::model::reflection::Mood;
use flownest_core::model::task::Task;
use flownest_core::model::time_block::BlockColor;
use flownest_core::model::{format_clock_12h, now_epoch_ms};
use flownest_core::preferences::{PomodoroSettings, Widget};
use flownest_core::quotes::{
    carousel_fallback, fetch_with_fallback, GenerativeQuoteSource, QuoteCarousel, QuoteSource,
    ZenQuotesSource,
};
use flownest_core::service::calendar_service::NewEvent;
use flownest_core::service::goal_service::{GoalUpdate, NewGoal};
use flownest_core::service::reflection_service::NewWeeklyReflection;
use flownest_core::service::task_service::{NewTask, TaskUpdate};
use flownest_core::service::time_block_service::NewTimeBlock;
use flownest_core::timer::{
    format_mm_ss, AmbientSound, CompletionSink, Durations, PomodoroTimer, SinkError, TimerDriver,
    TimerMode,
};
use flownest_core::{CoreConfig, Dashboard, Priority, ValidationError};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn dispatch(
    dashboard: &mut Dashboard,
    config: &CoreConfig,
    command: Command,
) -> Result<(), CliError> {
    match command {
        Command::Task(command) => task(dashboard, command),
        Command::Habit(command) => habit(dashboard, command),
        Command::Goal(command) => goal(dashboard, command),
        Command::Reflect(command) => reflect(dashboard, command),
        Command::Event(command) => event(dashboard, command),
        Command::Block(command) => block(dashboard, command),
        Command::Pomodoro(args) => pomodoro(dashboard, args),
        Command::Score => {
            let score = dashboard.focus_score(now_epoch_ms())?;
            println!(
                "{} / 100  {}: {}",
                score.score,
                score.label.title(),
                score.label.message()
            );
            println!(
                "tasks {} + habits {}  streak {} day(s)",
                score.task_points, score.habit_points, score.streak
            );
            Ok(())
        }
        Command::Analytics => print_json(&dashboard.analytics()?),
        Command::Weekly { export } => {
            let now = Utc::now();
            let summary = dashboard.weekly_summary(now.date_naive())?;
            print_json(&summary)?;
            if let Some(dir) = export {
                let path = dashboard.export_weekly_to_dir(&dir, now)?;
                println!("wrote {}", path.display());
            }
            Ok(())
        }
        Command::Activity => {
            for activity in dashboard.recent_activity()? {
                println!("{:?}\t{}\t{}", activity.kind, activity.record_id, activity.title);
            }
            Ok(())
        }
        Command::Profile => {
            match dashboard.session().identity() {
                Some(identity) => println!("{} <{}>", identity.label(), identity.email),
                None => println!("guest"),
            }
            print_json(&dashboard.profile_stats()?)
        }
        Command::Export { dir } => {
            let path = dashboard.export_to_dir(&dir, Utc::now())?;
            println!("wrote {}", path.display());
            Ok(())
        }
        Command::Quote { source } => quote(config, source),
        Command::Motivation { refresh } => {
            let preferences = dashboard.preferences();
            let quote = if refresh {
                preferences.refresh_motivation(today())?
            } else {
                preferences.daily_motivation(today())?
            };
            println!("{quote}");
            Ok(())
        }
        Command::Prefs(command) => prefs(dashboard, command),
        Command::Account(command) => account(dashboard, command),
    }
}

fn task(dashboard: &mut Dashboard, command: TaskCommand) -> Result<(), CliError> {
    match command {
        TaskCommand::Add {
            text,
            priority,
            description,
            due,
        } => {
            let input = NewTask {
                text,
                description,
                priority: Priority::parse(&priority)?,
                due_date: due,
            };
            match dashboard.create_task(input)? {
                Some(task) => println!("added {}", task.id),
                None => println!("nothing to add"),
            }
        }
        TaskCommand::List => {
            for task in dashboard.list_tasks()? {
                print_task(&task);
            }
        }
        TaskCommand::Done { id } => print_task(&dashboard.toggle_task(id)?),
        TaskCommand::Edit {
            id,
            text,
            description,
            priority,
            due,
            clear_due,
        } => {
            let update = TaskUpdate {
                text,
                description,
                priority: priority.as_deref().map(Priority::parse).transpose()?,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
            };
            print_task(&dashboard.update_task(id, update)?);
        }
        TaskCommand::Rm { id } => {
            dashboard.delete_task(id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn habit(dashboard: &mut Dashboard, command: HabitCommand) -> Result<(), CliError> {
    match command {
        HabitCommand::Add { name } => match dashboard.add_habit(&name)? {
            Some(habit) => println!("added {}", habit.id),
            None => println!("nothing to add"),
        },
        HabitCommand::List => {
            println!("{:36}  {}  name", "id", DAY_LABELS.join(" "));
            for habit in dashboard.list_habits()? {
                print_habit(&habit);
            }
        }
        HabitCommand::Toggle { id, day } => {
            print_habit(&dashboard.toggle_habit_day(id, parse_day(&day)?)?);
        }
        HabitCommand::Rename { id, name } => print_habit(&dashboard.rename_habit(id, &name)?),
        HabitCommand::Rm { id } => {
            dashboard.delete_habit(id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn goal(dashboard: &mut Dashboard, command: GoalCommand) -> Result<(), CliError> {
    match command {
        GoalCommand::Add {
            title,
            description,
            target,
            current,
            goal_type,
            category,
        } => {
            let input = NewGoal {
                title,
                description,
                target_value: target,
                current_value: current,
                goal_type: GoalType::parse(&goal_type)?,
                category,
            };
            match dashboard.add_goal(input)? {
                Some(goal) => println!("added {}", goal.id),
                None => println!("nothing to add"),
            }
        }
        GoalCommand::List => {
            for goal in dashboard.list_goals()? {
                println!(
                    "{}  {:>5.1}%  {:?}  [{}] {} ({}/{})",
                    goal.id,
                    goal.progress_percentage(),
                    goal.progress_band(),
                    goal.goal_type,
                    goal.title,
                    goal.current_value,
                    goal.target_value
                );
            }
        }
        GoalCommand::Progress { id, value } => {
            let goal = dashboard.set_goal_progress(id, value)?;
            println!("{} {:.1}%", goal.id, goal.progress_percentage());
        }
        GoalCommand::Edit {
            id,
            title,
            description,
            target,
            goal_type,
            category,
        } => {
            let update = GoalUpdate {
                title,
                description,
                target_value: target,
                current_value: None,
                goal_type: goal_type.as_deref().map(GoalType::parse).transpose()?,
                category,
            };
            let goal = dashboard.update_goal(id, update)?;
            println!("{} {:.1}%", goal.id, goal.progress_percentage());
        }
        GoalCommand::Rm { id } => {
            dashboard.delete_goal(id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn reflect(dashboard: &mut Dashboard, command: ReflectCommand) -> Result<(), CliError> {
    match command {
        ReflectCommand::Add { text } => match dashboard.save_reflection(&text)? {
            Some(reflection) => println!("saved {}", reflection.id),
            None => println!("nothing to save"),
        },
        ReflectCommand::Weekly { title, text, mood } => {
            let input = NewWeeklyReflection {
                title,
                text,
                mood: Mood::parse(&mood)?,
            };
            match dashboard.save_weekly_reflection(input)? {
                Some(reflection) => println!("saved {}", reflection.id),
                None => println!("nothing to save"),
            }
        }
        ReflectCommand::Mood { value } => {
            let preferences = dashboard.preferences();
            let mood = match value {
                Some(value) => {
                    let mood = Mood::parse(&value)?;
                    preferences.set_current_mood(mood)?;
                    mood
                }
                None => preferences.current_mood()?,
            };
            println!("{} {mood}", mood.emoji());
        }
        ReflectCommand::List { recent } => {
            let reflections = if recent {
                dashboard.recent_reflections()?
            } else {
                dashboard.list_reflections()?
            };
            for reflection in reflections {
                let date = reflection
                    .date()
                    .map(|date| date.to_string())
                    .unwrap_or_default();
                match &reflection.title {
                    Some(title) => println!(
                        "{}  {}  {} {}: {}",
                        reflection.id,
                        date,
                        reflection.mood.emoji(),
                        title,
                        reflection.text
                    ),
                    None => println!("{}  {}  {}", reflection.id, date, reflection.text),
                }
            }
        }
        ReflectCommand::Rm { id } => {
            dashboard.delete_reflection(id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn event(dashboard: &mut Dashboard, command: EventCommand) -> Result<(), CliError> {
    match command {
        EventCommand::Add {
            title,
            date,
            time,
            priority,
            description,
        } => {
            let input = NewEvent {
                title,
                description,
                due_date: date,
                due_time: time,
                priority: Priority::parse(&priority)?,
            };
            match dashboard.add_event(input)? {
                Some(event) => println!("added {}", event.id),
                None => println!("nothing to add"),
            }
        }
        EventCommand::Rm { id } => {
            dashboard.delete_event(id)?;
            println!("deleted {id}");
        }
        EventCommand::Day { date } => {
            let agenda = dashboard.agenda(date.unwrap_or_else(today))?;
            println!("{}", agenda.date.format("%A, %B %-d, %Y"));
            for event in &agenda.events {
                let time = event
                    .due_time
                    .map(format_clock_12h)
                    .unwrap_or_else(|| "all day".to_string());
                println!("  event  {}  {}  {} ({})", event.id, time, event.title, event.priority);
            }
            for task in &agenda.tasks {
                print!("  task   ");
                print_task(task);
            }
            for habit in &agenda.habits {
                println!("  habit  {}  {}", habit.id, habit.name);
            }
        }
        EventCommand::Month { year, month } => {
            let now = today();
            let year = year.unwrap_or(now.year());
            let month = month.unwrap_or(now.month());
            for marker in dashboard.month_overview(year, month)? {
                if marker.is_empty() {
                    continue;
                }
                println!(
                    "{}  tasks {}  habits {}  events {}",
                    marker.date, marker.task_count, marker.habit_count, marker.event_count
                );
            }
        }
    }
    Ok(())
}

fn block(dashboard: &mut Dashboard, command: BlockCommand) -> Result<(), CliError> {
    let today = today();
    match command {
        BlockCommand::Add {
            title,
            start,
            end,
            color,
        } => {
            let input = NewTimeBlock {
                title,
                start_time: start,
                end_time: end,
                color: BlockColor::parse(&color)?,
            };
            match dashboard.add_time_block(today, input)? {
                Some(block) => println!("added {} {}", block.id, block.display_range()),
                None => println!("nothing to add"),
            }
        }
        BlockCommand::List => {
            for block in dashboard.time_blocks_for(today)? {
                println!(
                    "{}  {}  {}  {}",
                    block.id,
                    block.display_range(),
                    block.color.as_str(),
                    block.title
                );
            }
        }
        BlockCommand::Rm { id } => {
            dashboard.delete_time_block(today, id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

struct TerminalSink;

impl CompletionSink for TerminalSink {
    fn on_tick(&mut self, remaining: u32) {
        print!("\r{}  ", format_mm_ss(remaining));
        let _ = std::io::stdout().flush();
    }

    fn on_complete(
        &mut self,
        mode: TimerMode,
        sound: AmbientSound,
        volume: f32,
    ) -> Result<(), SinkError> {
        println!("\rTime's up! ({mode})");
        if let Some(asset) = sound.asset_path() {
            println!("ambient sound: {asset} at volume {volume:.2}");
        }
        Ok(())
    }
}

fn pomodoro(dashboard: &mut Dashboard, args: PomodoroArgs) -> Result<(), CliError> {
    let settings = dashboard.preferences().pomodoro_settings()?;
    let mut timer = PomodoroTimer::new(Durations::from(settings));
    timer.change_mode(TimerMode::parse(&args.mode)?);
    timer.set_sound(AmbientSound::parse(&args.sound)?);
    timer.set_volume(args.volume);
    println!("{} {}", timer.mode(), timer.formatted());
    timer.start();

    let timer = Arc::new(Mutex::new(timer));
    let driver = TimerDriver::spawn(
        Arc::clone(&timer),
        Box::new(TerminalSink),
        Duration::from_millis(args.interval_ms.max(1)),
    )?;
    driver.wait();
    Ok(())
}

fn quote(config: &CoreConfig, source: QuoteSourceArg) -> Result<(), CliError> {
    let source: Box<dyn QuoteSource> = match source {
        QuoteSourceArg::Zen => Box::new(ZenQuotesSource::new(&config.quotes)?),
        QuoteSourceArg::Generative => Box::new(GenerativeQuoteSource::new(&config.quotes)?),
    };
    let batch = fetch_with_fallback(source.as_ref(), carousel_fallback());
    if let Some(error) = &batch.error {
        eprintln!("failed to fetch quote ({error}); showing saved quotes");
    }
    let carousel = QuoteCarousel::from_batch(batch);
    println!("{}", carousel.current());
    Ok(())
}

fn prefs(dashboard: &mut Dashboard, command: PrefsCommand) -> Result<(), CliError> {
    let preferences = dashboard.preferences();
    match command {
        PrefsCommand::Show => {
            println!("dark_mode={}", preferences.dark_mode(false)?);
            let widgets = preferences.widgets()?;
            println!(
                "widgets todo={} pomodoro={} habit={}",
                widgets.todo, widgets.pomodoro, widgets.habit
            );
            let timer = preferences.pomodoro_settings()?;
            println!(
                "pomodoro work={} short={} long={}",
                timer.work_duration, timer.short_break_duration, timer.long_break_duration
            );
            let notifications = preferences.notifications()?;
            println!(
                "notifications email={} push={} reminders={}",
                notifications.email, notifications.push, notifications.reminders
            );
        }
        PrefsCommand::DarkMode { value } => {
            let enabled = match value.as_deref().map(str::trim) {
                None | Some("toggle") => preferences.toggle_dark_mode(false)?,
                Some("on") => {
                    preferences.set_dark_mode(true)?;
                    true
                }
                Some("off") => {
                    preferences.set_dark_mode(false)?;
                    false
                }
                Some(other) => {
                    return Err(ValidationError::UnknownValue {
                        field: "dark mode",
                        value: other.to_string(),
                    }
                    .into())
                }
            };
            println!("dark_mode={enabled}");
        }
        PrefsCommand::Widget { name } => {
            let widget = Widget::parse(&name)?;
            let widgets = preferences.toggle_widget(widget)?;
            println!("{name}={}", widgets.is_visible(widget));
        }
        PrefsCommand::Pomodoro { work, short, long } => {
            let current = preferences.pomodoro_settings()?;
            let settings = PomodoroSettings {
                work_duration: work.unwrap_or(current.work_duration),
                short_break_duration: short.unwrap_or(current.short_break_duration),
                long_break_duration: long.unwrap_or(current.long_break_duration),
            };
            preferences.set_pomodoro_settings(settings)?;
            println!(
                "pomodoro work={} short={} long={}",
                settings.work_duration, settings.short_break_duration, settings.long_break_duration
            );
        }
        PrefsCommand::Notify { channel } => {
            let mut settings = preferences.notifications()?;
            let slot = match channel.trim().to_ascii_lowercase().as_str() {
                "email" => &mut settings.email,
                "push" => &mut settings.push,
                "reminders" => &mut settings.reminders,
                other => {
                    return Err(ValidationError::UnknownValue {
                        field: "notification channel",
                        value: other.to_string(),
                    }
                    .into())
                }
            };
            *slot = !*slot;
            let enabled = *slot;
            preferences.set_notifications(settings)?;
            println!("{channel}={enabled}");
        }
        PrefsCommand::Reset => {
            preferences.reset_settings()?;
            println!("settings reset");
        }
    }
    Ok(())
}

fn account(dashboard: &mut Dashboard, command: AccountCommand) -> Result<(), CliError> {
    match command {
        AccountCommand::Signup {
            email,
            password,
            name,
        } => {
            let identity = dashboard.sign_up(&email, &password, name.as_deref())?;
            println!("signed up as {}", identity.label());
        }
        AccountCommand::Signin { email, password } => {
            let identity = dashboard.sign_in(&email, &password)?;
            println!("signed in as {}", identity.label());
        }
        AccountCommand::Signout => {
            dashboard.sign_out()?;
            println!("signed out");
        }
        AccountCommand::Rename { name } => {
            let identity = dashboard.update_display_name(&name)?;
            println!("renamed to {}", identity.label());
        }
        AccountCommand::Whoami => match dashboard.session().identity() {
            Some(identity) => println!("{} <{}> {}", identity.label(), identity.email, identity.owner_id),
            None => println!("guest"),
        },
    }
    Ok(())
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|date| format!("  due {date}"))
        .unwrap_or_default();
    println!(
        "[{mark}] {}  {:<6}  {}{}",
        task.id,
        task.priority.as_str(),
        task.text,
        due
    );
}

fn print_habit(habit: &Habit) {
    let cells: Vec<&str> = habit
        .days
        .iter()
        .map(|checked| if *checked { " x " } else { " . " })
        .collect();
    println!("{}  {}  {}", habit.id, cells.join(" "), habit.name);
}

fn parse_day(value: &str) -> Result<usize, ValidationError> {
    let trimmed = value.trim();
    if let Ok(index) = trimmed.parse::<usize>() {
        return Ok(index);
    }
    DAY_LABELS
        .iter()
        .position(|label| label.eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| ValidationError::UnknownValue {
            field: "day",
            value: trimmed.to_string(),
        })
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
