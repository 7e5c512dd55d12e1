use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand};

use agenda_lib::calendar::{CalendarTerms, MonthView, WeekView};
use agenda_lib::commands::appointment::{AppointmentForm, AppointmentPatch};
use agenda_lib::commands;
use agenda_lib::config::{self, AppConfig};
use agenda_lib::core_state::CoreState;
use agenda_lib::models::Appointment;
use agenda_lib::reminder::Reminder;

/// Appointment book for a small practice
#[derive(Parser)]
#[command(name = "agenda", version, about, long_about = None)]
struct Cli {
    /// Operator username
    #[arg(long, short, env = "AGENDA_USER")]
    user: String,

    /// Operator password
    #[arg(long, short, env = "AGENDA_PASSWORD", hide_env_values = true)]
    password: String,

    /// Directory holding the appointment and credential files
    #[arg(long, env = config::DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seven days with appointment counts
    Week {
        /// First day shown (default: this week's Monday)
        #[arg(long)]
        from: Option<String>,
        /// Whole weeks forward (positive) or back (negative)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },

    /// Month grid with appointment counts
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    /// Appointments on one day
    Day { date: String },

    /// Every appointment
    List,

    /// Book a new appointment
    Add(AddArgs),

    /// Change fields of an existing appointment
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },

    /// Remove an appointment
    Delete { id: String },

    /// Reminder links for a day (default: today) or a single appointment
    Remind {
        #[arg(long, conflicts_with = "id")]
        date: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },

    /// Change the operator password
    Passwd {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    phone: String,
    /// Terapia, Visita posturale or Check-up Completo
    #[arg(long)]
    visit_type: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// HH:MM
    #[arg(long)]
    time: String,
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    visit_type: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    time: Option<String>,
}

fn main() {
    agenda_lib::init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.data_dir {
        Some(dir) => AppConfig::load_from(dir)?,
        None => AppConfig::load()?,
    };
    let mut state = CoreState::new(config);
    commands::profile::login(&mut state, &cli.user, &cli.password)?;

    match cli.command {
        Command::Week { from, offset } => {
            let view = commands::calendar::week(&mut state, from.as_deref(), offset)?;
            print_week(&view);
        }
        Command::Month { year, month } => {
            let view = commands::calendar::month(&state, year, month)?;
            print_month(&view);
        }
        Command::Day { date } => {
            let (date, appointments) = commands::calendar::day(&mut state, &date)?;
            println!("{}", CalendarTerms::ITALIAN.long_date(date));
            if appointments.is_empty() {
                println!("  Nessun appuntamento");
            }
            for appointment in &appointments {
                print_appointment(appointment);
            }
        }
        Command::List => {
            for appointment in &commands::appointment::list_appointments(&state)? {
                print_appointment(appointment);
            }
        }
        Command::Add(args) => {
            let form = AppointmentForm {
                first_name: args.first_name,
                last_name: args.last_name,
                phone: args.phone,
                visit_type: args.visit_type,
                date: args.date,
                time: args.time,
            };
            let created = commands::appointment::add_appointment(&mut state, &form)?;
            println!("Appuntamento creato: {}", created.id);
        }
        Command::Edit { id, fields } => {
            let patch = AppointmentPatch {
                first_name: fields.first_name,
                last_name: fields.last_name,
                phone: fields.phone,
                visit_type: fields.visit_type,
                date: fields.date,
                time: fields.time,
            };
            let updated = commands::appointment::edit_appointment(&mut state, &id, patch)?;
            println!("Appuntamento aggiornato: {}", updated.id);
        }
        Command::Delete { id } => {
            let removed = commands::appointment::delete_appointment(&mut state, &id)?;
            println!("Appuntamento eliminato: {} ({})", removed.full_name(), removed.id);
        }
        Command::Remind { date, id } => {
            let reminders = match (id, date) {
                (Some(id), _) => vec![commands::reminder::reminder_for_appointment(&mut state, &id)?],
                (None, date) => {
                    let date = date.unwrap_or_else(|| Local::now().date_naive().to_string());
                    commands::reminder::reminders_for_day(&mut state, &date)?
                }
            };
            print_reminders(&reminders);
        }
        Command::Passwd { old, new, confirm } => {
            commands::profile::change_password(&mut state, &old, &new, &confirm)?;
            println!("Password aggiornata. Accedi di nuovo con la nuova password.");
        }
    }
    Ok(())
}

fn print_week(view: &WeekView) {
    println!("{}", view.label);
    for day in &view.days {
        println!("  {:<10} {:>2}  {}", day.weekday, day.day, day.count);
    }
    println!("  Totale: {}", view.total);
}

fn print_month(view: &MonthView) {
    println!("{}", view.title);
    let header: Vec<String> = view
        .weekday_headers
        .iter()
        .map(|name| format!("{name:<7}"))
        .collect();
    println!("{}", header.join(""));
    for week in &view.weeks {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) if day.count > 0 => format!("{:>2}({:<2}) ", day.day, day.count),
                Some(day) => format!("{:>2}     ", day.day),
                None => " ".repeat(7),
            })
            .collect();
        println!("{}", row.trim_end());
    }
    println!("Totale: {}", view.total);
}

fn print_appointment(appointment: &Appointment) {
    let date = match appointment.date_label() {
        label if label.is_empty() => "??????????".to_string(),
        label => label,
    };
    let time = match appointment.time_label() {
        label if label.is_empty() => "??:??".to_string(),
        label => label,
    };
    println!(
        "  {date} {time}  {:<30} {:<18} {:<15} {}",
        appointment.full_name(),
        appointment.visit_type.as_str(),
        appointment.phone,
        appointment.id
    );
}

fn print_reminders(reminders: &[Reminder]) {
    for reminder in reminders {
        println!("{} ({})", reminder.patient, reminder.phone);
        println!("  {}", reminder.message);
        println!("  {}", reminder.link);
    }
}
