use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};

use eventBooking::handlers::admin::{ActionOutcome, AdminController, EventForm, FormMessage};
use eventBooking::handlers::public::{BookOutcome, PublicController, RegisterForm};
use eventBooking::service::booking_api::BookingApi;
use eventBooking::service::prompt::{AutoPrompter, Prompter, TerminalPrompter};
use eventBooking::service::token_store::TokenStore;
use eventBooking::views::calendar::parse_month;

#[derive(Parser)]
#[command(name = "eventBooking", about = "Browse, book and administer events")]
struct Cli {
    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    #[command(flatten)]
    Public(PublicCommands),
}

#[derive(Subcommand)]
enum PublicCommands {
    Login {
        #[arg(long)]
        username: Option<String>,
    },
    Register {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Logout,
    Whoami,
    Browse {
        #[arg(long)]
        search: Option<String>,
    },
    Calendar {
        /// Month to show, as YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Book the given calendar entry after confirmation
        #[arg(long)]
        book: Option<i64>,
    },
    Book {
        event_id: i64,
    },
    Details {
        event_id: i64,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    Events,
    Bookings,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        capacity: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    CreatePrompt {},
    Delete {
        event_id: i64,
    },
    Cancel {
        booking_id: i64,
    },
    Ping,
}

pub async fn cli(api: Arc<dyn BookingApi>, tokens: Arc<TokenStore>) {
    // Fine to panic here
    let cli = Cli::parse();
    let prompter: Arc<dyn Prompter> = if cli.yes {
        Arc::new(AutoPrompter { answer: true })
    } else {
        Arc::new(TerminalPrompter)
    };

    let result = match cli.command {
        Commands::Admin { command } => run_admin(command, api, prompter).await,
        Commands::Public(command) => {
            let mut public = PublicController::new(api, tokens, prompter);
            run_public(command, &mut public).await
        }
    };
    if let Err(e) = result {
        println!("{}", e);
    }
}

async fn run_public(
    command: PublicCommands,
    public: &mut PublicController,
) -> Result<(), Box<dyn std::error::Error>> {
    public.start().await;
    match command {
        PublicCommands::Login { username } => {
            let username = match username {
                Some(username) => username,
                None => Text::new("Username:").prompt()?,
            };
            let password = Password::new("Password:").without_confirmation().prompt()?;
            if public.login(&username, &password).await {
                print_session(public);
            } else if let Some(message) = &public.page().login_message {
                println!("{}", message);
            }
        }
        PublicCommands::Register { username, mobile, email } => {
            let username = match username {
                Some(username) => username,
                None => Text::new("Username:").prompt()?,
            };
            let password = Password::new("Password:").without_confirmation().prompt()?;
            let password_confirm = Password::new("Confirm password:")
                .without_confirmation()
                .prompt()?;
            let form = RegisterForm {
                username,
                password,
                password_confirm,
                mobile: mobile.unwrap_or_default(),
                email: email.unwrap_or_default(),
            };
            let registered = public.register(form).await;
            if let Some(message) = &public.page().register_message {
                println!("{}", message);
            }
            if registered {
                print_session(public);
            }
        }
        PublicCommands::Logout => {
            public.logout().await;
            print_session(public);
        }
        PublicCommands::Whoami => {
            print_session(public);
        }
        PublicCommands::Browse { search } => {
            if let Some(query) = search {
                public.search(&query);
            }
            print_page(public);
        }
        PublicCommands::Calendar { month, book } => {
            if let Some(event_id) = book {
                report_booking(public.book_from_calendar(event_id).await, event_id);
                return Ok(());
            }
            let first = match month {
                Some(month) => parse_month(&month)
                    .ok_or_else(|| format!("Invalid month {:?}, expected YYYY-MM", month))?,
                None => current_month(),
            };
            print_notices(public);
            print!("{}", public.calendar().render_month(first));
        }
        PublicCommands::Book { event_id } => {
            report_booking(public.book(event_id).await, event_id);
        }
        PublicCommands::Details { event_id } => {
            if !public.details(event_id).await {
                println!("No event with id {}", event_id);
            }
        }
    }
    Ok(())
}

async fn run_admin(
    command: AdminCommands,
    api: Arc<dyn BookingApi>,
    prompter: Arc<dyn Prompter>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut admin = AdminController::new(api, prompter);
    match command {
        AdminCommands::Ping => {
            let message = admin.ping().await?;
            println!("{}", message);
            return Ok(());
        }
        AdminCommands::Events => {
            admin.load_events().await;
            print!("{}", admin.page().events);
            return Ok(());
        }
        AdminCommands::Bookings => {
            admin.load_bookings().await;
            print!("{}", admin.page().bookings);
            return Ok(());
        }
        _ => {}
    }

    admin.start().await;
    match command {
        AdminCommands::Create { title, description, date, capacity, image } => {
            let form = EventForm { title, description, date, capacity, image };
            admin.create_event(form).await;
            print_form_message(&admin);
            print!("{}", admin.page().events);
        }
        AdminCommands::CreatePrompt {} => {
            let form = prompt_event_form()?;
            admin.create_event(form).await;
            print_form_message(&admin);
            print!("{}", admin.page().events);
        }
        AdminCommands::Delete { event_id } => match admin.delete_event(event_id).await {
            ActionOutcome::Done => print!("{}", admin.page().events),
            ActionOutcome::NotFound => println!("No event with id {}", event_id),
            ActionOutcome::Declined | ActionOutcome::Failed(_) => {}
        },
        AdminCommands::Cancel { booking_id } => match admin.cancel_booking(booking_id).await {
            ActionOutcome::Done => print!("{}", admin.page().bookings),
            ActionOutcome::NotFound => println!("No booking with id {}", booking_id),
            ActionOutcome::Declined | ActionOutcome::Failed(_) => {}
        },
        AdminCommands::Ping | AdminCommands::Events | AdminCommands::Bookings => {}
    }
    Ok(())
}

fn prompt_event_form() -> Result<EventForm, Box<dyn std::error::Error>> {
    let title = Text::new("Title:").prompt()?;
    let description = Text::new("Description:").prompt()?;
    let date = Text::new("Date (YYYY-MM-DD):").prompt()?;
    let capacity = Text::new("Capacity:").prompt()?;
    let image = Text::new("Image path (optional):").prompt()?;
    Ok(EventForm {
        title,
        description,
        date,
        capacity,
        image: Some(image.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from),
    })
}

fn current_month() -> NaiveDate {
    let today = Local::now().date_naive();
    today.with_day(1).unwrap_or(today)
}

fn report_booking(outcome: BookOutcome, event_id: i64) {
    if outcome == BookOutcome::Unavailable {
        println!("Event {} cannot be booked", event_id);
    }
}

fn print_form_message(admin: &AdminController) {
    match &admin.page().create_message {
        Some(FormMessage::Success(message)) | Some(FormMessage::Error(message)) => {
            println!("{}", message)
        }
        None => {}
    }
}

fn print_session(public: &PublicController) {
    println!("{}", public.page().header);
    println!("{}", public.panel().view());
}

fn print_notices(public: &PublicController) {
    if let Some(error) = &public.page().error {
        println!("{}", error);
    }
    if let Some(message) = &public.page().message {
        println!("{}", message);
    }
}

fn print_page(public: &PublicController) {
    println!("{}", public.page().header);
    print_notices(public);
    println!();
    print!("{}", public.page().strip);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn admin_and_public_commands_parse_apart() {
        let admin = Cli::try_parse_from(["eventBooking", "admin", "delete", "4"]).unwrap();
        assert!(matches!(
            admin.command,
            Commands::Admin { command: AdminCommands::Delete { event_id: 4 } }
        ));

        let public = Cli::try_parse_from(["eventBooking", "-y", "book", "2"]).unwrap();
        assert!(public.yes);
        assert!(matches!(
            public.command,
            Commands::Public(PublicCommands::Book { event_id: 2 })
        ));
    }
}
