//! Command-line interface over the stores.
//!
//! Subcommands map one-to-one onto store operations:
//! - `login` / `register` / `profile` / `logout` / `whoami` - session
//! - `business ...` / `services ...` / `employees ...` / `schedule ...` -
//!   admin management of the active business
//! - `appointments ...` - business-side appointment handling
//! - `search` / `browse` / `slots` / `book` / `mine` - the client flow
//!
//! Failure output comes from the notification sink; handlers only render
//! successful results.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{
    BookingRequest, CreateScheduleTemplateRequest, CreateServiceRequest, DateRange, LoginRequest,
    RegisterRequest, ScheduleTemplate, UpdateAppearanceRequest, UpdateBusinessRequest,
    UpdateProfileRequest,
};
use crate::utils;
use crate::AppState;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "bookr")]
#[command(author, version, about = "Client core for a business-appointment booking platform", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bookr.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with email or phone plus password
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: String,
    },

    /// Register a business (with --business-name) or an employee account
    /// (with --business-id)
    Register {
        #[arg(long)]
        business_name: Option<String>,
        #[arg(long)]
        business_id: Option<i64>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
    },

    /// Update the current user's profile
    Profile {
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        full_name: String,
    },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami,

    /// Active-business management
    #[command(subcommand)]
    Business(BusinessCommands),

    /// Service management for the active business
    #[command(subcommand)]
    Services(ServiceCommands),

    /// Employee management for the active business
    #[command(subcommand)]
    Employees(EmployeeCommands),

    /// Weekly schedule templates for an employee
    #[command(subcommand)]
    Schedule(ScheduleCommands),

    /// Appointments of the active business
    #[command(subcommand)]
    Appointments(AppointmentCommands),

    /// Search businesses by name
    Search { query: String },

    /// Browse a business's services as a client
    Browse { business_id: i64 },

    /// List free time slots for an employee/service on one date
    Slots {
        #[arg(long)]
        business: i64,
        #[arg(long)]
        service: i64,
        #[arg(long)]
        employee: i64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },

    /// Book a service
    Book {
        #[arg(long)]
        business: i64,
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        service: i64,
        /// Start time as RFC 3339, e.g. 2024-11-14T15:00:00Z
        #[arg(long)]
        start: DateTime<Utc>,
        /// Reminder lead time in minutes
        #[arg(long)]
        reminder: Option<i64>,
    },

    /// List the current user's own appointments
    Mine {
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BusinessCommands {
    /// Load a business and make it the active one
    Show { business_id: i64 },
    /// Rename the active business
    Rename { name: String },
    /// Update logo URL of the active business
    Appearance {
        #[arg(long)]
        logo_url: String,
    },
    /// Print the employee registration link
    Link,
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    /// List cached services (refreshing from the server)
    List,
    /// Create a service
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Duration string, e.g. "45m" or "1h 30m"
        #[arg(long)]
        duration: String,
        #[arg(long)]
        price: i64,
    },
    /// Update a service
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Duration string, e.g. "45m" or "1h 30m"
        #[arg(long)]
        duration: String,
        #[arg(long)]
        price: i64,
    },
    /// Delete a service
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    /// List employees (refreshing from the server)
    List,
    /// Remove an employee
    Remove { id: i64 },
    /// List the services assigned to an employee
    Services { employee_id: i64 },
    /// Assign a service to an employee
    Assign {
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        service: i64,
    },
    /// Remove a service assignment from an employee
    Unassign {
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        service: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// List an employee's templates
    List { employee_id: i64 },
    /// Add a template
    Add {
        #[arg(long)]
        employee: i64,
        /// Day of week, 0 = Sunday
        #[arg(long)]
        day: u8,
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long)]
        is_break: bool,
    },
    /// Update a template
    Update {
        id: i64,
        #[arg(long)]
        employee: i64,
        #[arg(long)]
        day: u8,
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long)]
        is_break: bool,
    },
    /// Remove a template
    Remove {
        id: i64,
        #[arg(long)]
        employee: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum AppointmentCommands {
    /// List appointments of the active business
    List {
        /// Restrict to one employee
        #[arg(long)]
        employee: Option<i64>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// Cancel an appointment
    Cancel { id: i64 },
}

/// Run a CLI command against the wired application core.
pub async fn run_command(cli: &Cli, state: &AppState) -> Result<()> {
    match &cli.command {
        Commands::Login {
            email,
            phone,
            password,
        } => {
            state
                .users
                .login(&LoginRequest {
                    email: email.clone(),
                    phone: phone.clone(),
                    password: password.clone(),
                })
                .await?;
            if let Some(user) = state.session.user() {
                println!("Logged in as {} ({})", user.full_name, user.role);
            }
            Ok(())
        }

        Commands::Register {
            business_name,
            business_id,
            email,
            phone,
            full_name,
            password,
        } => {
            let registered = state
                .users
                .register(&RegisterRequest {
                    business_name: business_name.clone(),
                    business_id: *business_id,
                    email: email.clone(),
                    phone: phone.clone(),
                    full_name: full_name.clone(),
                    password: password.clone(),
                })
                .await;
            if let Some(user) = registered {
                println!("Registered {} ({})", user.full_name, user.role);
            }
            Ok(())
        }

        Commands::Profile {
            email,
            phone,
            full_name,
        } => {
            state
                .users
                .update_profile(&UpdateProfileRequest {
                    email: email.clone(),
                    phone: phone.clone(),
                    full_name: full_name.clone(),
                })
                .await?;
            Ok(())
        }

        Commands::Logout => {
            state.users.logout();
            println!("Logged out.");
            Ok(())
        }

        Commands::Whoami => {
            match state.session.user() {
                Some(user) => {
                    println!("User:     {} (id {})", user.full_name, user.id);
                    println!("Role:     {}", user.role);
                    println!("Business: {}", user.business_id);
                    if let Some(employee_id) = user.employee_id {
                        println!("Employee: {}", employee_id);
                    }
                }
                None => println!("Not logged in."),
            }
            Ok(())
        }

        Commands::Business(cmd) => run_business(cmd, state).await,
        Commands::Services(cmd) => run_services(cmd, state).await,
        Commands::Employees(cmd) => run_employees(cmd, state).await,
        Commands::Schedule(cmd) => run_schedule(cmd, state).await,
        Commands::Appointments(cmd) => run_appointments(cmd, state).await,

        Commands::Search { query } => {
            if let Some(results) = state.client.search(query).await {
                if results.is_empty() {
                    println!("No businesses found.");
                }
                for business in results {
                    println!("{:<6}  {}", business.id, business.name);
                }
            }
            Ok(())
        }

        Commands::Browse { business_id } => {
            if let Some(services) = state.client.get_business_services(*business_id).await {
                print_service_table(&services);
            }
            Ok(())
        }

        Commands::Slots {
            business,
            service,
            employee,
            date,
        } => {
            let slots = state
                .client
                .fetch_available_time_slots(*business, *service, *employee, *date)
                .await?;
            if slots.is_empty() {
                println!("No free slots.");
            }
            for slot in slots {
                println!(
                    "{} - {}",
                    utils::format_time(&slot.start_time),
                    utils::format_time(&slot.end_time)
                );
            }
            Ok(())
        }

        Commands::Book {
            business,
            employee,
            service,
            start,
            reminder,
        } => {
            let client_id = state
                .session
                .user()
                .map(|u| u.id)
                .ok_or_else(|| anyhow::anyhow!("Not logged in"))?;
            let appointment = state
                .client
                .book_service(
                    *business,
                    &BookingRequest {
                        client_id,
                        employee_id: *employee,
                        service_id: *service,
                        start_time: *start,
                        reminder_time: *reminder,
                    },
                )
                .await?;
            println!(
                "Appointment {} on {} at {}",
                appointment.id,
                utils::format_fancy_date(&appointment.start_time),
                utils::format_time(&appointment.start_time)
            );
            Ok(())
        }

        Commands::Mine {
            start_date,
            end_date,
        } => {
            let user_id = state
                .session
                .user()
                .map(|u| u.id)
                .ok_or_else(|| anyhow::anyhow!("Not logged in"))?;
            let range = DateRange {
                start_date: *start_date,
                end_date: *end_date,
            };
            if let Some(appointments) = state.client.fetch_appointments(user_id, &range).await {
                print_appointment_table(&appointments);
            }
            Ok(())
        }
    }
}

async fn run_business(cmd: &BusinessCommands, state: &AppState) -> Result<()> {
    match cmd {
        BusinessCommands::Show { business_id } => {
            let business = state.business.get_business(*business_id).await?;
            println!("ID:      {}", business.id);
            println!("Name:    {}", business.name);
            if let Some(logo_url) = &business.logo_url {
                println!("Logo:    {}", logo_url);
            }
            if let Some(created_at) = &business.created_at {
                println!("Created: {}", utils::format_fancy_date(created_at));
            }
            Ok(())
        }
        BusinessCommands::Rename { name } => {
            state
                .business
                .update_business(&UpdateBusinessRequest { name: name.clone() })
                .await?;
            println!("Business renamed to {}", name);
            Ok(())
        }
        BusinessCommands::Appearance { logo_url } => {
            state
                .business
                .update_business_appearance(&UpdateAppearanceRequest {
                    logo_url: Some(logo_url.clone()),
                    color_scheme: None,
                })
                .await?;
            println!("Appearance updated.");
            Ok(())
        }
        BusinessCommands::Link => {
            match state.business.registration_link() {
                Some(link) => println!("{}", link),
                None => println!("No active business. Run `bookr business show <id>` first."),
            }
            Ok(())
        }
    }
}

async fn run_services(cmd: &ServiceCommands, state: &AppState) -> Result<()> {
    match cmd {
        ServiceCommands::List => {
            if let Some(services) = state.business.fetch_services().await {
                print_service_table(&services);
            }
            Ok(())
        }
        ServiceCommands::Create {
            name,
            description,
            duration,
            price,
        } => {
            let created = state
                .business
                .create_service(&CreateServiceRequest {
                    name: name.clone(),
                    description: description.clone(),
                    duration: utils::parse_duration(duration),
                    price: *price,
                })
                .await;
            if let Some(service) = created {
                println!("Created service {} (id {})", service.name, service.id);
            }
            Ok(())
        }
        ServiceCommands::Update {
            id,
            name,
            description,
            duration,
            price,
        } => {
            let updated = state
                .business
                .update_service(
                    *id,
                    &CreateServiceRequest {
                        name: name.clone(),
                        description: description.clone(),
                        duration: utils::parse_duration(duration),
                        price: *price,
                    },
                )
                .await;
            if updated.is_some() {
                println!("Service {} updated.", id);
            }
            Ok(())
        }
        ServiceCommands::Delete { id } => {
            if state.business.delete_service(*id).await.is_some() {
                println!("Service {} deleted.", id);
            }
            Ok(())
        }
    }
}

async fn run_employees(cmd: &EmployeeCommands, state: &AppState) -> Result<()> {
    match cmd {
        EmployeeCommands::List => {
            if let Some(employees) = state.business.fetch_employees().await {
                if employees.is_empty() {
                    println!("No employees.");
                }
                for employee in employees {
                    println!(
                        "{:<6}  {:<24}  {}",
                        employee.id,
                        employee.display_name(),
                        employee.specialization.as_deref().unwrap_or("-")
                    );
                }
            }
            Ok(())
        }
        EmployeeCommands::Remove { id } => {
            if state.business.delete_employee(*id).await.is_some() {
                println!("Employee {} removed.", id);
            }
            Ok(())
        }
        EmployeeCommands::Services { employee_id } => {
            if let Some(services) = state.business.fetch_employee_services(*employee_id).await {
                print_service_table(&services);
            }
            Ok(())
        }
        EmployeeCommands::Assign { employee, service } => {
            if let Some(assigned) = state.business.assign_service(*employee, *service).await {
                println!("Assigned {} to employee {}.", assigned.name, employee);
            }
            Ok(())
        }
        EmployeeCommands::Unassign { employee, service } => {
            if state
                .business
                .remove_service(*employee, *service)
                .await
                .is_some()
            {
                println!("Removed service {} from employee {}.", service, employee);
            }
            Ok(())
        }
    }
}

async fn run_schedule(cmd: &ScheduleCommands, state: &AppState) -> Result<()> {
    match cmd {
        ScheduleCommands::List { employee_id } => {
            if let Some(templates) = state.business.fetch_schedule_templates(*employee_id).await {
                if templates.is_empty() {
                    println!("No schedule templates.");
                }
                for template in templates {
                    println!(
                        "{:<6}  day {}  {} - {}{}",
                        template.id,
                        template.day_of_week,
                        utils::format_time(&template.start_time),
                        utils::format_time(&template.end_time),
                        if template.is_break { "  (break)" } else { "" }
                    );
                }
            }
            Ok(())
        }
        ScheduleCommands::Add {
            employee,
            day,
            start,
            end,
            is_break,
        } => {
            let created = state
                .business
                .create_schedule_template(
                    *employee,
                    &CreateScheduleTemplateRequest {
                        day_of_week: *day,
                        start_time: *start,
                        end_time: *end,
                        is_break: *is_break,
                    },
                )
                .await;
            if let Some(template) = created {
                println!("Created template {}.", template.id);
            }
            Ok(())
        }
        ScheduleCommands::Update {
            id,
            employee,
            day,
            start,
            end,
            is_break,
        } => {
            let template = ScheduleTemplate {
                id: *id,
                employee_id: *employee,
                day_of_week: *day,
                start_time: *start,
                end_time: *end,
                is_break: *is_break,
                created_at: None,
            };
            if state
                .business
                .update_schedule_template(*employee, &template)
                .await
                .is_some()
            {
                println!("Template {} updated.", id);
            }
            Ok(())
        }
        ScheduleCommands::Remove { id, employee } => {
            if state
                .business
                .delete_schedule_template(*employee, *id)
                .await
                .is_some()
            {
                println!("Template {} removed.", id);
            }
            Ok(())
        }
    }
}

async fn run_appointments(cmd: &AppointmentCommands, state: &AppState) -> Result<()> {
    match cmd {
        AppointmentCommands::List {
            employee,
            start_date,
            end_date,
        } => {
            let range = DateRange {
                start_date: *start_date,
                end_date: *end_date,
            };
            let appointments = match employee {
                Some(employee_id) => {
                    state
                        .business
                        .fetch_employee_appointments(*employee_id, &range)
                        .await
                }
                None => state.business.fetch_appointments(&range).await,
            };
            if let Some(appointments) = appointments {
                print_appointment_table(&appointments);
            }
            Ok(())
        }
        AppointmentCommands::Cancel { id } => {
            if state.business.cancel_appointment(*id).await.is_some() {
                println!("Appointment {} cancelled.", id);
            }
            Ok(())
        }
    }
}

fn print_service_table(services: &[crate::models::Service]) {
    if services.is_empty() {
        println!("No services.");
        return;
    }
    println!("{:<6}  {:<24}  {:<10}  {:<8}", "ID", "NAME", "DURATION", "PRICE");
    for service in services {
        println!(
            "{:<6}  {:<24}  {:<10}  {:<8}",
            service.id,
            service.name,
            service.duration_label(),
            service.price
        );
    }
}

fn print_appointment_table(appointments: &[crate::models::Appointment]) {
    if appointments.is_empty() {
        println!("No appointments.");
        return;
    }
    println!(
        "{:<6}  {:<14}  {:<10}  {:<10}  {}",
        "ID", "DATE", "START", "END", "STATUS"
    );
    for appointment in appointments {
        println!(
            "{:<6}  {:<14}  {:<10}  {:<10}  {}",
            appointment.id,
            utils::format_fancy_date(&appointment.start_time),
            utils::format_time(&appointment.start_time),
            utils::format_time(&appointment.end_time),
            appointment.status.label()
        );
    }
}
