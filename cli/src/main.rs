use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clinic_client::config::{ClientConfig, ConfigError};
use clinic_client::net::types::{AppointmentFilter, AppointmentStatus, AvailabilityRange, ExportStatus};
use clinic_client::net::{ApiClient, RequestError};
use clinic_client::router::{self, GuardError, routes};
use clinic_client::state::session::{Role, SessionContext};
use clinic_client::state::storage::{FileStorage, StorageError};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("request failed: {0}")]
    Request(#[from] RequestError),
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error("{view} is not available to this session (redirected to {redirect})")]
    Redirected { view: String, redirect: String },
    #[error("login response did not carry a recognized role")]
    UnknownRole,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected a JSON array, got {0}")]
    ExpectedArray(&'static str),
    #[error("export failed: {0}")]
    ExportFailed(String),
}

#[derive(Parser, Debug)]
#[command(name = "clinic-cli", about = "Clinic appointment portal CLI")]
struct Cli {
    /// Overrides `CLINIC_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `CLINIC_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

struct CliContext {
    config: ClientConfig,
    session: SessionContext<FileStorage>,
}

impl CliContext {
    fn api(&self) -> Result<ApiClient, CliError> {
        Ok(ApiClient::for_session(&self.config, self.session.session())?)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the in-app routes and the role each requires.
    Routes,
    /// Navigate to an in-app path and report where the guard lands.
    Open { path: String },
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        data: String,
    },
    Logout,
    /// Fetch the signed-in user's profile.
    Whoami,
    /// Show the stored session without contacting the server.
    Session,
    Api(ApiCommand),
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    Admin(AdminCommand),
    Doctor(DoctorCommand),
    Patient(PatientCommand),
}

#[derive(Args, Debug, Clone, Copy, Default)]
struct FilterArgs {
    #[arg(long, value_parser = parse_status)]
    status: Option<AppointmentStatus>,
    #[arg(long, default_value_t = false)]
    upcoming: bool,
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Dashboard,
    Doctors {
        #[arg(long)]
        search: Option<String>,
    },
    Doctor {
        id: u64,
    },
    CreateDoctor {
        #[arg(long)]
        data: String,
    },
    UpdateDoctor {
        id: u64,
        #[arg(long)]
        data: String,
    },
    DeleteDoctor {
        id: u64,
    },
    Patients {
        #[arg(long)]
        search: Option<String>,
    },
    Patient {
        id: u64,
    },
    UpdatePatient {
        id: u64,
        #[arg(long)]
        data: String,
    },
    DeletePatient {
        id: u64,
    },
    Appointments(FilterArgs),
    History {
        appointment_id: u64,
    },
    Departments,
}

#[derive(Args, Debug)]
struct DoctorCommand {
    #[command(subcommand)]
    command: DoctorSubcommand,
}

#[derive(Subcommand, Debug)]
enum DoctorSubcommand {
    Dashboard,
    Appointments(FilterArgs),
    Patients,
    Complete {
        appointment_id: u64,
        #[arg(long)]
        data: String,
    },
    Cancel {
        appointment_id: u64,
    },
    PatientHistory {
        patient_id: u64,
    },
    UpdateHistory {
        appointment_id: u64,
        #[arg(long)]
        data: String,
    },
    Availability {
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    SetAvailability {
        #[arg(long, help = "JSON array of slot objects")]
        data: String,
    },
}

#[derive(Args, Debug)]
struct PatientCommand {
    #[command(subcommand)]
    command: PatientSubcommand,
}

#[derive(Subcommand, Debug)]
enum PatientSubcommand {
    Dashboard,
    Profile,
    UpdateProfile {
        #[arg(long)]
        data: String,
    },
    Departments,
    DepartmentDoctors {
        department_id: u64,
    },
    Doctor {
        doctor_id: u64,
    },
    DoctorAvailability {
        doctor_id: u64,
    },
    Appointments {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = false, conflicts_with = "upcoming")]
        past: bool,
    },
    Book {
        #[arg(long)]
        data: String,
    },
    Cancel {
        appointment_id: u64,
    },
    History,
    SearchDoctors {
        query: String,
    },
    Export,
    ExportStatus {
        task_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_api_base_url(base_url)?;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }
    tracing::debug!(
        base_url = %config.api_base_url,
        session_file = %config.session_file.display(),
        "configuration loaded"
    );
    let session = SessionContext::init(FileStorage::new(&config.session_file));
    let mut ctx = CliContext { config, session };

    match cli.command {
        Command::Routes => run_routes(),
        Command::Open { path } => run_open(&ctx, &path),
        Command::Login { username, password } => run_login(&mut ctx, &username, &password).await,
        Command::Register { data } => {
            let json = ctx.api()?.auth().register(parse_payload(&data)?).await?;
            print_json(&json)
        }
        Command::Logout => {
            ctx.session.logout()?;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            let json = ctx.api()?.auth().me().await?;
            print_json(&json)
        }
        Command::Session => run_session(&ctx),
        Command::Api(api) => run_api(&ctx, api).await,
    }
}

fn run_routes() -> Result<(), CliError> {
    for route in routes::routes() {
        let role = route.required_role.map_or("public", Role::as_str);
        println!("{:<22} {:<18} {role}", route.path, route.name);
    }
    Ok(())
}

fn run_open(ctx: &CliContext, path: &str) -> Result<(), CliError> {
    let nav = router::resolve(ctx.session.session(), path)?;
    let name = routes::find(&nav.path).map_or("(no view)", |route| route.name);
    print_json(&json!({
        "requested": nav.requested,
        "path": nav.path,
        "view": name,
        "redirects": nav.redirects,
    }))
}

async fn run_login(ctx: &mut CliContext, username: &str, password: &str) -> Result<(), CliError> {
    let response = ctx.api()?.auth().login(username, password).await?;
    let role = response.role().ok_or(CliError::UnknownRole)?;
    ctx.session.login(&response.access_token, role)?;

    let nav = router::resolve(ctx.session.session(), routes::LOGIN_PATH)?;
    print_json(&json!({
        "message": response.message,
        "role": role.as_str(),
        "path": nav.path,
        "user": response.user,
    }))
}

fn run_session(ctx: &CliContext) -> Result<(), CliError> {
    let session = ctx.session.session();
    print_json(&json!({
        "authenticated": session.is_authenticated(),
        "role": session.authenticated_role().map(Role::as_str),
        "file": ctx.config.session_file.display().to_string(),
    }))
}

/// Role commands stand in for views under the role's prefix, so they pass
/// through the guard like any navigation would.
fn require_view(ctx: &CliContext, role: Role) -> Result<ApiClient, CliError> {
    let view = role.dashboard_path();
    let nav = router::resolve(ctx.session.session(), view)?;
    if nav.was_redirected() {
        return Err(CliError::Redirected { view: view.to_owned(), redirect: nav.path });
    }
    ctx.api()
}

async fn run_api(ctx: &CliContext, api: ApiCommand) -> Result<(), CliError> {
    let json = match api.command {
        ApiSubcommand::Admin(admin) => run_api_admin(&require_view(ctx, Role::Admin)?, admin).await?,
        ApiSubcommand::Doctor(doctor) => run_api_doctor(&require_view(ctx, Role::Doctor)?, doctor).await?,
        ApiSubcommand::Patient(patient) => run_api_patient(&require_view(ctx, Role::Patient)?, patient).await?,
    };
    print_json(&json)
}

async fn run_api_admin(client: &ApiClient, admin: AdminCommand) -> Result<Value, CliError> {
    let api = client.admin();
    let json = match admin.command {
        AdminSubcommand::Dashboard => api.dashboard().await?,
        AdminSubcommand::Doctors { search } => api.doctors(search.as_deref()).await?,
        AdminSubcommand::Doctor { id } => api.doctor(id).await?,
        AdminSubcommand::CreateDoctor { data } => api.create_doctor(parse_payload(&data)?).await?,
        AdminSubcommand::UpdateDoctor { id, data } => api.update_doctor(id, parse_payload(&data)?).await?,
        AdminSubcommand::DeleteDoctor { id } => api.delete_doctor(id).await?,
        AdminSubcommand::Patients { search } => api.patients(search.as_deref()).await?,
        AdminSubcommand::Patient { id } => api.patient(id).await?,
        AdminSubcommand::UpdatePatient { id, data } => api.update_patient(id, parse_payload(&data)?).await?,
        AdminSubcommand::DeletePatient { id } => api.delete_patient(id).await?,
        AdminSubcommand::Appointments(filter) => api.appointments(&filter.into_filter(false)).await?,
        AdminSubcommand::History { appointment_id } => api.appointment_history(appointment_id).await?,
        AdminSubcommand::Departments => api.departments().await?,
    };
    Ok(json)
}

async fn run_api_doctor(client: &ApiClient, doctor: DoctorCommand) -> Result<Value, CliError> {
    let api = client.doctor();
    let json = match doctor.command {
        DoctorSubcommand::Dashboard => api.dashboard().await?,
        DoctorSubcommand::Appointments(filter) => api.appointments(&filter.into_filter(false)).await?,
        DoctorSubcommand::Patients => api.patients().await?,
        DoctorSubcommand::Complete { appointment_id, data } => {
            api.complete_appointment(appointment_id, parse_payload(&data)?).await?
        }
        DoctorSubcommand::Cancel { appointment_id } => api.cancel_appointment(appointment_id).await?,
        DoctorSubcommand::PatientHistory { patient_id } => api.patient_history(patient_id).await?,
        DoctorSubcommand::UpdateHistory { appointment_id, data } => {
            api.update_history(appointment_id, parse_payload(&data)?).await?
        }
        DoctorSubcommand::Availability { start_date, end_date } => {
            api.availability(&AvailabilityRange { start_date, end_date }).await?
        }
        DoctorSubcommand::SetAvailability { data } => api.set_availability(parse_array(&data)?).await?,
    };
    Ok(json)
}

async fn run_api_patient(client: &ApiClient, patient: PatientCommand) -> Result<Value, CliError> {
    let api = client.patient();
    let json = match patient.command {
        PatientSubcommand::Dashboard => api.dashboard().await?,
        PatientSubcommand::Profile => api.profile().await?,
        PatientSubcommand::UpdateProfile { data } => api.update_profile(parse_payload(&data)?).await?,
        PatientSubcommand::Departments => api.departments().await?,
        PatientSubcommand::DepartmentDoctors { department_id } => api.doctors_in_department(department_id).await?,
        PatientSubcommand::Doctor { doctor_id } => api.doctor(doctor_id).await?,
        PatientSubcommand::DoctorAvailability { doctor_id } => api.doctor_availability(doctor_id).await?,
        PatientSubcommand::Appointments { filter, past } => api.appointments(&filter.into_filter(past)).await?,
        PatientSubcommand::Book { data } => api.book_appointment(parse_payload(&data)?).await?,
        PatientSubcommand::Cancel { appointment_id } => api.cancel_appointment(appointment_id).await?,
        PatientSubcommand::History => api.history().await?,
        PatientSubcommand::SearchDoctors { query } => api.search_doctors(&query).await?,
        PatientSubcommand::Export => {
            let job = api.export_history().await?;
            json!({ "task_id": job.task_id, "status": job.status, "message": job.message })
        }
        PatientSubcommand::ExportStatus { task_id } => match api.export_status(&task_id).await? {
            ExportStatus::Ready { csv } => {
                print!("{csv}");
                return Ok(Value::Null);
            }
            ExportStatus::InProgress(progress) => {
                json!({ "state": progress.state, "status": progress.status, "error": progress.error })
            }
            ExportStatus::Empty { status } => json!({ "state": "SUCCESS", "status": status }),
            ExportStatus::Failed { error } => return Err(CliError::ExportFailed(error)),
        },
    };
    Ok(json)
}

impl FilterArgs {
    fn into_filter(self, past: bool) -> AppointmentFilter {
        AppointmentFilter { status: self.status, upcoming: self.upcoming, past }
    }
}

fn parse_status(raw: &str) -> Result<AppointmentStatus, String> {
    raw.parse()
}

fn parse_payload(raw: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str(raw)?)
}

fn parse_array(raw: &str) -> Result<Vec<Value>, CliError> {
    match parse_payload(raw)? {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Err(CliError::ExpectedArray("object")),
        Value::String(_) => Err(CliError::ExpectedArray("string")),
        Value::Number(_) => Err(CliError::ExpectedArray("number")),
        Value::Bool(_) => Err(CliError::ExpectedArray("bool")),
        Value::Null => Err(CliError::ExpectedArray("null")),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    if value.is_null() {
        return Ok(());
    }
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
