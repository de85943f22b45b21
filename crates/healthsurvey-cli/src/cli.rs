use clap::{Args, Parser, Subcommand, ValueEnum};
use healthsurvey_client::models::{Role, SurveyCategory, SurveyStatus};

#[derive(Parser)]
#[command(name = "healthsurvey")]
#[command(about = "HealthSurvey dashboard in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL (overrides config and HEALTHSURVEY_API_URL)
    #[arg(short, long, global = true)]
    pub api_url: Option<String>,

    /// Configuration file
    #[arg(short, long, global = true, env = "HEALTHSURVEY_CONFIG")]
    pub config: Option<String>,

    /// Stored session name
    #[arg(short, long, global = true, env = "HEALTHSURVEY_PROFILE")]
    pub profile: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),
    /// Create an account and sign in
    Register(RegisterArgs),
    /// Sign out and erase the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Your profile
    Profile(ProfileArgs),
    /// Role-specific counters and recent surveys
    Dashboard(DashboardArgs),
    /// Manage surveys
    Surveys(SurveysArgs),
    /// Manage survey questions
    Questions(QuestionsArgs),
    /// Browse survey responses
    Responses(ResponsesArgs),
    /// Manage users (admin)
    Users(UsersArgs),
    /// Check whether the backend is reachable
    Status(StatusArgs),
    /// Show the navigation menu for your role
    Menu,
}

impl Commands {
    /// Dashboard route the command stands in for, checked by the route
    /// guard before the command runs. `None` for commands that work in any
    /// session state.
    pub fn route(&self) -> Option<String> {
        let route = match self {
            Commands::Login(_) => "/login".to_string(),
            Commands::Register(_) => "/register".to_string(),
            Commands::Logout | Commands::Whoami | Commands::Status(_) => return None,
            Commands::Profile(_) => "/settings".to_string(),
            Commands::Dashboard(_) | Commands::Menu => "/dashboard".to_string(),
            Commands::Surveys(args) => match &args.command {
                SurveyCommands::Create(_) => "/surveys/create".to_string(),
                SurveyCommands::Update(a) => format!("/surveys/{}/edit", a.id),
                SurveyCommands::Analytics { .. } => "/analytics".to_string(),
                _ => "/surveys".to_string(),
            },
            Commands::Questions(args) => match &args.command {
                QuestionCommands::List { survey } => format!("/surveys/{survey}/edit"),
                QuestionCommands::Create(a) => format!("/surveys/{}/edit", a.survey),
                QuestionCommands::Bulk { survey, .. } => format!("/surveys/{survey}/edit"),
                // Single-question commands do not know their survey.
                _ => "/surveys/create".to_string(),
            },
            Commands::Responses(_) => "/responses".to_string(),
            Commands::Users(_) => "/users".to_string(),
        };
        Some(route)
    }
}

#[derive(Args)]
pub struct LoginArgs {
    /// Username or email
    #[arg(short, long)]
    pub username: String,
    /// Password
    #[arg(long, env = "HEALTHSURVEY_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "HEALTHSURVEY_PASSWORD", hide_env_values = true)]
    pub password: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Account role
    #[arg(long, default_value = "patient")]
    pub role: Role,
    #[arg(long)]
    pub phone: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub specialization: Option<String>,
    #[arg(long)]
    pub medical_id: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: Option<ProfileCommands>,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile (default)
    Show,
    /// Update profile fields
    Update(ProfileUpdateArgs),
    /// Change your password
    Password(PasswordArgs),
}

#[derive(Args, Default)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub specialization: Option<String>,
}

#[derive(Args)]
pub struct PasswordArgs {
    #[arg(long)]
    pub current: String,
    #[arg(long)]
    pub new: String,
    /// Repeat of the new password
    #[arg(long)]
    pub confirm: String,
}

#[derive(Args)]
pub struct DashboardArgs {
    /// Keep refreshing every N seconds until interrupted
    #[arg(long)]
    pub refresh: Option<u64>,
}

#[derive(Args)]
pub struct SurveysArgs {
    #[command(subcommand)]
    pub command: SurveyCommands,
}

#[derive(Subcommand)]
pub enum SurveyCommands {
    /// List surveys
    List(SurveyListArgs),
    /// Show a survey with its questions
    Get { id: i64 },
    /// Create a survey
    Create(SurveyFormArgs),
    /// Replace a survey
    Update(SurveyUpdateArgs),
    /// Delete a survey
    Delete { id: i64 },
    /// Copy a survey and its questions into a new draft
    Duplicate { id: i64 },
    /// Response analytics for a survey
    Analytics { id: i64 },
}

#[derive(Args, Default)]
pub struct SurveyListArgs {
    #[arg(long)]
    pub status: Option<SurveyStatus>,
    #[arg(long)]
    pub category: Option<SurveyCategory>,
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct SurveyFormArgs {
    /// JSON file with the survey body (reads the flags below when omitted)
    #[arg(long)]
    pub file: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<SurveyCategory>,
    #[arg(long)]
    pub status: Option<SurveyStatus>,
    #[arg(long)]
    pub anonymous: bool,
    #[arg(long)]
    pub allow_multiple: bool,
    /// Estimated duration in minutes
    #[arg(long)]
    pub duration: Option<u32>,
    /// Roles the survey targets (repeatable)
    #[arg(long = "target-role")]
    pub target_roles: Vec<Role>,
}

#[derive(Args)]
pub struct SurveyUpdateArgs {
    pub id: i64,
    #[command(flatten)]
    pub form: SurveyFormArgs,
}

#[derive(Args)]
pub struct QuestionsArgs {
    #[command(subcommand)]
    pub command: QuestionCommands,
}

#[derive(Subcommand)]
pub enum QuestionCommands {
    /// List the questions of a survey
    List { survey: i64 },
    /// Show one question
    Get { id: i64 },
    /// Add a question to a survey
    Create(QuestionCreateArgs),
    /// Replace a question from a JSON file
    Update {
        id: i64,
        #[arg(long)]
        file: String,
    },
    /// Delete a question
    Delete { id: i64 },
    /// Add several questions from a JSON array file
    Bulk {
        survey: i64,
        #[arg(long)]
        file: String,
    },
}

#[derive(Args)]
pub struct QuestionCreateArgs {
    pub survey: i64,
    /// JSON file with the question body (reads the flags below when omitted)
    #[arg(long)]
    pub file: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub text: Option<String>,
    #[arg(long = "type", default_value = "text")]
    pub question_type: String,
    #[arg(long)]
    pub required: bool,
    /// Choice option (repeatable)
    #[arg(long = "option")]
    pub options: Vec<String>,
    #[arg(long)]
    pub min: Option<i32>,
    #[arg(long)]
    pub max: Option<i32>,
}

#[derive(Args)]
pub struct ResponsesArgs {
    #[command(subcommand)]
    pub command: ResponseCommands,
}

#[derive(Subcommand)]
pub enum ResponseCommands {
    /// List responses
    List(ResponseListArgs),
    /// Show a response with its answers
    Get { id: i64 },
    /// Submit a response from a JSON file
    Create {
        #[arg(long)]
        file: String,
    },
    /// Mark a response complete or incomplete
    Update {
        id: i64,
        #[arg(long)]
        complete: bool,
    },
    /// Delete a response
    Delete { id: i64 },
}

#[derive(Args, Default)]
pub struct ResponseListArgs {
    /// Only responses to this survey
    #[arg(long)]
    pub survey: Option<i64>,
    /// Only complete (true) or incomplete (false) responses
    #[arg(long)]
    pub complete: Option<bool>,
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a user
    Get { id: i64 },
    /// Create a user
    Create(RegisterArgs),
    /// Update a user
    Update(UserUpdateArgs),
    /// Delete a user
    Delete { id: i64 },
    /// Account totals by role
    Stats,
}

#[derive(Args)]
pub struct UserUpdateArgs {
    pub id: i64,
    #[command(flatten)]
    pub profile: ProfileUpdateArgs,
    #[arg(long)]
    pub role: Option<Role>,
    #[arg(long)]
    pub active: Option<bool>,
    /// New password
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Keep probing on the configured interval until interrupted
    #[arg(long)]
    pub watch: bool,
}
