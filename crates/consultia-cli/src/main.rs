//! ConsultIA CLI - chat with expert personas and track business goals.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use consultia_client::{ApiClient, FileStore, GoalStore, ProfileStore, SessionStore};
use consultia_core::catalog::{self, Expert, EXPERTS};
use consultia_core::{
    AuthUser, BusinessGoal, Category, Company, CompanySize, GoalDraft, GoalId, GoalStatus, Sender,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// ConsultIA CLI - business consulting from the terminal
#[derive(Parser)]
#[command(name = "consultia")]
#[command(about = "CLI for the ConsultIA consulting service", long_about = None)]
struct Cli {
    /// Base URL of the ConsultIA API
    #[arg(
        long,
        env = "CONSULTIA_API_URL",
        default_value = "http://localhost:3001/api",
        global = true
    )]
    api_url: String,

    /// Directory holding local goals, profile and chat sessions
    #[arg(long, env = "CONSULTIA_DATA_DIR", default_value = ".consultia", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available experts
    Experts {
        /// Only experts in this category
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Send a message to an expert
    Chat {
        /// Expert ID (see `consultia experts`)
        expert_id: String,

        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Email to associate the conversation with
        #[arg(long, env = "CONSULTIA_USER_EMAIL")]
        email: Option<String>,

        /// Display name to associate the conversation with
        #[arg(long, env = "CONSULTIA_USER_NAME")]
        name: Option<String>,
    },

    /// Show the conversation with an expert
    History {
        /// Expert ID
        expert_id: String,
    },

    /// Check API health
    Health,

    /// Show API status and features
    Status,

    /// Manage business goals
    #[command(subcommand)]
    Goals(GoalsCommand),

    /// Manage the company profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Summary of consultations and goals
    Dashboard,
}

#[derive(Subcommand)]
enum GoalsCommand {
    /// List goals
    List {
        #[arg(short, long)]
        category: Option<Category>,

        /// pending, in-progress or completed
        #[arg(short, long)]
        status: Option<GoalStatus>,
    },

    /// Add a goal
    Add {
        title: String,

        #[arg(short, long)]
        category: Category,

        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        due: NaiveDate,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Update fields of a goal
    Update {
        id: String,

        #[command(flatten)]
        fields: GoalFields,
    },

    /// Delete a goal
    Delete { id: String },

    /// Completion rate and overdue goals
    Stats,
}

#[derive(Args, Default)]
struct GoalFields {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    category: Option<Category>,

    /// Percent complete (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    progress: Option<u8>,

    /// Target date (YYYY-MM-DD)
    #[arg(long)]
    due: Option<NaiveDate>,

    #[arg(long)]
    status: Option<GoalStatus>,
}

impl GoalFields {
    fn apply(self, goal: &BusinessGoal) -> GoalDraft {
        let mut draft = goal.draft.clone();
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(progress) = self.progress {
            draft.progress = progress;
        }
        if let Some(due) = self.due {
            draft.target_date = due;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        draft
    }
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Print the company profile
    Show,

    /// Set profile fields
    Set(ProfileFields),

    /// Erase the company profile
    Clear,
}

#[derive(Args, Default)]
struct ProfileFields {
    /// Company name
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    owner: Option<String>,

    /// micro, pequena, media or grande
    #[arg(long)]
    size: Option<CompanySize>,

    #[arg(long)]
    product: Option<String>,

    #[arg(long)]
    pains: Option<String>,

    #[arg(long)]
    culture: Option<String>,

    #[arg(long)]
    role: Option<String>,

    #[arg(long)]
    routine: Option<String>,

    #[arg(long)]
    info: Option<String>,
}

impl ProfileFields {
    fn apply(self, company: &mut Company) {
        let ProfileFields {
            name,
            owner,
            size,
            product,
            pains,
            culture,
            role,
            routine,
            info,
        } = self;
        let text_fields = [
            (name, &mut company.name),
            (owner, &mut company.owner_name),
            (product, &mut company.product_service),
            (pains, &mut company.customer_pains),
            (culture, &mut company.culture),
            (role, &mut company.user_role),
            (routine, &mut company.daily_routine),
            (info, &mut company.additional_info),
        ];
        for (value, slot) in text_fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(size) = size {
            company.size = size;
        }
    }
}

#[tokio::main]
async fn main() -> CliResult {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    match cli.command {
        Commands::Experts { category } => list_experts(category),
        Commands::Chat {
            expert_id,
            message,
            email,
            name,
        } => {
            let store = FileStore::open(&cli.data_dir)?;
            let user = AuthUser {
                id: None,
                email,
                name,
            };
            chat(&client, &store, &expert_id, &message.join(" "), user).await?;
        }
        Commands::History { expert_id } => {
            let store = FileStore::open(&cli.data_dir)?;
            show_history(&store, &expert_id)?;
        }
        Commands::Health => health(&client).await?,
        Commands::Status => status(&client).await?,
        Commands::Goals(command) => {
            let store = FileStore::open(&cli.data_dir)?;
            goals(GoalStore::load(&store), command)?;
        }
        Commands::Profile(command) => {
            let store = FileStore::open(&cli.data_dir)?;
            profile(ProfileStore::new(&store), command)?;
        }
        Commands::Dashboard => {
            let store = FileStore::open(&cli.data_dir)?;
            dashboard(&store);
        }
    }

    Ok(())
}

// ============================================================================
// Experts and chat
// ============================================================================

fn list_experts(category: Option<Category>) {
    let experts: Vec<&Expert> = match category {
        Some(category) => catalog::by_category(category).collect(),
        None => EXPERTS.iter().collect(),
    };

    println!("Experts ({}):", experts.len());
    println!("{:<22}  {:<10}  {:<12}  {}", "ID", "NAME", "CATEGORY", "SPECIALTY");
    println!("{}", "-".repeat(90));
    for expert in experts {
        println!(
            "{:<22}  {:<10}  {:<12}  {}",
            expert.id,
            expert.name,
            expert.category.label(),
            expert.specialty
        );
    }
}

async fn chat(
    client: &ApiClient,
    store: &FileStore,
    expert_id: &str,
    text: &str,
    user: AuthUser,
) -> CliResult {
    let expert = catalog::find(expert_id)?;
    let mut sessions = SessionStore::load(store);

    let mut messages = sessions
        .get(expert_id)
        .map(|s| s.to_chat_messages())
        .unwrap_or_default();
    messages.push(consultia_core::ChatMessage::user(text));

    let chat_id = sessions.chat_id(expert_id).cloned();
    let auth_user = user.has_identity().then_some(user);

    let sent_at = Utc::now();
    let response = client
        .send_chat(
            &messages,
            &expert.context(),
            auth_user.as_ref(),
            chat_id.as_ref(),
        )
        .await?;

    sessions.append(expert_id, Sender::User, text, sent_at)?;
    sessions.append(expert_id, Sender::Expert, response.message.as_str(), Utc::now())?;
    if let Some(chat_id) = response.chat_id {
        sessions.set_chat_id(expert_id, chat_id)?;
    }

    println!("{} ({}):", expert.name, expert.specialty);
    println!("{}", response.message);
    if let Some(usage) = response.usage {
        println!();
        println!("[tokens: {}]", usage.total_tokens);
    }

    Ok(())
}

fn show_history(store: &FileStore, expert_id: &str) -> CliResult {
    let expert = catalog::find(expert_id)?;
    let sessions = SessionStore::load(store);

    let Some(session) = sessions.get(expert_id).filter(|s| !s.messages.is_empty()) else {
        println!("No conversation with {} yet.", expert.name);
        return Ok(());
    };

    if let Some(chat_id) = &session.chat_id {
        println!("Chat: {}", chat_id);
    }
    for message in &session.messages {
        let author = match message.sender {
            Sender::User => "Você",
            Sender::Expert => expert.name,
        };
        let at = message.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        println!("[{}] {}: {}", at, author, message.content);
    }

    Ok(())
}

// ============================================================================
// Service
// ============================================================================

async fn health(client: &ApiClient) -> CliResult {
    let health = client.health().await?;

    println!("Status:         {}", health.status);
    println!("AI configured:  {}", health.ai_configured);
    println!("Timestamp:      {}", health.timestamp.to_rfc3339());
    println!(
        "Available:      {}",
        if health.is_available() { "yes" } else { "no" }
    );

    Ok(())
}

async fn status(client: &ApiClient) -> CliResult {
    let status = client.status().await?;

    println!("{} v{} ({})", status.service, status.version, status.status);
    let features = [
        ("chat", status.features.chat),
        ("persistence", status.features.persistence),
        ("rate limit", status.features.rate_limit),
        ("cors", status.features.cors),
    ];
    for (name, enabled) in features {
        println!("  {:<12} {}", name, if enabled { "on" } else { "off" });
    }

    Ok(())
}

// ============================================================================
// Goals and profile
// ============================================================================

fn goals(mut store: GoalStore<&FileStore>, command: GoalsCommand) -> CliResult {
    match command {
        GoalsCommand::List { category, status } => {
            let goals: Vec<&BusinessGoal> = store
                .goals()
                .iter()
                .filter(|g| category.map_or(true, |c| g.draft.category == c))
                .filter(|g| status.map_or(true, |s| g.draft.status == s))
                .collect();
            print_goals(&goals);
        }
        GoalsCommand::Add {
            title,
            category,
            due,
            description,
        } => {
            let draft = GoalDraft {
                description,
                ..GoalDraft::new(title, category, due)
            };
            let goal = store.add(draft)?;
            println!("Goal created: {}", goal.id);
        }
        GoalsCommand::Update { id, fields } => {
            let id = GoalId::new(id);
            let current = store
                .get(&id)
                .ok_or_else(|| consultia_core::CoreError::GoalNotFound(id.to_string()))?;
            let draft = fields.apply(current);
            let goal = store.update(&id, draft)?;
            println!("Goal updated:");
            print_goals(&[goal]);
        }
        GoalsCommand::Delete { id } => {
            if store.delete(&GoalId::new(id.as_str()))? {
                println!("Goal deleted: {}", id);
            } else {
                println!("No goal with id {}", id);
            }
        }
        GoalsCommand::Stats => {
            let today = Local::now().date_naive();
            let overdue = store.overdue(today);
            println!("Goals:       {}", store.goals().len());
            println!("Completed:   {}%", store.completion_rate());
            println!("Overdue:     {}", overdue.len());
            if !overdue.is_empty() {
                print_goals(&overdue);
            }
        }
    }

    Ok(())
}

fn print_goals(goals: &[&BusinessGoal]) {
    println!(
        "{:<14}  {:<11}  {:<12}  {:>4}  {:<10}  {}",
        "ID", "STATUS", "CATEGORY", "%", "DUE", "TITLE"
    );
    println!("{}", "-".repeat(80));
    for goal in goals {
        println!(
            "{:<14}  {:<11}  {:<12}  {:>4}  {:<10}  {}",
            goal.id,
            goal.draft.status.as_str(),
            goal.draft.category.label(),
            goal.draft.progress,
            goal.draft.target_date,
            goal.draft.title
        );
    }
}

fn profile(store: ProfileStore<&FileStore>, command: ProfileCommand) -> CliResult {
    match command {
        ProfileCommand::Show => print_company(&store.load()),
        ProfileCommand::Set(fields) => {
            let mut company = store.load();
            fields.apply(&mut company);
            store.save(&company)?;
            println!("Profile saved.");
            print_company(&company);
        }
        ProfileCommand::Clear => {
            store.clear()?;
            println!("Profile cleared.");
        }
    }

    Ok(())
}

fn print_company(company: &Company) {
    if !company.is_configured() {
        println!("No company profile configured. Use `consultia profile set --name ...`.");
        return;
    }
    println!("  Company:    {}", company.name);
    println!("  Owner:      {}", company.owner_name);
    println!("  Size:       {:?}", company.size);
    println!("  Product:    {}", company.product_service);
    println!("  Pains:      {}", company.customer_pains);
    println!("  Culture:    {}", company.culture);
    println!("  Your role:  {}", company.user_role);
    println!("  Routine:    {}", company.daily_routine);
    println!("  Notes:      {}", company.additional_info);
}

fn dashboard(store: &FileStore) {
    let sessions = SessionStore::load(store);
    let goals = GoalStore::load(store);
    let company = ProfileStore::new(store).load();
    let metrics = sessions.metrics(Utc::now());

    if company.is_configured() {
        println!("{}", company.name);
        println!();
    }
    println!("Consultations:    {}", metrics.total_consultations);
    println!("Active chats:     {}", metrics.active_chats);
    println!("Messages:         {}", metrics.total_messages);
    println!("Weekly progress:  {}%", metrics.weekly_progress);
    println!("Goals completed:  {}%", goals.completion_rate());
    println!(
        "Overdue goals:    {}",
        goals.overdue(Local::now().date_naive()).len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_joins_words() {
        let cli = Cli::try_parse_from([
            "consultia",
            "--data-dir",
            "/tmp/x",
            "chat",
            "joao-crm",
            "como",
            "organizar",
            "follow-ups?",
        ])
        .unwrap();
        match cli.command {
            Commands::Chat {
                expert_id, message, ..
            } => {
                assert_eq!(expert_id, "joao-crm");
                assert_eq!(message.join(" "), "como organizar follow-ups?");
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_parse_goal_add() {
        let cli = Cli::try_parse_from([
            "consultia",
            "goals",
            "add",
            "Abrir filial",
            "--category",
            "estrategia",
            "--due",
            "2025-12-31",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Goals(GoalsCommand::Add {
                category: Category::Estrategia,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_category_and_progress_over_100() {
        assert!(Cli::try_parse_from(["consultia", "experts", "--category", "juridico"]).is_err());
        assert!(
            Cli::try_parse_from(["consultia", "goals", "update", "1", "--progress", "120"]).is_err()
        );
    }

    #[test]
    fn test_goal_fields_apply_only_given_values() {
        let draft = GoalDraft::new(
            "Meta",
            Category::Vendas,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        let goal = BusinessGoal::new(GoalId::new("1"), draft);
        let fields = GoalFields {
            progress: Some(60),
            status: Some(GoalStatus::InProgress),
            ..Default::default()
        };

        let updated = fields.apply(&goal);
        assert_eq!(updated.title, "Meta");
        assert_eq!(updated.progress, 60);
        assert_eq!(updated.status, GoalStatus::InProgress);
    }

    #[test]
    fn test_profile_fields_apply() {
        let mut company = Company {
            name: "Antiga".into(),
            culture: "Colaborativa".into(),
            ..Default::default()
        };
        ProfileFields {
            name: Some("Nova".into()),
            size: Some(CompanySize::Media),
            ..Default::default()
        }
        .apply(&mut company);

        assert_eq!(company.name, "Nova");
        assert_eq!(company.culture, "Colaborativa");
        assert_eq!(company.size, CompanySize::Media);
    }
}
