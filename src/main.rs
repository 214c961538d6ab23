use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use farm_ledger::audit::{Actor, ActivityLogger, Role, RoleAuthorizer};
use farm_ledger::cli::{
    handle_activity_command, handle_budget_command, handle_category_command,
    handle_expense_command, handle_export_command, handle_surplus_command,
    handle_transfer_command, handle_vendor_command, handle_year_command,
};
use farm_ledger::clock::SystemClock;
use farm_ledger::config::{LedgerPaths, Settings};
use farm_ledger::storage::JsonFilePersistence;
use farm_ledger::LedgerContext;

#[derive(Parser)]
#[command(
    name = "farmledger",
    version,
    about = "Budget ledger and reallocation engine for small agricultural operations",
    long_about = "Farm Ledger keeps a monthly budget per category for each year, \
                  records expenses against it, moves funds between months and \
                  categories, and decides what to do with a year's surplus."
)]
struct Cli {
    /// Acting user, recorded in the activity log
    #[arg(long, global = true, env = "FARMLEDGER_USER")]
    user: Option<String>,

    /// Role of the acting user (admin, user, viewer)
    #[arg(long, global = true, env = "FARMLEDGER_ROLE")]
    role: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Category management commands
    #[command(subcommand)]
    Category(farm_ledger::cli::CategoryCommands),

    /// Budget planning commands
    #[command(subcommand)]
    Budget(farm_ledger::cli::BudgetCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(farm_ledger::cli::ExpenseCommands),

    /// Move funds between two cells of the active year
    Transfer {
        /// Amount to move
        amount: String,
        /// Source cell as Month/Category
        #[arg(long)]
        from: String,
        /// Destination cell as Month/Category
        #[arg(long)]
        to: String,
    },

    /// Year surplus commands
    #[command(subcommand)]
    Surplus(farm_ledger::cli::SurplusCommands),

    /// Year management commands
    #[command(subcommand)]
    Year(farm_ledger::cli::YearCommands),

    /// Vendor directory commands
    #[command(subcommand)]
    Vendor(farm_ledger::cli::VendorCommands),

    /// Export data to CSV
    #[command(subcommand)]
    Export(farm_ledger::cli::ExportCommands),

    /// Show the activity log
    #[command(subcommand)]
    Activity(farm_ledger::cli::ActivityCommands),

    /// Show current configuration and paths
    Config,
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("farm_ledger=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let role = match cli.role.as_deref() {
        Some(role) => role.parse::<Role>()?,
        None => settings.default_role,
    };
    let actor = Actor::new(
        cli.user.unwrap_or_else(|| settings.default_actor.clone()),
        role,
    );
    let logger = ActivityLogger::new(paths.activity_log());

    let command = match cli.command {
        Some(Commands::Config) => {
            println!("Farm Ledger Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Activity log:   {}", paths.activity_log().display());
            println!();
            println!("Settings:");
            println!("  Acting as:               {}", actor);
            println!("  Surplus tolerance:       {}", settings.surplus_tolerance);
            println!("  Infrastructure category: {}", settings.infrastructure_category);
            println!("  Training category:       {}", settings.training_category);
            return Ok(());
        }
        Some(Commands::Activity(cmd)) => {
            handle_activity_command(&logger, cmd)?;
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("Farm Ledger - budgets, expenses and surplus for the farm");
            println!();
            println!("Run 'farmledger --help' for usage information.");
            return Ok(());
        }
    };

    let persistence = JsonFilePersistence::new(paths.clone())?;
    let authorizer = RoleAuthorizer::with_logger(logger);
    let mut ctx = LedgerContext::open(
        Box::new(persistence),
        Box::new(authorizer),
        Box::new(SystemClock),
        settings,
    )?;

    match command {
        Commands::Category(cmd) => handle_category_command(&mut ctx, &actor, cmd)?,
        Commands::Budget(cmd) => handle_budget_command(&mut ctx, &actor, cmd)?,
        Commands::Expense(cmd) => handle_expense_command(&mut ctx, &actor, cmd)?,
        Commands::Transfer { amount, from, to } => {
            handle_transfer_command(&mut ctx, &actor, &amount, &from, &to)?
        }
        Commands::Surplus(cmd) => handle_surplus_command(&mut ctx, &actor, cmd)?,
        Commands::Year(cmd) => handle_year_command(&mut ctx, &actor, cmd)?,
        Commands::Vendor(cmd) => handle_vendor_command(&mut ctx, &actor, cmd)?,
        Commands::Export(cmd) => handle_export_command(&mut ctx, cmd)?,
        Commands::Config | Commands::Activity(_) => {}
    }

    Ok(())
}
