use anyhow::Context;
use chrono::NaiveDate;
use classflow_cli::preview::render_schedule;
use classflow_cli::seeder::{self, SeedConfig};
use classflow_config::DatabaseConfig;
use classflow_db::{PgPool, init_db_pool, run_migrations};
use classflow_schedule::{
    DEFAULT_SESSION_COUNT, DEFAULT_WEEKDAY, HolidayCalendar, generate_schedule, parse_date,
};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "classflow-cli")]
#[command(about = "ClassFlow CLI - Administrative tools for ClassFlow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Print the sessions a class would get, without touching the database
    PreviewSchedule {
        /// First possible session date (YYYY-MM-DD)
        #[arg(short = 's', long)]
        start_date: String,

        /// Day of the week, 0 = Sunday through 6 = Saturday
        #[arg(short = 'w', long, default_value_t = DEFAULT_WEEKDAY)]
        weekday: i32,

        /// Number of sessions
        #[arg(short = 'n', long, default_value_t = DEFAULT_SESSION_COUNT)]
        sessions: i32,

        /// Holiday date (YYYY-MM-DD); may be repeated
        #[arg(long = "holiday")]
        holidays: Vec<String>,
    },
    /// Seed the database with fake staff, classes, sessions and students
    Seed {
        /// Number of classes to create
        #[arg(short = 'c', long, default_value = "8")]
        classes: usize,

        /// Number of teachers
        #[arg(long, default_value = "6")]
        teachers: usize,

        /// Number of managers
        #[arg(long, default_value = "2")]
        managers: usize,

        /// Number of students per class
        #[arg(long, default_value = "12")]
        students: usize,

        /// Skip seeding public holidays
        #[arg(long)]
        no_holidays: bool,
    },
    /// Rebuild a class's sessions from its schedule fields and current holidays
    RegenerateSessions {
        /// Class code, e.g. C-0001
        #[arg(short = 'c', long)]
        class_code: String,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Delete all data (classes, people, holidays)
    ClearSeed {
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    // The preview is pure; everything else needs a database.
    if let Commands::PreviewSchedule {
        start_date,
        weekday,
        sessions,
        holidays,
    } = &cli.command
    {
        return handle_preview(start_date, *weekday, *sessions, holidays);
    }

    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::PreviewSchedule { .. } => Ok(()),
        Commands::Seed {
            classes,
            teachers,
            managers,
            students,
            no_holidays,
        } => {
            let config = SeedConfig {
                teachers,
                managers,
                classes,
                students_per_class: students,
                holidays: !no_holidays,
            };
            handle_seed(&pool, config).await;
            Ok(())
        }
        Commands::RegenerateSessions { class_code, yes } => {
            handle_regenerate(&pool, &class_code, yes).await
        }
        Commands::ClearSeed { yes } => handle_clear_seed(&pool, yes).await,
    }
}

fn handle_preview(
    start_date: &str,
    weekday: i32,
    sessions: i32,
    holidays: &[String],
) -> anyhow::Result<()> {
    let start: NaiveDate = parse_date(start_date)?;
    let calendar = HolidayCalendar::parse(holidays)?;
    let schedule = generate_schedule(start, weekday, sessions, &calendar)?;

    print!("{}", render_schedule(&schedule));
    Ok(())
}

async fn handle_migrate(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool)
        .await
        .context("Failed to run migrations")?;
    println!("✅ Migrations applied");
    Ok(())
}

async fn handle_seed(pool: &PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_regenerate(pool: &PgPool, class_code: &str, yes: bool) -> anyhow::Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!(
                "Replace every session of {class_code}? Session edits will be lost."
            ))
            .default(false)
            .interact()?;

    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    match seeder::sessions::regenerate_by_code(pool, class_code).await {
        Ok(schedule) => {
            print!("{}", render_schedule(schedule.sessions()));
            println!("✅ Regenerated sessions for {}", class_code);
        }
        Err(e) => {
            eprintln!("\n❌ Error regenerating sessions: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn handle_clear_seed(pool: &PgPool, yes: bool) -> anyhow::Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("Delete ALL classes, students, staff and holidays?")
            .default(false)
            .interact()?;

    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    if let Err(e) = seeder::clear_all(pool).await {
        eprintln!("\n❌ Error clearing seeded data: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
