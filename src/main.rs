//! Parking Occupancy Prediction CLI
//!
//! Predicts how many vehicles a parking facility holds at a given month,
//! day, hour and weather.

use clap::{Parser, Subcommand};
use parking::present::OutputFormat;
use parking::{Config, Result};

#[derive(Parser)]
#[command(name = "parking")]
#[command(about = "Parking occupancy prediction per facility", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict occupancy for one set of selections
    Predict {
        /// Month name, e.g. "Enero"
        #[arg(long)]
        month: String,
        /// Day of month
        #[arg(long)]
        day: String,
        /// Hour, e.g. "08:00"
        #[arg(long)]
        hour: String,
        /// Facility name, e.g. "MATA"
        #[arg(long)]
        facility: String,
        /// "Sin lluvia" or "lluvioso"
        #[arg(long, default_value = "Sin lluvia")]
        precipitation: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Fill in the selections from a menu and predict
    Interactive {
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Serve the HTTP front end
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        bind: Option<String>,
    },
    /// Show the holiday calendar
    Calendar {
        /// Only this month, e.g. "Mayo"
        #[arg(long)]
        month: Option<String>,
    },
    /// List the accepted labels for every selection
    Options,
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Write a default config file
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show which model a facility uses
    Info {
        /// Facility name
        #[arg(long)]
        facility: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Predict {
            month,
            day,
            hour,
            facility,
            precipitation,
            format,
        } => {
            let selection = parking::Selection {
                month,
                day,
                hour,
                facility,
                precipitation,
            };
            commands::predict(&config, &selection, format)
        }
        Commands::Interactive { format } => commands::interactive(&config, format),
        Commands::Serve { bind } => commands::serve(&config, bind),
        Commands::Calendar { month } => commands::calendar(&config, month),
        Commands::Options => commands::options(),
        Commands::Model { action } => match action {
            ModelCommands::Info { facility } => commands::model_info(&config, &facility),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use parking::features::category::{FACILITIES, HOURS, MONTHS, PRECIPITATION};
    use parking::features::HolidayCalendar;
    use parking::model::{load_model, ModelFormat};
    use parking::predict::Predictor;
    use parking::present::form::fill_selection;
    use parking::Selection;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.models.directory)?;
        println!("Created {}/ directory", config.models.directory);

        println!("\nNext steps:");
        println!(
            "  1. Place one model per facility in {}/ named {}",
            config.models.directory, config.models.template
        );
        println!("  2. Run 'parking predict --month Enero --day 1 --hour 08:00 --facility MATA'");

        Ok(())
    }

    pub fn predict(config: &Config, selection: &Selection, format: OutputFormat) -> Result<()> {
        let predictor = Predictor::from_config(config)?;
        let outcome = predictor.predict(selection)?;
        print!("{}", format.presenter().render(&outcome));
        if format == OutputFormat::Json {
            println!();
        }
        Ok(())
    }

    pub fn interactive(config: &Config, format: OutputFormat) -> Result<()> {
        let predictor = Predictor::from_config(config)?;

        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        let selection = fill_selection(predictor.encoder().calendar(), &mut input, &mut output)?;

        let outcome = predictor.predict(&selection)?;
        print!("{}", format.presenter().render(&outcome));
        if format == OutputFormat::Json {
            println!();
        }
        Ok(())
    }

    pub fn serve(config: &Config, bind: Option<String>) -> Result<()> {
        let bind = bind.unwrap_or_else(|| config.server.bind.clone());
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(parking::server::serve(config, &bind))
    }

    pub fn calendar(config: &Config, month: Option<String>) -> Result<()> {
        let calendar = HolidayCalendar::from_config(&config.calendar)?;

        let months: Vec<(&str, u32)> = match month {
            Some(label) => {
                let code = MONTHS.code(&label)?;
                vec![(MONTHS.label(code).unwrap_or("?"), code)]
            }
            None => MONTHS.labels().zip(1..).collect(),
        };

        println!("Holidays and weekends {}", calendar.year());
        println!("───────────────────────────────");
        for (label, code) in months {
            let days: Vec<String> = calendar
                .holidays_in_month(code)
                .iter()
                .map(|d| d.to_string())
                .collect();
            println!("  {:<11} {}", label, days.join(", "));
        }
        println!("\n  Total: {} non-working days", calendar.len());

        Ok(())
    }

    pub fn options() -> Result<()> {
        for map in [&MONTHS, &HOURS, &FACILITIES, &PRECIPITATION] {
            let labels: Vec<&str> = map.labels().collect();
            println!("{}: {}", map.name(), labels.join(" | "));
        }
        println!("day: 1-31 (limited by the month)");
        Ok(())
    }

    pub fn model_info(config: &Config, facility: &str) -> Result<()> {
        let predictor = Predictor::from_config(config)?;
        let path = predictor.model_path(facility)?;
        let format = ModelFormat::from_path(&path)?;
        let model = load_model(&path, &config.models)?;

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Facility:       {}", facility);
        println!("  Path:           {}", path.display());
        println!("  Format:         {}", format);
        println!("  Model:          {}", model.describe());

        Ok(())
    }
}
