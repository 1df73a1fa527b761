mod display;

use std::path::PathBuf;

use anyhow::Context;
use attrition_ai::{ModelHandle, assess};
use attrition_core::{EmployeeProfile, encode};
use attrition_web::AppState;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "attrition", version, about = "Employee attrition scoring")]
struct Cli {
    /// Trained model artifact (.json tree ensemble or .onnx).
    #[arg(
        long,
        env = "ATTRITION_MODEL",
        default_value = "emp_attrition_model.json",
        global = true
    )]
    model: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the JSON API and the HTML form.
    Serve {
        #[arg(long, env = "ATTRITION_BIND", default_value = "127.0.0.1:8000")]
        bind: String,
    },
    /// Score a single employee and print the result.
    Predict(PredictArgs),
    /// Show the loaded model's backend and expected feature order.
    Inspect,
}

#[derive(Debug, Args)]
struct PredictArgs {
    #[arg(long, default_value_t = 0.5)]
    satisfaction_level: f64,
    #[arg(long, default_value_t = 0.7)]
    last_evaluation: f64,
    #[arg(long, default_value_t = 3)]
    number_project: u32,
    #[arg(long, default_value_t = 160)]
    average_monthly_hours: u32,
    #[arg(long, default_value_t = 3)]
    time_spend_company: u32,
    #[arg(long)]
    work_accident: bool,
    #[arg(long)]
    promoted: bool,
    /// One of: sales, accounting, hr, technical, support, management, IT,
    /// product_mng, marketing, RandD.
    #[arg(long)]
    department: String,
    /// One of: low, medium, high.
    #[arg(long)]
    salary: String,
    /// Print the API's JSON response instead of a card.
    #[arg(long)]
    json: bool,
}

impl PredictArgs {
    fn profile(&self) -> EmployeeProfile {
        EmployeeProfile {
            satisfaction_level: self.satisfaction_level,
            last_evaluation: self.last_evaluation,
            number_project: self.number_project,
            average_monthly_hours: self.average_monthly_hours,
            time_spend_company: self.time_spend_company,
            had_work_accident: self.work_accident,
            promoted_last_5_years: self.promoted,
            department: self.department.clone(),
            salary_level: self.salary.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("attrition v{}", env!("CARGO_PKG_VERSION"));

    // Startup precondition: no model, no service.
    let model = ModelHandle::load(&cli.model)
        .with_context(|| format!("loading model from {}", cli.model.display()))?;

    match cli.command {
        Command::Serve { bind } => attrition_web::serve(AppState::new(model), &bind).await,
        Command::Predict(args) => predict(&model, &args),
        Command::Inspect => {
            print!("{}", display::model_card(&model.describe()));
            Ok(())
        }
    }
}

fn predict(model: &ModelHandle, args: &PredictArgs) -> anyhow::Result<()> {
    let profile = args.profile();
    let result = assess(model, &profile)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        // assess already encoded successfully, so this cannot fail.
        let features = encode(&profile)?;
        print!("{}", display::prediction_card(&profile, &features, &result));
    }
    Ok(())
}
