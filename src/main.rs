//! # compliance-reports CLI
//!
//! Usage:
//!   compliance-reports render request.json -o out/
//!   echo '{ ... }' | compliance-reports render
//!   compliance-reports example supervision > request.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use compliance_reports::{render_json, save_report, ReportKind};

#[derive(Parser)]
#[command(name = "compliance-reports")]
#[command(version)]
#[command(about = "Render HR compliance forms to paginated PDF reports", long_about = None)]
struct Cli {
    /// Log page breaks and asset loading
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report request to a PDF named after its kind, person and date
    Render {
        /// Request JSON file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Print a sample request for a report kind
    Example {
        /// job-application, supervision or appraisal
        #[arg(value_name = "KIND")]
        kind: ReportKind,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Render { input, output } => match render(input, output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("✗ {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Example { kind } => {
            print!("{}", example_request(kind));
            ExitCode::SUCCESS
        }
    }
}

fn render(input: Option<PathBuf>, output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let json = match input {
        Some(path) => fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let report = render_json(&json)?;
    fs::create_dir_all(&output)?;
    let path = save_report(&report, &output)?;
    eprintln!("✓ Written {} bytes to {}", report.bytes.len(), path.display());
    Ok(())
}

fn example_request(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::JobApplication => {
            r##"{
  "kind": "jobApplication",
  "branding": { "name": "Acme Care" },
  "data": {
    "personalInfo": {
      "title": "Ms",
      "fullName": "Jane Doe",
      "email": "jane.doe@example.com",
      "telephone": "07700 900123",
      "streetAddress": "1 High Street",
      "town": "Croydon",
      "postcode": "CR0 1AA",
      "positionAppliedFor": "Care Assistant",
      "englishProficiency": "Fluent",
      "otherLanguages": ["French"],
      "hasDBS": "Yes",
      "hasCarAndLicense": "No"
    },
    "availability": {
      "timeSlots": { "Morning": ["Monday", "Tuesday"], "Evening": ["Friday"] },
      "hoursPerWeek": 30,
      "hasRightToWork": true
    },
    "emergencyContact": { "fullName": "John Doe", "relationship": "Brother", "contactNumber": "07700 900456" },
    "employmentHistory": {
      "previouslyEmployed": "Yes",
      "recentEmployer": { "company": "Sunrise Homes", "position": "Carer", "from": "2021", "to": "2025" }
    },
    "references": [{ "name": "Alex Lead", "company": "Sunrise Homes", "email": "alex@example.com" }],
    "skillsExperience": { "skills": { "Dementia care": "Good", "Medication": "Basic" } },
    "declaration": { "convictedOfOffence": "No", "healthConditions": "No" },
    "termsPolicy": { "consentToTerms": true, "signatureFullName": "Jane Doe", "date": "16-10-2026" }
  }
}
"##
        }
        ReportKind::Supervision => {
            r##"{
  "kind": "supervision",
  "branding": { "name": "Acme Care" },
  "data": {
    "employeeName": "Sam Carer",
    "supervisorName": "Alex Lead",
    "dateOfSupervision": "16-10-2026",
    "howAreYou": "Settling in well.",
    "workload": "Manageable.",
    "perServiceUser": [
      { "serviceUserName": "Mr A", "bruises": { "value": "yes" }, "bruisesCauses": "Fell in the garden" },
      { "serviceUserName": "Mrs B", "bruises": { "value": "no" }, "pressureSores": { "value": "no" } }
    ],
    "officeUse": { "reviewedBy": "Registered Manager" }
  }
}
"##
        }
        ReportKind::AnnualAppraisal => {
            r##"{
  "kind": "annualAppraisal",
  "branding": { "name": "Acme Care" },
  "data": {
    "employeeName": "Pat Smith",
    "jobTitle": "Senior Carer",
    "managerName": "Alex Lead",
    "ratings": {
      "clientCare": "A", "careStandards": "B", "safetyHealth": "B", "medicationManagement": "C",
      "communication": "A", "responsiveness": "B", "professionalDevelopment": "D", "attendance": "A"
    },
    "commentsManager": "A strong year.",
    "trainingNeeds": "Medication refresher.",
    "nextReviewDate": "16-10-2027"
  }
}
"##
        }
    }
}
