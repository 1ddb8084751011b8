//! h2site - hydrogen site exploration CLI
//!
//! Classifies infrastructure assets around a candidate site, scores sites
//! offline, and talks to the analysis back-end for AI summaries and reports.

use clap::{Args, Parser, Subcommand, ValueEnum};
use h2site_core::config::WeightsConfig;
use h2site_geo::GeoPoint;
use h2site_scoring::Weights;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod catalogue;
mod commands;
mod context;
mod exit;

use commands::{analyze, assets, classify, geocode, health, nearby, reports, score, summarize};
use context::Context;

/// Hydrogen site exploration: asset rings, site scores, reports
#[derive(Parser)]
#[command(name = "h2site")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path to h2site.toml (searched in ., .config/ and the user config dir otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A site center given as latitude and longitude
#[derive(Debug, Clone, Copy, Args)]
pub struct SiteArgs {
    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
}

impl SiteArgs {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

/// Slider weights for the user-preference score; unset ones come from `[scoring.weights]`
#[derive(Debug, Clone, Copy, Args)]
pub struct WeightArgs {
    /// Infrastructure weight
    #[arg(long)]
    pub w_infra: Option<f64>,

    /// Environment weight
    #[arg(long)]
    pub w_env: Option<f64>,

    /// Economic weight
    #[arg(long)]
    pub w_econ: Option<f64>,
}

impl WeightArgs {
    pub fn resolve(&self, defaults: &WeightsConfig) -> Weights {
        Weights {
            infrastructure: self.w_infra.unwrap_or(defaults.infrastructure),
            environment: self.w_env.unwrap_or(defaults.environment),
            economic: self.w_econ.unwrap_or(defaults.economic),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify catalogue assets into primary and secondary rings around a site
    Classify {
        #[command(flatten)]
        site: SiteArgs,

        /// Primary (analysis) radius in km [default: explore.default_radius_km]
        #[arg(short, long)]
        radius: Option<f64>,

        /// Secondary (context) radius in km [default: explore.secondary_radius_km]
        #[arg(short, long)]
        secondary: Option<f64>,

        /// Asset catalogue JSON file (bundled catalogue if not specified)
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Fail on the first asset with invalid coordinates instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// List catalogue assets within a radius, closest first
    Nearby {
        #[command(flatten)]
        site: SiteArgs,

        /// Search radius in km [default: explore.default_radius_km]
        #[arg(short, long)]
        radius: Option<f64>,

        /// Maximum number of assets to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Only assets of this exact category label
        #[arg(long)]
        category: Option<String>,

        /// Asset catalogue JSON file (bundled catalogue if not specified)
        #[arg(short, long)]
        assets: Option<PathBuf>,
    },

    /// Score a site offline from the asset catalogue
    Score {
        #[command(flatten)]
        site: SiteArgs,

        /// Analysis radius in km [default: explore.default_radius_km]
        #[arg(short, long)]
        radius: Option<f64>,

        #[command(flatten)]
        weights: WeightArgs,

        /// Blending factor between model and slider weights [default: scoring.blending_factor]
        #[arg(long)]
        blend: Option<f64>,

        /// Asset catalogue JSON file (bundled catalogue if not specified)
        #[arg(short, long)]
        assets: Option<PathBuf>,
    },

    /// Split an AI summary into insights and recommendations
    Summarize {
        /// Summary text (reads --input or stdin if not given)
        text: Option<String>,

        /// Analysis response JSON; its ai_summary is segmented
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Render the plain-text report for a saved analysis response
    Render {
        /// Analysis response JSON file
        input: PathBuf,

        #[command(flatten)]
        site: SiteArgs,

        /// Analysis radius in km
        #[arg(short, long)]
        radius: f64,

        /// Place name shown as the location
        #[arg(short, long)]
        name: Option<String>,

        /// Write to this file, or into this directory under the dated report name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search places by name
    Geocode {
        /// Free-text place query
        query: String,
    },

    /// Name the place at a point
    Reverse {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Manage the back-end asset catalogue
    Assets {
        #[command(subcommand)]
        action: AssetsAction,
    },

    /// Run the back-end analysis for a site
    Analyze {
        #[command(flatten)]
        site: SiteArgs,

        /// Analysis radius in km [default: explore.default_radius_km]
        #[arg(short, long)]
        radius: Option<f64>,

        #[command(flatten)]
        weights: WeightArgs,

        /// What the site is for; passed to the summary
        #[arg(short, long, default_value = "")]
        description: String,

        /// Account email; required with --save
        #[arg(short, long, env = "H2SITE_USER_EMAIL")]
        email: Option<String>,

        /// Save the analysis to the account's reports
        #[arg(long)]
        save: bool,

        /// Also write the text report to this file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Saved reports
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },

    /// Check back-end health
    Health {
        /// Include response time
        #[arg(short, long)]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum AssetsAction {
    /// List catalogue assets
    List {
        /// Only assets of this exact category label
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one asset
    Get {
        /// Asset ID
        id: String,
    },

    /// Create an asset
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Category label as stored by the back-end
        #[arg(long)]
        category: String,

        #[command(flatten)]
        site: SiteArgs,

        /// Capital expenditure estimate
        #[arg(long)]
        capex: Option<f64>,

        /// Operating expenditure estimate
        #[arg(long)]
        opex: Option<f64>,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an asset
    Delete {
        /// Asset ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ReportsAction {
    /// List saved reports
    List {
        /// Account email
        #[arg(short, long, env = "H2SITE_USER_EMAIL")]
        email: String,

        /// Case-insensitive match on name or location
        #[arg(short, long)]
        query: Option<String>,

        /// Only reports with this status (completed, processing, failed)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Save an analysis response file to the account
    Save {
        /// Analysis response JSON file
        input: PathBuf,

        #[command(flatten)]
        site: SiteArgs,

        /// Analysis radius in km
        #[arg(short, long)]
        radius: f64,

        /// Place name
        #[arg(short, long)]
        name: Option<String>,

        /// Account email
        #[arg(short, long, env = "H2SITE_USER_EMAIL")]
        email: String,
    },

    /// Ask the back-end to compare analyses against a question
    Compare {
        /// Analysis response JSON files; each file name becomes the report name
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Question to answer across the reports
        #[arg(short, long)]
        question: String,

        /// Account email
        #[arg(short, long, env = "H2SITE_USER_EMAIL")]
        email: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match Context::load(cli.config.as_deref(), cli.format) {
        Ok(ctx) => ctx,
        Err(e) => return exit::report(&e),
    };

    let _telemetry = match ctx.init_telemetry(cli.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{} {e:#}", "Warning:".yellow().bold());
            None
        }
    };

    let result = match cli.command {
        Commands::Classify { site, radius, secondary, assets, strict } => {
            classify::run(&ctx, site.point(), radius, secondary, assets.as_deref(), strict)
        }

        Commands::Nearby { site, radius, top, category, assets } => nearby::run(
            &ctx,
            site.point(),
            radius,
            top,
            category.as_deref(),
            assets.as_deref(),
        ),

        Commands::Score { site, radius, weights, blend, assets } => {
            score::run(&ctx, site.point(), radius, weights, blend, assets.as_deref())
        }

        Commands::Summarize { text, input } => summarize::run(&ctx, text, input.as_deref()),

        Commands::Render { input, site, radius, name, output } => {
            summarize::render(&ctx, &input, site.point(), radius, name, output.as_deref())
        }

        Commands::Geocode { query } => geocode::forward(&ctx, &query).await,

        Commands::Reverse { site } => geocode::reverse(&ctx, site.point()).await,

        Commands::Assets { action } => match action {
            AssetsAction::List { category } => assets::list(&ctx, category.as_deref()).await,
            AssetsAction::Get { id } => assets::get(&ctx, &id).await,
            AssetsAction::Create { name, category, site, capex, opex, description } => {
                assets::create(&ctx, name, category, site.point(), capex, opex, description)
                    .await
            }
            AssetsAction::Delete { id } => assets::delete(&ctx, &id).await,
        },

        Commands::Analyze { site, radius, weights, description, email, save, output } => {
            analyze::run(
                &ctx,
                analyze::AnalyzeArgs {
                    center: site.point(),
                    radius_km: radius,
                    weights,
                    description,
                    email,
                    save,
                    output,
                },
            )
            .await
        }

        Commands::Reports { action } => match action {
            ReportsAction::List { email, query, status } => {
                reports::list(&ctx, &email, query, status.as_deref()).await
            }
            ReportsAction::Save { input, site, radius, name, email } => {
                reports::save(&ctx, &input, site.point(), radius, name, &email).await
            }
            ReportsAction::Compare { inputs, question, email } => {
                reports::compare(&ctx, &inputs, question, email).await
            }
        },

        Commands::Health { detailed } => health::run(&ctx, detailed).await,
    };

    h2site_telemetry::log_metrics();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit::report(&e),
    }
}
