use anyhow::Result;
use clap::{Parser, Subcommand};
use model::Horizon;
use std::path::PathBuf;

pub mod commands;
pub mod output;

use crate::config::{Settings, initialize_dashboard};
use commands::{ask, dashboard, forecast, groups, history, overview, upload};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "procast")]
#[command(about = "Demand forecasting dashboard for the terminal")]
#[command(version)]
pub struct Cli {
    /// Sales group catalog (JSON or YAML list of groups)
    ///
    /// The built-in mock catalog is used when no file is given.
    #[arg(long, global = true, env = "PROCAST_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        env = "PROCAST_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sales groups matching a search and category filter
    Groups {
        /// Case-insensitive text searched in group names
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category to filter by; repeat for several (any match)
        ///
        /// Passing "All" clears the categories given before it.
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Also match the search text against tags
        #[arg(long)]
        search_tags: bool,
    },
    /// Generate a forecast for a sales group
    Forecast {
        /// Sales group id
        #[arg(short, long)]
        group: String,

        /// Forecast horizon: 1-month, 3-months, 1-year or aop
        #[arg(long, default_value_t = Horizon::ThreeMonths)]
        horizon: Horizon,

        /// Ignore holidays, weekends and seasonal patterns
        #[arg(long)]
        no_calendar: bool,

        /// Ignore pricing changes and elasticity
        #[arg(long)]
        no_price: bool,

        /// Save the result to the group's forecast history
        #[arg(long)]
        save: bool,
    },
    /// Upload sales data for an existing or a new sales group
    Upload {
        /// Sales group id
        #[arg(short, long, conflicts_with = "new", required_unless_present = "new")]
        group: Option<String>,

        /// Create a new sales group instead
        #[arg(long, requires = "name")]
        new: bool,

        /// Group name (required with --new)
        #[arg(long)]
        name: Option<String>,

        /// Group description
        #[arg(long)]
        description: Option<String>,

        /// Comma separated tags, e.g. "Milk, importation"
        #[arg(long)]
        tags: Option<String>,
    },
    /// Show the analytics dashboard of a sales group
    Dashboard {
        /// Sales group id
        #[arg(short, long)]
        group: String,
    },
    /// Show the forecast history of a sales group
    History {
        /// Sales group id
        #[arg(short, long)]
        group: String,

        /// Show the details of one history record
        #[arg(long)]
        view: Option<String>,
    },
    /// Ask the ProAsk assistant a question
    Ask {
        /// The question
        prompt: String,
    },
    /// Show the executive overview
    Overview,
}

impl Cli {
    pub async fn run(self, settings: &Settings) -> Result<()> {
        let rendered = self.execute(settings).await?;
        println!("{}", rendered);
        Ok(())
    }

    /// Runs the command and returns the rendered output.
    pub async fn execute(self, settings: &Settings) -> Result<String> {
        let mut session = initialize_dashboard(self.catalog.as_deref(), settings).await?;
        let format = self.format;

        match self.command {
            Commands::Groups {
                search,
                categories,
                search_tags,
            } => groups(&session, &search, &categories, search_tags, format),
            Commands::Forecast {
                group,
                horizon,
                no_calendar,
                no_price,
                save,
            } => {
                let options = model::ForecastOptions {
                    horizon,
                    include_calendar: !no_calendar,
                    include_price: !no_price,
                };
                forecast(&mut session, &group, options, save, format).await
            }
            Commands::Upload {
                group,
                new: _,
                name,
                description,
                tags,
            } => {
                let request = commands::UploadRequest {
                    group,
                    name,
                    description,
                    tags,
                };
                upload(&mut session, request, format).await
            }
            Commands::Dashboard { group } => dashboard(&mut session, &group, format),
            Commands::History { group, view } => {
                history(&mut session, &group, view.as_deref(), format)
            }
            Commands::Ask { prompt } => ask(&mut session, &prompt, format).await,
            Commands::Overview => overview(&mut session, format),
        }
    }
}
