mod commands;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use millwright_core::{FieldAssignment, NewUser, ResourceKind};
use millwright_http::{ClientConfig, ConfigFile, ConfigOverrides};
use tracing_subscriber::EnvFilter;

use commands::{auth, resource, stats, with_resource, Context};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Manage plant maintenance records from the command line.
#[derive(Parser)]
#[command(
    name = "millwright",
    version,
    about = "Plant maintenance records from the command line"
)]
struct Cli {
    /// API server root [env: MILLWRIGHT_API_URL] [default: http://localhost:5000]
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session token sent with every request [env: MILLWRIGHT_TOKEN]
    #[arg(long, global = true)]
    token: Option<String>,

    /// Config file (default: ./millwright.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds [env: MILLWRIGHT_TIMEOUT_SECS] [default: 30]
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log requests and card activity to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Search terms narrowing a listing or export.
#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Case-insensitive term matched against the record's own text fields
    #[arg(long)]
    pub search: Option<String>,

    /// Term also matched against embedded plant, machine, vendor and assignee names
    #[arg(long)]
    pub global_search: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, optionally filtered
    List {
        /// machines, plants, vendors, users, work-orders, maintenance-schedules or inventory
        resource: ResourceKind,
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print one record, with work-order parts and labor
    Show {
        resource: ResourceKind,
        /// Record id
        id: String,
    },

    /// Create a record
    Create {
        resource: ResourceKind,
        /// Field value, repeatable (e.g. --set name="Press 7" --set plant_id=3)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<FieldAssignment>,
        /// JSON object of field values applied before --set
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Update fields of an existing record
    Update {
        resource: ResourceKind,
        /// Record id
        id: String,
        /// Field value, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<FieldAssignment>,
        /// JSON object of field values applied before --set
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Delete a record
    Delete {
        resource: ResourceKind,
        /// Record id
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Write the (filtered) records as CSV
    Export {
        resource: ResourceKind,
        #[command(flatten)]
        search: SearchArgs,
        /// Destination file (default: ./<resource>.csv)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Work-order counters: open, urgent, late and status breakdown
    Stats {
        /// Reference date for lateness, YYYY-MM-DD (default: today, UTC)
        #[arg(long, value_name = "DATE")]
        as_of: Option<String>,
    },

    /// Sign in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "technician", value_enum)]
        role: auth::RoleArg,
        /// Plant the account belongs to
        #[arg(long)]
        plant_id: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ConfigFile::discover(cli.config.as_deref()).and_then(|file| {
        ClientConfig::resolve(
            ConfigOverrides {
                base_url: cli.api_url,
                token: cli.token,
                timeout_secs: cli.timeout_secs,
            },
            &file,
        )
    });
    let config = match config {
        Ok(c) => c,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    };
    tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "resolved configuration");

    let ctx = Context {
        config,
        output: cli.output,
        quiet: cli.quiet,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("failed to start runtime: {}", e), ctx.output, ctx.quiet);
            process::exit(1);
        }
    };

    if let Err(msg) = runtime.block_on(run(cli.command, &ctx)) {
        report_error(&msg, ctx.output, ctx.quiet);
        process::exit(1);
    }
}

async fn run(command: Commands, ctx: &Context) -> Result<(), String> {
    match command {
        Commands::List {
            resource: kind,
            search,
        } => with_resource!(kind, resource::cmd_list(ctx, &search)),
        Commands::Show { resource: kind, id } => {
            with_resource!(kind, resource::cmd_show(ctx, &id))
        }
        Commands::Create {
            resource: kind,
            set,
            data,
        } => with_resource!(kind, resource::cmd_create(ctx, data.as_deref(), &set)),
        Commands::Update {
            resource: kind,
            id,
            set,
            data,
        } => with_resource!(kind, resource::cmd_update(ctx, &id, data.as_deref(), &set)),
        Commands::Delete {
            resource: kind,
            id,
            yes,
        } => with_resource!(kind, resource::cmd_delete(ctx, &id, yes)),
        Commands::Export {
            resource: kind,
            search,
            out,
        } => with_resource!(kind, resource::cmd_export(ctx, &search, out.as_deref())),
        Commands::Stats { as_of } => stats::cmd_stats(ctx, as_of.as_deref()).await,
        Commands::Login { email, password } => auth::cmd_login(ctx, &email, &password).await,
        Commands::Logout => auth::cmd_logout(ctx).await,
        Commands::Whoami => auth::cmd_whoami(ctx).await,
        Commands::Register {
            username,
            email,
            password,
            role,
            plant_id,
        } => {
            let user = NewUser {
                username,
                email,
                password,
                role: role.into(),
                plant_id,
            };
            auth::cmd_register(ctx, &user).await
        }
    }
}

/// Workspace crates whose logs `--verbose` raises to debug.
const LOG_TARGETS: [&str; 5] = [
    "millwright_cli",
    "millwright_card",
    "millwright_http",
    "millwright_api",
    "millwright_core",
];

fn default_log_filter(verbose: bool) -> String {
    if !verbose {
        return "warn".to_string();
    }
    let mut directives = vec!["warn".to_string()];
    directives.extend(LOG_TARGETS.iter().map(|target| format!("{target}=debug")));
    directives.join(",")
}

/// Logs go to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Report an error message in the appropriate format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_filter_is_warn_only() {
        assert_eq!(default_log_filter(false), "warn");
    }

    #[test]
    fn verbose_filter_covers_every_library_crate() {
        let filter = default_log_filter(true);
        for target in [
            "millwright_cli",
            "millwright_card",
            "millwright_http",
            "millwright_api",
            "millwright_core",
        ] {
            assert!(
                filter.contains(&format!("{target}=debug")),
                "{target} missing from {filter}"
            );
        }
        assert!(filter.starts_with("warn,"));
        assert!(filter.parse::<EnvFilter>().is_ok());
    }
}
