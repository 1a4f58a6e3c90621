//! Command-line interface for managing sitekit users, sites and routes.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Args, Parser, Subcommand};

mod commands;
mod config;
mod error;

pub use error::CliError;

use config::StoreArgs;

/// Run the sitekit CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli, &mut stdout)
}

fn run_with(cli: Cli, writer: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::User { action } => commands::run_user(action, cli.store, writer),
        Command::Site { action } => commands::run_site(action, cli.store, writer),
        Command::Route { action } => commands::run_route(action, cli.store, writer),
        Command::Consent { action } => commands::run_consent(action, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sitekit",
    about = "Manage sitekit users, sites and routes",
    version
)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create and look up users.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },
    /// Create, list, show and update sites.
    Site {
        #[command(subcommand)]
        action: SiteCommand,
    },
    /// Create routes and render the routes page.
    Route {
        #[command(subcommand)]
        action: RouteCommand,
    },
    /// Render the consent banner and consent cookies.
    Consent {
        #[command(subcommand)]
        action: ConsentCommand,
    },
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Store a user under its auth identifier, replacing any existing one.
    Create(CreateUserArgs),
    /// Print a user found by identifier or username.
    Show(ShowUserArgs),
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    /// External auth identifier.
    #[arg(long)]
    id: String,
    /// Public handle.
    #[arg(long)]
    username: String,
    /// Contact address.
    #[arg(long)]
    email: Option<String>,
    /// Human-friendly name.
    #[arg(long)]
    display_name: Option<String>,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct ShowUserArgs {
    /// Look up by auth identifier.
    #[arg(long)]
    id: Option<String>,
    /// Look up by username.
    #[arg(long)]
    username: Option<String>,
}

#[derive(Debug, Subcommand)]
enum SiteCommand {
    /// Create a site for an existing user.
    Create(CreateSiteArgs),
    /// List every site, or only those owned by one user.
    List(ListSitesArgs),
    /// Print one site.
    Show(SiteIdArgs),
    /// Change site attributes and refresh its update time.
    Update(UpdateSiteArgs),
}

#[derive(Debug, Args)]
struct CreateSiteArgs {
    /// Owner's user identifier.
    #[arg(long)]
    user_id: String,
    /// Display name.
    #[arg(long)]
    name: String,
    /// Subdomain label.
    #[arg(long)]
    subdomain: String,
    /// Optional tagline.
    #[arg(long)]
    description: Option<String>,
    /// Optional custom domain.
    #[arg(long)]
    custom_domain: Option<String>,
}

#[derive(Debug, Args)]
struct ListSitesArgs {
    /// Only list sites owned by this user.
    #[arg(long)]
    user_id: Option<String>,
}

#[derive(Debug, Args)]
struct SiteIdArgs {
    /// Site identifier.
    #[arg(long)]
    site_id: String,
}

#[derive(Debug, Args)]
struct UpdateSiteArgs {
    /// Site identifier.
    #[arg(long)]
    site_id: String,
    /// Replacement display name.
    #[arg(long)]
    name: Option<String>,
    /// Replacement subdomain label.
    #[arg(long)]
    subdomain: Option<String>,
    /// Replacement tagline.
    #[arg(long)]
    description: Option<String>,
    /// Replacement custom domain.
    #[arg(long)]
    custom_domain: Option<String>,
}

#[derive(Debug, Subcommand)]
enum RouteCommand {
    /// Create a route under an existing site.
    Create(CreateRouteArgs),
    /// Render the routes page of a site as HTML.
    Page(SiteIdArgs),
}

#[derive(Debug, Args)]
struct CreateRouteArgs {
    /// Parent site identifier.
    #[arg(long)]
    site_id: String,
    /// URL path.
    #[arg(long)]
    path: String,
    /// Page title.
    #[arg(long)]
    title: String,
    /// Optional summary.
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ConsentCommand {
    /// Render the banner for a request carrying the given `Cookie` header.
    Banner(BannerArgs),
    /// Print the `Set-Cookie` header recording a consent choice.
    Save(SaveConsentArgs),
}

#[derive(Debug, Args)]
struct BannerArgs {
    /// Request `Cookie` header; omit for a first visit.
    #[arg(long)]
    cookie: Option<String>,
}

#[derive(Debug, Args)]
struct SaveConsentArgs {
    /// Grant every category, as the "Accept All" button does.
    #[arg(long)]
    all: bool,
    /// Analytics toggle.
    #[arg(long, value_name = "bool")]
    analytics: Option<bool>,
    /// Marketing toggle.
    #[arg(long, value_name = "bool")]
    marketing: Option<bool>,
}

#[cfg(test)]
mod tests;
