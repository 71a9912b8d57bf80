use analytics::{generate_colors, line_series, ChartFormatter, TrendAnalyzer};
use anyhow::Context;
use api_client::{
    ApiError, AuthSession, DashboardClient, ErrorPayload, FileSessionStore, MatchFilters,
    PerformanceQuery, PlayerFilters, ProfileUpdate, SportsApi,
};
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::Config;
use core_types::{EntityType, Match, MatchStatus, Player, Team, TrendPeriod};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Exit code used when the backend rejects the request for lack of a valid session.
const EXIT_SESSION_EXPIRED: u8 = 2;

/// The main entry point for the Pitchside dashboard client.
#[tokio::main]
async fn main() -> ExitCode {
    // A .env file is optional; it only carries PITCHSIDE_* overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = match configuration::init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match connect(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let had_session = client.session().is_authenticated();
    let is_auth_command = matches!(cli.command, Commands::Login(_) | Commands::Register(_));

    // Execute the appropriate command
    match run(cli.command, &client, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ApiError>() {
            Some(api_error) if api_error.is_unauthorized() => {
                match unauthorized_notice(is_auth_command, had_session) {
                    Some(notice) => {
                        eprintln!("{}", notice);
                        ExitCode::from(EXIT_SESSION_EXPIRED)
                    }
                    None => {
                        eprintln!("Error: {}", ErrorPayload::from(api_error).error);
                        ExitCode::FAILURE
                    }
                }
            }
            Some(api_error) => {
                tracing::debug!(error = ?api_error, "Command failed.");
                eprintln!("Error: {}", ErrorPayload::from(api_error).error);
                ExitCode::FAILURE
            }
            None => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// What to tell the user when the backend answers 401.
///
/// Bad credentials also come back as a 401, so login and register report the
/// backend's message instead (`None`).
fn unauthorized_notice(is_auth_command: bool, had_session: bool) -> Option<&'static str> {
    match (is_auth_command, had_session) {
        (true, _) => None,
        (false, true) => Some("Session expired, run `pitchside login`."),
        (false, false) => Some("Not logged in, run `pitchside login`."),
    }
}

/// Restores the stored session and builds the API client around it.
fn connect(config: &Config) -> anyhow::Result<DashboardClient> {
    let store = FileSessionStore::new(&config.session.path);
    let session = AuthSession::load(store).with_context(|| {
        format!("Failed to load the session from {}", config.session.path.display())
    })?;
    let client = DashboardClient::new(&config.api, Arc::new(session))?;
    tracing::debug!(base_url = client.base_url(), "API client ready.");
    Ok(client)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Terminal client for the football analytics dashboard.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session.
    Login(LoginArgs),
    /// Create an account and store the session.
    Register(RegisterArgs),
    /// Forget the stored session.
    Logout,
    /// Show the user of the stored session without contacting the backend.
    Whoami,
    /// Show the own profile, or update it when a field is given.
    Profile(ProfileArgs),
    /// Check that the backend is up.
    Health,
    /// Summary counts, recent matches, top scorers and positions.
    Dashboard,
    /// List teams, or show one team's details.
    Teams(TeamsArgs),
    /// List players, or show one player's details.
    Players(PlayersArgs),
    /// List matches, or show one match's details.
    Matches(MatchesArgs),
    /// Standings of a league in a season.
    LeagueTable(LeagueTableArgs),
    /// Head-to-head comparison of two teams.
    CompareTeams(CompareArgs),
    /// Side-by-side comparison of two players.
    ComparePlayers(CompareArgs),
    /// Summary and trend of one metric for a team or a player.
    Trends(TrendsArgs),
    /// Print the colours assigned to a number of chart series.
    Palette(PaletteArgs),
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
}

#[derive(Args)]
struct ProfileArgs {
    /// New username.
    #[arg(long)]
    username: Option<String>,
    /// New email address.
    #[arg(long)]
    email: Option<String>,
}

#[derive(Args)]
struct TeamsArgs {
    /// Show a single team.
    #[arg(long)]
    id: Option<i64>,
    /// List the team's squad.
    #[arg(long, requires = "id", conflicts_with_all = ["matches", "stats"])]
    players: bool,
    /// List the team's matches.
    #[arg(long, requires = "id", conflicts_with = "stats")]
    matches: bool,
    /// Show the team's season statistics.
    #[arg(long, requires = "id")]
    stats: bool,
}

#[derive(Args)]
struct PlayersArgs {
    #[arg(long)]
    team_id: Option<i64>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    nationality: Option<String>,
    /// Show a single player.
    #[arg(long, conflicts_with_all = ["team_id", "position", "nationality"])]
    id: Option<i64>,
    /// Show the player's statistics.
    #[arg(long, requires = "id", conflicts_with = "performance")]
    stats: bool,
    /// Show the player's per-match performance.
    #[arg(long, requires = "id")]
    performance: bool,
}

#[derive(Args)]
struct MatchesArgs {
    #[arg(long)]
    team_id: Option<i64>,
    /// One of scheduled, live, completed, postponed, cancelled.
    #[arg(long)]
    status: Option<MatchStatus>,
    #[arg(long)]
    competition: Option<String>,
    #[arg(long)]
    season: Option<String>,
    /// Show a single match.
    #[arg(long, conflicts_with_all = ["team_id", "status", "competition", "season"])]
    id: Option<i64>,
    /// Show the match statistics.
    #[arg(long, requires = "id", conflicts_with = "timeline")]
    stats: bool,
    /// Show the match events in order.
    #[arg(long, requires = "id")]
    timeline: bool,
}

#[derive(Args)]
struct LeagueTableArgs {
    /// League name (e.g., "Liga Portugal").
    #[arg(long)]
    league: String,
    /// Season (e.g., "2023/2024").
    #[arg(long)]
    season: String,
}

#[derive(Args)]
struct CompareArgs {
    first: i64,
    second: i64,
}

#[derive(Args)]
struct TrendsArgs {
    /// team or player.
    #[arg(long)]
    entity_type: EntityType,
    #[arg(long)]
    entity_id: i64,
    /// Field to analyze (e.g., goals, possession, shots, passes, tackles).
    #[arg(long, default_value = "goals")]
    metric: String,
    /// last_5, last_10 or season. Defaults to the configured period.
    #[arg(long)]
    period: Option<TrendPeriod>,
    /// Also print the series as line-chart records.
    #[arg(long)]
    chart: bool,
}

#[derive(Args)]
struct PaletteArgs {
    /// Number of series that need a colour.
    count: usize,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn run(command: Commands, client: &DashboardClient, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Login(args) => {
            let password = read_password(args.password)?;
            let response = with_spinner("Logging in...", client.login(&args.email, &password)).await?;
            let name = response.user.as_ref().map(|u| u.username.as_str()).unwrap_or(args.email.as_str());
            println!("Logged in as {}.", name);
        }
        Commands::Register(args) => {
            let password = read_password(args.password)?;
            let response = with_spinner(
                "Creating account...",
                client.register(&args.username, &args.email, &password),
            )
            .await?;
            println!("{}", response.message.as_deref().unwrap_or("Account created."));
        }
        Commands::Logout => {
            client.session().logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => match client.session().current() {
            Some(user) => println!("{} <{}>", user.username, user.email),
            None if client.session().is_authenticated() => println!("Logged in (user unknown)."),
            None => println!("Not logged in."),
        },
        Commands::Profile(args) => handle_profile(client, args).await?,
        Commands::Health => {
            let health = with_spinner("Checking backend...", client.health()).await?;
            print_json(&health)?;
        }
        Commands::Dashboard => handle_dashboard(client).await?,
        Commands::Teams(args) => handle_teams(client, args).await?,
        Commands::Players(args) => handle_players(client, args).await?,
        Commands::Matches(args) => handle_matches(client, args).await?,
        Commands::LeagueTable(args) => handle_league_table(client, args).await?,
        Commands::CompareTeams(args) => {
            let comparison =
                with_spinner("Comparing teams...", client.compare_teams(args.first, args.second)).await?;
            print_json(&comparison)?;
        }
        Commands::ComparePlayers(args) => {
            let comparison =
                with_spinner("Comparing players...", client.compare_players(args.first, args.second))
                    .await?;
            print_json(&comparison)?;
        }
        Commands::Trends(args) => handle_trends(client, config, args).await?,
        Commands::Palette(args) => print_palette(args.count),
    }

    Ok(())
}

async fn handle_profile(client: &DashboardClient, args: ProfileArgs) -> anyhow::Result<()> {
    let user = if args.username.is_none() && args.email.is_none() {
        with_spinner("Fetching profile...", client.profile()).await?
    } else {
        let update = ProfileUpdate {
            username: args.username,
            email: args.email,
        };
        let response = with_spinner("Updating profile...", client.update_profile(&update)).await?;
        if let Some(message) = &response.message {
            println!("{}", message);
        }
        response.user
    };

    let mut table = new_table(&["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), user.id.to_string()]);
    table.add_row(vec!["Username".to_string(), user.username]);
    table.add_row(vec!["Email".to_string(), user.email]);
    table.add_row(vec![
        "Member since".to_string(),
        user.created_at.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".to_string()),
    ]);
    println!("{table}");
    Ok(())
}

/// Fetches the dashboard and the backend health concurrently.
async fn handle_dashboard(client: &DashboardClient) -> anyhow::Result<()> {
    let spinner = new_spinner("Loading dashboard...");
    let (dashboard, health) = tokio::join!(client.dashboard(), client.health());
    spinner.finish_and_clear();

    let dashboard = dashboard?;
    let backend = match health {
        Ok(value) => value.get("status").and_then(Value::as_str).unwrap_or("ok").to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed while loading the dashboard.");
            "unreachable".to_string()
        }
    };

    println!(
        "Teams: {}  Players: {}  Matches: {}  Backend: {}",
        dashboard.summary.total_teams,
        dashboard.summary.total_players,
        dashboard.summary.total_matches,
        backend
    );

    if !dashboard.recent_matches.is_empty() {
        println!("\nRecent matches");
        println!("{}", matches_table(&dashboard.recent_matches));
    }

    if !dashboard.top_scorers.is_empty() {
        let mut table = new_table(&["#", "Player", "Team", "Goals"]);
        for (rank, scorer) in dashboard.top_scorers.iter().enumerate() {
            table.add_row(vec![
                (rank + 1).to_string(),
                scorer.player_name.clone(),
                scorer.team_name.clone(),
                scorer.goals.to_string(),
            ]);
        }
        println!("\nTop scorers\n{table}");
    }

    if !dashboard.position_distribution.is_empty() {
        let colors = generate_colors(dashboard.position_distribution.len());
        let mut table = new_table(&["Position", "Players", "Colour"]);
        for (row, color) in dashboard.position_distribution.iter().zip(colors) {
            table.add_row(vec![row.position.clone(), row.count.to_string(), color]);
        }
        println!("\nPlayers by position\n{table}");
    }

    Ok(())
}

async fn handle_teams(client: &DashboardClient, args: TeamsArgs) -> anyhow::Result<()> {
    let Some(id) = args.id else {
        let teams = with_spinner("Fetching teams...", client.teams()).await?;
        println!("{}", teams_table(&teams));
        return Ok(());
    };

    if args.players {
        let players = with_spinner("Fetching squad...", client.team_players(id)).await?;
        println!("{}", players_table(&players));
    } else if args.matches {
        let matches = with_spinner("Fetching matches...", client.team_matches(id)).await?;
        println!("{}", matches_table(&matches));
    } else if args.stats {
        let stats = with_spinner("Fetching statistics...", client.team_statistics(id)).await?;
        let mut table = new_table(&["Team", "P", "W", "D", "L", "GF", "GA", "Win %", "Form"]);
        table.add_row(vec![
            stats.team_name.clone(),
            stats.total_matches.to_string(),
            stats.wins.to_string(),
            stats.draws.to_string(),
            stats.losses.to_string(),
            stats.goals_scored.to_string(),
            stats.goals_conceded.to_string(),
            format!("{:.1}", stats.win_percentage),
            stats.form.join(" "),
        ]);
        println!("{table}");
    } else {
        let team = with_spinner("Fetching team...", client.team(id)).await?;
        println!("{}", teams_table(std::slice::from_ref(&team)));
    }
    Ok(())
}

async fn handle_players(client: &DashboardClient, args: PlayersArgs) -> anyhow::Result<()> {
    let Some(id) = args.id else {
        let filters = PlayerFilters {
            team_id: args.team_id,
            position: args.position,
            nationality: args.nationality,
        };
        let players = with_spinner("Fetching players...", client.players(&filters)).await?;
        println!("{}", players_table(&players));
        return Ok(());
    };

    if args.stats {
        print_json(&with_spinner("Fetching statistics...", client.player_statistics(id)).await?)?;
    } else if args.performance {
        print_json(&with_spinner("Fetching performance...", client.player_performance(id)).await?)?;
    } else {
        let player = with_spinner("Fetching player...", client.player(id)).await?;
        println!("{}", players_table(std::slice::from_ref(&player)));
    }
    Ok(())
}

async fn handle_matches(client: &DashboardClient, args: MatchesArgs) -> anyhow::Result<()> {
    let Some(id) = args.id else {
        let filters = MatchFilters {
            team_id: args.team_id,
            status: args.status,
            competition: args.competition,
            season: args.season,
        };
        let matches = with_spinner("Fetching matches...", client.matches(&filters)).await?;
        println!("{}", matches_table(&matches));
        return Ok(());
    };

    if args.stats {
        print_json(&with_spinner("Fetching statistics...", client.match_statistics(id)).await?)?;
    } else if args.timeline {
        print_json(&with_spinner("Fetching timeline...", client.match_timeline(id)).await?)?;
    } else {
        let fixture = with_spinner("Fetching match...", client.match_details(id)).await?;
        println!("{}", matches_table(std::slice::from_ref(&fixture)));
    }
    Ok(())
}

async fn handle_league_table(client: &DashboardClient, args: LeagueTableArgs) -> anyhow::Result<()> {
    let standings =
        with_spinner("Fetching standings...", client.league_table(&args.league, &args.season)).await?;

    println!("{} {}", standings.league, standings.season);
    let mut table = new_table(&["Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"]);
    for row in &standings.table {
        table.add_row(vec![
            row.position.to_string(),
            row.team_name.clone(),
            row.played.to_string(),
            row.wins.to_string(),
            row.draws.to_string(),
            row.losses.to_string(),
            row.goals_for.to_string(),
            row.goals_against.to_string(),
            format!("{:+}", row.goal_difference),
            row.points.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Summarizes one metric of a performance series and its trend over the configured window.
async fn handle_trends(client: &DashboardClient, config: &Config, args: TrendsArgs) -> anyhow::Result<()> {
    let analyzer = TrendAnalyzer::new(config.analytics.trend_periods)?;
    let formatter = ChartFormatter::with_date_format(&config.analytics.date_format)?;
    let query = PerformanceQuery {
        entity_type: args.entity_type,
        entity_id: args.entity_id,
        metric: args.metric,
        period: args.period.unwrap_or(config.analytics.default_period),
    };

    let trends = with_spinner("Fetching performance data...", client.performance_trends(&query)).await?;
    let report = analyzer.analyze(&trends, &query.metric);

    println!("{} ({}, {})", trends.entity_name(), query.entity_type, query.period);
    let mut table = new_table(&["Metric", "Matches", "Min", "Max", "Avg", "Total", "Trend"]);
    table.add_row(vec![
        report.metric.clone(),
        report.observations.to_string(),
        format!("{:.2}", report.summary.min),
        format!("{:.2}", report.summary.max),
        format!("{:.2}", report.summary.avg),
        format!("{:.2}", report.summary.sum),
        format!("{} {:+.1}% (last {})", report.direction(), report.trend_pct, report.window),
    ]);
    println!("{table}");

    if args.chart {
        let points = line_series(&trends, &query.metric);
        print_json(&Value::Array(formatter.format(points, "line")))?;
    }
    Ok(())
}

fn print_palette(count: usize) {
    let mut table = new_table(&["Series", "Colour"]);
    for (i, color) in generate_colors(count).into_iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), color]);
    }
    println!("{table}");
}

// ==============================================================================
// Rendering Helpers
// ==============================================================================

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.iter().copied());
    table
}

fn teams_table(teams: &[Team]) -> Table {
    let mut table = new_table(&["ID", "Name", "Country", "League", "Founded"]);
    for team in teams {
        table.add_row(vec![
            team.id.to_string(),
            team.name.clone(),
            team.country.clone(),
            team.league.clone(),
            or_dash(team.founded_year.as_ref()),
        ]);
    }
    table
}

fn players_table(players: &[Player]) -> Table {
    let mut table = new_table(&["ID", "Name", "Position", "Nationality", "No.", "Team"]);
    for player in players {
        table.add_row(vec![
            player.id.to_string(),
            player.name.clone(),
            player.position.clone(),
            player.nationality.clone(),
            or_dash(player.jersey_number.as_ref()),
            player.team_id.to_string(),
        ]);
    }
    table
}

fn matches_table(matches: &[Match]) -> Table {
    let mut table = new_table(&["ID", "Date", "Competition", "Home", "Score", "Away", "Status"]);
    for m in matches {
        table.add_row(vec![
            m.id.to_string(),
            m.date.format("%Y-%m-%d %H:%M").to_string(),
            m.competition.clone(),
            m.home_team_id.to_string(),
            m.score_line(),
            m.away_team_id.to_string(),
            m.status.to_string(),
        ]);
    }
    table
}

fn or_dash<T: Display>(value: Option<&T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Awaits one API call behind a spinner.
async fn with_spinner<T>(
    message: &str,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    let spinner = new_spinner(message);
    let result = call.await;
    spinner.finish_and_clear();
    result
}

/// Uses the password given on the command line, or reads one line from stdin.
fn read_password(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read the password from stdin")?;

    let password = line.trim_end_matches(|c| c == '\r' || c == '\n').to_string();
    if password.is_empty() {
        anyhow::bail!("A password is required");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_request_notice_depends_on_prior_session() {
        assert_eq!(
            unauthorized_notice(false, true),
            Some("Session expired, run `pitchside login`.")
        );
        assert_eq!(
            unauthorized_notice(false, false),
            Some("Not logged in, run `pitchside login`.")
        );
        // Wrong credentials on login are a plain error.
        assert_eq!(unauthorized_notice(true, false), None);
        assert_eq!(unauthorized_notice(true, true), None);
    }

    #[test]
    fn cli_accepts_backend_enum_names() {
        let cli = Cli::try_parse_from([
            "pitchside", "trends", "--entity-type", "player", "--entity-id", "9", "--period", "last_10",
        ])
        .unwrap();
        let Commands::Trends(args) = cli.command else {
            panic!("expected the trends command");
        };
        assert_eq!(args.entity_type, EntityType::Player);
        assert_eq!(args.period, Some(TrendPeriod::Last10));
        assert_eq!(args.metric, "goals");
    }
}
