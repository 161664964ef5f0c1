// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use library instead of local modules
use carbon_garden::{parse_rate, report, Args, Catalog, CatalogSource, Command, Config, Registration, Session};

fn main() -> Result<()> {
    // Logs go to stderr; quiet unless RUST_LOG asks for more
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carbon_garden=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (config, command) = Args::parse().into_config();
    info!(
        version = carbon_garden::VERSION,
        catalog = %config.catalog_path.display(),
        ?command,
        "starting"
    );

    match command {
        Command::Ui => run_ui_mode(&config),
        Command::List => run_list(&config),
        Command::Register { name, rate } => run_register(&config, &name, &rate),
        Command::Tally { trees } => run_tally(&config, &trees),
        Command::Init { force } => run_init(&config, force),
    }
}

fn open_session(config: &Config) -> Session {
    let (session, source) = Session::open(config);

    if let CatalogSource::Fallback { reason } = &source {
        eprintln!("⚠️  Could not load catalog, using built-in trees");
        eprintln!("   {}", reason);
    }

    session
}

fn run_list(config: &Config) -> Result<()> {
    let session = open_session(config);

    println!("🌳 Tree catalog ({} types)", session.catalog().len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for tree in session.catalog().iter() {
        println!("  {:<20} {:>8.1} {}", tree.name(), tree.rate(), report::CHART_UNIT);
    }

    Ok(())
}

fn run_register(config: &Config, name: &str, rate: &str) -> Result<()> {
    // Strict load: never overwrite a catalog we failed to read
    let catalog = Catalog::load(&config.catalog_path)?;
    let mut session = Session::new(catalog, config.catalog_path.clone());

    let rate = parse_rate(rate)?;
    let registration = session.register(name, rate)?;
    session
        .save()
        .with_context(|| format!("Failed to save catalog to {:?}", config.catalog_path))?;

    match registration {
        Registration::Added => println!("✓ {} added ({:.1} {})", name.trim(), rate, report::CHART_UNIT),
        Registration::Replaced { previous_rate } => println!(
            "✓ {} updated: {:.1} → {:.1} {}",
            name.trim(),
            previous_rate,
            rate,
            report::CHART_UNIT
        ),
    }

    Ok(())
}

fn run_tally(config: &Config, trees: &[String]) -> Result<()> {
    let mut session = open_session(config);

    for name in trees {
        session
            .add(name)
            .with_context(|| format!("Cannot plant {:?}; see `carbon-garden list`", name))?;
    }

    println!("{}", report::garden_line(session.garden()));
    println!();
    println!("{}", report::summary(&session.stats()));

    Ok(())
}

fn run_init(config: &Config, force: bool) -> Result<()> {
    let path = &config.catalog_path;

    if path.exists() && !force {
        bail!("{:?} already exists (use --force to overwrite)", path);
    }

    Catalog::defaults()
        .save(path)
        .with_context(|| format!("Failed to write default catalog to {:?}", path))?;

    println!("✓ Wrote {} default trees to {}", Catalog::defaults().len(), path.display());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let mut session = open_session(config);
    if session.catalog().is_empty() {
        tracing::warn!("catalog is empty");
    }

    // Create and run app
    let mut app = ui::App::new(&mut session);
    ui::run_ui(&mut app)?;

    println!("{}", report::summary(&session.stats()));

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the CLI: carbon-garden list | register | tally");
    std::process::exit(1);
}
