use anyhow::Context;
use asset_sheet::decode_markup;
use asset_sheet::fill_form;
use asset_sheet::locate_fields;
use asset_sheet::registry::import_workbook;
use asset_sheet::report::extract_hardware;
use asset_sheet::spreadsheet::Sheet;
use asset_sheet::spreadsheet::SheetSelector;
use asset_sheet::spreadsheet::XlsxWorkbook;
use asset_sheet::CanonicalField;
use asset_sheet::Config;
use asset_sheet::FormRequest;
use asset_sheet::RegistryStore;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "asset-sheet")]
#[command(about = "Fill asset configuration forms from hardware reports and the asset registry", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Registry file, overriding the configured one
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the registry with the contents of a registry workbook
    Import {
        workbook: PathBuf,

        /// Worksheet name pattern, tried before the configured ones
        #[arg(short, long)]
        sheet: Option<String>,
    },
    /// Print the hardware fields of a report, correlated with the registry
    Extract {
        report: PathBuf,

        /// Skip registry correlation
        #[arg(long)]
        raw: bool,
    },
    /// Print the field locations of a form template
    Locate {
        template: PathBuf,

        /// Template worksheet name, instead of the active sheet
        #[arg(short, long)]
        sheet: Option<String>,
    },
    /// Compute the values and cells of a configuration form
    Fill {
        report: PathBuf,

        #[arg(short, long)]
        template: PathBuf,

        /// Template worksheet name, instead of the active sheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// OSSM ticket number
        #[arg(long, default_value = "")]
        ticket: String,

        /// Delivery note number
        #[arg(long, default_value = "")]
        delivery_note: String,
    },
    /// Delete every registry record
    Wipe,
    /// Show the registry size and its asset ids
    Status,
}

#[derive(Serialize)]
struct Status<'a> {
    database: &'a Path,
    assets: usize,
    ids: Vec<&'a str>,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_report(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Cannot read report '{}'", path.display()))?;
    Ok(decode_markup(&bytes))
}

fn read_template(path: &Path, sheet: Option<&str>) -> anyhow::Result<Sheet> {
    let mut workbook = XlsxWorkbook::open(path)?;
    let sheet = match sheet {
        Some(name) => workbook.read_sheet_named(name)?,
        None => workbook.read_sheet(&SheetSelector::active())?,
    };
    Ok(sheet)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    let store = RegistryStore::open(&config.database.path);

    match cli.command {
        Commands::Import { workbook, sheet } => {
            let mut layout = config.registry.clone();
            if let Some(sheet) = sheet {
                layout.sheet_patterns.insert(0, sheet);
            }
            let mut workbook = XlsxWorkbook::open(&workbook)?;
            let registry = import_workbook(&mut workbook, &layout)?;
            let count = store.replace(registry)?;
            info!("Saved! Database holds {count} assets.");
        }
        Commands::Extract { report, raw } => {
            let fields = extract_hardware(&read_report(&report)?);
            let fields = if raw { fields } else { store.correlate(fields) };
            print_json(&fields)?;
        }
        Commands::Locate { template, sheet } => {
            let sheet = read_template(&template, sheet.as_deref())?;
            print_json(&locate_fields(&sheet, &config.template))?;
        }
        Commands::Fill {
            report,
            template,
            sheet,
            ticket,
            delivery_note,
        } => {
            let markup = read_report(&report)?;
            let mut sheet = read_template(&template, sheet.as_deref())?;
            let request = FormRequest {
                ossm_ticket: ticket,
                delivery_note,
            };
            let output = fill_form(&markup, &request, &store, &mut sheet, &config.template);
            if output.fields.get(CanonicalField::ComputerName).is_empty() {
                warn!("report has no computer name");
            }
            print_json(&output)?;
        }
        Commands::Wipe => {
            store.clear()?;
            info!("Database wiped successfully.");
        }
        Commands::Status => {
            let registry = store.snapshot();
            print_json(&Status {
                database: store.path(),
                assets: registry.len(),
                ids: registry.iter().map(|(id, _)| id).collect(),
            })?;
        }
    }

    Ok(())
}
