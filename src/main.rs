//! umlstore CLI - browse and search a UML/SysML model database

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use umlstore::config::{self, UmlStoreConfig};
use umlstore::storage::RowCursor;
use umlstore::storage::RowLayout;
use umlstore::ui::{self, EntityRow, Icons};
use umlstore::{Database, EntityId, RowId, TableKind, TextSearch};

#[derive(Parser)]
#[command(name = "umlstore")]
#[command(version)]
#[command(about = "Browse and search a UML/SysML model database")]
#[command(long_about = r#"
umlstore reads the diagrams, classifiers, features and relationships of a
model database and searches them by text.

Example usage:
  umlstore init
  umlstore search pump
  umlstore diagrams --parent D0001
  umlstore show C0042 --format json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create an empty model database
    Init {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Search names, stereotypes and descriptions of all entities
    Search {
        /// Text to search for; `%`, `_` and `\` match literally
        query: String,

        /// Maximum number of hits (defaults to the config's search.max_results)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List root diagrams, or the children of one diagram
    Diagrams {
        /// Parent diagram id, e.g. D0001
        #[arg(long)]
        parent: Option<String>,

        /// Diagrams showing this classifier instead, e.g. C0042
        #[arg(long, conflicts_with = "parent")]
        classifier: Option<String>,
    },

    /// List all classifiers, or those shown on one diagram
    Classifiers {
        /// Diagram id, e.g. D0003
        #[arg(long)]
        diagram: Option<String>,
    },

    /// List features of a classifier or of a diagram
    Features {
        #[arg(long, required_unless_present = "diagram")]
        classifier: Option<String>,

        #[arg(long, conflicts_with = "classifier")]
        diagram: Option<String>,
    },

    /// List relationships of a classifier, a feature or a diagram
    Relationships {
        #[arg(long, required_unless_present_any = ["feature", "diagram"])]
        classifier: Option<String>,

        #[arg(long, conflicts_with_all = ["classifier", "diagram"])]
        feature: Option<String>,

        #[arg(long, conflicts_with = "classifier")]
        diagram: Option<String>,
    },

    /// Show one entity by id, e.g. C0042 or E0007
    Show {
        id: String,
    },

    /// Show row counts per table
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    #[value(name = "text")]
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print `data` wrapped in the JSON result envelope
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    debug_assert!(!output_mode.is_human());
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = cli.format;
    if let Err(err) = run(cli) {
        if output_mode.is_human() {
            ui::error(&format!("{err:#}"));
        } else {
            let envelope = serde_json::json!({ "ok": false, "error": format!("{err:#}") });
            println!("{envelope}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = cli.format;
    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    let command = match cli.command {
        Commands::Init { path, force } => {
            return run_init(mode, &path, cli.database.as_deref(), cli.config.as_deref(), force);
        }
        command => command,
    };

    let db_path = resolve_database(cli.database.as_deref(), &config)?;
    if !db_path.exists() {
        anyhow::bail!("no database at {} (run `umlstore init` first)", db_path.display());
    }
    let db = Database::open_read_only(&db_path)?;
    tracing::debug!("Using database {}", db_path.display());

    match command {
        Commands::Init { .. } => Ok(()),
        Commands::Search { query, limit } => {
            run_search(mode, &db, &query, limit.unwrap_or(config.search.max_results))
        }
        Commands::Diagrams { parent, classifier } => run_diagrams(mode, &db, parent, classifier),
        Commands::Classifiers { diagram } => run_classifiers(mode, &db, diagram),
        Commands::Features { classifier, diagram } => run_features(mode, &db, classifier, diagram),
        Commands::Relationships {
            classifier,
            feature,
            diagram,
        } => run_relationships(mode, &db, classifier, feature, diagram),
        Commands::Show { id } => run_show(mode, &db, &id),
        Commands::Stats => run_stats(mode, &db, &db_path),
    }
}

fn resolve_database(flag: Option<&Path>, config: &UmlStoreConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = &config.database {
        return Ok(PathBuf::from(path));
    }
    Ok(config::default_database_path_in(&std::env::current_dir()?))
}

/// Parse an entity id and check it names a row of `table`
fn parse_id(text: &str, table: TableKind) -> anyhow::Result<RowId> {
    let id = EntityId::parse(text)?;
    if id.table != table {
        anyhow::bail!("{} is not a {} id", text, table.as_str());
    }
    Ok(id.row_id)
}

fn drain<L: RowLayout>(mut cursor: RowCursor<'_, '_, L>) -> umlstore::Result<Vec<L::Record>> {
    let mut records = Vec::new();
    while cursor.has_next() {
        records.push(cursor.next()?);
    }
    Ok(records)
}

/// Print records as a table, or as a JSON array
fn emit_list<T>(mode: OutputMode, command: &str, title: &str, records: &[T]) -> anyhow::Result<()>
where
    T: serde::Serialize,
    for<'a> EntityRow: From<&'a T>,
{
    if !mode.is_human() {
        return emit_success(mode, command, serde_json::to_value(records)?);
    }
    if records.is_empty() {
        ui::warn(&format!("No {title} found."));
        return Ok(());
    }
    if !umlstore::output::is_quiet() {
        ui::section(&format!(" {} ({}) ", title, records.len()));
    }
    let rows: Vec<EntityRow> = records.iter().map(EntityRow::from).collect();
    println!("{}", ui::entity_table(&rows));
    Ok(())
}

fn run_init(
    mode: OutputMode,
    path: &Path,
    database: Option<&Path>,
    config_path: Option<&Path>,
    force: bool,
) -> anyhow::Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.join(config::default_config_path()));
    let db_path = database
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config::default_database_path_in(path));

    let cfg = UmlStoreConfig {
        database: Some(db_path.to_string_lossy().to_string()),
        ..UmlStoreConfig::default()
    };
    config::write_config(&config_path, &cfg, force)?;
    config::ensure_db_dir(&db_path)?;
    let db = Database::open(&db_path)?;
    tracing::info!("Initialized {}", db_path.display());

    if mode.is_human() {
        ui::header("umlstore initialized");
        ui::status(Icons::GEAR, "Config", &config_path.display().to_string());
        ui::status(Icons::DATABASE, "Database", &db_path.display().to_string());
        ui::success(&format!("{} classifiers in model", db.stats()?.classifiers));
    } else {
        emit_success(
            mode,
            "init",
            serde_json::json!({
                "config": config_path.display().to_string(),
                "database": db_path.display().to_string(),
            }),
        )?;
    }
    Ok(())
}

fn run_search(mode: OutputMode, db: &Database, query: &str, limit: usize) -> anyhow::Result<()> {
    let diagrams = db.diagram_reader()?;
    let classifiers = db.classifier_reader()?;
    let search = TextSearch::new(&diagrams, &classifiers);
    let hits = search.collect(query, limit)?;

    if !mode.is_human() {
        return emit_success(mode, "search", serde_json::to_value(&hits)?);
    }

    if !umlstore::output::is_quiet() {
        println!("{} Searching for: '{}' (limit: {})...", Icons::SEARCH, query, limit);
    }
    if hits.is_empty() {
        ui::warn("No matches found.");
    } else {
        for hit in &hits {
            ui::hit(hit);
        }
        if hits.len() == limit {
            println!("{}", ui::muted(&format!("(showing the first {limit} hits)")));
        }
    }
    Ok(())
}

fn run_diagrams(
    mode: OutputMode,
    db: &Database,
    parent: Option<String>,
    classifier: Option<String>,
) -> anyhow::Result<()> {
    let reader = db.diagram_reader()?;
    let records = match (parent, classifier) {
        (_, Some(c)) => drain(reader.get_diagrams_by_classifier_id(parse_id(&c, TableKind::Classifier)?)?)?,
        (Some(p), None) => drain(reader.get_diagrams_by_parent_id(parse_id(&p, TableKind::Diagram)?)?)?,
        (None, None) => drain(reader.get_diagrams_by_parent_id(RowId::VOID)?)?,
    };
    emit_list(mode, "diagrams", "diagrams", &records)
}

fn run_classifiers(mode: OutputMode, db: &Database, diagram: Option<String>) -> anyhow::Result<()> {
    let reader = db.classifier_reader()?;
    let records = match diagram {
        Some(d) => drain(reader.get_classifiers_by_diagram_id(parse_id(&d, TableKind::Diagram)?)?)?,
        None => drain(reader.get_classifiers_all()?)?,
    };
    emit_list(mode, "classifiers", "classifiers", &records)
}

fn run_features(
    mode: OutputMode,
    db: &Database,
    classifier: Option<String>,
    diagram: Option<String>,
) -> anyhow::Result<()> {
    let reader = db.classifier_reader()?;
    let records = match (classifier, diagram) {
        (Some(c), _) => drain(reader.get_features_by_classifier_id(parse_id(&c, TableKind::Classifier)?)?)?,
        (None, Some(d)) => drain(reader.get_features_by_diagram_id(parse_id(&d, TableKind::Diagram)?)?)?,
        (None, None) => anyhow::bail!("either --classifier or --diagram is required"),
    };
    emit_list(mode, "features", "features", &records)
}

fn run_relationships(
    mode: OutputMode,
    db: &Database,
    classifier: Option<String>,
    feature: Option<String>,
    diagram: Option<String>,
) -> anyhow::Result<()> {
    let reader = db.classifier_reader()?;
    let records = match (classifier, feature, diagram) {
        (Some(c), _, _) => {
            drain(reader.get_relationships_by_classifier_id(parse_id(&c, TableKind::Classifier)?)?)?
        }
        (None, Some(f), _) => drain(reader.get_relationships_by_feature_id(parse_id(&f, TableKind::Feature)?)?)?,
        (None, None, Some(d)) => drain(reader.get_relationships_by_diagram_id(parse_id(&d, TableKind::Diagram)?)?)?,
        (None, None, None) => anyhow::bail!("one of --classifier, --feature or --diagram is required"),
    };
    emit_list(mode, "relationships", "relationships", &records)
}

fn run_show(mode: OutputMode, db: &Database, text: &str) -> anyhow::Result<()> {
    let id = EntityId::parse(text)?;
    let classifiers = db.classifier_reader()?;
    let diagrams = db.diagram_reader()?;

    // the record plus the rows that hang off it
    let (record, children): (serde_json::Value, Vec<EntityRow>) = match id.table {
        TableKind::Classifier => {
            let c = classifiers.get_classifier_by_id(id.row_id)?;
            let features = drain(classifiers.get_features_by_classifier_id(c.id)?)?;
            (serde_json::to_value(&c)?, features.iter().map(EntityRow::from).collect())
        }
        TableKind::Feature => {
            let f = classifiers.get_feature_by_id(id.row_id)?;
            let relationships = drain(classifiers.get_relationships_by_feature_id(f.id)?)?;
            (serde_json::to_value(&f)?, relationships.iter().map(EntityRow::from).collect())
        }
        TableKind::Relationship => {
            let r = classifiers.get_relationship_by_id(id.row_id)?;
            (serde_json::to_value(&r)?, Vec::new())
        }
        TableKind::Diagram => {
            let d = diagrams.get_diagram_by_id(id.row_id)?;
            let elements = drain(diagrams.get_diagramelements_by_diagram_id(d.id)?)?;
            (serde_json::to_value(&d)?, elements.iter().map(EntityRow::from).collect())
        }
        TableKind::DiagramElement => {
            let e = diagrams.get_diagramelement_by_id(id.row_id)?;
            (serde_json::to_value(&e)?, Vec::new())
        }
    };

    if !mode.is_human() {
        return emit_success(mode, "show", record);
    }

    ui::section(&format!(" {} ", id));
    if let serde_json::Value::Object(fields) = &record {
        for (key, value) in fields {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            ui::summary_row(&format!("{key:>20}"), &value);
        }
    }
    if !children.is_empty() {
        println!("{}", ui::entity_table(&children));
    }
    Ok(())
}

fn run_stats(mode: OutputMode, db: &Database, db_path: &Path) -> anyhow::Result<()> {
    let stats = db.stats()?;
    if !mode.is_human() {
        return emit_success(mode, "stats", serde_json::to_value(stats)?);
    }
    println!("{} umlstore Statistics ({})", Icons::STATS, db_path.display());
    println!("{}", ui::stats_table(&stats));
    Ok(())
}
