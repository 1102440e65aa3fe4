//! oview command-line inspector
//!
//! Loads object descriptions, opens inspection sessions against them and
//! prints the resulting display models or viewer output.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use ov_core::config::{self, OUTPUT_KEY, WORKERS_KEY};
use ov_core::Guid;
use ov_inspector::{DisplayModel, InspectionSession, Inspector};
use ov_introspection::DescribedObject;
use ov_plugins::{SpecialViewer, ViewerHandle};

mod batch;

#[derive(Parser, Debug)]
#[command(name = "oview")]
#[command(about = "Inspect objects, their interfaces and safety options")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to OV_OUTPUT, then text)
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the property and interface tables of an object
    Inspect {
        /// Object description (.json, .yaml, .yml)
        file: PathBuf,
    },
    /// Launch the registered viewer for one interface
    View {
        file: PathBuf,
        /// Interface identifier, braced or plain
        #[arg(long)]
        iid: String,
    },
    /// Launch the dispatch or control container viewer
    Special {
        file: PathBuf,
        #[arg(value_enum)]
        kind: SpecialKind,
    },
    /// Inspect several objects concurrently
    Batch {
        files: Vec<PathBuf>,
        /// Worker count (defaults to OV_WORKERS, then 4)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// List registered interface viewers
    Viewers,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SpecialKind {
    Dispatch,
    Container,
}

impl From<SpecialKind> for SpecialViewer {
    fn from(kind: SpecialKind) -> Self {
        match kind {
            SpecialKind::Dispatch => SpecialViewer::Dispatch,
            SpecialKind::Container => SpecialViewer::ControlContainer,
        }
    }
}

fn output_format(flag: Option<OutputFormat>) -> OutputFormat {
    flag.unwrap_or_else(|| match config::get_config(OUTPUT_KEY, "text").to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    })
}

fn open(inspector: &Inspector, file: &Path) -> Result<InspectionSession> {
    let object = DescribedObject::load(file)
        .with_context(|| format!("Failed to load object description {}", file.display()))?;
    Ok(inspector.open_described(object))
}

fn print_model(model: &DisplayModel, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(model)?),
        OutputFormat::Text => print!("{}", model.render_text()),
    }
    Ok(())
}

fn print_viewer(viewer: &ViewerHandle, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "title": viewer.title(),
                "kind": viewer.kind(),
                "content": viewer.render(),
            }))?
        ),
        OutputFormat::Text => {
            println!("{} [{}]", viewer.title(), viewer.kind());
            println!("{}", serde_json::to_string_pretty(&viewer.render())?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from /etc/oview/environment (if exists)
    config::load_environment();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("oview=info".parse()?)
                .add_directive("ov_inspector=info".parse()?)
                .add_directive("ov_plugins=warn".parse()?),
        )
        .init();

    let args = Args::parse();
    let format = output_format(args.format);

    // Shared cache and viewer registry for the whole process
    let inspector = Inspector::with_builtin_viewers();
    debug!("Registered {} viewers", inspector.viewers().len());

    match args.command {
        Commands::Inspect { file } => {
            let mut session = open(&inspector, &file)?;
            print_model(&session.display_model(), format)?;
            session.close();
        }
        Commands::View { file, iid } => {
            let iid: Guid = iid.parse()?;
            let mut session = open(&inspector, &file)?;
            // A failed launch leaves the session open; dropping it closes it.
            let launched = session
                .launch_viewer(&iid)
                .with_context(|| format!("Viewer for {} could not be opened", iid))?;

            match launched {
                Some(viewer) => print_viewer(&viewer, format)?,
                None => println!("No viewer registered for {}", iid),
            }
            session.close();
        }
        Commands::Special { file, kind } => {
            let mut session = open(&inspector, &file)?;
            let viewer = session
                .launch_special_viewer(kind.into())
                .context("Special viewer could not be opened")?;
            print_viewer(&viewer, format)?;
            session.close();
        }
        Commands::Batch { files, workers } => {
            let workers = workers
                .unwrap_or_else(|| config::get_config_int(WORKERS_KEY, 4).max(1) as usize);
            info!("Inspecting {} objects with {} workers", files.len(), workers);

            let results = batch::inspect_batch(inspector.clone(), files, workers).await;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
                OutputFormat::Text => {
                    for result in &results {
                        match (&result.model, &result.error) {
                            (Some(model), _) => println!("{}", model.render_text()),
                            (None, Some(error)) => {
                                println!("{}: {}\n", result.path.display(), error)
                            }
                            (None, None) => {}
                        }
                    }
                }
            }
        }
        Commands::Viewers => {
            for (iid, name) in inspector.viewers().registered() {
                println!("{}  {}", iid, name);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_view() {
        let args = Args::parse_from([
            "oview",
            "view",
            "calc.json",
            "--iid",
            "{cb5bdc81-93c1-11cf-8f20-00805f2cd064}",
            "--format",
            "json",
        ]);
        assert_eq!(args.format, Some(OutputFormat::Json));
        match args.command {
            Commands::View { file, iid } => {
                assert_eq!(file, PathBuf::from("calc.json"));
                assert!(iid.parse::<Guid>().is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_parse_special_kind() {
        let args = Args::parse_from(["oview", "special", "ctl.yaml", "container"]);
        match args.command {
            Commands::Special { kind, .. } => {
                assert_eq!(SpecialViewer::from(kind), SpecialViewer::ControlContainer)
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_demo_calculator() {
        let inspector = Inspector::with_builtin_viewers();
        let file = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/calculator.json");
        let session = open(&inspector, &file).unwrap();
        let model = session.display_model();

        assert_eq!(model.interfaces.len(), 4);
        assert!(model.dispatch_enabled);
        assert!(model.control_container_enabled);
        assert_eq!(model.properties.len(), 5);
        assert!(model.interfaces[2].viewable);
    }

    #[test]
    fn test_format_flag_wins() {
        assert_eq!(output_format(Some(OutputFormat::Json)), OutputFormat::Json);
    }
}
