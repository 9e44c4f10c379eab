//! Inkgraph CLI — export ink scripts as a node/edge graph.
//!
//! Usage:
//!   inkgraph export <root.ink> [--depth full] [--tunnels keep] [--out path]
//!   inkgraph files <root.ink>

use clap::{Parser, Subcommand};
use inkgraph::{
    collect_script_files, export_graph, ExportDepth, GraphSettings, TunnelHandling,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "inkgraph",
    version,
    about = "Structural graph exporter for ink narrative scripts"
)]
struct Cli {
    /// Path to a settings JSON file (defaults to the user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and write the TGF export
    Export {
        /// Root ink script; includes are resolved from its directory
        script: PathBuf,
        /// Export file or directory (overrides settings)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Node collapsing granularity (overrides settings)
        #[arg(long, value_enum)]
        depth: Option<ExportDepth>,
        /// Tunnel node policy (overrides settings)
        #[arg(long, value_enum)]
        tunnels: Option<TunnelHandling>,
        /// Symbolic path to omit from the export (repeatable)
        #[arg(long = "exclude", value_name = "PATH")]
        exclude: Vec<String>,
        /// Symbolic path always treated as a tunnel target (repeatable)
        #[arg(long = "force-tunnel", value_name = "PATH")]
        force_tunnel: Vec<String>,
        /// Symbolic path duplicated per incoming source (repeatable)
        #[arg(long = "force-duplicate", value_name = "PATH")]
        force_duplicate: Vec<String>,
    },
    /// List the include-expanded file set for a root script
    Files {
        /// Root ink script
        script: PathBuf,
    },
}

/// Default settings location (~/.config/inkgraph/settings.json)
fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("inkgraph").join("settings.json"))
}

fn load_settings(explicit: Option<PathBuf>) -> Result<GraphSettings, String> {
    if let Some(path) = explicit {
        return GraphSettings::load(&path).map_err(|e| e.to_string());
    }
    match default_settings_path() {
        Some(path) if path.is_file() => GraphSettings::load(&path).map_err(|e| e.to_string()),
        _ => Ok(GraphSettings::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_export(
    mut settings: GraphSettings,
    script: &PathBuf,
    out: Option<PathBuf>,
    depth: Option<ExportDepth>,
    tunnels: Option<TunnelHandling>,
    exclude: Vec<String>,
    force_tunnel: Vec<String>,
    force_duplicate: Vec<String>,
) -> i32 {
    if let Some(out) = out {
        settings.export_path = out;
    }
    if let Some(depth) = depth {
        settings.export_depth = depth;
    }
    if let Some(tunnels) = tunnels {
        settings.tunnel_handling = tunnels;
    }
    settings.exclude_paths.extend(exclude);
    settings.force_tunnel_paths.extend(force_tunnel);
    settings.force_duplicate_paths.extend(force_duplicate);

    match export_graph(script, &settings) {
        Ok(path) => {
            println!("Exported {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_files(script: &PathBuf) -> i32 {
    match collect_script_files(script) {
        Ok(files) => {
            for file in &files {
                println!("{:<48}  {:>5} lines", file.display_path, file.lines.len());
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let settings = match load_settings(cli.settings) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Export {
            script,
            out,
            depth,
            tunnels,
            exclude,
            force_tunnel,
            force_duplicate,
        } => cmd_export(
            settings,
            &script,
            out,
            depth,
            tunnels,
            exclude,
            force_tunnel,
            force_duplicate,
        ),
        Commands::Files { script } => cmd_files(&script),
    };
    std::process::exit(code);
}
