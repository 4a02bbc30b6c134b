//! Logic Tree CLI
//!
//! Usage:
//!   logic-tree [OPTIONS] [FILE]
//!
//! Options:
//!   -o, --output <FILE>      Write to a file instead of stdout
//!       --png                Rasterize to PNG (requires --output)
//!       --dpi <N>            PNG resolution [default: 300]
//!   -s, --stylesheet <FILE>  Stylesheet file for color palette (TOML format)
//!   -d, --debug              Debug logging and box extents on stderr
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use logic_tree::renderer::{render_svg, write_png, write_svg};
use logic_tree::{diagram, RenderConfig, Stylesheet};

#[derive(Parser)]
#[command(name = "logic-tree")]
#[command(about = "Render logic-tree diagrams described in TOML")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output file; the extension picks SVG or PNG
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force PNG output
    #[arg(long)]
    png: bool,

    /// PNG resolution
    #[arg(long, default_value_t = 300.0)]
    dpi: f32,

    /// Stylesheet file for color palette (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Debug logging and box extents on stderr
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.debug);

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = RenderConfig::new()
        .with_stylesheet(stylesheet)
        .with_dpi(cli.dpi);

    let tree = match diagram::parse(&source).and_then(|d| d.build(config.tree.clone())) {
        Ok(tree) => tree,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    if cli.debug {
        eprintln!("=== Box Extents ===");
        for b in tree.boxes() {
            if let Ok(l) = b.layout() {
                eprintln!(
                    "[{}] x={:.2}..{:.2} y={:.2}..{:.2}",
                    b.name, l.x_left, l.x_right, l.y_bottom, l.y_top
                );
            }
        }
        eprintln!("===================");
    }

    let svg = render_svg(&tree, &config.svg, &config.stylesheet);

    let wants_png = cli.png
        || cli
            .output
            .as_ref()
            .and_then(|p| p.extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    let result = match (&cli.output, wants_png) {
        (Some(path), true) => write_png(&svg, path, config.dpi),
        (Some(path), false) => write_svg(&svg, path),
        (None, true) => {
            eprintln!("Error: PNG output requires --output");
            std::process::exit(1);
        }
        (None, false) => {
            println!("{}", svg);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--debug`
#[cfg(feature = "tracing")]
fn init_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

#[cfg(not(feature = "tracing"))]
fn init_logging(_debug: bool) {}

fn print_intro() {
    println!(
        r#"Logic Tree - decision-tree diagrams from TOML

USAGE:
    logic-tree [OPTIONS] [FILE]
    cat tree.toml | logic-tree > tree.svg

OPTIONS:
    -o, --output       Output file (.svg or .png)
    --png              Rasterize to PNG
    --dpi              PNG resolution (default 300)
    -s, --stylesheet   Custom color palette (TOML file)
    -d, --debug        Debug logging and box extents
    -h, --help         Print help

QUICK START:
    [[box]]
    name = "q"
    text = "Is it raining?"
    x = 50
    y = 80

    [[box]]
    name = "yes"
    text = "Umbrella"
    x = 25
    y = 30

    [[box]]
    name = "no"
    text = "Sunglasses"
    x = 75
    y = 30

    [[split]]
    parent = "q"
    children = ["yes", "no"]
    left_label = "yes"
    right_label = "no""#
    );
}
