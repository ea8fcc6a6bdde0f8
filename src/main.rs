use clap::Parser;
use conf_parser::{parse_file, RecordingHandler};

#[derive(Parser)]
#[command(name = "settings-lint")]
#[command(about = "Parse a configuration file and report its events or a parse error")]
#[command(version)]
struct Cli {
    /// Configuration file to parse
    path: String,

    /// Only dispatch the subtree addressed by this slash-separated section path
    #[arg(long = "section")]
    section: Option<String>,

    /// Print the dispatched events as JSON instead of a human summary
    #[arg(long = "json")]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let path = std::path::Path::new(&cli.path);

    let mut handler = RecordingHandler::new();
    match parse_file(path, cli.section.as_deref(), &mut handler) {
        Ok(()) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&handler.events).unwrap_or_default());
            } else {
                for event in &handler.events {
                    println!("{event:?}");
                }
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
