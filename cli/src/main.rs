mod commands;
mod terminal;

use commands::{CommandLine, Commands, parse, scan};
use nmapviz_common::config::Config;
use nmapviz_core::selection::Selection;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    print::banner();

    let selection = Selection::new();
    if let Some(ip) = &commands.select {
        selection.select(ip.trim());
    }

    let viewport = commands.viewport();
    let result = match &commands.command {
        Commands::Scan(args) => {
            print::header("starting scans");
            scan::scan(&args.targets, &args.to_config(viewport), &selection).await
        }
        Commands::Parse {
            file,
            resolve_vendors,
        } => {
            print::header("reading report");
            let cfg = Config {
                resolve_vendors: *resolve_vendors,
                viewport,
                ..Config::default()
            };
            parse::parse(file, &cfg, &selection).await
        }
    };

    print::end_of_program();
    result
}
