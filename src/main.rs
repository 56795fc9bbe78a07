mod cli;
mod error;
mod extract;
mod fmt;
mod ledger;
mod logging;
mod mirror;
mod models;
mod ocr;
mod settings;
mod store;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};
use models::{NewReceipt, ReceiptUpdate};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let data_dir = cli.data_dir.as_deref();

    let result = match cli.command {
        Commands::Init => cli::init::run(data_dir),
        Commands::Scan { image, text_file } => cli::scan::run(data_dir, &image, text_file.as_deref()),
        Commands::Add {
            vendor,
            date,
            total,
            tax,
            raw_text,
            image,
            id,
        } => cli::receipts::add(
            data_dir,
            NewReceipt {
                id,
                date,
                vendor,
                total,
                tax,
                image_path: image,
                raw_text,
            },
        ),
        Commands::List { search, sort, asc } => cli::receipts::list(data_dir, search.as_deref(), sort, asc),
        Commands::Show { id } => cli::receipts::show(data_dir, &id),
        Commands::Edit {
            id,
            vendor,
            date,
            total,
            tax,
            raw_text,
            image,
        } => cli::receipts::edit(
            data_dir,
            &id,
            ReceiptUpdate {
                date,
                vendor,
                total,
                tax,
                raw_text,
                image_path: image,
            },
        ),
        Commands::Extract { file } => cli::extract::run(&file),
        Commands::Export { output } => cli::export::run(data_dir, output.as_deref()),
        Commands::RebuildMirror => cli::mirror::rebuild(data_dir),
        Commands::Status => cli::status::run(data_dir),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "receipts", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
