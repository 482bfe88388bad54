mod controller;
mod document;
mod file_commands;
mod footnote_commands;
mod markers;
mod navigation;
mod organize;
mod rc;
mod view;

use clap::Parser;
use controller::Controller;
use document::Document;
use rc::RcLoader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vinote", version, about = "vi-style editor for numbered footnotes")]
struct Args {
    /// File to edit
    file: Option<PathBuf>,

    /// Organize footnotes in FILE and write it back without opening the editor
    #[arg(long)]
    organize: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load RC configuration
    let config = RcLoader::load_config();

    if args.organize {
        let Some(path) = args.file else {
            return Err("--organize requires a file".into());
        };
        let mut document = Document::from_file(path)?;
        let report = organize::organize(&mut document);
        if report.changed() {
            document.save()?;
        }
        println!("{}", report.summary());
        return Ok(());
    }

    let controller = match args.file {
        Some(path) => Controller::new_with_file(path, config)?,
        None => Controller::new(config),
    };

    controller.run()?;
    Ok(())
}
