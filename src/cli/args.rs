use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdf-interleave")]
#[command(
    author,
    version,
    about = "Insert a blank page after every page of one or more PDFs"
)]
pub struct Args {
    /// Input PDF files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the processed PDF or zip archive is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
