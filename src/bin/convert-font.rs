use std::error::Error;
use std::fs::File;
use std::io::{stdout, BufReader};
use std::path::PathBuf;

use bpaf::Bpaf;
use glow_tools::font;

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
/// Convert a 5x7 font table to the display firmware's character markup
struct Args {
    /// Path to the font table, 5 hex columns per row
    #[bpaf(positional("PATH"), fallback(PathBuf::from("original.csv")))]
    path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = args().run();

    let input = BufReader::new(File::open(&args.path)?);
    font::convert(input, stdout().lock())?;
    Ok(())
}
