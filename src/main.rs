use anyhow::Result;
use nodewatch::cli::process_cli;

pub fn main() -> Result<()> {
    process_cli()
}
