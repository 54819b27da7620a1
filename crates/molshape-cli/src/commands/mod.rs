pub mod classify;
pub mod inspect;

use crate::display;
use crate::error::Result;
use molshape::workflows::{classify::ClassificationResult, report};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Prints the results table and writes whichever artifacts were requested.
fn emit_results(
    results: &[ClassificationResult],
    diagrams_dir: Option<&Path>,
    csv_path: Option<&Path>,
) -> Result<()> {
    display::print_results(results);

    if let Some(dir) = diagrams_dir {
        let written = display::write_diagrams(dir, results)?;
        info!("Wrote {} diagram(s) to {:?}", written.len(), dir);
        println!("✓ {} diagram(s) written to: {}", written.len(), dir.display());
    }

    if let Some(path) = csv_path {
        info!("Writing CSV report to {:?}", path);
        report::write_csv(BufWriter::new(File::create(path)?), results)?;
        println!("✓ CSV report written to: {}", path.display());
    }

    println!("{}", display::summary_line(results));
    Ok(())
}
