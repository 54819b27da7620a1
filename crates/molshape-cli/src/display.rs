use crate::error::Result;
use crate::utils::text::{slugify, truncate};
use molshape::workflows::classify::{ClassificationResult, DiagramOutcome, Outcome};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const INDEX_W: usize = 4;
const NAME_W: usize = 28;
const RESULT_W: usize = 19;
const COUNT_W: usize = 5;
const SLUG_MAX_LEN: usize = 40;

pub fn print_results(results: &[ClassificationResult]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = write_results_table(&mut out, results);
}

/// Box-drawn table with one row per input line, in input order.
pub fn write_results_table(
    out: &mut impl Write,
    results: &[ClassificationResult],
) -> io::Result<()> {
    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{left}{}{mid}{}{mid}{}{mid}{}{mid}{}{mid}{}{right}",
            "─".repeat(INDEX_W + 2),
            "─".repeat(NAME_W + 2),
            "─".repeat(RESULT_W + 2),
            "─".repeat(COUNT_W + 2),
            "─".repeat(COUNT_W + 2),
            "─".repeat(COUNT_W + 2),
        )
    };

    writeln!(out, "{}", rule("┌", "┬", "┐"))?;
    writeln!(
        out,
        "│ {:>INDEX_W$} │ {:<NAME_W$} │ {:<RESULT_W$} │ {:>COUNT_W$} │ {:>COUNT_W$} │ {:>COUNT_W$} │",
        "#", "Name", "Result", "Rings", "Rot.", "Atoms"
    )?;
    writeln!(out, "{}", rule("├", "┼", "┤"))?;

    for result in results {
        let (label, rings, rotatable, atoms) = match &result.outcome {
            Outcome::Classified(c) => (
                c.category.label(),
                c.descriptors.ring_count.to_string(),
                c.descriptors.rotatable_bonds.to_string(),
                c.descriptors.atom_count.to_string(),
            ),
            Outcome::Failed { failure, .. } => {
                (failure.tag(), "-".to_string(), "-".to_string(), "-".to_string())
            }
        };
        writeln!(
            out,
            "│ {:>INDEX_W$} │ {:<NAME_W$} │ {:<RESULT_W$} │ {:>COUNT_W$} │ {:>COUNT_W$} │ {:>COUNT_W$} │",
            result.line.position + 1,
            truncate(&result.line.text, NAME_W),
            truncate(label, RESULT_W),
            rings,
            rotatable,
            atoms
        )?;
    }

    writeln!(out, "{}", rule("└", "┴", "┘"))
}

pub fn summary_line(results: &[ClassificationResult]) -> String {
    let failed = results.iter().filter(|r| r.failure().is_some()).count();
    format!(
        "{} of {} line(s) classified, {} failed.",
        results.len() - failed,
        results.len(),
        failed
    )
}

pub fn diagram_file_name(result: &ClassificationResult) -> String {
    format!(
        "{:03}-{}.png",
        result.line.position + 1,
        slugify(&result.line.text, SLUG_MAX_LEN)
    )
}

/// Writes every rendered diagram into `dir`, creating it if needed, and
/// returns the paths written. Failed renders are logged and skipped.
pub fn write_diagrams(dir: &Path, results: &[ClassificationResult]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for result in results {
        let Some(classification) = result.classification() else {
            continue;
        };
        match &classification.diagram {
            DiagramOutcome::Rendered(diagram) => {
                let path = dir.join(diagram_file_name(result));
                fs::write(&path, &diagram.png)?;
                debug!("Wrote diagram for '{}' to {:?}", result.line.text, &path);
                written.push(path);
            }
            DiagramOutcome::Failed(reason) => {
                warn!("No diagram for '{}': {}", result.line.text, reason);
            }
            DiagramOutcome::Skipped => {}
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use molshape::core::models::identifier::StructureIdentifier;
    use molshape::core::shape::classifier::ShapeCategory;
    use molshape::core::shape::descriptors::Descriptors;
    use molshape::engine::render::Diagram;
    use molshape::workflows::classify::{Classification, Failure, InputLine};
    use tempfile::tempdir;

    fn classified(position: usize, name: &str, diagram: DiagramOutcome) -> ClassificationResult {
        ClassificationResult {
            line: InputLine::new(position, name),
            outcome: Outcome::Classified(Classification {
                identifier: StructureIdentifier::new("c1ccccc1"),
                descriptors: Descriptors {
                    ring_count: 1,
                    rotatable_bonds: 0,
                    atom_count: 6,
                },
                category: ShapeCategory::Monocyclic,
                diagram,
            }),
        }
    }

    fn failed(position: usize, name: &str) -> ClassificationResult {
        ClassificationResult {
            line: InputLine::new(position, name),
            outcome: Outcome::Failed {
                failure: Failure::ResolutionFailed,
                detail: "HTTP 404".to_string(),
            },
        }
    }

    fn diagram() -> DiagramOutcome {
        DiagramOutcome::Rendered(Diagram {
            width: 1,
            height: 1,
            png: vec![0x89, b'P', b'N', b'G'],
        })
    }

    #[test]
    fn table_has_one_row_per_result() {
        let results = vec![
            classified(0, "benzene", DiagramOutcome::Skipped),
            failed(1, "notachemical"),
        ];
        let mut buf = Vec::new();
        write_results_table(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[1].contains("Name") && lines[1].contains("Atoms"));
        assert!(lines[3].contains("benzene") && lines[3].contains("Monocyclic"));
        assert!(lines[4].contains("notachemical") && lines[4].contains("Could not resolve"));
        assert!(lines[4].contains(" - "));

        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn long_names_are_truncated_in_table() {
        let long = "a".repeat(80);
        let mut buf = Vec::new();
        write_results_table(&mut buf, &[failed(0, &long)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains(&long));
        assert!(text.contains('…'));
    }

    #[test]
    fn summary_counts_failures() {
        let results = vec![
            classified(0, "benzene", DiagramOutcome::Skipped),
            failed(1, "x"),
            failed(2, "y"),
        ];
        assert_eq!(summary_line(&results), "1 of 3 line(s) classified, 2 failed.");
    }

    #[test]
    fn diagram_names_use_position_and_slug() {
        let result = classified(11, "Acetic Acid", DiagramOutcome::Skipped);
        assert_eq!(diagram_file_name(&result), "012-acetic-acid.png");
    }

    #[test]
    fn write_diagrams_only_writes_rendered_structures() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("pngs");
        let results = vec![
            classified(0, "benzene", diagram()),
            classified(1, "toluene", DiagramOutcome::Failed("boom".to_string())),
            failed(2, "nothing"),
            classified(3, "phenol", DiagramOutcome::Skipped),
        ];

        let written = write_diagrams(&out_dir, &results).unwrap();
        assert_eq!(written, vec![out_dir.join("001-benzene.png")]);
        assert_eq!(fs::read(&written[0]).unwrap(), vec![0x89, b'P', b'N', b'G']);
    }
}
