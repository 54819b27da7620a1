use crate::core::io::smiles::SmilesParser;
use crate::core::io::traits::StructureParser;
use crate::core::models::identifier::StructureIdentifier;
use crate::core::shape::classifier::{ShapeCategory, classify};
use crate::core::shape::descriptors::{Descriptors, MolecularStructure};
use crate::engine::config::{PipelineConfig, RenderConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::render::{Diagram, DiagramRenderer, PngRenderer};
use crate::engine::resolver::{NameResolver, PubChemResolver, ResolveError};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// One submitted line and its zero-based position in the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub position: usize,
    pub text: String,
}

impl InputLine {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Splits a submitted text block into lines.
///
/// The block is trimmed as a whole first, so a blank submission yields no
/// lines at all; blank lines in the interior are kept.
pub fn split_input(text: &str) -> Vec<InputLine> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .lines()
        .enumerate()
        .map(|(position, line)| InputLine::new(position, line))
        .collect()
}

/// Builds input lines from already separated items, e.g. command-line
/// arguments.
pub fn lines_from<I, S>(items: I) -> Vec<InputLine>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(position, text)| InputLine::new(position, text))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    ResolutionFailed,
    TransportError,
    ParseFailed,
}

impl Failure {
    pub fn tag(self) -> &'static str {
        match self {
            Self::ResolutionFailed => "Could not resolve",
            Self::TransportError => "Lookup failed",
            Self::ParseFailed => "Invalid SMILES",
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<&ResolveError> for Failure {
    fn from(error: &ResolveError) -> Self {
        match error {
            ResolveError::NotFound { .. } | ResolveError::EmptyResponse => Self::ResolutionFailed,
            ResolveError::Transport(_) => Self::TransportError,
        }
    }
}

/// What happened to the diagram of a classified structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramOutcome {
    /// Rendering was disabled for this run.
    Skipped,
    Rendered(Diagram),
    /// Rendering failed; classification is unaffected.
    Failed(String),
}

impl DiagramOutcome {
    pub fn diagram(&self) -> Option<&Diagram> {
        match self {
            Self::Rendered(diagram) => Some(diagram),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub identifier: StructureIdentifier,
    pub descriptors: Descriptors,
    pub category: ShapeCategory,
    pub diagram: DiagramOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Classified(Classification),
    Failed { failure: Failure, detail: String },
}

/// The result for exactly one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub line: InputLine,
    pub outcome: Outcome,
}

impl ClassificationResult {
    pub fn category(&self) -> Option<ShapeCategory> {
        match &self.outcome {
            Outcome::Classified(classification) => Some(classification.category),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<Failure> {
        match &self.outcome {
            Outcome::Classified(_) => None,
            Outcome::Failed { failure, .. } => Some(*failure),
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match &self.outcome {
            Outcome::Classified(classification) => Some(classification),
            Outcome::Failed { .. } => None,
        }
    }
}

/// The collaborators one run is wired with.
pub struct Collaborators<'a, P: StructureParser> {
    pub resolver: &'a dyn NameResolver,
    pub parser: &'a P,
    /// `None` skips diagram rendering.
    pub renderer: Option<&'a dyn DiagramRenderer>,
}

/// Resolves, parses, classifies and renders every line of a submission.
///
/// Builds the PubChem resolver, the SMILES parser and, when enabled, the PNG
/// renderer from `config`, then delegates to [`run_with`].
///
/// # Errors
///
/// Returns [`EngineError`] only when the collaborators or the worker pool
/// cannot be set up. Per-line failures are reported on the results.
#[instrument(skip_all, name = "classify_workflow", fields(lines = lines.len()))]
pub fn run(
    lines: &[InputLine],
    config: &PipelineConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<ClassificationResult>, EngineError> {
    let resolver = PubChemResolver::new(&config.resolver)?;
    let renderer = config.render.map(PngRenderer::new);
    let collaborators = Collaborators {
        resolver: &resolver,
        parser: &SmilesParser,
        renderer: renderer.as_ref().map(|r| r as &dyn DiagramRenderer),
    };
    run_with(lines, &collaborators, config.workers, reporter)
}

/// Runs the pipeline with explicit collaborators.
///
/// With `workers > 1` lines are processed on a dedicated thread pool of that
/// size; results always come back in input order, one per line.
pub fn run_with<P: StructureParser>(
    lines: &[InputLine],
    collaborators: &Collaborators<'_, P>,
    workers: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<ClassificationResult>, EngineError> {
    info!(lines = lines.len(), workers, "Classifying submission.");
    reporter.report(Progress::TaskStart {
        total_steps: lines.len() as u64,
    });

    let process = |line: &InputLine| {
        let result = classify_line(line, collaborators);
        reporter.report(Progress::TaskIncrement);
        result
    };

    let results: Vec<ClassificationResult> = if workers > 1 && lines.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| EngineError::ThreadPool {
                workers,
                reason: e.to_string(),
            })?;
        pool.install(|| lines.par_iter().map(process).collect())
    } else {
        lines.iter().map(process).collect()
    };

    reporter.report(Progress::TaskFinish);
    let failed = results.iter().filter(|r| r.failure().is_some()).count();
    info!(
        classified = results.len() - failed,
        failed, "Classification complete."
    );
    Ok(results)
}

/// Classifies identifiers directly, without a name lookup.
#[instrument(skip_all, name = "inspect_workflow", fields(lines = identifiers.len()))]
pub fn inspect(
    identifiers: &[InputLine],
    render: Option<RenderConfig>,
    reporter: &ProgressReporter,
) -> Vec<ClassificationResult> {
    let renderer = render.map(PngRenderer::new);
    inspect_with(
        identifiers,
        &SmilesParser,
        renderer.as_ref().map(|r| r as &dyn DiagramRenderer),
        reporter,
    )
}

pub fn inspect_with<P: StructureParser>(
    identifiers: &[InputLine],
    parser: &P,
    renderer: Option<&dyn DiagramRenderer>,
    reporter: &ProgressReporter,
) -> Vec<ClassificationResult> {
    reporter.report(Progress::TaskStart {
        total_steps: identifiers.len() as u64,
    });
    let results = identifiers
        .iter()
        .map(|line| {
            let identifier = StructureIdentifier::new(line.text.trim());
            let outcome = analyze(line, identifier, parser, renderer);
            reporter.report(Progress::TaskIncrement);
            ClassificationResult {
                line: line.clone(),
                outcome,
            }
        })
        .collect();
    reporter.report(Progress::TaskFinish);
    results
}

fn classify_line<P: StructureParser>(
    line: &InputLine,
    collaborators: &Collaborators<'_, P>,
) -> ClassificationResult {
    let outcome = match collaborators.resolver.resolve(&line.text) {
        Ok(identifier) => analyze(line, identifier, collaborators.parser, collaborators.renderer),
        Err(error) => {
            let failure = Failure::from(&error);
            warn!(position = line.position, name = %line.text, %error, "{}", failure.tag());
            Outcome::Failed {
                failure,
                detail: error.to_string(),
            }
        }
    };
    ClassificationResult {
        line: line.clone(),
        outcome,
    }
}

/// Parses an identifier and classifies it; renders only after a successful
/// parse.
fn analyze<P: StructureParser>(
    line: &InputLine,
    identifier: StructureIdentifier,
    parser: &P,
    renderer: Option<&dyn DiagramRenderer>,
) -> Outcome {
    let molecule = match parser.parse(identifier.as_str()) {
        Ok(molecule) => molecule,
        Err(error) => {
            warn!(position = line.position, %identifier, %error, "Invalid SMILES");
            return Outcome::Failed {
                failure: Failure::ParseFailed,
                detail: error.to_string(),
            };
        }
    };

    let descriptors = molecule.descriptors();
    let category = classify(&descriptors);
    debug!(
        position = line.position,
        %identifier,
        rings = descriptors.ring_count,
        rotatable_bonds = descriptors.rotatable_bonds,
        atoms = descriptors.atom_count,
        %category,
        "Structure classified."
    );

    let diagram = match renderer {
        None => DiagramOutcome::Skipped,
        Some(renderer) => match renderer.render(&molecule) {
            Ok(diagram) => DiagramOutcome::Rendered(diagram),
            Err(error) => {
                warn!(position = line.position, %error, "Diagram rendering failed");
                DiagramOutcome::Failed(error.to_string())
            }
        },
    };

    Outcome::Classified(Classification {
        identifier,
        descriptors,
        category,
        diagram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::molecule::Molecule;
    use crate::engine::render::RenderError;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resolver backed by a fixed table; unknown names are "not found".
    struct TableResolver {
        table: HashMap<&'static str, Result<&'static str, ResolveError>>,
        calls: AtomicUsize,
    }

    impl TableResolver {
        fn new(entries: &[(&'static str, Result<&'static str, ResolveError>)]) -> Self {
            Self {
                table: entries.iter().cloned().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl NameResolver for TableResolver {
        fn resolve(&self, name: &str) -> Result<StructureIdentifier, ResolveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.table.get(name) {
                Some(Ok(smiles)) => Ok(StructureIdentifier::new(*smiles)),
                Some(Err(error)) => Err(error.clone()),
                None => Err(ResolveError::NotFound { status: 404 }),
            }
        }
    }

    struct FailingRenderer;

    impl DiagramRenderer for FailingRenderer {
        fn render(&self, _molecule: &Molecule) -> Result<Diagram, RenderError> {
            Err(RenderError::EmptyStructure)
        }
    }

    struct CountingRenderer(AtomicUsize);

    impl DiagramRenderer for CountingRenderer {
        fn render(&self, _molecule: &Molecule) -> Result<Diagram, RenderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Diagram {
                width: 1,
                height: 1,
                png: Vec::new(),
            })
        }
    }

    fn common_resolver() -> TableResolver {
        TableResolver::new(&[
            ("butane", Ok("CCCC")),
            ("pentane", Ok("CCCCC")),
            ("octane", Ok("CCCCCCCC")),
            ("benzene", Ok("C1=CC=CC=C1")),
            ("naphthalene", Ok("C1=CC=C2C=CC=CC2=C1")),
            ("adamantane", Ok("C1C2CC3CC1CC(C2)C3")),
            ("broken", Ok("C1CC")),
            ("offline", Err(ResolveError::Transport("connection refused".to_string()))),
        ])
    }

    fn run_names(
        names: &[&str],
        resolver: &TableResolver,
        renderer: Option<&dyn DiagramRenderer>,
        workers: usize,
    ) -> Vec<ClassificationResult> {
        let collaborators = Collaborators {
            resolver,
            parser: &SmilesParser,
            renderer,
        };
        run_with(
            &lines_from(names.iter().copied()),
            &collaborators,
            workers,
            &ProgressReporter::new(),
        )
        .unwrap()
    }

    #[test]
    fn split_input_trims_block_and_keeps_interior_blank_lines() {
        let lines = split_input("\n  ethanol\r\n\nbenzene  \n\n");
        assert_eq!(
            lines,
            vec![
                InputLine::new(0, "ethanol"),
                InputLine::new(1, ""),
                InputLine::new(2, "benzene"),
            ]
        );
    }

    #[test]
    fn blank_submission_yields_no_lines() {
        assert!(split_input("").is_empty());
        assert!(split_input("  \n\t\r\n ").is_empty());
    }

    #[test]
    fn flexible_chain_is_linear_and_flexible() {
        let results = run_names(&["pentane"], &common_resolver(), None, 1);
        let classification = results[0].classification().unwrap();

        assert_eq!(classification.descriptors.ring_count, 0);
        assert_eq!(classification.descriptors.rotatable_bonds, 2);
        assert_eq!(classification.category, ShapeCategory::LinearFlexible);
        assert_eq!(classification.diagram, DiagramOutcome::Skipped);
    }

    #[test]
    fn fused_rings_are_bicyclic() {
        let results = run_names(&["naphthalene"], &common_resolver(), None, 1);
        let classification = results[0].classification().unwrap();

        assert_eq!(classification.descriptors.ring_count, 2);
        assert_eq!(classification.descriptors.rotatable_bonds, 0);
        assert_eq!(classification.category, ShapeCategory::Bicyclic);
    }

    #[test]
    fn unresolved_name_fails_without_stopping_the_batch() {
        let results = run_names(&["notachemical", "benzene"], &common_resolver(), None, 1);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].failure(), Some(Failure::ResolutionFailed));
        assert_eq!(results[1].category(), Some(ShapeCategory::Monocyclic));
    }

    #[test]
    fn transport_error_is_isolated_to_its_line() {
        let results = run_names(&["offline", "octane"], &common_resolver(), None, 1);

        assert_eq!(results[0].failure(), Some(Failure::TransportError));
        assert_eq!(results[1].category(), Some(ShapeCategory::LinearRigid));
    }

    #[test]
    fn unparsable_identifier_is_parse_failed_and_not_rendered() {
        let renderer = CountingRenderer(AtomicUsize::new(0));
        let results = run_names(&["broken"], &common_resolver(), Some(&renderer), 1);

        assert_eq!(results[0].failure(), Some(Failure::ParseFailed));
        assert_eq!(renderer.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn every_line_yields_exactly_one_result_in_order() {
        let names = ["butane", "missing-a", "benzene", "missing-b", "adamantane"];
        let resolver = common_resolver();
        let results = run_names(&names, &resolver, None, 1);

        assert_eq!(results.len(), names.len());
        assert_eq!(resolver.calls.load(Ordering::SeqCst), names.len());
        for (position, result) in results.iter().enumerate() {
            assert_eq!(result.line.position, position);
            assert_eq!(result.line.text, names[position]);
        }
        assert_eq!(results[1].failure(), Some(Failure::ResolutionFailed));
        assert_eq!(results[3].failure(), Some(Failure::ResolutionFailed));
        assert_eq!(results[0].category(), Some(ShapeCategory::LinearFlexible));
        assert_eq!(results[2].category(), Some(ShapeCategory::Monocyclic));
        assert_eq!(results[4].category(), Some(ShapeCategory::Polycyclic));
    }

    #[test]
    fn parallel_run_matches_sequential_order() {
        let names: Vec<&str> = ["butane", "benzene", "nope", "naphthalene", "broken", "octane"]
            .iter()
            .copied()
            .cycle()
            .take(30)
            .collect();
        let resolver = common_resolver();

        let sequential = run_names(&names, &resolver, None, 1);
        let parallel = run_names(&names, &resolver, None, 4);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn render_failure_does_not_affect_classification() {
        let results = run_names(&["benzene"], &common_resolver(), Some(&FailingRenderer), 1);
        let classification = results[0].classification().unwrap();

        assert_eq!(classification.category, ShapeCategory::Monocyclic);
        assert!(matches!(classification.diagram, DiagramOutcome::Failed(_)));
    }

    #[test]
    fn progress_events_bracket_the_run() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let resolver = common_resolver();
        let collaborators = Collaborators {
            resolver: &resolver,
            parser: &SmilesParser,
            renderer: None,
        };
        run_with(&lines_from(["butane", "x"]), &collaborators, 1, &reporter).unwrap();
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::TaskStart { total_steps: 2 },
                Progress::TaskIncrement,
                Progress::TaskIncrement,
                Progress::TaskFinish,
            ]
        );
    }

    #[test]
    fn inspect_skips_resolution() {
        let renderer = CountingRenderer(AtomicUsize::new(0));
        let results = inspect_with(
            &lines_from([" c1ccc2ccccc2c1 ", "C1CC"]),
            &SmilesParser,
            Some(&renderer),
            &ProgressReporter::new(),
        );

        let classification = results[0].classification().unwrap();
        assert_eq!(classification.identifier.as_str(), "c1ccc2ccccc2c1");
        assert_eq!(classification.category, ShapeCategory::Bicyclic);
        assert_eq!(results[1].failure(), Some(Failure::ParseFailed));
        assert_eq!(renderer.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_tags_are_user_facing() {
        assert_eq!(Failure::ResolutionFailed.to_string(), "Could not resolve");
        assert_eq!(Failure::TransportError.to_string(), "Lookup failed");
        assert_eq!(Failure::ParseFailed.to_string(), "Invalid SMILES");
        assert_eq!(
            Failure::from(&ResolveError::EmptyResponse),
            Failure::ResolutionFailed
        );
    }
}
