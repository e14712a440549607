//! Concurrent generation of independent documents.
//!
//! Every request runs on its own blocking task with its own map and
//! document. Two requests may not share an output path: the whole batch is
//! rejected before anything is generated.

use futures::future::join_all;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::{GenerationReport, GenerationRequest, Generator};
use crate::core::DocfillError;
use crate::utils::progress::BatchProgress;

/// Reject a batch in which two requests write the same file.
pub fn check_output_conflicts(requests: &[GenerationRequest]) -> Result<(), DocfillError> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for request in requests {
        let key = std::path::absolute(&request.output).unwrap_or_else(|_| request.output.clone());
        if !seen.insert(key) {
            return Err(DocfillError::OutputConflict {
                path: request.output.display().to_string(),
            });
        }
    }
    Ok(())
}

/// Generate every request concurrently.
///
/// Results come back in request order; one failed request does not stop
/// the others.
///
/// # Errors
///
/// [`DocfillError::OutputConflict`] when two requests share an output path.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::config::EngineConfig;
/// use docfill::generator::{GenerationRequest, Generator, generate_batch};
/// use docfill::utils::progress::BatchProgress;
///
/// # async fn example() -> Result<(), docfill::core::DocfillError> {
/// let requests = vec![
///     GenerationRequest::new("modelos/proposta.docx", "ACME/dados.md", "ACME/proposta.docx"),
///     GenerationRequest::new("modelos/resumo.pptx", "ACME/dados.md", "ACME/resumo.pptx"),
/// ];
/// let results = generate_batch(Generator::new(EngineConfig::default()), requests, BatchProgress::new(2)).await?;
/// assert_eq!(results.len(), 2);
/// # Ok(())
/// # }
/// ```
pub async fn generate_batch(
    generator: Generator,
    requests: Vec<GenerationRequest>,
    progress: BatchProgress,
) -> Result<Vec<Result<GenerationReport, DocfillError>>, DocfillError> {
    check_output_conflicts(&requests)?;
    info!("Generating {} document(s)", requests.len());

    let generator = Arc::new(generator);
    let tasks = requests.into_iter().map(|request| {
        let generator = Arc::clone(&generator);
        let progress = progress.clone();
        async move {
            let label = request.output.display().to_string();
            let joined = tokio::task::spawn_blocking(move || generator.generate(&request)).await;
            progress.set_message(label.clone());
            progress.inc();

            match joined {
                Ok(result) => result,
                Err(e) => {
                    debug!("Generation task for {label} did not complete: {e}");
                    Err(DocfillError::Other {
                        message: format!("Generation of {label} was aborted: {e}"),
                    })
                }
            }
        }
    });

    let results = join_all(tasks).await;
    let failed = results.iter().filter(|r| r.is_err()).count();
    progress.finish(format!("{} generated, {failed} failed", results.len() - failed));
    Ok(results)
}
