//! Stamping many documents at once

use super::Stamper;
use crate::content::StampContext;
use crate::types::*;
use tokio::task::JoinSet;

/// One document of a batch
#[derive(Debug, Clone)]
pub struct BatchInput {
    /// File name, also shown by the filename line
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Stamper {
    /// Stamp every input as its own blocking task.
    ///
    /// A failing document only fails its own outcome. Outcomes are returned
    /// in input order.
    pub async fn stamp_batch(&self, inputs: Vec<BatchInput>) -> Vec<BatchOutcome> {
        let names: Vec<String> = inputs.iter().map(|input| input.name.clone()).collect();
        let mut results: Vec<Option<Result<Vec<u8>>>> = names.iter().map(|_| None).collect();

        let mut tasks = JoinSet::new();
        for (index, input) in inputs.into_iter().enumerate() {
            let stamper = self.clone();
            tasks.spawn_blocking(move || {
                let context = StampContext::new(Some(input.name));
                (index, stamper.stamp_bytes(&input.bytes, &context))
            });
        }

        // A panicked task cannot report its index; its error fills whichever
        // slot is left empty.
        let mut join_errors = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Err(e) = &result {
                        log::warn!("Failed to stamp {}: {}", names[index], e);
                    }
                    results[index] = Some(result);
                }
                Err(e) => {
                    log::error!("Stamping task failed: {}", e);
                    join_errors.push(e);
                }
            }
        }

        let mut join_errors = join_errors.into_iter();
        names
            .into_iter()
            .zip(results)
            .map(|(name, result)| BatchOutcome {
                result: result.unwrap_or_else(|| match join_errors.next() {
                    Some(e) => Err(StampError::TaskJoin(e)),
                    None => Err(StampError::Config(format!("{} was never stamped", name))),
                }),
                name,
            })
            .collect()
    }
}
