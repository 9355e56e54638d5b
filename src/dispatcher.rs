//! Stage routing for landed files.
//!
//! The dispatcher classifies the file once, then runs the validate or
//! transform path. It holds no state between invocations; collaborators are
//! injected so stages can run against any store backend.
use crate::config::PipelineConfig;
use crate::enricher::enrich_batch;
use crate::error::Result;
use crate::event::{FileKind, FileLanded, ReferenceKind};
use crate::model::StageOutcome;
use crate::parser::{parse_batch_bytes, ParsedBatch};
use crate::persister::persist_batch;
use crate::reference::ReferenceLoader;
use crate::store::{ObjectStore, RecordStore};
use crate::validator::{ensure_valid, validate_batch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Transform,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Transform => "transform",
        }
    }
}

pub struct StageDispatcher<'a> {
    config: &'a PipelineConfig,
    objects: &'a dyn ObjectStore,
    references: &'a dyn ReferenceLoader,
    records: &'a dyn RecordStore,
}

impl<'a> StageDispatcher<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        objects: &'a dyn ObjectStore,
        references: &'a dyn ReferenceLoader,
        records: &'a dyn RecordStore,
    ) -> Self {
        Self {
            config,
            objects,
            references,
            records,
        }
    }

    pub fn run(&self, stage: Stage, event: &FileLanded) -> Result<StageOutcome> {
        let filename = event.filename();
        let kind = FileKind::classify(filename, self.config);
        tracing::info!(
            stage = stage.as_str(),
            bucket = %event.bucket,
            filename,
            ?kind,
            "file detected"
        );
        let outcome = match (stage, kind) {
            (Stage::Validate, FileKind::ReferenceFile(reference)) => {
                self.move_reference_file(event, reference)?
            }
            (Stage::Validate, FileKind::OrderBatch) => self.validate_orders(event)?,
            (Stage::Transform, FileKind::OrderBatch) => self.transform_orders(event)?,
            (Stage::Transform, FileKind::ReferenceFile(_)) | (_, FileKind::Unrecognized) => {
                StageOutcome::Skipped {
                    filename: filename.to_string(),
                }
            }
        };
        tracing::info!(
            stage = stage.as_str(),
            filename,
            records = outcome.records(),
            ?outcome,
            "stage complete"
        );
        Ok(outcome)
    }

    fn move_reference_file(
        &self,
        event: &FileLanded,
        reference: ReferenceKind,
    ) -> Result<StageOutcome> {
        let filename = event.filename();
        let processing_bucket = self.config.processing_bucket(&event.bucket);
        tracing::info!(
            filename,
            reference = reference.as_str(),
            destination = %processing_bucket,
            "moving reference file to processing area"
        );
        self.objects
            .copy(&event.bucket, &event.key, &processing_bucket, filename)?;
        Ok(StageOutcome::ReferenceFileMoved {
            filename: filename.to_string(),
        })
    }

    fn read_batch(&self, event: &FileLanded) -> Result<ParsedBatch> {
        let bytes = self.objects.get(&event.bucket, &event.key)?;
        let batch = parse_batch_bytes(&event.key, &bytes)?;
        tracing::info!(
            filename = event.filename(),
            records = batch.records.len(),
            skipped = batch.skipped.len(),
            "order batch parsed"
        );
        Ok(batch)
    }

    fn validate_orders(&self, event: &FileLanded) -> Result<StageOutcome> {
        let filename = event.filename();
        let batch = self.read_batch(event)?;
        let cache = self
            .references
            .load(&self.config.processing_bucket(&event.bucket))?;
        let defects = validate_batch(&batch.records, &cache);
        ensure_valid(filename, &defects)?;
        tracing::info!(filename, records = batch.records.len(), "validation successful");
        Ok(StageOutcome::Validated {
            records: batch.records.len(),
            filename: filename.to_string(),
        })
    }

    fn transform_orders(&self, event: &FileLanded) -> Result<StageOutcome> {
        let filename = event.filename();
        let batch = self.read_batch(event)?;
        let cache = self
            .references
            .load(&self.config.processing_bucket(&event.bucket))?;
        let enriched = enrich_batch(&batch.records, &cache);
        let records = persist_batch(self.records, &self.config.table, &enriched)?;
        Ok(StageOutcome::Transformed {
            records,
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
