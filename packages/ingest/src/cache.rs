//! Single-slot memoization of pipeline results.
//!
//! Repeated requests for the same source pair and column mapping reuse the
//! previously built record set instead of re-reading the spreadsheets.
//! Failed builds are never stored.

use std::sync::Arc;

use call_center_incident_models::CanonicalRecordSet;
use call_center_source::columns::ColumnMapping;

use crate::PipelineError;
use crate::pipeline::{CacheKey, SourcePair, run_pipeline};

/// Caches the most recently built record set.
#[derive(Debug)]
pub struct PipelineCache {
    columns: ColumnMapping,
    slot: Option<(CacheKey, Arc<CanonicalRecordSet>)>,
}

impl PipelineCache {
    /// Creates an empty cache that reads sources with `columns`.
    #[must_use]
    pub const fn new(columns: ColumnMapping) -> Self {
        Self {
            columns,
            slot: None,
        }
    }

    /// The column mapping used for every build.
    #[must_use]
    pub const fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    /// Returns the cached record set for `sources`, building it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates any [`PipelineError`] from [`run_pipeline`].
    pub fn get_or_load(
        &mut self,
        sources: &SourcePair,
    ) -> Result<Arc<CanonicalRecordSet>, PipelineError> {
        let columns = self.columns.clone();
        self.get_or_build(sources, |pair| run_pipeline(pair, &columns))
    }

    /// Like [`Self::get_or_load`] with a caller-supplied build step.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by `build`. The slot is left untouched
    /// on failure.
    pub fn get_or_build<F>(
        &mut self,
        sources: &SourcePair,
        build: F,
    ) -> Result<Arc<CanonicalRecordSet>, PipelineError>
    where
        F: FnOnce(&SourcePair) -> Result<CanonicalRecordSet, PipelineError>,
    {
        let key = sources.cache_key(&self.columns);
        if let Some((cached, set)) = &self.slot
            && *cached == key
        {
            log::debug!("Pipeline cache hit ({})", key.as_str());
            return Ok(Arc::clone(set));
        }

        log::debug!("Pipeline cache miss ({})", key.as_str());
        let set = Arc::new(build(sources)?);
        self.slot = Some((key, Arc::clone(&set)));
        Ok(set)
    }

    /// Whether a record set for `sources` is currently cached.
    #[must_use]
    pub fn is_cached(&self, sources: &SourcePair) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|(key, _)| *key == sources.cache_key(&self.columns))
    }

    /// Drops the cached record set.
    pub fn invalidate(&mut self) {
        if self.slot.take().is_some() {
            log::debug!("Pipeline cache invalidated");
        }
    }
}
