//! The catalog: model specification and compilation unit views behind one
//! data-access surface.

use crate::schema::{ObjectUsage, CREATION_TIMESTAMP};
use crate::views::{
    LatestTimestampByFingerprint, ModelSpecificationByFingerprint, ModelSpecificationsIncludeAlias,
    ObjectUsagesByFingerprint, ViewKind,
};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use hashbrown::HashMap;
use tracing::debug;
use viewdex_core::{DocId, Document, Result, Value};
use viewdex_index::KeyRange;
use viewdex_view::{Count, MaxValue, View, ViewConfig, ViewStats};

/// Indexes model specifications and compilation units and answers the
/// lookups a recommender needs: specifications by fingerprint or name,
/// object usages per fingerprint and the freshest data per fingerprint.
pub struct Catalog {
    by_fingerprint: View<ModelSpecificationByFingerprint>,
    by_name_or_alias: View<ModelSpecificationsIncludeAlias>,
    object_usages: View<ObjectUsagesByFingerprint, Count>,
    latest_timestamps: View<LatestTimestampByFingerprint, MaxValue>,
    /// Creation timestamp of the applied version of each compilation unit
    units: HashMap<DocId, Value>,
}

/// Fingerprint arguments are a set: repeats are looked up once.
fn distinct<I, S>(fingerprints: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fingerprints
        .into_iter()
        .map(|fp| fp.as_ref().to_string())
        .collect()
}

impl Catalog {
    /// Creates an empty catalog with the default view configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ViewConfig::default())
    }

    /// Creates an empty catalog whose views share one configuration.
    pub fn with_config(config: ViewConfig) -> Result<Self> {
        Ok(Self {
            by_fingerprint: View::builder(
                ViewKind::ModelSpecificationByFingerprint.name(),
                ModelSpecificationByFingerprint,
            )
            .config(config.clone())
            .build()?,
            by_name_or_alias: View::builder(
                ViewKind::ModelSpecificationsIncludeAlias.name(),
                ModelSpecificationsIncludeAlias,
            )
            .config(config.clone())
            .build()?,
            object_usages: View::builder(
                ViewKind::ObjectUsagesByFingerprint.name(),
                ObjectUsagesByFingerprint,
            )
            .reduce(Count)
            .config(config.clone())
            .build()?,
            latest_timestamps: View::builder(
                ViewKind::LatestTimestampByFingerprint.name(),
                LatestTimestampByFingerprint,
            )
            .reduce(MaxValue)
            .config(config)
            .build()?,
            units: HashMap::new(),
        })
    }

    /// Returns the processing counters of one view.
    pub fn view_stats(&self, kind: ViewKind) -> ViewStats {
        match kind {
            ViewKind::ModelSpecificationByFingerprint => self.by_fingerprint.stats(),
            ViewKind::ModelSpecificationsIncludeAlias => self.by_name_or_alias.stats(),
            ViewKind::ObjectUsagesByFingerprint => self.object_usages.stats(),
            ViewKind::LatestTimestampByFingerprint => self.latest_timestamps.stats(),
        }
    }

    /// Returns the number of applied compilation units.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Indexes or re-indexes a model specification.
    ///
    /// Returns false when the document is not a complete specification and
    /// was therefore not indexed.
    pub fn put_model_specification(&mut self, doc: &Document) -> bool {
        self.by_fingerprint.update(doc);
        self.by_name_or_alias.update(doc);
        self.by_fingerprint.contains_document(doc.id())
            || self.by_name_or_alias.contains_document(doc.id())
    }

    /// Removes a model specification. Unknown ids are ignored.
    pub fn remove_model_specification(&mut self, id: &str) {
        self.by_fingerprint.remove(id);
        self.by_name_or_alias.remove(id);
    }

    /// Saves compilation units, keeping the newest version of each.
    ///
    /// A unit is applied when its id is new or its `creationTimestamp` is
    /// strictly newer than the applied version's. Returns the number of
    /// units applied.
    pub fn save_compilation_units(&mut self, docs: &[Document]) -> usize {
        let mut accepted: Vec<Document> = Vec::new();
        for doc in docs {
            let timestamp = doc.get(CREATION_TIMESTAMP).cloned().unwrap_or(Value::Null);
            let newer = match self.units.get(doc.id()) {
                Some(applied) => *applied < timestamp,
                None => true,
            };
            if newer {
                self.units.insert(doc.id().to_string(), timestamp);
                accepted.push(doc.clone());
            }
        }

        if !accepted.is_empty() {
            self.object_usages.update_batch(&accepted);
            self.latest_timestamps.update_batch(&accepted);
        }
        debug!(
            offered = docs.len(),
            applied = accepted.len(),
            units = self.units.len(),
            "saved compilation units"
        );
        accepted.len()
    }

    /// Removes a compilation unit. Returns false for unknown ids.
    pub fn remove_compilation_unit(&mut self, id: &str) -> bool {
        if self.units.remove(id).is_none() {
            return false;
        }
        self.object_usages.remove(id);
        self.latest_timestamps.remove(id);
        true
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    /// Returns the first model specification carrying the fingerprint.
    pub fn model_specification_by_fingerprint(&self, fingerprint: &str) -> Option<Arc<Document>> {
        self.by_fingerprint
            .snapshot()
            .get(&fingerprint.to_string())
            .into_iter()
            .next()
            .map(|row| row.value)
    }

    /// Returns every indexed model specification once, in id order.
    pub fn model_specifications(&self) -> Vec<Arc<Document>> {
        let specs: BTreeMap<String, Arc<Document>> = self
            .by_name_or_alias
            .snapshot()
            .range(&KeyRange::all(), false)
            .into_iter()
            .map(|row| (row.id, row.value))
            .collect();
        specs.into_values().collect()
    }

    /// Returns the model specifications whose symbolic name or one of whose
    /// aliases equals `name`.
    pub fn model_specifications_by_name_or_alias(&self, name: &str) -> Vec<Arc<Document>> {
        self.by_name_or_alias
            .snapshot()
            .get(&name.to_string())
            .into_iter()
            .map(|row| row.value)
            .collect()
    }

    /// Returns every recorded usage of the types with the given fingerprints,
    /// grouped by fingerprint in ascending order.
    pub fn object_usages<I, S>(&self, fingerprints: I) -> Vec<ObjectUsage>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.object_usages.snapshot();
        let mut usages = Vec::new();
        for fp in distinct(fingerprints) {
            usages.extend(
                snapshot
                    .get(&fp)
                    .iter()
                    .filter_map(|row| ObjectUsage::from_value(&row.value)),
            );
        }
        usages
    }

    /// Returns the number of recorded usages of the types with the given
    /// fingerprints. Unknown fingerprints count zero.
    pub fn number_of_object_usages<I, S>(&self, fingerprints: I) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.object_usages.snapshot();
        let mut total = 0;
        for fp in distinct(fingerprints) {
            let range = KeyRange::only(fp);
            total += snapshot.reduce_all(&range)?.unwrap_or(0);
        }
        Ok(total)
    }

    /// Returns the newest creation timestamp of any compilation unit that
    /// imports one of the fingerprints, or `None` when none does.
    pub fn latest_timestamp_for_fingerprints<I, S>(&self, fingerprints: I) -> Result<Option<Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let snapshot = self.latest_timestamps.snapshot();
        let mut latest: Option<Value> = None;
        for fp in distinct(fingerprints) {
            let range = KeyRange::only(fp);
            let Some(timestamp) = snapshot.reduce_all(&range)? else {
                continue;
            };
            if latest.as_ref().map_or(true, |current| *current <= timestamp) {
                latest = Some(timestamp);
            }
        }
        Ok(latest)
    }
}
