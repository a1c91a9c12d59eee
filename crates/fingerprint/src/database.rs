//! Recog fingerprint databases and the set loaded from a directory.

use crate::matcher::{Fingerprint, FingerprintMatch, Param};
use nmapreport_common::{Fingerprinter, ReconMatch, ReportError, ReportResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

const DATABASE_SUFFIX: &str = ".xml";

#[derive(Debug, Deserialize)]
struct RawDatabase {
    #[serde(rename = "fingerprint", default)]
    fingerprints: Vec<RawFingerprint>,
}

#[derive(Debug, Deserialize)]
struct RawFingerprint {
    #[serde(rename = "@pattern")]
    pattern: String,
    #[serde(rename = "@flags", default)]
    flags: Option<String>,
    #[serde(rename = "@certainty", default)]
    certainty: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "param", default)]
    params: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(rename = "@pos", default)]
    pos: usize,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@value", default)]
    value: Option<String>,
}

/// One fingerprint file, patterns kept in file order.
#[derive(Debug, Clone)]
pub struct FingerprintDatabase {
    name: String,
    fingerprints: Vec<Fingerprint>,
    skipped: usize,
}

impl FingerprintDatabase {
    /// Parse a Recog XML document. Patterns the regex engine rejects are
    /// skipped with a warning; the rest of the database still loads.
    pub fn from_xml(name: impl Into<String>, xml: &str) -> ReportResult<Self> {
        let name = name.into();
        let raw: RawDatabase = quick_xml::de::from_str(xml)
            .map_err(|e| ReportError::Fingerprint(format!("{}: {}", name, e)))?;

        let mut fingerprints = Vec::with_capacity(raw.fingerprints.len());
        let mut skipped = 0;
        for fp in raw.fingerprints {
            let description = fp.description.as_deref().unwrap_or_default().trim().to_string();
            let params = fp
                .params
                .into_iter()
                .map(|p| Param {
                    pos: p.pos,
                    name: p.name,
                    value: p.value,
                })
                .collect();

            match Fingerprint::compile(
                description.as_str(),
                &fp.pattern,
                fp.flags.as_deref(),
                fp.certainty,
                params,
            ) {
                Ok(compiled) => fingerprints.push(compiled),
                Err(e) => {
                    skipped += 1;
                    warn!("{}: skipping fingerprint '{}': {}", name, description, e);
                }
            }
        }

        debug!("{}: {} fingerprint(s), {} skipped", name, fingerprints.len(), skipped);
        Ok(Self {
            name,
            fingerprints,
            skipped,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Fingerprints dropped because their pattern did not compile.
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// First fingerprint, in file order, that matches `text`.
    pub fn match_first(&self, text: &str) -> Option<FingerprintMatch> {
        self.fingerprints.iter().find_map(|fp| fp.match_banner(text))
    }
}

/// All loaded databases, keyed by name and iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct FingerprintSet {
    databases: BTreeMap<String, FingerprintDatabase>,
}

impl FingerprintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.xml` regular file in `path`, keyed by file name.
    pub async fn load_dir(path: impl AsRef<Path>) -> ReportResult<Self> {
        let path = path.as_ref();
        info!("Loading fingerprints from {}", path.display());

        let mut entries = tokio::fs::read_dir(path).await.map_err(|e| {
            ReportError::Fingerprint(format!(
                "cannot read fingerprint directory {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut set = Self::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(DATABASE_SUFFIX) {
                debug!("Ignoring {}", name);
                continue;
            }
            let file_path = entry.path();
            let metadata = tokio::fs::metadata(&file_path).await.map_err(|e| {
                ReportError::Fingerprint(format!("cannot read {}: {}", file_path.display(), e))
            })?;
            if !metadata.is_file() {
                continue;
            }

            let xml = tokio::fs::read_to_string(&file_path).await.map_err(|e| {
                ReportError::Fingerprint(format!("cannot read {}: {}", file_path.display(), e))
            })?;
            set.insert(FingerprintDatabase::from_xml(name, &xml)?);
        }

        if set.is_empty() {
            warn!("No fingerprint databases found in {}", path.display());
        } else {
            let skipped: usize = set.databases().map(FingerprintDatabase::skipped).sum();
            info!(
                "Loaded {} database(s) with {} fingerprint(s), {} skipped",
                set.len(),
                set.signature_count(),
                skipped
            );
        }
        Ok(set)
    }

    /// Add or replace a database under its own name.
    pub fn insert(&mut self, database: FingerprintDatabase) {
        self.databases.insert(database.name().to_string(), database);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.databases.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FingerprintDatabase> {
        self.databases.get(name)
    }

    pub fn databases(&self) -> impl Iterator<Item = &FingerprintDatabase> {
        self.databases.values()
    }

    /// First match in the named database. `None` when the database is
    /// unknown or nothing matched.
    pub fn match_first(&self, database: &str, text: &str) -> Option<FingerprintMatch> {
        self.databases.get(database)?.match_first(text)
    }
}

impl Fingerprinter for FingerprintSet {
    fn recon(&self, banner: &str) -> Vec<ReconMatch> {
        self.databases
            .iter()
            .filter(|(name, _)| name.ends_with(DATABASE_SUFFIX))
            .filter_map(|(name, db)| {
                db.match_first(banner)
                    .map(|m| ReconMatch::new(name.as_str(), m.values))
            })
            .collect()
    }

    fn signature_count(&self) -> usize {
        self.databases.values().map(FingerprintDatabase::len).sum()
    }
}
