use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use varclust_core::NamespaceSelector;

use super::{InMemoryVariantStore, StoreState};
use crate::errors::{Result, StoreError};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreSnapshot {
    version: u32,
    selector: NamespaceSelector,
    state: StoreState,
}

impl InMemoryVariantStore {
    /// Write the whole store as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let snapshot = StoreSnapshot {
            version: SNAPSHOT_VERSION,
            selector: self.selector,
            state: self.state()?.clone(),
        };

        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;

        info!(path = %path.as_ref().display(), "saved store snapshot");
        Ok(())
    }

    /// Read a store written by [`InMemoryVariantStore::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let snapshot: StoreSnapshot = serde_json::from_reader(reader)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Snapshot(format!(
                "unsupported version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        if snapshot.state.next_clustered_accession < snapshot.selector.clustered_monotonic_init {
            return Err(StoreError::Snapshot(format!(
                "next clustered accession {} is below the clustered threshold {}",
                snapshot.state.next_clustered_accession,
                snapshot.selector.clustered_monotonic_init
            )));
        }

        Ok(InMemoryVariantStore {
            selector: snapshot.selector,
            state: Mutex::new(snapshot.state),
        })
    }

    ///
    /// Load the snapshot at `path`, or start an empty store when there is none.
    ///
    /// The thresholds stored in an existing snapshot win over `selector`:
    /// the namespace of an accession must never change once written.
    ///
    pub fn load_or_new<P: AsRef<Path>>(path: P, selector: NamespaceSelector) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no store snapshot, starting empty");
            return Ok(InMemoryVariantStore::new(selector));
        }

        let store = InMemoryVariantStore::load(path)?;
        if store.selector != selector {
            warn!(
                stored = ?store.selector,
                configured = ?selector,
                "configured thresholds differ from the snapshot, keeping the snapshot's"
            );
        }
        Ok(store)
    }
}
