//! Allow-list loading

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::domain::{AllowList, KeyEntry};

/// Build the allow-list from configured keys, then the local keys file
///
/// Configured keys take priority. Entries from the file are added only when
/// not already configured and when enabled.
pub async fn load_allow_list(
    configured: impl IntoIterator<Item = (String, KeyEntry)>,
    keys_file: &Path,
) -> AllowList {
    let mut allow_list = AllowList::new();

    for (key, entry) in configured {
        allow_list.insert_if_absent(&key, entry);
    }
    let from_config = allow_list.len();

    let mut from_file = 0usize;
    for (key, entry) in read_keys_file(keys_file).await {
        if entry.enabled && allow_list.insert_if_absent(&key, entry) {
            from_file += 1;
        }
    }

    info!(
        from_config,
        from_file,
        total = allow_list.len(),
        "Access key allow-list loaded"
    );

    allow_list
}

async fn read_keys_file(path: &Path) -> BTreeMap<String, KeyEntry> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No keys file");
            return BTreeMap::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read keys file");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(keys) => keys,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring malformed keys file");
            BTreeMap::new()
        }
    }
}
