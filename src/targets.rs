//! Static registry of ping targets
//!
//! The table is fixed at build time; names are matched loosely so that
//! `na-east`, `NA East` and `naeast` all resolve to the same entry.

use crate::error::{AppError, Result};
use crate::types::Target;

/// Display name → host, in menu order
pub const TARGETS: &[(&str, &str)] = &[
    ("NA-East", "ping-nae.ds.on.epicgames.com"),
    ("NA-Central", "ping-nac.ds.on.epicgames.com"),
    ("NA-West", "ping-naw.ds.on.epicgames.com"),
    ("Europe", "ping-eu.ds.on.epicgames.com"),
    ("Oceania", "ping-oce.ds.on.epicgames.com"),
    ("Brazil", "ping-br.ds.on.epicgames.com"),
    ("Asia", "ping-asia.ds.on.epicgames.com"),
    ("Middle East", "ping-me.ds.on.epicgames.com"),
];

/// All registered targets in menu order
pub fn all() -> Vec<Target> {
    TARGETS
        .iter()
        .map(|(name, host)| Target::new(*name, *host))
        .collect()
}

/// Registered target names in menu order
pub fn names() -> Vec<&'static str> {
    TARGETS.iter().map(|(name, _)| *name).collect()
}

/// Find a target by display name
pub fn find(name: &str) -> Option<Target> {
    let wanted = normalize(name);
    if wanted.is_empty() {
        return None;
    }

    TARGETS
        .iter()
        .find(|(candidate, _)| normalize(candidate) == wanted)
        .map(|(name, host)| Target::new(*name, *host))
}

/// Find a target by name, failing with the list of valid names
pub fn resolve(name: &str) -> Result<Target> {
    find(name).ok_or_else(|| {
        AppError::validation(format!(
            "Unknown target '{}'. Available targets: {}",
            name,
            names().join(", ")
        ))
    })
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
