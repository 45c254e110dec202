use serde::Serialize;
use thiserror::Error;

use crate::catalog::LocationDescriptor;
use crate::guid::GuidToken;
use crate::store::Store;
use crate::strategy::{Action, Mode, OutcomeRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("no adapter GUIDs supplied (input was empty after trimming)")]
    EmptyInput,
}

/// All outcomes for one GUID's pass over the catalog.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub guid: String,
    pub records: Vec<OutcomeRecord>,
}

impl RunSummary {
    pub fn count(&self, action: Action) -> usize {
        self.records.iter().filter(|r| r.action == action).count()
    }

    pub fn errors(&self) -> Vec<&OutcomeRecord> {
        self.records
            .iter()
            .filter(|r| r.action == Action::Error)
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|r| r.action == Action::Error)
    }
}

/// Run one location, capturing any store failure as an error record so the
/// rest of the catalog is still processed.
pub fn run_location(
    store: &mut dyn Store,
    location: &LocationDescriptor,
    guid: &GuidToken,
    dry_run: bool,
) -> Vec<OutcomeRecord> {
    match location
        .strategy
        .execute(store, &location.id, &location.path, guid, dry_run)
    {
        Ok(records) => records,
        Err(e) => vec![OutcomeRecord {
            location_id: location.id.clone(),
            guid: guid.braced().to_string(),
            mode: if dry_run { Mode::DryRun } else { Mode::Apply },
            action: Action::Error,
            detail: Some(e.to_string()),
        }],
    }
}

/// Walk the whole catalog for one GUID, in catalog order.
pub fn run_catalog(
    store: &mut dyn Store,
    locations: &[LocationDescriptor],
    guid: &GuidToken,
    dry_run: bool,
) -> Vec<OutcomeRecord> {
    let mut records = Vec::new();
    for location in locations {
        records.extend(run_location(store, location, guid, dry_run));
    }
    records
}

/// Normalize raw GUID input: trim, brace-wrap, drop entries that are empty
/// after trimming.
pub fn normalize_guids(raw: &[String]) -> Vec<GuidToken> {
    raw.iter().filter_map(|r| GuidToken::normalize(r)).collect()
}

/// Drive one catalog pass per normalized GUID. GUIDs are independent; one
/// GUID's errors never block another's pass. Fails up front, before any
/// store access, when nothing is left after normalization.
pub fn run_batch(
    store: &mut dyn Store,
    locations: &[LocationDescriptor],
    raw_guids: &[String],
    dry_run: bool,
) -> Result<Vec<RunSummary>, InputError> {
    let guids = normalize_guids(raw_guids);
    if guids.is_empty() {
        return Err(InputError::EmptyInput);
    }
    Ok(guids
        .iter()
        .map(|guid| RunSummary {
            guid: guid.braced().to_string(),
            records: run_catalog(store, locations, guid, dry_run),
        })
        .collect())
}
