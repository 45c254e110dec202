use serde::Serialize;

use crate::guid::GuidToken;
use crate::store::{PropertyValue, Store, StoreError};

/// How the GUID appears in a node name built by `ExactChildPath`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidForm {
    /// `{guid}`
    Braced,
    /// `guid` without braces
    Bare,
    /// A fixed prefix followed by the braced form, e.g. `Tcpip_{guid}`.
    Prefixed(&'static str),
}

impl GuidForm {
    fn decorate(self, guid: &GuidToken) -> String {
        match self {
            GuidForm::Braced => guid.braced().to_string(),
            GuidForm::Bare => guid.bare().to_string(),
            GuidForm::Prefixed(prefix) => format!("{prefix}{}", guid.braced()),
        }
    }
}

/// One of the four matching/removal algorithms a catalog location uses.
///
/// The variant determines which fields are meaningful; path-based variants
/// carry no property names at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The location holds a child node named after the GUID itself.
    ExactChildPath { form: GuidForm },
    /// Named list properties on the base node whose entries may embed the
    /// GUID in decorated form (matched by literal substring).
    PropertyScan { properties: &'static [&'static str] },
    /// Children of the base node carry an identifying property compared
    /// exactly against the GUID; every matching child is deleted.
    NodeNameOrPropertyMatch { property: &'static str },
    /// Every property of every child is inspected: exact list elements are
    /// removed, exact single-string matches are cleared.
    ListFilter,
}

impl Strategy {
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::ExactChildPath { .. } => "exact-child-path",
            Strategy::PropertyScan { .. } => "property-scan",
            Strategy::NodeNameOrPropertyMatch { .. } => "node-match",
            Strategy::ListFilter => "list-filter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    DryRun,
    Apply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    NoneFound,
    WouldDeleteNode,
    DeletedNode,
    WouldClearProperty,
    ClearedProperty,
    WouldRemoveListEntries,
    RemovedListEntries,
    Error,
}

/// One outcome for one (GUID, location) pair. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub location_id: String,
    pub guid: String,
    pub mode: Mode,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

struct Pass<'a> {
    location_id: &'a str,
    guid: &'a GuidToken,
    dry_run: bool,
    records: Vec<OutcomeRecord>,
}

impl<'a> Pass<'a> {
    fn push(&mut self, action: Action, detail: Option<String>) {
        self.records.push(OutcomeRecord {
            location_id: self.location_id.to_string(),
            guid: self.guid.braced().to_string(),
            mode: if self.dry_run { Mode::DryRun } else { Mode::Apply },
            action,
            detail,
        });
    }

    fn push_error(&mut self, detail: String) {
        self.push(Action::Error, Some(detail));
    }
}

impl Strategy {
    /// Run this strategy against one resolved base path.
    ///
    /// Failures on individual properties or children are recorded inline
    /// and never abort the rest of the pass; only a failure before any
    /// per-item work starts is returned as Err, for the runner to convert.
    pub fn execute(
        &self,
        store: &mut dyn Store,
        location_id: &str,
        base_path: &str,
        guid: &GuidToken,
        dry_run: bool,
    ) -> Result<Vec<OutcomeRecord>, StoreError> {
        let mut pass = Pass {
            location_id,
            guid,
            dry_run,
            records: Vec::new(),
        };
        match self {
            Strategy::ExactChildPath { form } => {
                exact_child_path(store, base_path, *form, &mut pass)?
            }
            Strategy::PropertyScan { properties } => {
                property_scan(store, base_path, properties, &mut pass)
            }
            Strategy::NodeNameOrPropertyMatch { property } => {
                node_match(store, base_path, property, &mut pass)?
            }
            Strategy::ListFilter => list_filter(store, base_path, &mut pass)?,
        }
        Ok(pass.records)
    }
}

fn exact_child_path(
    store: &mut dyn Store,
    base_path: &str,
    form: GuidForm,
    pass: &mut Pass,
) -> Result<(), StoreError> {
    let path = store.join_path(base_path, &form.decorate(pass.guid));
    if store.exists(&path)? {
        if pass.dry_run {
            pass.push(Action::WouldDeleteNode, Some(path));
        } else {
            store.delete_node(&path)?;
            pass.push(Action::DeletedNode, Some(path));
        }
    } else if pass.dry_run {
        // Apply mode stays silent on absent nodes.
        pass.push(Action::NoneFound, Some(path));
    }
    Ok(())
}

fn property_scan(
    store: &mut dyn Store,
    base_path: &str,
    properties: &[&str],
    pass: &mut Pass,
) {
    for &prop in properties {
        // A property that cannot be read is recorded and skipped; the
        // remaining properties of this location are still scanned.
        let value = match store.read_property(base_path, prop) {
            Ok(v) => v,
            Err(e) => {
                pass.push_error(format!("{prop}: {e}"));
                continue;
            }
        };
        match value {
            PropertyValue::List(entries) => {
                let (matched, kept): (Vec<String>, Vec<String>) = entries
                    .into_iter()
                    .partition(|entry| pass.guid.contained_in(entry));
                if matched.is_empty() {
                    if pass.dry_run {
                        pass.push(Action::NoneFound, Some(prop.to_string()));
                    }
                } else if pass.dry_run {
                    pass.push(
                        Action::WouldRemoveListEntries,
                        Some(format!("{prop}: {}", matched.join(", "))),
                    );
                } else {
                    match store.write_property(base_path, prop, PropertyValue::List(kept)) {
                        Ok(()) => pass.push(
                            Action::RemovedListEntries,
                            Some(format!("{prop}: {}", matched.join(", "))),
                        ),
                        Err(e) => pass.push_error(format!("{prop}: {e}")),
                    }
                }
            }
            PropertyValue::Single(s) => {
                if pass.guid.contained_in(&s) {
                    if pass.dry_run {
                        pass.push(Action::WouldClearProperty, Some(format!("{prop} = {s}")));
                    } else {
                        match store.write_property(
                            base_path,
                            prop,
                            PropertyValue::Single(String::new()),
                        ) {
                            Ok(()) => pass
                                .push(Action::ClearedProperty, Some(format!("{prop} = {s}"))),
                            Err(e) => pass.push_error(format!("{prop}: {e}")),
                        }
                    }
                } else if pass.dry_run {
                    pass.push(Action::NoneFound, Some(prop.to_string()));
                }
            }
        }
    }
}

fn node_match(
    store: &mut dyn Store,
    base_path: &str,
    property: &str,
    pass: &mut Pass,
) -> Result<(), StoreError> {
    let children = match store.list_children(base_path) {
        Ok(c) => c,
        Err(e) if e.is_not_found() => {
            if pass.dry_run {
                pass.push(Action::NoneFound, Some(base_path.to_string()));
            }
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let inspected = children.len();
    let mut matched_any = false;
    for child in children {
        let value = match store.read_property(&child.full_path, property) {
            Ok(PropertyValue::Single(v)) => v,
            // The identifying property is single-valued; anything else on
            // a child means it is not an adapter entry.
            Ok(PropertyValue::List(_)) => continue,
            Err(e) if e.is_not_found() => continue,
            Err(e) => {
                pass.push_error(format!("{}: {e}", child.full_path));
                continue;
            }
        };
        if !pass.guid.matches_exact(&value) {
            continue;
        }
        // Duplicate registrations are real; keep going after a match.
        matched_any = true;
        if pass.dry_run {
            pass.push(Action::WouldDeleteNode, Some(child.full_path));
        } else {
            match store.delete_node(&child.full_path) {
                Ok(()) => pass.push(Action::DeletedNode, Some(child.full_path)),
                Err(e) => pass.push_error(format!("{}: {e}", child.full_path)),
            }
        }
    }
    if !matched_any && pass.dry_run {
        pass.push(
            Action::NoneFound,
            Some(format!("{inspected} children inspected")),
        );
    }
    Ok(())
}

fn list_filter(
    store: &mut dyn Store,
    base_path: &str,
    pass: &mut Pass,
) -> Result<(), StoreError> {
    let children = match store.list_children(base_path) {
        Ok(c) => c,
        Err(e) if e.is_not_found() => {
            if pass.dry_run {
                pass.push(Action::NoneFound, Some(base_path.to_string()));
            }
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let mut matched_any = false;
    // Every child and every property is visited; no shortcut exit.
    for child in &children {
        let properties = match store.list_properties(&child.full_path) {
            Ok(p) => p,
            Err(e) => {
                pass.push_error(format!("{}: {e}", child.full_path));
                continue;
            }
        };
        for prop in properties {
            let value = match store.read_property(&child.full_path, &prop) {
                Ok(v) => v,
                Err(e) => {
                    pass.push_error(format!("{}\\{prop}: {e}", child.name));
                    continue;
                }
            };
            match value {
                PropertyValue::List(entries) => {
                    let kept: Vec<String> = entries
                        .iter()
                        .filter(|entry| !pass.guid.matches_exact(entry))
                        .cloned()
                        .collect();
                    let removed = entries.len() - kept.len();
                    if removed == 0 {
                        continue;
                    }
                    matched_any = true;
                    let detail = format!("{}\\{prop}: {removed} entries", child.name);
                    if pass.dry_run {
                        pass.push(Action::WouldRemoveListEntries, Some(detail));
                    } else {
                        match store.write_property(
                            &child.full_path,
                            &prop,
                            PropertyValue::List(kept),
                        ) {
                            Ok(()) => pass.push(Action::RemovedListEntries, Some(detail)),
                            Err(e) => pass.push_error(format!("{}\\{prop}: {e}", child.name)),
                        }
                    }
                }
                PropertyValue::Single(s) => {
                    if !pass.guid.matches_exact(&s) {
                        continue;
                    }
                    matched_any = true;
                    let detail = format!("{}\\{prop}", child.name);
                    if pass.dry_run {
                        pass.push(Action::WouldClearProperty, Some(detail));
                    } else {
                        match store.write_property(
                            &child.full_path,
                            &prop,
                            PropertyValue::Single(String::new()),
                        ) {
                            Ok(()) => pass.push(Action::ClearedProperty, Some(detail)),
                            Err(e) => pass.push_error(format!("{}\\{prop}: {e}", child.name)),
                        }
                    }
                }
            }
        }
    }
    if !matched_any && pass.dry_run {
        pass.push(Action::NoneFound, None);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotStore;

    const GUID: &str = "{1234ABCD-0000-0000-0000-000000000001}";

    fn token() -> GuidToken {
        GuidToken::normalize(GUID).unwrap()
    }

    fn run(
        strategy: Strategy,
        store: &mut SnapshotStore,
        base: &str,
        dry_run: bool,
    ) -> Vec<OutcomeRecord> {
        strategy
            .execute(store, "test-location", base, &token(), dry_run)
            .unwrap()
    }

    #[test]
    fn exact_child_dry_run_reports_and_keeps_node() {
        let base = r"SYSTEM\CurrentControlSet\Services\Tcpip\Parameters\Interfaces";
        let mut store = SnapshotStore::default();
        store.ensure_node(&format!(r"{base}\{GUID}"));
        let before = store.clone();

        let records = run(
            Strategy::ExactChildPath { form: GuidForm::Braced },
            &mut store,
            base,
            true,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, Action::WouldDeleteNode);
        assert_eq!(store, before);
    }

    #[test]
    fn exact_child_apply_deletes_node() {
        let base = r"SYSTEM\CurrentControlSet\Services\Tcpip\Parameters\Interfaces";
        let mut store = SnapshotStore::default();
        store.ensure_node(&format!(r"{base}\{GUID}"));

        let records = run(
            Strategy::ExactChildPath { form: GuidForm::Braced },
            &mut store,
            base,
            false,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, Action::DeletedNode);
        assert!(!store.exists(&format!(r"{base}\{GUID}")).unwrap());
    }

    #[test]
    fn exact_child_absent_is_reported_only_in_dry_run() {
        let base = "Services";
        let mut store = SnapshotStore::default();
        store.ensure_node(base);

        let strategy = Strategy::ExactChildPath { form: GuidForm::Braced };
        let dry = run(strategy, &mut store.clone(), base, true);
        assert_eq!(dry.len(), 1);
        assert_eq!(dry[0].action, Action::NoneFound);

        let applied = run(strategy, &mut store, base, false);
        assert!(applied.is_empty());
    }

    #[test]
    fn exact_child_prefixed_form_matches_decorated_name() {
        let base = r"Services\NetBT\Parameters\Interfaces";
        let mut store = SnapshotStore::default();
        store.ensure_node(&format!(r"{base}\Tcpip_{GUID}"));

        let records = run(
            Strategy::ExactChildPath { form: GuidForm::Prefixed("Tcpip_") },
            &mut store,
            base,
            false,
        );
        assert_eq!(records[0].action, Action::DeletedNode);
        assert!(!store.exists(&format!(r"{base}\Tcpip_{GUID}")).unwrap());
    }

    #[test]
    fn property_scan_removes_all_matches_preserving_order() {
        let base = r"Services\Tcpip\Linkage";
        let mut store = SnapshotStore::default();
        store.set_property(
            base,
            "Bind",
            PropertyValue::List(vec![
                "a".into(),
                format!(r"\Device\{GUID}"),
                "b".into(),
                format!(r"\Device\Tcpip_{GUID}"),
                "c".into(),
            ]),
        );

        let records = run(
            Strategy::PropertyScan { properties: &["Bind"] },
            &mut store,
            base,
            false,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, Action::RemovedListEntries);
        assert_eq!(
            store.read_property(base, "Bind").unwrap(),
            PropertyValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn property_scan_matches_case_insensitively() {
        let base = r"Services\Tcpip\Linkage";
        let mut store = SnapshotStore::default();
        store.set_property(
            base,
            "Bind",
            PropertyValue::List(vec![format!(r"\Device\{}", GUID.to_lowercase())]),
        );

        let records = run(
            Strategy::PropertyScan { properties: &["Bind"] },
            &mut store,
            base,
            true,
        );
        assert_eq!(records[0].action, Action::WouldRemoveListEntries);
    }

    #[test]
    fn property_scan_unreadable_property_is_one_error_and_scan_continues() {
        let base = r"Services\NetBT\Linkage";
        let mut store = SnapshotStore::default();
        store.set_property(
            base,
            "Route",
            PropertyValue::List(vec![format!(r"\Device\{GUID}")]),
        );
        // "Bind" and "Export" are absent.
        let records = run(
            Strategy::PropertyScan { properties: &["Bind", "Export", "Route"] },
            &mut store,
            base,
            false,
        );
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].action, Action::Error);
        assert_eq!(records[1].action, Action::Error);
        assert_eq!(records[2].action, Action::RemovedListEntries);
    }

    #[test]
    fn property_scan_miss_reported_only_in_dry_run() {
        let base = r"Services\Tcpip\Linkage";
        let mut store = SnapshotStore::default();
        store.set_property(base, "Bind", PropertyValue::List(vec!["other".into()]));

        let strategy = Strategy::PropertyScan { properties: &["Bind"] };
        let dry = run(strategy, &mut store.clone(), base, true);
        assert_eq!(dry.len(), 1);
        assert_eq!(dry[0].action, Action::NoneFound);

        let applied = run(strategy, &mut store, base, false);
        assert!(applied.is_empty());
    }

    #[test]
    fn node_match_deletes_every_matching_child() {
        let base = r"Control\Class\{4D36E972-E325-11CE-BFC1-08002BE10318}";
        let mut store = SnapshotStore::default();
        // Duplicate registrations under different indices, different case.
        store.set_property(
            &format!(r"{base}\0001"),
            "NetCfgInstanceId",
            PropertyValue::Single(GUID.to_lowercase()),
        );
        store.set_property(
            &format!(r"{base}\0002"),
            "NetCfgInstanceId",
            PropertyValue::Single("{other}".into()),
        );
        store.set_property(
            &format!(r"{base}\0003"),
            "NetCfgInstanceId",
            PropertyValue::Single(GUID.to_uppercase()),
        );
        store.ensure_node(&format!(r"{base}\Properties"));

        let records = run(
            Strategy::NodeNameOrPropertyMatch { property: "NetCfgInstanceId" },
            &mut store,
            base,
            false,
        );
        let deleted: Vec<_> = records
            .iter()
            .filter(|r| r.action == Action::DeletedNode)
            .collect();
        assert_eq!(deleted.len(), 2);
        assert!(!store.exists(&format!(r"{base}\0001")).unwrap());
        assert!(store.exists(&format!(r"{base}\0002")).unwrap());
        assert!(!store.exists(&format!(r"{base}\0003")).unwrap());
    }

    #[test]
    fn node_match_no_match_reports_inspected_count_in_dry_run() {
        let base = r"Control\Class\{4D36E972-E325-11CE-BFC1-08002BE10318}";
        let mut store = SnapshotStore::default();
        store.set_property(
            &format!(r"{base}\0001"),
            "NetCfgInstanceId",
            PropertyValue::Single("{other}".into()),
        );

        let strategy = Strategy::NodeNameOrPropertyMatch { property: "NetCfgInstanceId" };
        let dry = run(strategy, &mut store.clone(), base, true);
        assert_eq!(dry.len(), 1);
        assert_eq!(dry[0].action, Action::NoneFound);
        assert_eq!(dry[0].detail.as_deref(), Some("1 children inspected"));

        let applied = run(strategy, &mut store, base, false);
        assert!(applied.is_empty());
    }

    #[test]
    fn list_filter_removes_exact_elements_and_clears_exact_singles() {
        let base = r"Services\Dhcp\Parameters";
        let mut store = SnapshotStore::default();
        store.set_property(
            &format!(r"{base}\ifs"),
            "Active",
            PropertyValue::List(vec![
                "{other}".into(),
                GUID.to_lowercase(),
                "{another}".into(),
                GUID.to_string(),
            ]),
        );
        store.set_property(
            &format!(r"{base}\ifs"),
            "Primary",
            PropertyValue::Single(GUID.to_string()),
        );
        store.set_property(
            &format!(r"{base}\other"),
            "Note",
            PropertyValue::Single("unrelated".into()),
        );

        let records = run(Strategy::ListFilter, &mut store, base, false);
        assert_eq!(
            records
                .iter()
                .filter(|r| r.action == Action::RemovedListEntries)
                .count(),
            1
        );
        assert_eq!(
            records
                .iter()
                .filter(|r| r.action == Action::ClearedProperty)
                .count(),
            1
        );
        assert_eq!(
            store
                .read_property(&format!(r"{base}\ifs"), "Active")
                .unwrap(),
            PropertyValue::List(vec!["{other}".into(), "{another}".into()])
        );
        assert_eq!(
            store
                .read_property(&format!(r"{base}\ifs"), "Primary")
                .unwrap(),
            PropertyValue::Single(String::new())
        );
        // Unrelated property untouched.
        assert_eq!(
            store
                .read_property(&format!(r"{base}\other"), "Note")
                .unwrap(),
            PropertyValue::Single("unrelated".into())
        );
    }

    #[test]
    fn list_filter_requires_exact_element_match() {
        let base = r"Services\Dhcp\Parameters";
        let mut store = SnapshotStore::default();
        // Decorated values are a PropertyScan concern; ListFilter only
        // removes exact elements.
        store.set_property(
            &format!(r"{base}\ifs"),
            "Refs",
            PropertyValue::List(vec![format!(r"\Device\{GUID}")]),
        );

        let records = run(Strategy::ListFilter, &mut store, base, true);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, Action::NoneFound);
    }
}
