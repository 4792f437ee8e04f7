//! Relationships between linkable segments.
//!
//! The tree only talks to [`AssociationLinks`]. [`AssociationTable`] is the
//! in-memory implementation backed by the record's `Association` collection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `associationType` given to links created without one.
pub const RELATED_TO: &str = "urn:oasis:names:tc:ebxml-regrep:AssociationType:RelatedTo";

/// `objectType` written on association records.
pub const ASSOCIATION_OBJECT_TYPE: &str =
    "urn:oasis:names:tc:ebxml-regrep:ObjectType:RegistryObject:Association";

///
/// AssociationLinks
///
/// What the segment tree needs from association bookkeeping.
///

pub trait AssociationLinks {
    /// A new linkable segment exists.
    fn segment_created(&mut self, segment_id: &str, segment_type: &str, title: &str);

    /// A segment is gone; drop every link that references it.
    fn segment_removed(&mut self, segment_id: &str);

    /// A segment was re-keyed; links and targets follow it to `new`.
    fn segment_renamed(&mut self, old: &str, new: &str);

    fn links_for(&self, segment_id: &str) -> Vec<Link>;

    fn available_targets(&self, segment_id: &str) -> Vec<LinkTarget>;
}

///
/// NoLinks
///
/// Ignores every notification.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoLinks;

impl AssociationLinks for NoLinks {
    fn segment_created(&mut self, _: &str, _: &str, _: &str) {}

    fn segment_removed(&mut self, _: &str) {}

    fn segment_renamed(&mut self, _: &str, _: &str) {}

    fn links_for(&self, _: &str) -> Vec<Link> {
        Vec::new()
    }

    fn available_targets(&self, _: &str) -> Vec<LinkTarget> {
        Vec::new()
    }
}

///
/// Link
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub source_object: String,
    pub target_object: String,

    #[serde(default = "default_association_type")]
    pub association_type: String,
}

fn default_association_type() -> String {
    RELATED_TO.to_string()
}

impl Link {
    #[must_use]
    pub fn references(&self, segment_id: &str) -> bool {
        self.source_object == segment_id || self.target_object == segment_id
    }
}

///
/// LinkTarget
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LinkTarget {
    pub segment_id: String,
    pub segment_type: String,
    pub title: String,
}

///
/// AssociationTable
///

#[derive(Clone, Debug, Default)]
pub struct AssociationTable {
    targets: Vec<LinkTarget>,
    links: Vec<StoredLink>,
}

// A link plus whatever else its record carried, written back untouched.
#[derive(Clone, Debug)]
struct StoredLink {
    link: Link,
    raw: Map<String, Value>,
}

impl AssociationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load links from an `Association` collection. Entries that are not
    /// link-shaped are skipped.
    #[must_use]
    pub fn from_records(records: &[Value]) -> Self {
        let links = records
            .iter()
            .filter_map(|record| {
                let raw = record.as_object()?.clone();
                match serde_json::from_value::<Link>(record.clone()) {
                    Ok(link) => Some(StoredLink { link, raw }),
                    Err(err) => {
                        tracing::warn!(%err, "skipping malformed association record");
                        None
                    }
                }
            })
            .collect();

        Self {
            targets: Vec::new(),
            links,
        }
    }

    /// The `Association` collection for the current links.
    #[must_use]
    pub fn to_records(&self) -> Vec<Value> {
        self.links
            .iter()
            .map(|stored| {
                let mut record = stored.raw.clone();
                let link = &stored.link;

                record.insert("id".into(), Value::String(link.id.clone()));
                record.insert(
                    "associationType".into(),
                    Value::String(link.association_type.clone()),
                );
                record.insert(
                    "sourceObject".into(),
                    Value::String(link.source_object.clone()),
                );
                record.insert(
                    "targetObject".into(),
                    Value::String(link.target_object.clone()),
                );
                record
                    .entry("objectType")
                    .or_insert_with(|| Value::String(ASSOCIATION_OBJECT_TYPE.to_string()));

                Value::Object(record)
            })
            .collect()
    }

    /// Link `source` to `target`. Returns false if that link already exists.
    pub fn add_link(&mut self, id: impl Into<String>, source: &str, target: &str) -> bool {
        let exists = self
            .links
            .iter()
            .any(|s| s.link.source_object == source && s.link.target_object == target);
        if exists {
            return false;
        }

        self.links.push(StoredLink {
            link: Link {
                id: id.into(),
                source_object: source.to_string(),
                target_object: target.to_string(),
                association_type: RELATED_TO.to_string(),
            },
            raw: Map::new(),
        });

        true
    }

    pub fn remove_link(&mut self, link_id: &str) -> Option<Link> {
        let index = self.links.iter().position(|s| s.link.id == link_id)?;

        Some(self.links.remove(index).link)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().map(|s| &s.link)
    }

    pub fn targets(&self) -> impl Iterator<Item = &LinkTarget> {
        self.targets.iter()
    }
}

impl AssociationLinks for AssociationTable {
    fn segment_created(&mut self, segment_id: &str, segment_type: &str, title: &str) {
        let target = LinkTarget {
            segment_id: segment_id.to_string(),
            segment_type: segment_type.to_string(),
            title: title.to_string(),
        };

        match self.targets.iter_mut().find(|t| t.segment_id == segment_id) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    fn segment_removed(&mut self, segment_id: &str) {
        self.targets.retain(|t| t.segment_id != segment_id);
        self.links.retain(|s| !s.link.references(segment_id));
    }

    fn segment_renamed(&mut self, old: &str, new: &str) {
        for target in self.targets.iter_mut().filter(|t| t.segment_id == old) {
            target.segment_id = new.to_string();
        }

        for stored in &mut self.links {
            let link = &mut stored.link;
            if link.source_object == old {
                link.source_object = new.to_string();
            }
            if link.target_object == old {
                link.target_object = new.to_string();
            }
        }
        tracing::debug!(old, new, "association endpoints renamed");
    }

    fn links_for(&self, segment_id: &str) -> Vec<Link> {
        self.links()
            .filter(|link| link.source_object == segment_id)
            .cloned()
            .collect()
    }

    fn available_targets(&self, segment_id: &str) -> Vec<LinkTarget> {
        let linked: Vec<&str> = self
            .links()
            .filter(|link| link.source_object == segment_id)
            .map(|link| link.target_object.as_str())
            .collect();

        self.targets
            .iter()
            .filter(|t| t.segment_id != segment_id && !linked.contains(&t.segment_id.as_str()))
            .cloned()
            .collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> AssociationTable {
        let mut table = AssociationTable::from_records(&[json!({
            "id": "assoc-1",
            "sourceObject": "svc-1",
            "targetObject": "org-1",
            "home": "local",
        })]);
        table.segment_created("svc-1", "Service", "Search");
        table.segment_created("org-1", "Organization", "Acme");
        table.segment_created("org-2", "Organization", "Initech");

        table
    }

    #[test]
    fn available_targets_exclude_self_and_linked() {
        let table = table();
        let targets: Vec<_> = table
            .available_targets("svc-1")
            .into_iter()
            .map(|t| t.segment_id)
            .collect();

        assert_eq!(targets, vec!["org-2".to_string()]);
        assert_eq!(table.links_for("svc-1").len(), 1);
    }

    #[test]
    fn removing_a_segment_drops_its_links() {
        let mut table = table();
        table.segment_removed("org-1");

        assert!(table.links_for("svc-1").is_empty());
        assert_eq!(table.targets().count(), 2);
    }

    #[test]
    fn renamed_segment_keeps_its_links() {
        let mut table = table();
        table.segment_renamed("org-1", "urn:uuid:7");

        let links = table.links_for("svc-1");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_object, "urn:uuid:7");

        let targets: Vec<_> = table.targets().map(|t| t.segment_id.as_str()).collect();
        assert_eq!(targets, vec!["svc-1", "urn:uuid:7", "org-2"]);
        assert_eq!(table.to_records()[0]["targetObject"], json!("urn:uuid:7"));
    }

    #[test]
    fn records_keep_unknown_keys_and_default_type() {
        let mut table = table();
        assert!(table.add_link("assoc-2", "svc-1", "org-2"));
        assert!(!table.add_link("assoc-3", "svc-1", "org-2"));

        let records = table.to_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["home"], json!("local"));
        assert_eq!(records[0]["associationType"], json!(RELATED_TO));
        assert_eq!(records[1]["objectType"], json!(ASSOCIATION_OBJECT_TYPE));
    }

    #[test]
    fn malformed_records_are_skipped() {
        let table = AssociationTable::from_records(&[json!({"id": "x"}), json!("nope")]);

        assert_eq!(table.links().count(), 0);
    }
}
