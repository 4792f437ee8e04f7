use fedreg::{
    core::association::{ASSOCIATION_OBJECT_TYPE, RELATED_TO},
    node::{NODE_ID, TEMP_ID},
    prelude::*,
    schema::{
        federation::{CONTENT_OBJECT_TYPE, NODE_OBJECT_TYPE, SERVICE_OBJECT_TYPE},
        types::SLOT_TYPE_POINT,
    },
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn node_record() -> Value {
    json!({
        "id": "urn:registry:node:1",
        "objectType": NODE_OBJECT_TYPE,
        "RegistryObjectList": {
            "ExtrinsicObject": [
                {
                    "id": NODE_ID,
                    "objectType": NODE_OBJECT_TYPE,
                    "Name": "Acme Node",
                    "VersionInfo": "2.1",
                    "Slot": [
                        {"slotType": "xs:dateTime", "name": "liveDate", "value": ["2020-01-01T00:00Z"]},
                        {"slotType": SLOT_TYPE_POINT, "name": "location", "value": {"Point": {"pos": "38.9 -77.0"}}},
                        {"slotType": "xs:string", "name": "favoriteColor", "value": ["blue"]},
                    ],
                },
                {
                    "id": "c1",
                    "objectType": CONTENT_OBJECT_TYPE,
                    "Name": "Imagery",
                    "Slot": [{"slotType": "xs:decimal", "name": "recordCount", "value": ["12"]}],
                },
            ],
            "Service": [{
                "id": "s1",
                "objectType": SERVICE_OBJECT_TYPE,
                "Name": "Catalog",
                "ServiceBinding": [{
                    "id": "b1",
                    "Name": "CSW",
                    "VersionInfo": "2.0.2",
                    "Slot": [{"slotType": "xs:string", "name": "bindingType", "value": ["csw"]}],
                }],
            }],
            "Organization": [{
                "id": "o1",
                "Name": "Acme Corp",
                "Address": [{"id": "a1", "street": "1 Main St", "city": "Springfield"}],
                "TelephoneNumber": [],
                "EmailAddress": [{"id": "e1", "type": "work", "address": "ops@acme.test"}],
            }],
            "Person": [{
                "id": "p1",
                "Name": "Lead",
                "PersonName": {"id": "pn1", "firstName": "Ada", "lastName": "Lovelace"},
                "Address": [],
                "TelephoneNumber": [],
                "EmailAddress": [],
            }],
            "Association": [{
                "id": "l1",
                "objectType": ASSOCIATION_OBJECT_TYPE,
                "associationType": RELATED_TO,
                "sourceObject": "s1",
                "targetObject": "o1",
            }],
        },
    })
}

fn config() -> EditorConfig {
    EditorConfig::from_toml_str(
        r#"
        [ids]
        prefix = "t-"
        generator = "counter"
        "#,
    )
    .expect("valid config")
}

#[test]
fn saving_an_unedited_record_reproduces_it() {
    let mut editor = NodeEditor::open(node_record(), &config());

    let first = editor.save();
    assert_eq!(first, node_record());

    let second = editor.save();
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize")
    );
}

#[test]
fn sections_split_the_object_list() {
    let editor = NodeEditor::open(node_record(), &config());

    let general = editor.section(Section::General);
    assert_eq!(general.segments().len(), 1);
    assert_eq!(general.segments()[0].segment_id, NODE_ID);

    let content = editor.section(Section::Content);
    assert_eq!(content.segments()[0].segment_id, "c1");
    assert_eq!(content.segments()[0].construct_title(), "Imagery");

    let contact = &editor.section(Section::Contacts).segments()[0];
    assert_eq!(contact.construct_title(), "Ada Lovelace [ Lead ]");
}

#[test]
fn loaded_segments_are_offered_as_link_targets() {
    let editor = NodeEditor::open(node_record(), &config());
    let links = editor.tree().links();

    let mut offered: Vec<_> = links
        .available_targets("s1")
        .into_iter()
        .map(|t| t.segment_id)
        .collect();
    offered.sort();

    // o1 is already linked from s1
    assert_eq!(offered, vec!["b1", "c1", "p1", NODE_ID]);
    assert_eq!(links.links_for("s1").len(), 1);
}

#[test]
fn removing_a_linked_segment_drops_its_association() {
    let mut editor = NodeEditor::open(node_record(), &config());

    editor
        .tree_mut()
        .remove_segment("o1")
        .expect("organization exists");
    let record = editor.save();

    assert_eq!(record["RegistryObjectList"]["Organization"], json!([]));
    assert_eq!(record["RegistryObjectList"]["Association"], json!([]));
}

#[test]
fn new_links_are_written_as_associations() {
    let mut editor = NodeEditor::open(node_record(), &config());

    assert!(editor.link("p1", "o1"));
    assert!(!editor.link("p1", "o1"));

    let record = editor.save();
    let associations = record["RegistryObjectList"]["Association"]
        .as_array()
        .expect("association array");

    assert_eq!(associations.len(), 2);
    assert_eq!(associations[1]["sourceObject"], json!("p1"));
    assert_eq!(associations[1]["targetObject"], json!("o1"));
    assert_eq!(associations[1]["associationType"], json!(RELATED_TO));
}

#[test]
fn new_record_is_created_and_takes_the_store_id() {
    let mut store = MemoryStore::new();
    let mut editor = NodeEditor::open(json!({}), &config());
    assert_eq!(editor.id(), TEMP_ID);

    let general = editor.section(Section::General).segments()[0]
        .segment_id
        .clone();
    editor
        .tree_mut()
        .find_mut(&general)
        .and_then(|node| node.get_field_mut("Name"))
        .expect("node name field")
        .set_value("Fresh Node");

    let id = editor.commit(&mut store).expect("commit");

    assert_eq!(id, "urn:registry:record:1");
    assert_eq!(editor.id(), id);
    assert!(!editor.is_new());

    let stored = store.get(&id).expect("stored record");
    assert_eq!(stored["id"], json!(id));
    assert_eq!(
        stored["RegistryObjectList"]["ExtrinsicObject"][0]["Name"],
        json!("Fresh Node")
    );

    // a second commit updates in place
    editor.commit(&mut store).expect("update");
    assert_eq!(store.len(), 1);
}

#[test]
fn invalid_tree_blocks_commit() {
    let mut store = MemoryStore::new();
    let mut editor = NodeEditor::open(json!({}), &config());

    let err = editor.commit(&mut store).expect_err("node name is required");

    assert!(matches!(err, Error::ValidateError(_)));
    assert!(store.is_empty());
    assert!(editor.is_new());
}

#[test]
fn validation_can_be_made_advisory() {
    let config = EditorConfig::from_toml_str("[validation]\nblock_save_on_error = false\n")
        .expect("valid config");
    let mut store = MemoryStore::new();
    let mut editor = NodeEditor::open(json!({}), &config);

    editor.commit(&mut store).expect("commit despite missing name");

    assert_eq!(store.len(), 1);
}

#[test]
fn unreachable_store_cannot_be_loaded_from() {
    let mut store = MemoryStore::new().with_record("urn:registry:node:1", node_record());
    store.interrupt("maintenance");

    let err = NodeEditor::load(&store, "urn:registry:node:1", &config()).err();

    assert!(matches!(
        err,
        Some(Error::StoreError(StoreError::Unavailable { .. }))
    ));
}

#[test]
fn failed_update_leaves_the_editor_intact() {
    let mut store = MemoryStore::new().with_record("urn:registry:node:1", node_record());
    let mut editor =
        NodeEditor::load(&store, "urn:registry:node:1", &config()).expect("record exists");

    editor
        .tree_mut()
        .find_mut("s1")
        .and_then(|node| node.get_field_mut("Name"))
        .expect("service name")
        .set_value("Catalog v2");

    store.interrupt("maintenance");
    let err = editor.commit(&mut store).expect_err("store is down");
    assert!(matches!(err, Error::StoreError(StoreError::Unavailable { .. })));
    assert_eq!(
        store.get("urn:registry:node:1"),
        Some(&node_record())
    );

    store.restore();
    let id = editor.commit(&mut store).expect("retry succeeds");
    assert_eq!(id, "urn:registry:node:1");

    let stored = store.get(&id).expect("stored record");
    assert_eq!(
        stored["RegistryObjectList"]["Service"][0]["Name"],
        json!("Catalog v2")
    );
}

#[test]
fn delete_forwards_to_the_store() {
    let mut store = MemoryStore::new()
        .with_record("a", json!({}))
        .with_record("b", json!({}));

    NodeEditor::delete(&mut store, &["a".to_string()]).expect("delete");
    assert_eq!(store.len(), 1);

    let err = NodeEditor::delete(&mut store, &["a".to_string()]).expect_err("already gone");
    assert!(matches!(
        err,
        Error::StoreError(StoreError::NotFound { .. })
    ));
}
