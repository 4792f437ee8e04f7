use fedreg_core::{prelude::*, schema::federation};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn tree() -> SegmentTree {
    SegmentTree::new(
        federation::registry(),
        Box::new(CounterIds::new("t-")),
        AssociationTable::new(),
        TemplateBook::default(),
    )
}

fn general(tree: &mut SegmentTree, raw: Value) -> String {
    tree.insert_root(SegmentNode::record("General", "General Information"), raw)
        .segment_id
        .clone()
}

fn saved(tree: &mut SegmentTree) -> Value {
    tree.save();
    tree.roots()[0].backing_record().clone()
}

fn slot<'a>(record: &'a Value, name: &str) -> Option<&'a Value> {
    record["Slot"]
        .as_array()?
        .iter()
        .find(|slot| slot["name"] == json!(name))
}

#[test]
fn live_date_round_trips() {
    let raw = json!({
        "id": "n1",
        "Name": "Acme",
        "Slot": [{"name": "liveDate", "value": ["2020-01-01T00:00Z"]}],
    });
    let mut tree = tree();
    let id = general(&mut tree, raw.clone());

    let field = tree
        .find(&id)
        .and_then(|node| node.get_field("liveDate"))
        .expect("liveDate field");
    assert_eq!(
        field.value().date_parts().and_then(|p| p.date.as_deref()),
        Some("2020-01-01")
    );

    assert_eq!(saved(&mut tree), raw);
}

#[test]
fn edited_date_is_re_encoded_at_minute_precision() {
    let mut tree = tree();
    let id = general(
        &mut tree,
        json!({
            "id": "n1",
            "Name": "Acme",
            "Slot": [{"name": "liveDate", "value": ["2020-01-01T08:30:00+02:00"]}],
        }),
    );

    let node = tree.find_mut(&id).expect("general segment");
    let field = node.get_field_mut("liveDate").expect("liveDate field");
    assert!(field.set_part(ValuePart::Date, Some("2021-02-03")));

    let record = saved(&mut tree);
    assert_eq!(
        slot(&record, "liveDate").map(|s| &s["value"]),
        Some(&json!(["2021-02-03T06:30Z"]))
    );
}

#[test]
fn location_point_round_trips_and_re_encodes() {
    let raw = json!({
        "id": "n2",
        "Slot": [{"name": "location", "value": {"Point": {"pos": "38.9 -77.0"}}}],
    });
    let mut tree = tree();
    let id = general(&mut tree, raw.clone());

    let node = tree.find(&id).expect("general segment");
    let point = node
        .get_field("location")
        .and_then(|f| f.value().point_parts())
        .expect("point parts");
    assert_eq!(point.lat.as_deref(), Some("38.9"));
    assert_eq!(point.lon.as_deref(), Some("-77.0"));

    assert_eq!(saved(&mut tree), raw);

    let field = tree
        .find_mut(&id)
        .and_then(|node| node.get_field_mut("location"))
        .expect("location field");
    field.set_part(ValuePart::Lon, Some("-77.1"));

    let record = saved(&mut tree);
    let value = &slot(&record, "location").expect("location slot")["value"];
    assert_eq!(value["Point"]["pos"], json!("38.9 -77.1"));
    assert_eq!(value["Point"]["srsDimension"], json!(2));
}

#[test]
fn custom_note_creates_one_slot() {
    let mut tree = tree();
    let id = general(&mut tree, json!({"id": "n3", "Name": "Acme"}));

    let field = tree
        .add_field(&id, "customNote", ValueType::String, None)
        .expect("general is customizable");
    field.add_value("hello");

    let record = saved(&mut tree);
    assert_eq!(
        record["Slot"],
        json!([{"slotType": "xs:string", "name": "customNote", "value": ["hello"]}])
    );
}

#[test]
fn incomplete_structured_values_are_suppressed() {
    let mut tree = tree();
    let id = general(
        &mut tree,
        json!({
            "id": "n4",
            "Slot": [{"name": "liveDate", "value": ["2020-01-01T10:15Z"]}],
        }),
    );

    tree.add_field(&id, "coverage", ValueType::Bounds, None)
        .expect("general is customizable");

    let node = tree.find_mut(&id).expect("general segment");

    // time of day left without a date
    let live = node.get_field_mut("liveDate").expect("liveDate field");
    live.set_part(ValuePart::Date, None);
    assert_eq!(
        live.value().date_parts().and_then(|p| p.time.as_deref()),
        Some("10:15")
    );

    // latitude without longitude
    let location = node.get_field_mut("location").expect("location field");
    location.set_part(ValuePart::Lat, Some("38.9"));

    // three of four corners
    let coverage = node.get_field_mut("coverage").expect("coverage field");
    for (part, value) in [
        (ValuePart::UpperLat, "10"),
        (ValuePart::UpperLon, "20"),
        (ValuePart::LowerLat, "1"),
    ] {
        coverage.set_part(part, Some(value));
    }

    let record = saved(&mut tree);
    assert_eq!(record.get("Slot"), Some(&json!([])));
}

#[test]
fn custom_slots_survive_unless_removed() {
    let raw = json!({
        "id": "n5",
        "Slot": [
            {"slotType": "xs:string", "name": "mascot", "value": ["owl"]},
            {"slotType": "xs:boolean", "name": "public", "value": "true"},
        ],
    });
    let mut tree = tree();
    let id = general(&mut tree, raw.clone());

    assert_eq!(saved(&mut tree), raw);

    let removed = tree.remove_field(&id, "mascot").expect("custom field");
    assert!(removed.is_custom);

    let record = saved(&mut tree);
    assert_eq!(
        record["Slot"],
        json!([{"slotType": "xs:boolean", "name": "public", "value": "true"}])
    );

    assert_eq!(
        tree.remove_field(&id, "mascot").err(),
        Some(TreeError::FieldNotFound {
            segment_id: id.clone(),
            key: "mascot".into()
        })
    );
}

#[test]
fn collections_grow_and_shrink_at_any_position() {
    let mut tree = tree();
    let services = tree
        .insert_root(
            SegmentNode::collection("Service", "Services").titled(TitleKind::Name),
            json!([
                {"id": "s1", "objectType": "x", "ServiceBinding": []},
                {"id": "s2", "objectType": "x", "ServiceBinding": []},
                {"id": "s3", "objectType": "x", "ServiceBinding": []},
            ]),
        )
        .segment_id
        .clone();

    let added = tree.add_segment(&services, None).expect("collection");
    assert_eq!(tree.roots()[0].segments().len(), 4);

    let record = saved(&mut tree);
    let ids: Vec<_> = record
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec!["s1", "s2", "s3", added.as_str()]);

    tree.remove_segment("s2").expect("middle element");
    let record = saved(&mut tree);
    let ids: Vec<_> = record
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec!["s1", "s3", added.as_str()]);
}

#[test]
fn structural_errors_are_reported() {
    let mut tree = tree();
    let id = general(&mut tree, json!({"id": "n6", "Name": "Acme"}));
    let org = tree
        .insert_root(
            SegmentNode::record("Organization", "Organization"),
            json!({"id": "o1"}),
        )
        .segments()[0]
        .segment_id
        .clone();

    assert_eq!(
        tree.add_segment(&id, None).err(),
        Some(TreeError::NotACollection {
            segment_id: id.clone()
        })
    );
    assert_eq!(
        tree.add_segment("nope", None).err(),
        Some(TreeError::SegmentNotFound {
            segment_id: "nope".into()
        })
    );
    assert!(matches!(
        tree.add_field(&id, "Name", ValueType::String, None),
        Err(TreeError::DuplicateField { .. })
    ));

    // addresses are container-only leaves; they take no custom fields
    let address = tree.add_segment(&org, None).expect("address collection");
    assert!(matches!(
        tree.add_field(&address, "note", ValueType::String, None),
        Err(TreeError::NotCustomizable { .. })
    ));
}

#[test]
fn validation_paths_start_at_the_root_type() {
    let mut tree = tree();
    tree.insert_root(
        SegmentNode::collection("General", "General Information"),
        json!([{"id": "n7", "Name": ""}]),
    );
    tree.insert_root(
        SegmentNode::collection("Content", "Content Collections"),
        json!([{"id": "c1", "Slot": [{"name": "recordCount", "value": ["-3"]}]}]),
    );

    let err = tree.validate().expect_err("two invalid fields");
    let paths: Vec<_> = err.issues().keys().cloned().collect();

    assert_eq!(paths, vec!["Content[0].recordCount", "General[0].Name"]);
}

#[test]
fn server_assigned_ids_replace_placeholders() {
    let mut tree = tree();
    let id = general(&mut tree, json!({"Name": "Acme"}));
    assert_eq!(id, "t-1");

    assert!(tree.replace_id(&id, "urn:uuid:42"));
    let record = saved(&mut tree);

    assert_eq!(record["id"], json!("urn:uuid:42"));
    assert!(tree.find("urn:uuid:42").is_some());
}

#[test]
fn replaced_ids_carry_their_links() {
    let mut tree = tree();
    let services = tree
        .insert_root(
            SegmentNode::collection("Service", "Services").titled(TitleKind::Name),
            json!([{"id": "s2", "Name": "Search", "ServiceBinding": []}]),
        )
        .segment_id
        .clone();
    tree.announce_segments();

    let added = tree.add_segment(&services, None).expect("collection");
    assert!(tree.links_mut().add_link("l1", &added, "s2"));

    assert!(tree.replace_id(&added, "urn:uuid:9"));

    let links = tree.links();
    assert!(links.links_for(&added).is_empty());
    assert_eq!(links.links_for("urn:uuid:9").len(), 1);
    assert_eq!(links.to_records()[0]["sourceObject"], json!("urn:uuid:9"));

    let offered: Vec<_> = links
        .available_targets("s2")
        .into_iter()
        .map(|t| t.segment_id)
        .collect();
    assert_eq!(offered, vec!["urn:uuid:9"]);

    let record = saved(&mut tree);
    assert_eq!(record[1]["id"], json!("urn:uuid:9"));
}
