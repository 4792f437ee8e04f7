use super::SegmentNode;
use fedreg_schema::prelude::TitleKind;

pub(super) fn construct(node: &SegmentNode) -> String {
    let title = match node.title {
        Some(TitleKind::Name) => text(node, "Name"),
        Some(TitleKind::NameVersion) => name_version(node),
        Some(TitleKind::PersonName) => person_name(node),
        Some(TitleKind::Address) => join(node, &["street", "city", "stateOrProvince"]),
        Some(TitleKind::Phone) => phone(node),
        Some(TitleKind::Email) => join(node, &["type", "address"]),
        None => String::new(),
    };

    if title.is_empty() {
        node.segment_name.clone()
    } else {
        title
    }
}

fn text(node: &SegmentNode, key: &str) -> String {
    node.get_field(key)
        .map(|field| field.value().display_text().trim().to_string())
        .unwrap_or_default()
}

fn join(node: &SegmentNode, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| text(node, key))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn name_version(node: &SegmentNode) -> String {
    let name = text(node, "Name");
    let version = text(node, "VersionInfo");

    match (name.is_empty(), version.is_empty()) {
        (true, _) => String::new(),
        (false, true) => name,
        (false, false) => format!("{name} Version: {version}"),
    }
}

fn person_name(node: &SegmentNode) -> String {
    let Some(person) = node.segments.iter().find(|s| s.segment_type == "PersonName") else {
        return String::new();
    };

    let title = join(person, &["firstName", "lastName"]);
    let designation = text(node, "Name");
    if designation.is_empty() {
        return title;
    }

    format!("{title} [ {designation} ]").trim_start().to_string()
}

fn phone(node: &SegmentNode) -> String {
    let mut parts = vec![text(node, "phoneType")];

    let area = text(node, "areaCode");
    if !area.is_empty() {
        parts.push(format!("({area})"));
    }
    parts.push(text(node, "number"));

    let extension = text(node, "extension");
    if !extension.is_empty() {
        parts.push(format!("x{extension}"));
    }

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
