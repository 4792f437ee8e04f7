//! The federation node registry: every segment type a registry node record
//! is built from.

use crate::prelude::*;

/// `objectType` of the node's own ExtrinsicObject.
pub const NODE_OBJECT_TYPE: &str = "urn:registry:federation:node";

/// Default `objectType` of a service.
pub const SERVICE_OBJECT_TYPE: &str = "urn:registry:federation:service";

/// Default `objectType` of a content collection.
pub const CONTENT_OBJECT_TYPE: &str = "urn:registry:content:collection";

const REQUIRED: &[Constraint] = &[Constraint::Required];
const DIGITS: &[Constraint] = &[Constraint::Pattern(r"^[0-9]*$")];
const EMAIL: &[Constraint] = &[Constraint::Pattern(r"^[^@\s]+@[^@\s]+$")];
const COUNT: &[Constraint] = &[Constraint::Pattern(r"^-?[0-9.]*$"), Constraint::Min(0.0)];

static GENERAL: &[Attribute] = &[
    Attribute::plain(
        "Name",
        FieldDef::text("Node Name", "This node's name").with_constraints(REQUIRED),
    ),
    Attribute::plain(
        "Description",
        FieldDef::text("Node Description", "Short description for this node"),
    ),
    Attribute::plain(
        "VersionInfo",
        FieldDef::text("Node Version", "This node's Version"),
    ),
    Attribute::slot(
        "liveDate",
        FieldDef::new(
            "Live Date",
            "Date indicating when this node went live or operational",
            ValueType::Date,
        ),
    ),
    Attribute::slot(
        "dataStartDate",
        FieldDef::new(
            "Data Start Date",
            "Date indicating the earliest data sets available in this node",
            ValueType::Date,
        ),
    ),
    Attribute::slot(
        "dataEndDate",
        FieldDef::new(
            "Data End Date",
            "Date indicating when data stopped being added to this instance",
            ValueType::Date,
        ),
    ),
    Attribute::slot(
        "lastUpdated",
        FieldDef::new(
            "Last Updated",
            "Date this entry's data was last updated",
            ValueType::Date,
        ),
    ),
    Attribute::slot(
        "links",
        FieldDef::text(
            "Associated Links",
            "Any links that might be associated with this node like wiki pages",
        )
        .multi(),
    ),
    Attribute::slot(
        "location",
        FieldDef::new(
            "Geographic Location",
            "Geographic location of this node described by a gml:Point in decimal degrees. Format \"lat lon\"",
            ValueType::Point,
        ),
    ),
    Attribute::slot(
        "region",
        FieldDef::text(
            "Region",
            "Region of this instance described by a UNSD region. The location should be within this region",
        ),
    ),
    Attribute::slot(
        "inputDataSources",
        FieldDef::text(
            "Data Sources",
            "Sources of information that contribute to this node's data",
        )
        .multi(),
    ),
    Attribute::slot(
        "dataTypes",
        FieldDef::text("Data Types", "Types of data that this node contains").multi(),
    ),
    Attribute::slot(
        "securityLevel",
        FieldDef::text(
            "Security Attributes",
            "Security attributes associated with this node. Format \"attribute=val1,val2\"",
        )
        .multi(),
    ),
];

static ORGANIZATION: &[Attribute] = &[
    Attribute::plain(
        "Name",
        FieldDef::text("Organization Name", "This organization's name"),
    ),
    Attribute::group("Address", GroupDef::many("Address", TitleKind::Address)),
    Attribute::group(
        "TelephoneNumber",
        GroupDef::many("Phone Number", TitleKind::Phone),
    ),
    Attribute::group("EmailAddress", GroupDef::many("Email", TitleKind::Email)),
];

static PERSON: &[Attribute] = &[
    Attribute::plain(
        "Name",
        FieldDef::text("Contact Designation", "Contact Designation"),
    ),
    Attribute::group("PersonName", GroupDef::one("Person Name")),
    Attribute::group("Address", GroupDef::many("Address", TitleKind::Address)),
    Attribute::group(
        "TelephoneNumber",
        GroupDef::many("Phone Number", TitleKind::Phone),
    ),
    Attribute::group("EmailAddress", GroupDef::many("Email", TitleKind::Email)),
];

static SERVICE: &[Attribute] = &[
    Attribute::plain("Name", FieldDef::text("Service Name", "This service name")),
    Attribute::plain(
        "Description",
        FieldDef::text("Service Description", "Short description for this service"),
    ),
    Attribute::plain(
        "VersionInfo",
        FieldDef::text("Service Version", "This service version"),
    ),
    Attribute::plain(
        "objectType",
        FieldDef::text("Service Type", "Identifies the type of service this is by a urn")
            .with_defaults(&[SERVICE_OBJECT_TYPE]),
    ),
    Attribute::group(
        "ServiceBinding",
        GroupDef::many("Bindings", TitleKind::NameVersion),
    ),
];

static SERVICE_BINDING: &[Attribute] = &[
    Attribute::plain("Name", FieldDef::text("Binding Name", "This binding name")),
    Attribute::plain(
        "Description",
        FieldDef::text("Binding Description", "Short description for this binding"),
    ),
    Attribute::plain(
        "VersionInfo",
        FieldDef::text("Binding Version", "This binding version"),
    ),
    Attribute::slot(
        "bindingType",
        FieldDef::text("Service Binding Type", "The binding type for the service.").multi(),
    ),
    Attribute::slot(
        "serviceType",
        FieldDef::text("Service Type", "The service type, usually SOAP or REST"),
    ),
    Attribute::slot(
        "endpointDocumentation",
        FieldDef::text(
            "Service Documentation",
            "Set of links pointing to the documentation for this service",
        )
        .multi(),
    ),
];

static CONTENT: &[Attribute] = &[
    Attribute::plain("Name", FieldDef::text("Content Name", "Content collection name")),
    Attribute::plain(
        "Description",
        FieldDef::text(
            "Content Description",
            "Short description for this content collection",
        ),
    ),
    Attribute::plain(
        "objectType",
        FieldDef::text(
            "Content Object Type",
            "The kind of content object this will be. Default value should be used in most cases.",
        )
        .with_defaults(&[CONTENT_OBJECT_TYPE]),
    ),
    Attribute::slot(
        "mimeTypes",
        FieldDef::text("Mime Types", "Mime Types").multi(),
    ),
    Attribute::slot(
        "recordCount",
        FieldDef::new(
            "Number of records",
            "Number of records in content collection",
            ValueType::Number,
        )
        .with_constraints(COUNT),
    ),
    Attribute::slot(
        "startDate",
        FieldDef::new(
            "Data Start Date",
            "Date indicating the earliest data sets available in this contentCollection",
            ValueType::Date,
        ),
    ),
    Attribute::slot(
        "endDate",
        FieldDef::new(
            "Data End Date",
            "Date indicating when data stopped being added to this content collection",
            ValueType::Date,
        ),
    ),
    Attribute::slot(
        "lastUpdated",
        FieldDef::new(
            "Last Updated",
            "Date this content collections data was last updated",
            ValueType::Date,
        ),
    ),
    Attribute::slot(
        "types",
        FieldDef::text("Content Types", "Content types in the content collection").multi(),
    ),
];

static PERSON_NAME: &[Attribute] = &[
    Attribute::plain("firstName", FieldDef::text("First Name", "First name")),
    Attribute::plain("lastName", FieldDef::text("Last Name", "Last name")),
];

static TELEPHONE_NUMBER: &[Attribute] = &[
    Attribute::plain("phoneType", FieldDef::text("Phone Type", "Phone type")),
    Attribute::plain(
        "countryCode",
        FieldDef::new("Country Code", "Country code", ValueType::Number).with_constraints(DIGITS),
    ),
    Attribute::plain(
        "areaCode",
        FieldDef::new("Area Code", "Area Code", ValueType::Number).with_constraints(DIGITS),
    ),
    Attribute::plain("number", FieldDef::text("Number", "Number")),
    Attribute::plain(
        "extension",
        FieldDef::new("Extension", "Extension", ValueType::Number).with_constraints(DIGITS),
    ),
];

static EMAIL_ADDRESS: &[Attribute] = &[
    Attribute::plain("type", FieldDef::text("Email Type", "Email Type")),
    Attribute::plain(
        "address",
        FieldDef::text("Address", "Email Address").with_constraints(EMAIL),
    ),
];

static ADDRESS: &[Attribute] = &[
    Attribute::plain("street", FieldDef::text("Street", "Street")),
    Attribute::plain("city", FieldDef::text("City", "City")),
    Attribute::plain("country", FieldDef::text("Country", "Country")),
    Attribute::plain(
        "stateOrProvince",
        FieldDef::text("State or Province", "State or Province"),
    ),
    Attribute::plain("postalCode", FieldDef::text("Postal Code", "Postal Code")),
];

static SEGMENTS: &[SegmentSchema] = &[
    SegmentSchema::new("General", GENERAL).customizable(),
    SegmentSchema::new("Organization", ORGANIZATION).customizable(),
    SegmentSchema::new("Person", PERSON).customizable(),
    SegmentSchema::new("Service", SERVICE).customizable(),
    SegmentSchema::new("ServiceBinding", SERVICE_BINDING).customizable(),
    SegmentSchema::new("Content", CONTENT).customizable(),
    SegmentSchema::new("PersonName", PERSON_NAME),
    SegmentSchema::new("TelephoneNumber", TELEPHONE_NUMBER).container_only(),
    SegmentSchema::new("EmailAddress", EMAIL_ADDRESS).container_only(),
    SegmentSchema::new("Address", ADDRESS).container_only(),
];

static FEDERATION: Registry = Registry::new(SEGMENTS);

/// The federation node registry.
#[must_use]
pub fn registry() -> &'static Registry {
    &FEDERATION
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_segment_type_resolves_to_empty_slice() {
        let schema = registry().resolve("Spaceship");

        assert!(schema.is_empty());
        assert!(!registry().is_customizable("Spaceship"));
        assert!(!registry().is_container_only("Spaceship"));
    }

    #[test]
    fn leaf_groups_are_container_only() {
        for ty in ["Address", "TelephoneNumber", "EmailAddress"] {
            assert!(registry().is_container_only(ty), "{ty}");
            assert!(!registry().is_customizable(ty), "{ty}");
        }
        assert!(registry().is_customizable("ServiceBinding"));
    }

    #[test]
    fn general_slots_keep_declaration_order() {
        let names: Vec<_> = registry()
            .resolve("General")
            .slots()
            .map(|(name, _)| name)
            .collect();

        assert_eq!(names.first(), Some(&"liveDate"));
        assert_eq!(names.last(), Some(&"securityLevel"));
        assert_eq!(names.len(), 10);
    }
}
