mod attribute;
mod field;
mod group;
mod segment;

pub use attribute::{Attribute, Entry};
pub use field::FieldDef;
pub use group::GroupDef;
pub use segment::SegmentSchema;
