// Entity Models
//
// Category templates seeded into the app database. Each template gets a
// fresh UUID on import; children point at their parent's id.

pub mod category;

pub use category::{
    icon_map, load_icon_mappings, pinyin_fields, CategoryTemplate, CategoryTree, CategoryType,
    ChildEntry, HierarchyFile, IconMapping, PrimaryEntry, TypeSection,
};
