// 🏷️ Category Templates - system category hierarchy seeded into the app database
//
// Source: a JSON hierarchy (expense/income → primary categories → children).
// Target: rows of `system_category_templates`, parent rows before their
// children so every parent_id points at an existing row.

use anyhow::{Context, Result};
use pinyin::ToPinyin;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_ICON: &str = "default.png";
pub const EXPENSE_COLOR: &str = "#FF5252";
pub const INCOME_COLOR: &str = "#4CAF50";

// ============================================================================
// CATEGORY TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money going out
    Expense,

    /// Money coming in
    Income,
}

impl CategoryType {
    pub const ALL: [CategoryType; 2] = [CategoryType::Expense, CategoryType::Income];

    /// Value stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Expense => "expense",
            CategoryType::Income => "income",
        }
    }

    pub fn parse(value: &str) -> Option<CategoryType> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" => Some(CategoryType::Expense),
            "income" => Some(CategoryType::Income),
            _ => None,
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            CategoryType::Expense => EXPENSE_COLOR,
            CategoryType::Income => INCOME_COLOR,
        }
    }
}

// ============================================================================
// HIERARCHY FILE
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HierarchyFile {
    #[serde(default)]
    pub expense: TypeSection,
    #[serde(default)]
    pub income: TypeSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeSection {
    #[serde(default)]
    pub primary: Vec<PrimaryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryEntry {
    /// Identifier in the source file (not reused as row id)
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub name: String,
    #[serde(default)]
    pub icon_file: Option<String>,
    #[serde(default)]
    pub children: Vec<ChildEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildEntry {
    pub name: String,
    #[serde(default)]
    pub icon_file: Option<String>,
}

impl HierarchyFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read category hierarchy: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse category hierarchy: {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn section(&self, category_type: CategoryType) -> &TypeSection {
        match category_type {
            CategoryType::Expense => &self.expense,
            CategoryType::Income => &self.income,
        }
    }
}

// ============================================================================
// CATEGORY TEMPLATE (one table row)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTemplate {
    /// Fresh UUID v4
    pub id: String,
    pub name: String,
    /// Seeded with the source name until translated
    pub name_en: String,
    pub name_pinyin: Option<String>,
    pub name_pinyin_abbr: Option<String>,
    pub icon: String,
    pub category_type: CategoryType,
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub color: String,
}

impl CategoryTemplate {
    pub fn new(
        name: &str,
        icon_file: Option<&str>,
        category_type: CategoryType,
        parent_id: Option<String>,
    ) -> Self {
        let (name_pinyin, name_pinyin_abbr) = pinyin_fields(name);
        let icon = icon_file
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_ICON)
            .to_string();

        CategoryTemplate {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            name_en: name.to_string(),
            name_pinyin,
            name_pinyin_abbr,
            icon,
            category_type,
            parent_id,
            is_active: true,
            color: category_type.default_color().to_string(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

}

// ============================================================================
// PINYIN
// ============================================================================

/// Full pinyin ("canyin") and first-letter abbreviation ("cy").
/// Characters without a reading are kept as-is in both ("ATM取款" → "ATMqukuan", "ATMqk").
/// An empty name gives None for both.
pub fn pinyin_fields(text: &str) -> (Option<String>, Option<String>) {
    if text.is_empty() {
        return (None, None);
    }

    let mut full = String::new();
    let mut abbr = String::new();

    for c in text.chars() {
        match c.to_pinyin().map(|p| p.plain()) {
            Some(reading) => {
                full.push_str(reading);
                abbr.extend(reading.chars().next());
            }
            None => {
                full.push(c);
                abbr.push(c);
            }
        }
    }

    (Some(full), Some(abbr))
}

// ============================================================================
// CATEGORY TREE (insertion plan)
// ============================================================================

/// Flattened hierarchy in insertion order: each parent directly followed by
/// its children
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    rows: Vec<CategoryTemplate>,
}

impl CategoryTree {
    pub fn new() -> Self {
        CategoryTree { rows: Vec::new() }
    }

    /// Build from a hierarchy file, expense section first
    pub fn from_hierarchy(hierarchy: &HierarchyFile) -> Self {
        let mut tree = CategoryTree::new();

        for category_type in CategoryType::ALL {
            for primary in &hierarchy.section(category_type).primary {
                let parent = CategoryTemplate::new(
                    &primary.name,
                    primary.icon_file.as_deref(),
                    category_type,
                    None,
                );
                let parent_id = parent.id.clone();
                tree.push(parent);

                for child in &primary.children {
                    tree.push(CategoryTemplate::new(
                        &child.name,
                        child.icon_file.as_deref(),
                        category_type,
                        Some(parent_id.clone()),
                    ));
                }
            }
        }

        tree
    }

    pub fn push(&mut self, category: CategoryTemplate) {
        self.rows.push(category);
    }

    pub fn rows(&self) -> &[CategoryTemplate] {
        &self.rows
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&CategoryTemplate> {
        self.rows.iter().find(|c| c.id == id)
    }

    /// First category with this name (names repeat across types)
    pub fn root_categories(&self) -> Vec<&CategoryTemplate> {
        self.rows.iter().filter(|c| c.is_root()).collect()
    }

    pub fn get_children(&self, parent_id: &str) -> Vec<&CategoryTemplate> {
        self.rows
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    pub fn by_type(&self, category_type: CategoryType) -> Vec<&CategoryTemplate> {
        self.rows
            .iter()
            .filter(|c| c.category_type == category_type)
            .collect()
    }

    /// "Parent → Child"
    pub fn get_path_string(&self, category: &CategoryTemplate) -> String {
        match category.parent_id.as_deref().and_then(|id| self.find_by_id(id)) {
            Some(parent) => format!("{} → {}", parent.name, category.name),
            None => category.name.clone(),
        }
    }
}

// ============================================================================
// ICON MAPPINGS
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct IconMapping {
    pub category_name: String,
    #[serde(default)]
    pub icon_file: Option<String>,
}

/// Name → icon file, first non-empty mapping per name wins
pub fn load_icon_mappings(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read icon mappings: {}", path.display()))?;
    let mappings: Vec<IconMapping> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse icon mappings: {}", path.display()))?;
    Ok(icon_map(&mappings))
}

pub fn icon_map(mappings: &[IconMapping]) -> BTreeMap<String, String> {
    let mut icons = BTreeMap::new();
    for mapping in mappings {
        let Some(icon) = mapping.icon_file.as_deref().filter(|i| !i.is_empty()) else {
            continue;
        };
        icons
            .entry(mapping.category_name.clone())
            .or_insert_with(|| icon.to_string());
    }
    icons
}

// ============================================================================
// TESTS
// ============================================================================
