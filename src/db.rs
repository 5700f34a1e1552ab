use crate::entities::{CategoryTemplate, CategoryTree, CategoryType, HierarchyFile};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const TEMPLATE_TABLE: &str = "system_category_templates";

pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // System Category Templates (parent rows have parent_id NULL)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS system_category_templates (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            name_en TEXT,
            name_pinyin TEXT,
            name_pinyin_abbr TEXT,
            icon TEXT,
            type TEXT NOT NULL CHECK (type IN ('expense', 'income')),
            parent_id TEXT REFERENCES system_category_templates(id),
            is_active BOOLEAN NOT NULL DEFAULT 1,
            color TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_templates_name ON system_category_templates(name)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_templates_parent ON system_category_templates(parent_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// CATEGORY IMPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TypeStat {
    pub category_type: String,
    pub total: i64,
    pub parents: i64,
    pub children: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Rows removed before the import (0 when appending)
    pub cleared: usize,
    pub imported: usize,
    pub parents: usize,
    pub children: usize,
    /// Active rows per type after the import
    pub stats: Vec<TypeStat>,
}

fn insert_template(conn: &Connection, category: &CategoryTemplate) -> Result<usize> {
    let inserted = conn.execute(
        "INSERT INTO system_category_templates (
            id, name, name_en, name_pinyin, name_pinyin_abbr,
            icon, type, parent_id, is_active, color
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ON CONFLICT(id) DO NOTHING",
        params![
            category.id,
            category.name,
            category.name_en,
            category.name_pinyin,
            category.name_pinyin_abbr,
            category.icon,
            category.category_type.as_str(),
            category.parent_id,
            category.is_active,
            category.color,
        ],
    )?;
    Ok(inserted)
}

/// Import a whole hierarchy in one transaction.
/// With `clear`, existing templates are deleted first; any failure rolls
/// everything back.
pub fn import_hierarchy(conn: &mut Connection, hierarchy: &HierarchyFile, clear: bool) -> Result<ImportSummary> {
    let tree = CategoryTree::from_hierarchy(hierarchy);
    info!(
        "planned {} categories ({} roots; {} expense, {} income)",
        tree.count(),
        tree.root_categories().len(),
        tree.by_type(CategoryType::Expense).len(),
        tree.by_type(CategoryType::Income).len()
    );
    let tx = conn.transaction().context("Failed to start import transaction")?;

    let cleared = if clear {
        let removed = tx.execute("DELETE FROM system_category_templates", [])?;
        info!("cleared {} existing templates", removed);
        removed
    } else {
        0
    };

    let mut parents = 0;
    let mut children = 0;

    for category in tree.rows() {
        let inserted = insert_template(&tx, category)
            .with_context(|| format!("Failed to insert category: {}", category.name))?;
        if inserted == 0 {
            continue;
        }

        if category.is_root() {
            parents += 1;
            debug!(
                "✓ {} ({}) - {} children",
                category.name,
                category.category_type.as_str(),
                tree.get_children(&category.id).len()
            );
        } else {
            children += 1;
            debug!("  → {}", tree.get_path_string(category));
        }
    }

    tx.commit().context("Failed to commit category import")?;

    let summary = ImportSummary {
        cleared,
        imported: parents + children,
        parents,
        children,
        stats: type_stats(conn)?,
    };
    info!("imported {} categories ({} parents, {} children)", summary.imported, parents, children);

    Ok(summary)
}

/// Active template counts per type
pub fn type_stats(conn: &Connection) -> Result<Vec<TypeStat>> {
    let mut stmt = conn.prepare(
        "SELECT
            type,
            COUNT(*) as total,
            SUM(CASE WHEN parent_id IS NULL THEN 1 ELSE 0 END) as parents,
            SUM(CASE WHEN parent_id IS NOT NULL THEN 1 ELSE 0 END) as children
         FROM system_category_templates
         WHERE is_active = 1
         GROUP BY type
         ORDER BY type",
    )?;

    let stats = stmt
        .query_map([], |row| {
            Ok(TypeStat {
                category_type: row.get(0)?,
                total: row.get(1)?,
                parents: row.get(2)?,
                children: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(stats)
}

/// All templates in insertion-friendly order (parents first)
pub fn get_all_templates(conn: &Connection) -> Result<Vec<CategoryTemplate>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, name_en, name_pinyin, name_pinyin_abbr, icon, type, parent_id, is_active, color
         FROM system_category_templates
         ORDER BY parent_id IS NOT NULL, rowid",
    )?;

    let rows = stmt
        .query_map([], |row| {
            let type_str: String = row.get(6)?;
            Ok(CategoryTemplate {
                id: row.get(0)?,
                name: row.get(1)?,
                name_en: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                name_pinyin: row.get(3)?,
                name_pinyin_abbr: row.get(4)?,
                icon: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                category_type: CategoryType::parse(&type_str).unwrap_or(CategoryType::Expense),
                parent_id: row.get(7)?,
                is_active: row.get(8)?,
                color: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM system_category_templates", [], |row| row.get(0))?;
    Ok(count)
}

pub fn find_template_id(conn: &Connection, name: &str) -> Result<Option<String>> {
    let id = conn
        .query_row(
            "SELECT id FROM system_category_templates WHERE name = ?1 ORDER BY rowid LIMIT 1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

// ============================================================================
// ICON UPDATE
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MissingIcon {
    pub category_name: String,
    pub icon_file: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IconUpdateSummary {
    /// Names that had a usable mapping
    pub mapped: usize,
    /// Rows whose icon was rewritten
    pub updated: usize,
    pub missing: Vec<MissingIcon>,
    /// Names still without an icon after the update
    pub without_icon: Vec<String>,
}

/// Point templates at mapped icon files. Mappings whose file is absent
/// from `icons_dir` are reported and skipped.
pub fn update_icons(
    conn: &mut Connection,
    icons: &BTreeMap<String, String>,
    icons_dir: &Path,
) -> Result<IconUpdateSummary> {
    let tx = conn.transaction().context("Failed to start icon update transaction")?;

    let mut updated = 0;
    let mut missing = Vec::new();

    for (name, icon_file) in icons {
        let icon_path: PathBuf = icons_dir.join(icon_file);
        if !icon_path.exists() {
            warn!("icon file missing for {}: {}", name, icon_path.display());
            missing.push(MissingIcon {
                category_name: name.clone(),
                icon_file: icon_file.clone(),
            });
            continue;
        }

        let rows = tx.execute(
            "UPDATE system_category_templates SET icon = ?1 WHERE name = ?2",
            params![icon_file, name],
        )?;
        if rows > 0 {
            updated += rows;
            debug!("✓ Updated {} -> {} ({} records)", name, icon_file, rows);
        }
    }

    tx.commit().context("Failed to commit icon update")?;

    let summary = IconUpdateSummary {
        mapped: icons.len(),
        updated,
        missing,
        without_icon: categories_without_icons(conn)?,
    };
    info!("updated {} template icons, {} icon files missing", summary.updated, summary.missing.len());

    Ok(summary)
}

pub fn categories_without_icons(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT name
         FROM system_category_templates
         WHERE icon IS NULL OR icon = ''
         ORDER BY name",
    )?;

    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(names)
}

// ============================================================================
// TESTS
// ============================================================================
