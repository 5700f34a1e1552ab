// Category seeding against an on-disk SQLite database

use jive_devtools::db::{self, categories_without_icons, get_all_templates, import_hierarchy, update_icons};
use jive_devtools::entities::{load_icon_mappings, CategoryType, HierarchyFile};
use std::fs;

const HIERARCHY: &str = r##"{
    "expense": {
        "primary": [
            {
                "id": "exp_food",
                "name": "餐饮",
                "icon_file": "food.png",
                "children": [
                    { "name": "早餐", "icon_file": "breakfast.png" },
                    { "name": "午餐" }
                ]
            },
            { "id": "exp_misc", "name": "其他" }
        ]
    },
    "income": {
        "primary": [
            { "id": 7, "name": "工资", "children": [ { "name": "奖金" } ] }
        ]
    }
}"##;

#[test]
fn test_import_then_update_icons() {
    let dir = tempfile::tempdir().unwrap();
    let hierarchy_path = dir.path().join("category_hierarchy.json");
    let mappings_path = dir.path().join("category_icon_mappings.json");
    let icons_dir = dir.path().join("icons");
    let db_path = dir.path().join("jive_money.db");

    fs::write(&hierarchy_path, HIERARCHY).unwrap();
    fs::write(
        &mappings_path,
        r#"[
            { "category_name": "午餐", "icon_file": "lunch.png" },
            { "category_name": "工资", "icon_file": "salary.png" },
            { "category_name": "奖金", "icon_file": "" }
        ]"#,
    )
    .unwrap();
    fs::create_dir_all(&icons_dir).unwrap();
    fs::write(icons_dir.join("lunch.png"), b"png").unwrap();

    let hierarchy = HierarchyFile::load(&hierarchy_path).unwrap();
    let mut conn = db::open_database(&db_path).unwrap();

    let summary = import_hierarchy(&mut conn, &hierarchy, true).unwrap();
    assert_eq!(summary.imported, 6);
    assert_eq!(summary.parents, 3);
    assert_eq!(summary.children, 3);

    let income = summary.stats.iter().find(|s| s.category_type == "income").unwrap();
    assert_eq!((income.parents, income.children, income.total), (1, 1, 2));

    let rows = get_all_templates(&conn).unwrap();
    let salary = rows.iter().find(|c| c.name == "工资").unwrap();
    assert_eq!(salary.category_type, CategoryType::Income);
    assert_eq!(salary.color, "#4CAF50");
    assert_eq!(salary.name_pinyin.as_deref(), Some("gongzi"));
    let bonus = rows.iter().find(|c| c.name == "奖金").unwrap();
    assert_eq!(bonus.parent_id.as_deref(), Some(salary.id.as_str()));

    let icons = load_icon_mappings(&mappings_path).unwrap();
    assert_eq!(icons.len(), 2);

    let icon_summary = update_icons(&mut conn, &icons, &icons_dir).unwrap();
    assert_eq!(icon_summary.updated, 1);
    assert_eq!(icon_summary.missing.len(), 1);
    assert_eq!(icon_summary.missing[0].category_name, "工资");
    assert!(icon_summary.without_icon.is_empty());

    let lunch = get_all_templates(&conn)
        .unwrap()
        .into_iter()
        .find(|c| c.name == "午餐")
        .unwrap();
    assert_eq!(lunch.icon, "lunch.png");
    assert!(categories_without_icons(&conn).unwrap().is_empty());
}

#[test]
fn test_failed_import_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = db::open_database(&dir.path().join("jive_money.db")).unwrap();

    let first = HierarchyFile::from_json(HIERARCHY).unwrap();
    import_hierarchy(&mut conn, &first, true).unwrap();

    // Reject every insert so the second import fails after its DELETE
    conn.execute_batch(
        "CREATE TRIGGER reject_inserts BEFORE INSERT ON system_category_templates
         BEGIN SELECT RAISE(ABORT, 'read only'); END;",
    )
    .unwrap();

    let err = import_hierarchy(&mut conn, &first, true).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to insert category"));
    assert_eq!(db::verify_count(&conn).unwrap(), 6);
}
