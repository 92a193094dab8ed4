use std::fs;

use anyhow::Result;
use sheetmove_config::{ColumnRef, ConfigError, PLAN_FILE_NAME, load_plan};
use sheetmove_test_support::fixtures::temp_dir;

#[test]
fn load_plan_reads_file_from_disk() -> Result<()> {
    let temp = temp_dir()?;
    let path = temp.path().join(PLAN_FILE_NAME);
    fs::write(
        &path,
        "tasks:\n  - excel_path: roster.csv\n    name_col: 0\n    source_path: in\n    destination_path: out\n",
    )?;

    let plan = load_plan(&path)?;
    assert_eq!(plan.tasks.len(), 1);
    assert_eq!(plan.tasks[0].name_col, ColumnRef::Index(0));
    Ok(())
}

#[test]
fn load_plan_reports_missing_file() -> Result<()> {
    let temp = temp_dir()?;
    let path = temp.path().join(PLAN_FILE_NAME);

    let err = load_plan(&path).unwrap_err();
    match err {
        ConfigError::Io {
            operation, path: p, ..
        } => {
            assert_eq!(operation, "plan.read");
            assert_eq!(p, path);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn load_plan_attaches_path_to_parse_errors() -> Result<()> {
    let temp = temp_dir()?;
    let path = temp.path().join(PLAN_FILE_NAME);
    fs::write(&path, "tasks: [oops")?;

    let err = load_plan(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { path: Some(ref p), .. } if *p == path));
    Ok(())
}

#[test]
fn load_plan_rejects_filter_column_without_value() -> Result<()> {
    let temp = temp_dir()?;
    let path = temp.path().join(PLAN_FILE_NAME);
    fs::write(
        &path,
        "tasks:\n  - { excel_path: r.csv, name_col: 0, source_path: in, destination_path: out, filter_col: 1 }\n",
    )?;

    let err = load_plan(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidField { field: "filter_value", .. }));
    Ok(())
}
