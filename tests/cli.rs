mod common;

use std::fs;

use assert_cmd::Command;
use coretable::{ColumnTypeName, column_def::ColumnDefs};
use predicates::str::contains;

use common::{SPARSE_CSV, TestWorkspace};

fn coretable() -> Command {
    Command::cargo_bin("coretable").expect("binary exists")
}

#[test]
fn infer_prints_table_and_writes_defs() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sparse.csv", SPARSE_CSV);
    let defs_path = workspace.path().join("defs.yml");

    coretable()
        .args([
            "infer",
            "-i",
            input.to_str().unwrap(),
            "-o",
            defs_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("GDP_per_capita"))
        .stdout(contains("EntityName"));

    let defs = ColumnDefs::load(&defs_path).expect("load defs");
    let gdp = defs
        .as_slice()
        .iter()
        .find(|def| def.slug == "GDP_per_capita")
        .expect("gdp def");
    assert_eq!(gdp.column_type, ColumnTypeName::Numeric);
    assert_eq!(gdp.name.as_deref(), Some("GDP per capita"));
}

#[test]
fn infer_json_reports_renames() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sparse.csv", SPARSE_CSV);

    let output = coretable()
        .args(["infer", "-i", input.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run infer");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["renames"][0]["original_name"], "GDP per capita");
    assert_eq!(report["columns"][1]["type"], "Year");
}

#[test]
fn preview_marks_invalid_cells() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("typed.csv", "year,value\n2000,1\n2001,oops\n");

    coretable()
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "5"])
        .assert()
        .success()
        .stdout(contains("[NaNButShouldBeNumber]"));
}

#[test]
fn interpolate_writes_filled_csv() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sparse.csv", SPARSE_CSV);
    let output = workspace.path().join("filled.csv");

    coretable()
        .args([
            "interpolate",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--value",
            "GDP_per_capita",
            "--time",
            "year",
            "--tolerance",
            "1",
            "--group-by",
            "entityName",
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&output).expect("read output");
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "entityName,year,GDP_per_capita");
    assert_eq!(lines[2], "France,2000,5");
    assert_eq!(lines[3], "France,2002,");
    assert_eq!(lines[6], "Chad,2001,2");
}

#[test]
fn interpolate_uses_defs_file_and_tsv_output() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sparse.csv", SPARSE_CSV);
    let defs = workspace.write(
        "defs.yml",
        "- slug: GDP_per_capita\n  type: Currency\n  name: GDP\n",
    );

    coretable()
        .args([
            "interpolate",
            "-i",
            input.to_str().unwrap(),
            "--defs",
            defs.to_str().unwrap(),
            "--value",
            "GDP_per_capita",
            "--tolerance",
            "3",
            "--output-delimiter",
            "tab",
        ])
        .assert()
        .success()
        .stdout(contains("France\t2004\t9"));
}

#[test]
fn interpolate_rejects_unknown_column() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("sparse.csv", SPARSE_CSV);

    coretable()
        .args([
            "interpolate",
            "-i",
            input.to_str().unwrap(),
            "--value",
            "population",
        ])
        .assert()
        .failure()
        .stderr(contains("Column 'population' does not exist"));
}

#[test]
fn missing_input_reports_context() {
    coretable()
        .args(["preview", "-i", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(contains("Opening input file"));
}
