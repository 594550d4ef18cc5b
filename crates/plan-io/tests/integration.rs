//! Write a plan to disk and read it back.

use plan_io::{PlanReader, PlanWriter};

#[test]
fn test_write_then_read_plan() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("sas_plan");

    let mut writer = PlanWriter::new(path.clone());
    writer.record_all(["unstack b a", "put-down b", "pick-up a"]);
    writer.finish(3, true).unwrap();

    let steps = PlanReader::read(&path).unwrap();
    assert_eq!(steps, vec!["unstack b a", "put-down b", "pick-up a"]);
}

#[test]
fn test_read_empty_plan() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("sas_plan");
    PlanWriter::new(path.clone()).finish(0, true).unwrap();
    assert!(PlanReader::read(&path).unwrap().is_empty());
}
