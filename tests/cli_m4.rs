use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use lasr::libs::las::{LasWriter, Overlap};

const RECORD1_M4: &str = "000000000 000000001 -1000 99.00 0 0 1000 1000 0 0 1000 1000 overlap";
const RECORD2_M4: &str = "000000004 000000002 -980 94.95 0 300 1300 5000 1 3020 4000 4000 overlap";

fn basic_records() -> Vec<Overlap> {
    let mut rec1 = Overlap::default();
    rec1.aread = 0;
    rec1.bread = 1;
    rec1.alen = 1000;
    rec1.blen = 1000;
    rec1.abpos = 0;
    rec1.aepos = 1000;
    rec1.bbpos = 0;
    rec1.bepos = 1000;
    rec1.diffs = 10;
    let trace: Vec<u16> = (0..10).flat_map(|_| [1u16, 100u16]).collect();
    rec1.set_trace(&trace);

    let mut rec2 = Overlap::default();
    rec2.aread = 4;
    rec2.bread = 2;
    rec2.alen = 5000;
    rec2.blen = 4000;
    rec2.flags = 0x1;
    rec2.abpos = 300;
    rec2.aepos = 1300;
    rec2.bbpos = 0;
    rec2.bepos = 980;
    rec2.diffs = 50;
    let trace: Vec<u16> = (0..10).flat_map(|_| [5u16, 98u16]).collect();
    rec2.set_trace(&trace);

    vec![rec1, rec2]
}

fn write_las(path: &Path) -> anyhow::Result<()> {
    let records = basic_records();
    let mut writer = LasWriter::create(path, records.len() as i64, 100)?;
    for rec in &records {
        writer.write_record(rec)?;
    }
    writer.finish()?;
    Ok(())
}

#[test]
fn command_m4_identity_and_label() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let las = temp.path().join("basic.las");
    write_las(&las)?;
    let output = temp.path().join("out.m4");

    // identity = 100 - 200*10/2000 = 99.00; equal lengths stay `overlap`
    let mut cmd = Command::cargo_bin("lasr")?;
    cmd.arg("m4").arg(&las).arg("1").arg("-o").arg(&output);
    cmd.assert().success();

    let content = fs::read_to_string(&output)?;
    assert_eq!(content, format!("{}\n", RECORD1_M4));

    Ok(())
}

#[test]
fn command_m4_all_records() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let las = temp.path().join("basic.las");
    write_las(&las)?;
    let output = temp.path().join("out.m4");

    let mut cmd = Command::cargo_bin("lasr")?;
    cmd.arg("m4").arg(&las).arg("-o").arg(&output);
    cmd.assert().success();

    let content = fs::read_to_string(&output)?;
    assert_eq!(content, format!("{}\n{}\n", RECORD1_M4, RECORD2_M4));

    Ok(())
}

#[test]
fn command_m4_contained_label() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let las = temp.path().join("contained.las");

    // b read shorter than a and fully covered by the alignment
    let mut rec = Overlap::default();
    rec.aread = 0;
    rec.bread = 1;
    rec.alen = 2000;
    rec.blen = 800;
    rec.abpos = 300;
    rec.aepos = 1100;
    rec.bbpos = 0;
    rec.bepos = 800;
    rec.diffs = 8;
    let trace: Vec<u16> = (0..9).flat_map(|_| [1u16, 89u16]).collect();
    rec.set_trace(&trace);

    let mut writer = LasWriter::create(&las, 1, 100)?;
    writer.write_record(&rec)?;
    writer.finish()?;

    let output = temp.path().join("out.m4");
    let mut cmd = Command::cargo_bin("lasr")?;
    cmd.arg("m4").arg(&las).arg("-o").arg(&output);
    cmd.assert().success();

    let content = fs::read_to_string(&output)?;
    assert!(content.trim_end().ends_with(" contained"), "{}", content);

    Ok(())
}

#[test]
fn command_m4_fl_filter() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let las = temp.path().join("basic.las");
    write_las(&las)?;
    let output = temp.path().join("out.m4");

    // Record 2 starts 300bp into the a read and is dropped
    let mut cmd = Command::cargo_bin("lasr")?;
    cmd.arg("m4").arg("--fl").arg(&las).arg("-o").arg(&output);
    cmd.assert().success();

    let content = fs::read_to_string(&output)?;
    assert_eq!(content, format!("{}\n", RECORD1_M4));

    Ok(())
}

#[test]
fn command_m4_truncated_file() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let las = temp.path().join("basic.las");
    write_las(&las)?;

    let mut bytes = fs::read(&las)?;
    bytes.truncate(bytes.len() - 10);
    let truncated = temp.path().join("truncated.las");
    fs::write(&truncated, &bytes)?;

    let mut cmd = Command::cargo_bin("lasr")?;
    cmd.arg("m4").arg(&truncated);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("short read"));

    Ok(())
}
