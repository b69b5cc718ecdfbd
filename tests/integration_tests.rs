use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn runs_without_arguments() {
    let mut cmd = Command::cargo_bin("braid").unwrap();
    cmd.assert().success();
}

#[test]
fn demo_reaches_steady_state() {
    let mut cmd = Command::cargo_bin("braid").unwrap();
    cmd.args(["demo", "--minimal"]);
    cmd.assert()
        .success()
        .stdout("A 0x08\nB 0x00\nPSW 0x00\nSP 0x07\nPC 0x0004\nDPTR 0x0000\n");
}

#[test]
fn run_halts_on_unimplemented_opcode() {
    let path = std::env::temp_dir().join("braid_halt_test.bin");
    // MOV A,#42 then an unimplemented opcode
    std::fs::write(&path, [0x74, 0x2A, 0xFF]).unwrap();

    let mut cmd = Command::cargo_bin("braid").unwrap();
    cmd.args(["run", "--minimal"]).arg(&path);
    cmd.assert()
        .failure()
        .stdout("A 0x2A\nB 0x00\nPSW 0x00\nSP 0x07\nPC 0x0003\nDPTR 0x0000\n");
}

#[test]
fn run_rejects_missing_file() {
    let mut cmd = Command::cargo_bin("braid").unwrap();
    cmd.args(["run", "does_not_exist.bin"]);
    cmd.assert().failure();
}
