use lvm_sys::{LvmCommands, SysError, ToolOutput};
use lvm_testing::ScriptedRunner;
use lvm_types::GIB;

const VG_QUERY: &str = "vgs data --noheadings -o vg_name";
const ORIGIN_QUERY: &str = "lvs data/pvc-1 --noheadings -o lv_name";
const SNAP_QUERY: &str = "lvs data/pvc-1-snap --noheadings -o lv_name";

fn group_with_origin() -> LvmCommands<ScriptedRunner> {
    let runner = ScriptedRunner::new();
    runner
        .on(VG_QUERY, ToolOutput::ok("  data\n"))
        .on(ORIGIN_QUERY, ToolOutput::ok("  pvc-1\n"));
    LvmCommands::new(runner)
}

#[test]
fn create_reserves_origin_sectors_then_delete_succeeds() {
    let lvm = group_with_origin();

    lvm.create_snapshot("data", "pvc-1", "pvc-1-snap", 5 * GIB)
        .expect("create snapshot");
    assert_eq!(
        lvm.runner().count("lvcreate -q -s data/pvc-1 -n pvc-1-snap -y -L 10495760s"),
        1
    );

    lvm.runner().on(SNAP_QUERY, ToolOutput::ok("  pvc-1-snap\n"));
    lvm.delete_snapshot("data", "pvc-1-snap")
        .expect("delete snapshot");
    assert_eq!(lvm.runner().count("lvremove -q -y data/pvc-1-snap"), 1);
}

#[test]
fn existing_snapshot_name_is_a_precondition_failure() {
    let lvm = group_with_origin();
    lvm.runner().on(SNAP_QUERY, ToolOutput::ok("pvc-1-snap"));

    let err = lvm
        .create_snapshot("data", "pvc-1", "pvc-1-snap", GIB)
        .expect_err("name taken");
    assert!(matches!(err, SysError::Precondition(_)));
    assert_eq!(lvm.runner().count("lvcreate"), 0);
    assert_eq!(lvm.runner().count("lvremove"), 0);
}

#[test]
fn missing_origin_or_group_is_rejected() {
    let lvm = LvmCommands::new(ScriptedRunner::new());
    let err = lvm
        .create_snapshot("data", "pvc-1", "pvc-1-snap", GIB)
        .expect_err("no group");
    assert_eq!(err.to_string(), "volume group data does not exist");

    let runner = ScriptedRunner::new();
    runner.on(VG_QUERY, ToolOutput::ok("data"));
    let lvm = LvmCommands::new(runner);
    let err = lvm
        .create_snapshot("data", "pvc-1", "pvc-1-snap", GIB)
        .expect_err("no origin");
    assert_eq!(err.to_string(), "logical volume pvc-1 does not exist");
}

#[test]
fn deleting_missing_snapshot_is_an_error() {
    let lvm = group_with_origin();

    let err = lvm
        .delete_snapshot("data", "pvc-1-snap")
        .expect_err("missing snapshot");
    assert!(matches!(err, SysError::Precondition(_)));
    assert_eq!(lvm.runner().count("lvremove"), 0);

    // Ordinary volume removal stays idempotent for the same name.
    assert!(lvm.remove_volume("data", "pvc-1-snap").is_ok());
}
