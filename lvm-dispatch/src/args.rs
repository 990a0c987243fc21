// SPDX-License-Identifier: GPL-3.0-only

//! Provisioner command-line encoding

use lvm_types::{ActionError, ActionKind, VolumeAction};

use crate::error::Result;

/// Arguments passed to the provisioner binary for `action`.
///
/// The output is deterministic and always ends with the volume and group
/// names.
pub fn provisioner_args(action: &VolumeAction) -> Result<Vec<String>> {
    let mut args: Vec<String> = Vec::new();

    match action.kind {
        ActionKind::Create => {
            let lvm_type = action.lvm_type.ok_or(ActionError::MissingLvmType)?;
            args.push("createlv".to_string());
            push_flag(&mut args, "--lvsize", action.size.to_string());
            push_flag(&mut args, "--devices", action.devices_pattern.clone());
            push_flag(&mut args, "--lvmtype", lvm_type.to_string());
        }
        ActionKind::Delete => {
            args.push("deletelv".to_string());
        }
        ActionKind::CreateSnapshot => {
            args.push("createsnapshot".to_string());
            push_flag(&mut args, "--snapshotname", action.snapshot_name.clone());
            push_flag(&mut args, "--s3parameter", action.backup_target.encode()?);
            push_flag(&mut args, "--lvsize", action.size.to_string());
            push_flag(
                &mut args,
                "--lvmsnapshotbufferpercentage",
                action.snapshot_buffer_percentage.to_string(),
            );
        }
        ActionKind::RestoreSnapshot => {
            args.push("restoresnapshot".to_string());
            push_flag(&mut args, "--snapshotname", action.snapshot_name.clone());
            push_flag(&mut args, "--s3parameter", action.backup_target.encode()?);
        }
    }

    push_flag(&mut args, "--lvname", action.name.clone());
    push_flag(&mut args, "--vgname", action.vg_name.clone());
    Ok(args)
}

fn push_flag(args: &mut Vec<String>, flag: &str, value: String) {
    args.push(flag.to_string());
    args.push(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use lvm_types::{BackupTarget, GIB, LvmType};

    fn action(kind: ActionKind) -> VolumeAction {
        let mut action = VolumeAction::new(kind, "pvc-1", "node-1");
        action.vg_name = "data".to_string();
        action
    }

    #[test]
    fn encodes_create() {
        let mut create = action(ActionKind::Create);
        create.size = 10 * GIB;
        create.devices_pattern = "/dev/sdb,/dev/sdc".to_string();
        create.lvm_type = Some(LvmType::Striped);

        assert_eq!(
            provisioner_args(&create).expect("args").join(" "),
            "createlv --lvsize 10737418240 --devices /dev/sdb,/dev/sdc --lvmtype striped \
             --lvname pvc-1 --vgname data"
        );
    }

    #[test]
    fn create_without_type_is_rejected() {
        assert!(matches!(
            provisioner_args(&action(ActionKind::Create)),
            Err(DispatchError::Validation(ActionError::MissingLvmType))
        ));
    }

    #[test]
    fn encodes_delete() {
        assert_eq!(
            provisioner_args(&action(ActionKind::Delete)).expect("args"),
            vec!["deletelv", "--lvname", "pvc-1", "--vgname", "data"]
        );
    }

    #[test]
    fn encodes_snapshot_actions_with_backup_token() {
        let target = BackupTarget {
            bucket: Some("snapshots".to_string()),
            ..Default::default()
        };
        let token = target.encode().expect("encode");

        let mut create = action(ActionKind::CreateSnapshot);
        create.snapshot_name = "snap-1".to_string();
        create.size = GIB;
        create.snapshot_buffer_percentage = 20;
        create.backup_target = target.clone();
        assert_eq!(
            provisioner_args(&create).expect("args"),
            vec![
                "createsnapshot",
                "--snapshotname",
                "snap-1",
                "--s3parameter",
                token.as_str(),
                "--lvsize",
                "1073741824",
                "--lvmsnapshotbufferpercentage",
                "20",
                "--lvname",
                "pvc-1",
                "--vgname",
                "data",
            ]
        );

        let mut restore = action(ActionKind::RestoreSnapshot);
        restore.snapshot_name = "snap-1".to_string();
        restore.backup_target = target;
        assert_eq!(
            provisioner_args(&restore).expect("args"),
            vec![
                "restoresnapshot",
                "--snapshotname",
                "snap-1",
                "--s3parameter",
                token.as_str(),
                "--lvname",
                "pvc-1",
                "--vgname",
                "data",
            ]
        );
    }
}
