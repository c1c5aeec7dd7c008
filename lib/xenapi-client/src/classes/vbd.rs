// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual block devices, which attach a VDI to a VM.

use std::collections::{BTreeMap, BTreeSet};

use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{VbdMetricsRef, VbdRef, VdiRef, VmRef};

define_enum! {
    /// Access mode of a VBD.
    pub enum VbdMode {
        /// only read-only access will be allowed
        RO = "RO",
        /// read-write access will be allowed
        RW = "RW",
    }
}

define_enum! {
    /// How a VBD is presented to the guest.
    pub enum VbdType {
        /// VBD will appear to guest as CD
        CD = "CD",
        /// VBD will appear to guest as disk
        Disk = "Disk",
        /// VBD will appear as a floppy
        Floppy = "Floppy",
    }
}

define_enum! {
    pub enum VbdOperations {
        /// Attempting to attach this VBD to a VM
        Attach = "attach",
        /// Attempting to eject the media from this VBD
        Eject = "eject",
        /// Attempting to insert new media into this VBD
        Insert = "insert",
        /// Attempting to hotplug this VBD
        Plug = "plug",
        /// Attempting to hot unplug this VBD
        Unplug = "unplug",
        /// Attempting to forcibly unplug this VBD
        UnplugForce = "unplug_force",
        /// Attempting to pause a block device backend
        Pause = "pause",
        /// Attempting to unpause a block device backend
        Unpause = "unpause",
    }
}

define_record! {
    pub struct VbdRecord = "VBD" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<VbdOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, VbdOperations>,
        /// the virtual machine
        pub vm: VmRef = "VM",
        /// the virtual disk
        pub vdi: VdiRef = "VDI",
        /// device seen by the guest e.g. hda1
        pub device: String,
        /// user-friendly device name e.g. 0,1,2,etc.
        pub userdevice: String,
        /// true if this VBD is bootable
        pub bootable: bool,
        /// the mode the VBD should be mounted with
        pub mode: VbdMode,
        /// how the VBD will appear to the guest (e.g. disk or CD)
        pub kind: VbdType = "type",
        /// true if this VBD will support hot-unplug
        pub unpluggable: bool,
        /// true if a storage level lock was acquired
        pub storage_lock: bool,
        /// if true this represents an empty drive
        pub empty: bool,
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// is the device currently attached (erased on reboot)
        pub currently_attached: bool,
        /// error/success code associated with last attach-operation (erased on
        /// reboot)
        pub status_code: i64,
        /// error/success information associated with last attach-operation
        /// status (erased on reboot)
        pub status_detail: String,
        /// Device runtime properties
        pub runtime_properties: BTreeMap<String, String>,
        /// QoS algorithm to use
        pub qos_algorithm_type: String,
        /// parameters for chosen QoS algorithm
        pub qos_algorithm_params: BTreeMap<String, String>,
        /// supported QoS algorithms for this VBD
        pub qos_supported_algorithms: BTreeSet<String>,
        /// metrics associated with this VBD
        pub metrics: VbdMetricsRef,
    }
}

rpc_class! {
    pub struct Vbd = "VBD";

    /// Get a record containing the current state of the given VBD.
    fn get_record(this: &VbdRef) -> VbdRecord;
    fn get_by_uuid(uuid: &str) -> VbdRef;
    /// Create a new VBD instance, and return its handle.
    task fn create(args: &VbdRecord) -> VbdRef;
    /// Destroy the specified VBD instance.
    task fn destroy(this: &VbdRef) -> ();
    fn get_uuid(this: &VbdRef) -> String;
    fn get_allowed_operations(this: &VbdRef) -> BTreeSet<VbdOperations>;
    fn get_current_operations(this: &VbdRef) -> BTreeMap<String, VbdOperations>;
    fn get_vm as get_VM(this: &VbdRef) -> VmRef;
    fn get_vdi as get_VDI(this: &VbdRef) -> VdiRef;
    fn get_device(this: &VbdRef) -> String;
    fn get_userdevice(this: &VbdRef) -> String;
    fn get_bootable(this: &VbdRef) -> bool;
    fn get_mode(this: &VbdRef) -> VbdMode;
    fn get_type(this: &VbdRef) -> VbdType;
    fn get_unpluggable(this: &VbdRef) -> bool;
    fn get_storage_lock(this: &VbdRef) -> bool;
    fn get_empty(this: &VbdRef) -> bool;
    fn get_other_config(this: &VbdRef) -> BTreeMap<String, String>;
    fn get_currently_attached(this: &VbdRef) -> bool;
    fn get_status_code(this: &VbdRef) -> i64;
    fn get_status_detail(this: &VbdRef) -> String;
    fn get_runtime_properties(this: &VbdRef) -> BTreeMap<String, String>;
    fn get_qos_algorithm_type(this: &VbdRef) -> String;
    fn get_qos_algorithm_params(this: &VbdRef) -> BTreeMap<String, String>;
    fn get_qos_supported_algorithms(this: &VbdRef) -> BTreeSet<String>;
    fn get_metrics(this: &VbdRef) -> VbdMetricsRef;
    fn set_userdevice(this: &VbdRef, value: &str) -> ();
    fn set_bootable(this: &VbdRef, value: bool) -> ();
    fn set_type(this: &VbdRef, value: &VbdType) -> ();
    fn set_unpluggable(this: &VbdRef, value: bool) -> ();
    fn set_other_config(this: &VbdRef, value: &BTreeMap<String, String>) -> ();
    /// Add the given key-value pair to the other_config field of the given VBD.
    fn add_to_other_config(this: &VbdRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given VBD.
    fn remove_from_other_config(this: &VbdRef, key: &str) -> ();
    fn set_qos_algorithm_type(this: &VbdRef, value: &str) -> ();
    fn set_qos_algorithm_params(
        this: &VbdRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Add the given key-value pair to the qos/algorithm_params field of the
    /// given VBD.
    fn add_to_qos_algorithm_params(this: &VbdRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the
    /// qos/algorithm_params field of the given VBD.
    fn remove_from_qos_algorithm_params(this: &VbdRef, key: &str) -> ();
    /// Remove the media from the device and leave it empty
    task fn eject(vbd: &VbdRef) -> ();
    /// Insert new media into the device
    task fn insert(vbd: &VbdRef, vdi: &VdiRef) -> ();
    /// Hotplug the specified VBD, dynamically attaching it to the running VM
    task fn plug(this: &VbdRef) -> ();
    /// Hot-unplug the specified VBD, dynamically unattaching it from the
    /// running VM
    task fn unplug(this: &VbdRef) -> ();
    /// Forcibly unplug the specified VBD
    task fn unplug_force(this: &VbdRef) -> ();
    /// Throws an error if this VBD could not be attached to this VM if the VM
    /// were running.
    task fn assert_attachable(this: &VbdRef) -> ();
    /// Sets the mode of the VBD.
    task fn set_mode(this: &VbdRef, value: &VbdMode) -> ();
    /// Return a list of all the VBDs known to the system.
    fn get_all() -> Vec<VbdRef>;
    /// Return a map of VBD references to VBD records for all VBDs known to the
    /// system.
    fn get_all_records() -> BTreeMap<VbdRef, VbdRecord>;
}
