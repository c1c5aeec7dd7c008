// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Groups of VMs managed as a unit.

use std::collections::{BTreeMap, BTreeSet};

use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{SessionRef, SrRef, VmApplianceRef, VmRef};

define_enum! {
    pub enum VmApplianceOperation {
        /// Start
        Start = "start",
        /// Clean shutdown
        CleanShutdown = "clean_shutdown",
        /// Hard shutdown
        HardShutdown = "hard_shutdown",
        /// Shutdown
        Shutdown = "shutdown",
    }
}

define_record! {
    pub struct VmApplianceRecord = "VM_appliance" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// a human-readable name
        pub name_label: String,
        /// a notes field containing human-readable description
        pub name_description: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<VmApplianceOperation>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, VmApplianceOperation>,
        /// all VMs in this appliance
        pub vms: BTreeSet<VmRef> = "VMs",
    }
}

rpc_class! {
    pub struct VmAppliance = "VM_appliance";

    /// Get a record containing the current state of the given VM_appliance.
    fn get_record(this: &VmApplianceRef) -> VmApplianceRecord;
    fn get_by_uuid(uuid: &str) -> VmApplianceRef;
    /// Create a new VM_appliance instance, and return its handle.
    task fn create(args: &VmApplianceRecord) -> VmApplianceRef;
    /// Destroy the specified VM_appliance instance.
    task fn destroy(this: &VmApplianceRef) -> ();
    fn get_by_name_label(label: &str) -> Vec<VmApplianceRef>;
    fn get_uuid(this: &VmApplianceRef) -> String;
    fn get_name_label(this: &VmApplianceRef) -> String;
    fn get_name_description(this: &VmApplianceRef) -> String;
    fn get_allowed_operations(
        this: &VmApplianceRef,
    ) -> Vec<VmApplianceOperation>;
    fn get_current_operations(
        this: &VmApplianceRef,
    ) -> BTreeMap<String, VmApplianceOperation>;
    fn get_vms as get_VMs(this: &VmApplianceRef) -> Vec<VmRef>;
    fn set_name_label(this: &VmApplianceRef, value: &str) -> ();
    fn set_name_description(this: &VmApplianceRef, value: &str) -> ();
    /// Start all VMs in the appliance
    task fn start(this: &VmApplianceRef, paused: bool) -> ();
    /// Perform a clean shutdown of all the VMs in the appliance
    task fn clean_shutdown(this: &VmApplianceRef) -> ();
    /// Perform a hard shutdown of all the VMs in the appliance
    task fn hard_shutdown(this: &VmApplianceRef) -> ();
    /// For each VM in the appliance, try to shut it down cleanly.
    task fn shutdown(this: &VmApplianceRef) -> ();
    /// Assert whether all SRs required to recover this VM appliance are
    /// available.
    task fn assert_can_be_recovered(
        this: &VmApplianceRef,
        session_to: &SessionRef,
    ) -> ();
    /// Get the list of SRs required by the VM appliance to recover.
    task fn get_srs_required_for_recovery as get_SRs_required_for_recovery(
        this: &VmApplianceRef,
        session_to: &SessionRef,
    ) -> Vec<SrRef>;
    /// Recover the VM appliance
    task fn recover(
        this: &VmApplianceRef,
        session_to: &SessionRef,
        force: bool,
    ) -> ();
    /// Return a list of all the VM_appliances known to the system.
    fn get_all() -> Vec<VmApplianceRef>;
    /// Return a map of VM_appliance references to VM_appliance records for all
    /// VM_appliances known to the system.
    fn get_all_records() -> BTreeMap<VmApplianceRef, VmApplianceRecord>;
}
