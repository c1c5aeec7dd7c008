// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual machines and templates.

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::Timestamp;
use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{
    BlobRef, ConsoleRef, CrashdumpRef, GpuGroupRef, HostRef, NetworkRef, PciRef,
    SessionRef, SrRef, VbdRef, VdiRef, VgpuRef, VifRef, VmApplianceRef,
    VmGuestMetricsRef, VmMetricsRef, VmRef, VmppRef, VmssRef, VtpmRef, VusbRef,
};
use super::host::UpdateGuidances;

define_enum! {
    /// Power state of a VM as recorded by the server.
    pub enum VmPowerState {
        /// VM is offline and not using any resources
        Halted = "Halted",
        /// All resources have been allocated but the VM itself is paused and
        /// its vCPUs are not running
        Paused = "Paused",
        /// Running
        Running = "Running",
        /// VM state has been saved to disk and it is nolonger running.
        Suspended = "Suspended",
    }
}

define_enum! {
    pub enum VmOperations {
        /// refers to the operation "snapshot"
        Snapshot = "snapshot",
        /// refers to the operation "clone"
        Clone = "clone",
        /// refers to the operation "copy"
        Copy = "copy",
        /// refers to the operation "create_template"
        CreateTemplate = "create_template",
        /// refers to the operation "revert"
        Revert = "revert",
        /// refers to the operation "checkpoint"
        Checkpoint = "checkpoint",
        /// refers to the operation "snapshot_with_quiesce"
        SnapshotWithQuiesce = "snapshot_with_quiesce",
        /// refers to the operation "provision"
        Provision = "provision",
        /// refers to the operation "start"
        Start = "start",
        /// refers to the operation "start_on"
        StartOn = "start_on",
        /// refers to the operation "pause"
        Pause = "pause",
        /// refers to the operation "unpause"
        Unpause = "unpause",
        /// refers to the operation "clean_shutdown"
        CleanShutdown = "clean_shutdown",
        /// refers to the operation "clean_reboot"
        CleanReboot = "clean_reboot",
        /// refers to the operation "hard_shutdown"
        HardShutdown = "hard_shutdown",
        /// refers to the operation "power_state_reset"
        PowerStateReset = "power_state_reset",
        /// refers to the operation "hard_reboot"
        HardReboot = "hard_reboot",
        /// refers to the operation "suspend"
        Suspend = "suspend",
        /// refers to the operation "csvm"
        Csvm = "csvm",
        /// refers to the operation "resume"
        Resume = "resume",
        /// refers to the operation "resume_on"
        ResumeOn = "resume_on",
        /// refers to the operation "pool_migrate"
        PoolMigrate = "pool_migrate",
        /// refers to the operation "migrate_send"
        MigrateSend = "migrate_send",
        /// refers to the operation "get_boot_record"
        GetBootRecord = "get_boot_record",
        /// refers to the operation "send_sysrq"
        SendSysrq = "send_sysrq",
        /// refers to the operation "send_trigger"
        SendTrigger = "send_trigger",
        /// refers to the operation "query_services"
        QueryServices = "query_services",
        /// refers to the operation "shutdown"
        Shutdown = "shutdown",
        /// refers to the operation "call_plugin"
        CallPlugin = "call_plugin",
        /// Changing the memory settings
        ChangingMemoryLive = "changing_memory_live",
        /// Waiting for the memory settings to change
        AwaitingMemoryLive = "awaiting_memory_live",
        /// Changing the memory dynamic range
        ChangingDynamicRange = "changing_dynamic_range",
        /// Changing the memory static range
        ChangingStaticRange = "changing_static_range",
        /// Changing the memory limits
        ChangingMemoryLimits = "changing_memory_limits",
        /// Changing the shadow memory for a halted VM.
        ChangingShadowMemory = "changing_shadow_memory",
        /// Changing the shadow memory for a running VM.
        ChangingShadowMemoryLive = "changing_shadow_memory_live",
        /// Changing VCPU settings for a halted VM.
        ChangingVCPUs = "changing_VCPUs",
        /// Changing VCPU settings for a running VM.
        ChangingVCPUsLive = "changing_VCPUs_live",
        /// Changing NVRAM for a halted VM.
        ChangingNVRAM = "changing_NVRAM",
        AssertOperationValid = "assert_operation_valid",
        /// Add, remove, query or list data sources
        DataSourceOp = "data_source_op",
        UpdateAllowedOperations = "update_allowed_operations",
        /// Turning this VM into a template
        MakeIntoTemplate = "make_into_template",
        /// importing a VM from a network stream
        Import = "import",
        /// exporting a VM to a network stream
        Export = "export",
        /// exporting VM metadata to a network stream
        MetadataExport = "metadata_export",
        /// Reverting the VM to a previous snapshotted state
        Reverting = "reverting",
        /// refers to the act of uninstalling the VM
        Destroy = "destroy",
        /// Creating and adding a VTPM to this VM
        CreateVtpm = "create_vtpm",
    }
}

define_enum! {
    /// What to do when a guest shuts itself down.
    pub enum OnNormalExit {
        /// destroy the VM state
        Destroy = "destroy",
        /// restart the VM
        Restart = "restart",
    }
}

define_enum! {
    /// What to do when a guest crashes.
    pub enum OnCrashBehaviour {
        /// destroy the VM state
        Destroy = "destroy",
        /// record a coredump and then destroy the VM state
        CoredumpAndDestroy = "coredump_and_destroy",
        /// restart the VM
        Restart = "restart",
        /// record a coredump and then restart the VM
        CoredumpAndRestart = "coredump_and_restart",
        /// leave the crashed VM paused
        Preserve = "preserve",
        /// rename the crashed VM and start a new copy
        RenameRestart = "rename_restart",
    }
}

define_enum! {
    /// What to do when a guest requests a soft reboot.
    pub enum OnSoftrebootBehavior {
        /// perform soft-reboot
        SoftReboot = "soft_reboot",
        /// destroy the VM state
        Destroy = "destroy",
        /// restart the VM
        Restart = "restart",
        /// leave the VM paused
        Preserve = "preserve",
    }
}

define_enum! {
    /// Kind of domain created when a VM starts.
    pub enum DomainType {
        /// HVM; Fully Virtualised
        Hvm = "hvm",
        /// PV: Paravirtualised
        Pv = "pv",
        /// PV inside a PVH container
        PvInPvh = "pv_in_pvh",
        /// PVH
        Pvh = "pvh",
        /// Not specified or unknown domain type
        Unspecified = "unspecified",
    }
}

define_record! {
    pub struct VmRecord = "VM" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<VmOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, VmOperations>,
        /// a human-readable name
        pub name_label: String,
        /// a notes field containing human-readable description
        pub name_description: String,
        /// Current power state of the machine
        pub power_state: VmPowerState,
        /// Creators of VMs and templates may store version information here.
        pub user_version: i64,
        /// true if this is a template.
        pub is_a_template: bool,
        /// true if this is a default template.
        pub is_default_template: bool,
        /// The VDI that a suspend image is stored on.
        pub suspend_vdi: VdiRef = "suspend_VDI",
        /// the host the VM is currently resident on
        pub resident_on: HostRef,
        /// the host on which the VM is due to be started/resumed/migrated.
        pub scheduled_to_be_resident_on: HostRef,
        /// A host which the VM has some affinity for (or NULL).
        pub affinity: HostRef,
        /// Virtualization memory overhead (bytes).
        pub memory_overhead: i64,
        /// Dynamically-set memory target (bytes).
        pub memory_target: i64,
        /// Statically-set (i.e. absolute) maximum (bytes).
        pub memory_static_max: i64,
        /// Dynamic maximum (bytes)
        pub memory_dynamic_max: i64,
        /// Dynamic minimum (bytes)
        pub memory_dynamic_min: i64,
        /// Statically-set (i.e. absolute) mininum (bytes).
        pub memory_static_min: i64,
        /// configuration parameters for the selected VCPU policy
        pub vcpus_params: BTreeMap<String, String> = "VCPUs_params",
        /// Max number of VCPUs
        pub vcpus_max: i64 = "VCPUs_max",
        /// Boot number of VCPUs
        pub vcpus_at_startup: i64 = "VCPUs_at_startup",
        /// action to take after soft reboot
        pub actions_after_softreboot: OnSoftrebootBehavior,
        /// action to take after the guest has shutdown itself
        pub actions_after_shutdown: OnNormalExit,
        /// action to take after the guest has rebooted itself
        pub actions_after_reboot: OnNormalExit,
        /// action to take if the guest crashes
        pub actions_after_crash: OnCrashBehaviour,
        /// virtual console devices
        pub consoles: BTreeSet<ConsoleRef>,
        /// virtual network interfaces
        pub vifs: BTreeSet<VifRef> = "VIFs",
        /// virtual block devices
        pub vbds: BTreeSet<VbdRef> = "VBDs",
        /// vitual usb devices
        pub vusbs: BTreeSet<VusbRef> = "VUSBs",
        /// crash dumps associated with this VM
        pub crash_dumps: BTreeSet<CrashdumpRef>,
        /// virtual TPMs
        pub vtpms: BTreeSet<VtpmRef> = "VTPMs",
        /// name of or path to bootloader
        pub pv_bootloader: String = "PV_bootloader",
        /// path to the kernel
        pub pv_kernel: String = "PV_kernel",
        /// path to the initrd
        pub pv_ramdisk: String = "PV_ramdisk",
        /// kernel command-line arguments
        pub pv_args: String = "PV_args",
        /// miscellaneous arguments for the bootloader
        pub pv_bootloader_args: String = "PV_bootloader_args",
        /// to make Zurich guests boot
        pub pv_legacy_args: String = "PV_legacy_args",
        /// HVM boot policy
        pub hvm_boot_policy: String = "HVM_boot_policy",
        /// HVM boot params
        pub hvm_boot_params: BTreeMap<String, String> = "HVM_boot_params",
        /// multiplier applied to the amount of shadow that will be made
        /// available to the guest
        pub hvm_shadow_multiplier: f64 = "HVM_shadow_multiplier",
        /// platform-specific configuration
        pub platform: BTreeMap<String, String>,
        /// PCI bus path for pass-through devices
        pub pci_bus: String = "PCI_bus",
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// domain ID (if available, -1 otherwise)
        pub domid: i64,
        /// Domain architecture (if available, null string otherwise)
        pub domarch: String,
        /// describes the CPU flags on which the VM was last booted
        pub last_boot_cpu_flags: BTreeMap<String, String> =
            "last_boot_CPU_flags",
        /// true if this is a control domain (domain 0 or a driver domain)
        pub is_control_domain: bool,
        /// metrics associated with this VM
        pub metrics: VmMetricsRef,
        /// metrics associated with the running guest
        pub guest_metrics: VmGuestMetricsRef,
        /// marshalled value containing VM record at time of last boot
        pub last_booted_record: String,
        /// An XML specification of recommended values and ranges for properties
        /// of this VM
        pub recommendations: String,
        /// data to be inserted into the xenstore tree
        /// (/local/domain/<domid>/vm-data) after the VM is created.
        pub xenstore_data: BTreeMap<String, String>,
        /// if true then the system will attempt to keep the VM running as much
        /// as possible.
        pub ha_always_run: bool,
        /// has possible values: "best-effort" meaning "try to restart this VM
        /// if possible but don't consider the Pool to be overcommitted if this
        /// is not possible"; "restart" meaning "this VM should be restarted";
        /// "" meaning "do not try to restart this VM"
        pub ha_restart_priority: String,
        /// true if this is a snapshot.
        pub is_a_snapshot: bool,
        /// Ref pointing to the VM this snapshot is of.
        pub snapshot_of: VmRef,
        /// List pointing to all the VM snapshots.
        pub snapshots: BTreeSet<VmRef>,
        /// Date/time when this snapshot was created.
        pub snapshot_time: Timestamp,
        /// Transportable ID of the snapshot VM
        pub transportable_snapshot_id: String,
        /// Binary blobs associated with this VM
        pub blobs: BTreeMap<String, BlobRef>,
        /// user-specified tags for categorization purposes
        pub tags: BTreeSet<String>,
        /// List of operations which have been explicitly blocked and an error
        /// code
        pub blocked_operations: BTreeMap<VmOperations, String>,
        /// Human-readable information concerning this snapshot
        pub snapshot_info: BTreeMap<String, String>,
        /// Encoded information about the VM's metadata this is a snapshot of
        pub snapshot_metadata: String,
        /// Ref pointing to the parent of this VM
        pub parent: VmRef,
        /// List pointing to all the children of this VM
        pub children: BTreeSet<VmRef>,
        /// BIOS strings
        pub bios_strings: BTreeMap<String, String>,
        /// Ref pointing to a protection policy for this VM
        pub protection_policy: VmppRef,
        /// true if this snapshot was created by the protection policy
        pub is_snapshot_from_vmpp: bool,
        /// Ref pointing to a snapshot schedule for this VM
        pub snapshot_schedule: VmssRef,
        /// true if this snapshot was created by the snapshot schedule
        pub is_vmss_snapshot: bool,
        /// the appliance to which this VM belongs
        pub appliance: VmApplianceRef,
        /// The delay to wait before proceeding to the next order in the startup
        /// sequence (seconds)
        pub start_delay: i64,
        /// The delay to wait before proceeding to the next order in the
        /// shutdown sequence (seconds)
        pub shutdown_delay: i64,
        /// The point in the startup or shutdown sequence at which this VM will
        /// be started
        pub order: i64,
        /// Virtual GPUs
        pub vgpus: BTreeSet<VgpuRef> = "VGPUs",
        /// Currently passed-through PCI devices
        pub attached_pcis: BTreeSet<PciRef> = "attached_PCIs",
        /// The SR on which a suspend image is stored
        pub suspend_sr: SrRef = "suspend_SR",
        /// The number of times this VM has been recovered
        pub version: i64,
        /// Generation ID of the VM
        pub generation_id: String,
        /// The host virtual hardware platform version the VM can run on
        pub hardware_platform_version: i64,
        /// When an HVM guest starts, this controls the presence of the emulated
        /// C000 PCI device which triggers Windows Update to fetch or update PV
        /// drivers.
        pub has_vendor_device: bool,
        /// Indicates whether a VM requires a reboot in order to update its
        /// configuration, e.g. its memory allocation.
        pub requires_reboot: bool,
        /// Textual reference to the template used to create a VM.
        pub reference_label: String,
        /// The type of domain that will be created when the VM is started
        pub domain_type: DomainType,
        /// initial value for guest NVRAM (containing UEFI variables, etc).
        pub nvram: BTreeMap<String, String> = "NVRAM",
        /// The set of pending mandatory guidances after applying updates, which
        /// must be applied, as otherwise there may be e.g. VM failures
        pub pending_guidances: BTreeSet<UpdateGuidances>,
        /// The set of pending recommended guidances after applying updates,
        /// which most users should follow to make the updates effective, but if
        /// not followed, will not cause a failure
        pub pending_guidances_recommended: BTreeSet<UpdateGuidances>,
        /// The set of pending full guidances after applying updates, which a
        /// user should follow to make some updates, e.g. specific hardware
        /// drivers or CPU features, fully effective, but the 'average user'
        /// doesn't need to
        pub pending_guidances_full: BTreeSet<UpdateGuidances>,
    }
}

rpc_class! {
    pub struct Vm = "VM";

    /// Return a map of VM references to VM records for all VMs known to the
    /// system.
    fn get_all_records() -> BTreeMap<VmRef, VmRecord>;
    /// Return a list of all the VMs known to the system.
    fn get_all() -> Vec<VmRef>;
    /// Restart device models of the VM
    task fn restart_device_models(this: &VmRef) -> ();
    /// Set the VM.HVM_boot_policy field of the given VM, which will take effect
    /// when it is next started
    fn set_hvm_boot_policy as set_HVM_boot_policy(
        this: &VmRef,
        value: &str,
    ) -> ();
    /// Set the VM.domain_type field of the given VM, which will take effect
    /// when it is next started
    fn set_domain_type(this: &VmRef, value: &DomainType) -> ();
    /// Sets the actions_after_crash parameter
    task fn set_actions_after_crash(
        this: &VmRef,
        value: &OnCrashBehaviour,
    ) -> ();
    /// Import an XVA from a URI
    task fn import(
        url: &str,
        sr: &SrRef,
        full_restore: bool,
        force: bool,
    ) -> Vec<VmRef>;
    /// Controls whether, when the VM starts in HVM mode, its virtual hardware
    /// will include the emulated PCI device for which drivers may be available
    /// through Windows Update.
    task fn set_has_vendor_device(this: &VmRef, value: bool) -> ();
    /// Call an API plugin on this vm
    task fn call_plugin(
        vm: &VmRef,
        plugin: &str,
        function: &str = "fn",
        args: &BTreeMap<String, String>,
    ) -> String;
    /// Query the system services advertised by this VM and register them.
    task fn query_services(this: &VmRef) -> BTreeMap<String, String>;
    /// Assign this VM to an appliance.
    task fn set_appliance(this: &VmRef, value: &VmApplianceRef) -> ();
    /// Import using a conversion service.
    task fn import_convert(
        kind: &str = "type",
        username: &str,
        password: &str,
        sr: &SrRef,
        remote_config: &BTreeMap<String, String>,
    ) -> ();
    /// Recover the VM
    task fn recover(this: &VmRef, session_to: &SessionRef, force: bool) -> ();
    /// List all the SR's that are required for the VM to be recovered
    task fn get_srs_required_for_recovery as get_SRs_required_for_recovery(
        this: &VmRef,
        session_to: &SessionRef,
    ) -> Vec<SrRef>;
    /// Assert whether all SRs required to recover this VM are available.
    task fn assert_can_be_recovered(
        this: &VmRef,
        session_to: &SessionRef,
    ) -> ();
    /// Set this VM's suspend VDI, which must be indentical to its current one
    task fn set_suspend_vdi as set_suspend_VDI(
        this: &VmRef,
        value: &VdiRef,
    ) -> ();
    /// Set this VM's boot order
    task fn set_order(this: &VmRef, value: i64) -> ();
    /// Set this VM's shutdown delay in seconds
    task fn set_shutdown_delay(this: &VmRef, value: i64) -> ();
    /// Set this VM's start delay in seconds
    task fn set_start_delay(this: &VmRef, value: i64) -> ();
    /// Set the value of the snapshot schedule field
    fn set_snapshot_schedule(this: &VmRef, value: &VmssRef) -> ();
    /// Set the value of the protection_policy field
    fn set_protection_policy(this: &VmRef, value: &VmppRef) -> ();
    /// Copy the BIOS strings from the given host to this VM
    task fn copy_bios_strings(vm: &VmRef, host: &HostRef) -> ();
    /// Set custom BIOS strings to this VM.
    task fn set_bios_strings(
        this: &VmRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Returns mapping of hosts to ratings, indicating the suitability of
    /// starting the VM at that location according to wlb.
    task fn retrieve_wlb_recommendations(
        vm: &VmRef,
    ) -> BTreeMap<HostRef, Vec<String>>;
    /// Returns an error if the VM is not considered agile e.g. because it is
    /// tied to a resource local to a host
    task fn assert_agile(this: &VmRef) -> ();
    /// Create a placeholder for a named binary blob of data that is associated
    /// with this VM
    task fn create_new_blob(
        vm: &VmRef,
        name: &str,
        mime_type: &str,
        public: bool,
    ) -> BlobRef;
    /// Returns an error if the VM could not boot on this host for some reason
    task fn assert_can_boot_here(this: &VmRef, host: &HostRef) -> ();
    /// Return the list of hosts on which this VM may run.
    task fn get_possible_hosts(vm: &VmRef) -> Vec<HostRef>;
    /// Returns a list of the allowed values that a VIF device field can take
    fn get_allowed_vif_devices as get_allowed_VIF_devices(
        vm: &VmRef,
    ) -> Vec<String>;
    /// Returns a list of the allowed values that a VBD device field can take
    fn get_allowed_vbd_devices as get_allowed_VBD_devices(
        vm: &VmRef,
    ) -> Vec<String>;
    /// Recomputes the list of acceptable operations
    task fn update_allowed_operations(this: &VmRef) -> ();
    /// Check to see whether this operation is acceptable in the current state
    /// of the system, raising an error if the operation is invalid for some
    /// reason
    task fn assert_operation_valid(this: &VmRef, op: &VmOperations) -> ();
    /// Forget the recorded statistics related to the specified data source
    fn forget_data_source_archives(this: &VmRef, data_source: &str) -> ();
    /// Query the latest value of the specified data source
    fn query_data_source(this: &VmRef, data_source: &str) -> f64;
    /// Start recording the specified data source
    fn record_data_source(this: &VmRef, data_source: &str) -> ();
    /// Returns a record describing the VM's dynamic state, initialised when the
    /// VM boots and updated to reflect runtime configuration changes e.g. CPU
    /// hotplug
    fn get_boot_record(this: &VmRef) -> VmRecord;
    /// Assert whether a VM can be migrated to the specified destination.
    task fn assert_can_migrate(
        vm: &VmRef,
        dest: &BTreeMap<String, String>,
        live: bool,
        vdi_map: &BTreeMap<VdiRef, SrRef>,
        vif_map: &BTreeMap<VifRef, NetworkRef>,
        options: &BTreeMap<String, String>,
        vgpu_map: &BTreeMap<VgpuRef, GpuGroupRef>,
    ) -> ();
    /// Migrate the VM to another host.
    task fn migrate_send(
        vm: &VmRef,
        dest: &BTreeMap<String, String>,
        live: bool,
        vdi_map: &BTreeMap<VdiRef, SrRef>,
        vif_map: &BTreeMap<VifRef, NetworkRef>,
        options: &BTreeMap<String, String>,
        vgpu_map: &BTreeMap<VgpuRef, GpuGroupRef>,
    ) -> VmRef;
    /// Returns the maximum amount of guest memory which will fit, together with
    /// overheads, in the supplied amount of physical memory.
    task fn maximise_memory(this: &VmRef, total: i64, approximate: bool) -> i64;
    /// Send the named trigger to this VM.
    task fn send_trigger(vm: &VmRef, trigger: &str) -> ();
    /// Send the given key as a sysrq to this VM.
    task fn send_sysrq(vm: &VmRef, key: &str) -> ();
    /// Set the number of startup VCPUs for a halted VM
    fn set_vcpus_at_startup as set_VCPUs_at_startup(
        this: &VmRef,
        value: i64,
    ) -> ();
    /// Set the maximum number of VCPUs for a halted VM
    fn set_vcpus_max as set_VCPUs_max(this: &VmRef, value: i64) -> ();
    /// Set the shadow memory multiplier on a running VM
    task fn set_shadow_multiplier_live(this: &VmRef, multiplier: f64) -> ();
    /// Set the shadow memory multiplier on a halted VM
    fn set_hvm_shadow_multiplier as set_HVM_shadow_multiplier(
        this: &VmRef,
        value: f64,
    ) -> ();
    /// Return true if the VM is currently 'co-operative' i.e. is expected to
    /// reach a balloon target and actually has done
    task fn get_cooperative(this: &VmRef) -> bool;
    /// Wait for a running VM to reach its current memory target
    task fn wait_memory_target_live(this: &VmRef) -> ();
    /// Set the memory target for a running VM
    task fn set_memory_target_live(this: &VmRef, target: i64) -> ();
    /// Set the memory allocation of this VM.
    task fn set_memory(this: &VmRef, value: i64) -> ();
    /// Set the memory limits of this VM.
    task fn set_memory_limits(
        this: &VmRef,
        static_min: i64,
        static_max: i64,
        dynamic_min: i64,
        dynamic_max: i64,
    ) -> ();
    /// Set the static (ie boot-time) range of virtual memory that the VM is
    /// allowed to use.
    task fn set_memory_static_range(this: &VmRef, min: i64, max: i64) -> ();
    /// Set the value of the memory_static_min field
    fn set_memory_static_min(this: &VmRef, value: i64) -> ();
    /// Set the value of the memory_static_max field
    fn set_memory_static_max(this: &VmRef, value: i64) -> ();
    /// Set the minimum and maximum amounts of physical memory the VM is allowed
    /// to use.
    task fn set_memory_dynamic_range(this: &VmRef, min: i64, max: i64) -> ();
    /// Set the value of the memory_dynamic_min field
    fn set_memory_dynamic_min(this: &VmRef, value: i64) -> ();
    /// Set the value of the memory_dynamic_max field
    fn set_memory_dynamic_max(this: &VmRef, value: i64) -> ();
    /// Computes the virtualization memory overhead of a VM.
    task fn compute_memory_overhead(vm: &VmRef) -> i64;
    /// Set the value of the ha_always_run
    fn set_ha_always_run(this: &VmRef, value: bool) -> ();
    /// Set the value of the ha_restart_priority field
    fn set_ha_restart_priority(this: &VmRef, value: &str) -> ();
    fn remove_from_nvram as remove_from_NVRAM(this: &VmRef, key: &str) -> ();
    fn add_to_nvram as add_to_NVRAM(this: &VmRef, key: &str, value: &str) -> ();
    fn set_nvram as set_NVRAM(
        this: &VmRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Add the given key-value pair to VM.VCPUs_params, and apply that value on
    /// the running VM
    task fn add_to_vcpus_params_live as add_to_VCPUs_params_live(
        this: &VmRef,
        key: &str,
        value: &str,
    ) -> ();
    /// Set the number of VCPUs for a running VM
    task fn set_vcpus_number_live as set_VCPUs_number_live(
        this: &VmRef,
        nvcpu: i64,
    ) -> ();
    /// Migrate a VM to another Host.
    task fn pool_migrate(
        vm: &VmRef,
        host: &HostRef,
        options: &BTreeMap<String, String>,
    ) -> ();
    /// Awaken the specified VM and resume it on a particular Host.
    task fn resume_on(
        vm: &VmRef,
        host: &HostRef,
        start_paused: bool,
        force: bool,
    ) -> ();
    /// Awaken the specified VM and resume it.
    task fn resume(vm: &VmRef, start_paused: bool, force: bool) -> ();
    /// Suspend the specified VM to disk.
    task fn suspend(vm: &VmRef) -> ();
    /// Stop executing the specified VM without attempting a clean shutdown and
    /// immediately restart the VM.
    task fn hard_reboot(vm: &VmRef) -> ();
    /// Reset the power-state of the VM to halted in the database only.
    task fn power_state_reset(vm: &VmRef) -> ();
    /// Stop executing the specified VM without attempting a clean shutdown.
    task fn hard_shutdown(vm: &VmRef) -> ();
    /// Attempt to cleanly shutdown the specified VM (Note: this may not be
    /// supported---e.g. if a guest agent is not installed).
    task fn clean_reboot(vm: &VmRef) -> ();
    /// Attempts to first clean shutdown a VM and if it should fail then perform
    /// a hard shutdown on it.
    task fn shutdown(vm: &VmRef) -> ();
    /// Attempt to cleanly shutdown the specified VM.
    task fn clean_shutdown(vm: &VmRef) -> ();
    /// Resume the specified VM.
    task fn unpause(vm: &VmRef) -> ();
    /// Pause the specified VM.
    task fn pause(vm: &VmRef) -> ();
    /// Start the specified VM on a particular host.
    task fn start_on(
        vm: &VmRef,
        host: &HostRef,
        start_paused: bool,
        force: bool,
    ) -> ();
    /// Start the specified VM.
    task fn start(vm: &VmRef, start_paused: bool, force: bool) -> ();
    /// Inspects the disk configuration contained within the VM's other_config,
    /// creates VDIs and VBDs and then executes any applicable post-install
    /// script.
    task fn provision(vm: &VmRef) -> ();
    /// Checkpoints the specified VM, making a new VM.
    task fn checkpoint(vm: &VmRef, new_name: &str) -> VmRef;
    /// Reverts the specified VM to a previous state.
    task fn revert(snapshot: &VmRef) -> ();
    /// Copied the specified VM, making a new VM.
    task fn copy(vm: &VmRef, new_name: &str, sr: &SrRef) -> VmRef;
    /// Clones the specified VM, making a new VM.
    task fn clone(vm: &VmRef, new_name: &str) -> VmRef;
    /// Snapshots the specified VM with quiesce, making a new VM.
    task fn snapshot_with_quiesce(vm: &VmRef, new_name: &str) -> VmRef;
    /// Snapshots the specified VM, making a new VM.
    task fn snapshot(
        vm: &VmRef,
        new_name: &str,
        ignore_vdis: &[VdiRef],
    ) -> VmRef;
    /// Snapshots the specified VM without excluding any disks, as servers
    /// older than `ignore_vdis` expect.
    task fn snapshot3 as snapshot(vm: &VmRef, new_name: &str) -> VmRef;
    fn set_hardware_platform_version(this: &VmRef, value: i64) -> ();
    fn set_suspend_sr as set_suspend_SR(this: &VmRef, value: &SrRef) -> ();
    /// Remove the given key and its corresponding value from the
    /// blocked_operations field of the given VM.
    fn remove_from_blocked_operations(this: &VmRef, key: &VmOperations) -> ();
    /// Add the given key-value pair to the blocked_operations field of the
    /// given VM.
    fn add_to_blocked_operations(
        this: &VmRef,
        key: &VmOperations,
        value: &str,
    ) -> ();
    fn set_blocked_operations(
        this: &VmRef,
        value: &BTreeMap<VmOperations, String>,
    ) -> ();
    /// Remove the given value from the tags field of the given VM.
    fn remove_tags(this: &VmRef, value: &str) -> ();
    /// Add the given value to the tags field of the given VM.
    fn add_tags(this: &VmRef, value: &str) -> ();
    fn set_tags(this: &VmRef, value: &[String]) -> ();
    /// Remove the given key and its corresponding value from the xenstore_data
    /// field of the given VM.
    fn remove_from_xenstore_data(this: &VmRef, key: &str) -> ();
    /// Add the given key-value pair to the xenstore_data field of the given VM.
    fn add_to_xenstore_data(this: &VmRef, key: &str, value: &str) -> ();
    fn set_xenstore_data(this: &VmRef, value: &BTreeMap<String, String>) -> ();
    fn set_recommendations(this: &VmRef, value: &str) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given VM.
    fn remove_from_other_config(this: &VmRef, key: &str) -> ();
    /// Add the given key-value pair to the other_config field of the given VM.
    fn add_to_other_config(this: &VmRef, key: &str, value: &str) -> ();
    fn set_other_config(this: &VmRef, value: &BTreeMap<String, String>) -> ();
    fn set_pci_bus as set_PCI_bus(this: &VmRef, value: &str) -> ();
    /// Remove the given key and its corresponding value from the platform field
    /// of the given VM.
    fn remove_from_platform(this: &VmRef, key: &str) -> ();
    /// Add the given key-value pair to the platform field of the given VM.
    fn add_to_platform(this: &VmRef, key: &str, value: &str) -> ();
    fn set_platform(this: &VmRef, value: &BTreeMap<String, String>) -> ();
    /// Remove the given key and its corresponding value from the
    /// HVM/boot_params field of the given VM.
    fn remove_from_hvm_boot_params as remove_from_HVM_boot_params(
        this: &VmRef,
        key: &str,
    ) -> ();
    /// Add the given key-value pair to the HVM/boot_params field of the given
    /// VM.
    fn add_to_hvm_boot_params as add_to_HVM_boot_params(
        this: &VmRef,
        key: &str,
        value: &str,
    ) -> ();
    fn set_hvm_boot_params as set_HVM_boot_params(
        this: &VmRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    fn set_pv_legacy_args as set_PV_legacy_args(
        this: &VmRef,
        value: &str,
    ) -> ();
    fn set_pv_bootloader_args as set_PV_bootloader_args(
        this: &VmRef,
        value: &str,
    ) -> ();
    fn set_pv_args as set_PV_args(this: &VmRef, value: &str) -> ();
    fn set_pv_ramdisk as set_PV_ramdisk(this: &VmRef, value: &str) -> ();
    fn set_pv_kernel as set_PV_kernel(this: &VmRef, value: &str) -> ();
    fn set_pv_bootloader as set_PV_bootloader(this: &VmRef, value: &str) -> ();
    fn set_actions_after_reboot(this: &VmRef, value: &OnNormalExit) -> ();
    fn set_actions_after_shutdown(this: &VmRef, value: &OnNormalExit) -> ();
    fn set_actions_after_softreboot(
        this: &VmRef,
        value: &OnSoftrebootBehavior,
    ) -> ();
    /// Remove the given key and its corresponding value from the VCPUs/params
    /// field of the given VM.
    fn remove_from_vcpus_params as remove_from_VCPUs_params(
        this: &VmRef,
        key: &str,
    ) -> ();
    /// Add the given key-value pair to the VCPUs/params field of the given VM.
    fn add_to_vcpus_params as add_to_VCPUs_params(
        this: &VmRef,
        key: &str,
        value: &str,
    ) -> ();
    fn set_vcpus_params as set_VCPUs_params(
        this: &VmRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    fn set_affinity(this: &VmRef, value: &HostRef) -> ();
    fn set_is_a_template(this: &VmRef, value: bool) -> ();
    fn set_user_version(this: &VmRef, value: i64) -> ();
    fn set_name_description(this: &VmRef, value: &str) -> ();
    fn set_name_label(this: &VmRef, value: &str) -> ();
    fn get_pending_guidances_full(this: &VmRef) -> BTreeSet<UpdateGuidances>;
    fn get_pending_guidances_recommended(this: &VmRef)
        -> BTreeSet<UpdateGuidances>;
    fn get_pending_guidances(this: &VmRef) -> BTreeSet<UpdateGuidances>;
    fn get_nvram as get_NVRAM(this: &VmRef) -> BTreeMap<String, String>;
    fn get_domain_type(this: &VmRef) -> DomainType;
    fn get_reference_label(this: &VmRef) -> String;
    fn get_requires_reboot(this: &VmRef) -> bool;
    fn get_has_vendor_device(this: &VmRef) -> bool;
    fn get_hardware_platform_version(this: &VmRef) -> i64;
    fn get_generation_id(this: &VmRef) -> String;
    fn get_version(this: &VmRef) -> i64;
    fn get_suspend_sr as get_suspend_SR(this: &VmRef) -> SrRef;
    fn get_attached_pcis as get_attached_PCIs(this: &VmRef) -> Vec<PciRef>;
    fn get_vgpus as get_VGPUs(this: &VmRef) -> Vec<VgpuRef>;
    fn get_order(this: &VmRef) -> i64;
    fn get_shutdown_delay(this: &VmRef) -> i64;
    fn get_start_delay(this: &VmRef) -> i64;
    fn get_appliance(this: &VmRef) -> VmApplianceRef;
    fn get_is_vmss_snapshot(this: &VmRef) -> bool;
    fn get_snapshot_schedule(this: &VmRef) -> VmssRef;
    fn get_is_snapshot_from_vmpp(this: &VmRef) -> bool;
    fn get_protection_policy(this: &VmRef) -> VmppRef;
    fn get_bios_strings(this: &VmRef) -> BTreeMap<String, String>;
    fn get_children(this: &VmRef) -> BTreeSet<VmRef>;
    fn get_parent(this: &VmRef) -> VmRef;
    fn get_snapshot_metadata(this: &VmRef) -> String;
    fn get_snapshot_info(this: &VmRef) -> BTreeMap<String, String>;
    fn get_blocked_operations(this: &VmRef) -> BTreeMap<VmOperations, String>;
    fn get_tags(this: &VmRef) -> BTreeSet<String>;
    fn get_blobs(this: &VmRef) -> BTreeMap<String, BlobRef>;
    fn get_transportable_snapshot_id(this: &VmRef) -> String;
    fn get_snapshot_time(this: &VmRef) -> Timestamp;
    fn get_snapshots(this: &VmRef) -> BTreeSet<VmRef>;
    fn get_snapshot_of(this: &VmRef) -> VmRef;
    fn get_is_a_snapshot(this: &VmRef) -> bool;
    fn get_ha_restart_priority(this: &VmRef) -> String;
    fn get_ha_always_run(this: &VmRef) -> bool;
    fn get_xenstore_data(this: &VmRef) -> BTreeMap<String, String>;
    fn get_recommendations(this: &VmRef) -> String;
    fn get_last_booted_record(this: &VmRef) -> String;
    fn get_guest_metrics(this: &VmRef) -> VmGuestMetricsRef;
    fn get_metrics(this: &VmRef) -> VmMetricsRef;
    fn get_is_control_domain(this: &VmRef) -> bool;
    fn get_last_boot_cpu_flags as get_last_boot_CPU_flags(
        this: &VmRef,
    ) -> BTreeMap<String, String>;
    fn get_domarch(this: &VmRef) -> String;
    fn get_domid(this: &VmRef) -> i64;
    fn get_other_config(this: &VmRef) -> BTreeMap<String, String>;
    fn get_pci_bus as get_PCI_bus(this: &VmRef) -> String;
    fn get_platform(this: &VmRef) -> BTreeMap<String, String>;
    fn get_hvm_shadow_multiplier as get_HVM_shadow_multiplier(
        this: &VmRef,
    ) -> f64;
    fn get_hvm_boot_params as get_HVM_boot_params(
        this: &VmRef,
    ) -> BTreeMap<String, String>;
    fn get_hvm_boot_policy as get_HVM_boot_policy(this: &VmRef) -> String;
    fn get_pv_legacy_args as get_PV_legacy_args(this: &VmRef) -> String;
    fn get_pv_bootloader_args as get_PV_bootloader_args(this: &VmRef) -> String;
    fn get_pv_args as get_PV_args(this: &VmRef) -> String;
    fn get_pv_ramdisk as get_PV_ramdisk(this: &VmRef) -> String;
    fn get_pv_kernel as get_PV_kernel(this: &VmRef) -> String;
    fn get_pv_bootloader as get_PV_bootloader(this: &VmRef) -> String;
    fn get_vtpms as get_VTPMs(this: &VmRef) -> Vec<VtpmRef>;
    fn get_crash_dumps(this: &VmRef) -> BTreeSet<CrashdumpRef>;
    fn get_vusbs as get_VUSBs(this: &VmRef) -> Vec<VusbRef>;
    fn get_vbds as get_VBDs(this: &VmRef) -> Vec<VbdRef>;
    fn get_vifs as get_VIFs(this: &VmRef) -> Vec<VifRef>;
    fn get_consoles(this: &VmRef) -> BTreeSet<ConsoleRef>;
    fn get_actions_after_crash(this: &VmRef) -> OnCrashBehaviour;
    fn get_actions_after_reboot(this: &VmRef) -> OnNormalExit;
    fn get_actions_after_shutdown(this: &VmRef) -> OnNormalExit;
    fn get_actions_after_softreboot(this: &VmRef) -> OnSoftrebootBehavior;
    fn get_vcpus_at_startup as get_VCPUs_at_startup(this: &VmRef) -> i64;
    fn get_vcpus_max as get_VCPUs_max(this: &VmRef) -> i64;
    fn get_vcpus_params as get_VCPUs_params(
        this: &VmRef,
    ) -> BTreeMap<String, String>;
    fn get_memory_static_min(this: &VmRef) -> i64;
    fn get_memory_dynamic_min(this: &VmRef) -> i64;
    fn get_memory_dynamic_max(this: &VmRef) -> i64;
    fn get_memory_static_max(this: &VmRef) -> i64;
    fn get_memory_target(this: &VmRef) -> i64;
    fn get_memory_overhead(this: &VmRef) -> i64;
    fn get_affinity(this: &VmRef) -> HostRef;
    fn get_scheduled_to_be_resident_on(this: &VmRef) -> HostRef;
    fn get_resident_on(this: &VmRef) -> HostRef;
    fn get_suspend_vdi as get_suspend_VDI(this: &VmRef) -> VdiRef;
    fn get_is_default_template(this: &VmRef) -> bool;
    fn get_is_a_template(this: &VmRef) -> bool;
    fn get_user_version(this: &VmRef) -> i64;
    fn get_power_state(this: &VmRef) -> VmPowerState;
    fn get_name_description(this: &VmRef) -> String;
    fn get_name_label(this: &VmRef) -> String;
    fn get_current_operations(this: &VmRef) -> BTreeMap<String, VmOperations>;
    fn get_allowed_operations(this: &VmRef) -> BTreeSet<VmOperations>;
    fn get_uuid(this: &VmRef) -> String;
    fn get_by_name_label(label: &str) -> Vec<VmRef>;
    /// Destroy the specified VM.
    task fn destroy(this: &VmRef) -> ();
    /// NOT RECOMMENDED! VM.clone or VM.copy (or VM.import) is a better choice
    /// in almost all situations.
    task fn create(args: &VmRecord) -> VmRef;
    fn get_by_uuid(uuid: &str) -> VmRef;
    /// Get a record containing the current state of the given VM.
    fn get_record(this: &VmRef) -> VmRecord;
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::codec::Codec;
    use crate::config::ClientOpts;
    use crate::endpoint::Endpoint;
    use crate::error::{CodecErrorKind, Error};
    use crate::session::Session;
    use crate::transport::MockTransport;
    use crate::value::Value;

    async fn logged_in(mock: &MockTransport) -> Session {
        let session = Session::with_transport(
            Arc::new(mock.clone()),
            ClientOpts::new(Endpoint::https("hostA.example")),
        );
        session.login_with_password("root", "pw", "1.0", "test").await.unwrap();
        session
    }

    fn record(members: Vec<(&str, Value)>) -> Value {
        members.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[tokio::test]
    async fn record_decoding() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "VM.get_record" => Ok(record(vec![
                ("uuid", "0d1b-77".into()),
                ("power_state", "Running".into()),
                ("memory_static_max", "17179869184".into()),
                ("VCPUs_max", Value::Int(4)),
                ("is_a_template", false.into()),
                ("resident_on", "OpaqueRef:host1".into()),
                ("VBDs", Value::from(vec!["OpaqueRef:vbd1", "OpaqueRef:vbd2"])),
                ("domain_type", "pv_in_pvh_2".into()),
                ("field_from_the_future", "ignored".into()),
            ])),
            other => panic!("unexpected call {other}"),
        });
        let session = logged_in(&mock).await;
        let vm = VmRef::from("OpaqueRef:vm1");

        let rec = Vm::get_record(&session, &vm).await.unwrap();
        assert_eq!(rec.uuid, "0d1b-77");
        assert_eq!(rec.power_state, VmPowerState::Running);
        assert_eq!(rec.memory_static_max, 17_179_869_184);
        assert_eq!(rec.vcpus_max, 4);
        assert_eq!(rec.resident_on, HostRef::from("OpaqueRef:host1"));
        assert_eq!(rec.vbds.len(), 2);
        assert_eq!(
            rec.domain_type,
            DomainType::Unknown("pv_in_pvh_2".to_string())
        );
        // Absent members take their zero value.
        assert!(rec.affinity.is_null());
        assert!(rec.other_config.is_empty());
        assert!(rec.actions_after_crash.is_unknown());
    }

    #[test]
    fn set_fields_hold_each_member_once() {
        let wire = record(vec![
            (
                "allowed_operations",
                Value::from(vec!["start", "clean_shutdown", "start"]),
            ),
            ("tags", Value::from(vec!["prod", "db", "prod"])),
        ]);
        let rec = VmRecord::decode("VM.get_record -> ", &wire).unwrap();
        assert_eq!(
            rec.allowed_operations,
            BTreeSet::from([VmOperations::Start, VmOperations::CleanShutdown])
        );
        assert_eq!(rec.tags.len(), 2);
        assert!(rec.tags.contains("db"));

        let back = rec.encode("VM.create(args)").unwrap();
        let tags = &back.as_struct().unwrap()["tags"];
        assert_eq!(tags, &Value::from(vec!["db", "prod"]));
    }

    #[tokio::test]
    async fn codec_errors_name_the_offending_field() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            _ => Ok(record(vec![("memory_static_max", "lots".into())])),
        });
        let session = logged_in(&mock).await;
        let err = Vm::get_record(&session, &VmRef::from("OpaqueRef:vm1"))
            .await
            .unwrap_err();
        match err {
            Error::Codec(e) => {
                assert_eq!(
                    e.label,
                    "VM.get_record -> VMRecord.memory_static_max"
                );
                assert!(matches!(e.kind, CodecErrorKind::InvalidInteger(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn facades_use_wire_names() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "VM.snapshot" | "Async.VM.snapshot" => Ok("OpaqueRef:new".into()),
            _ => Ok(Value::Nil),
        });
        let session = logged_in(&mock).await;
        let vm = VmRef::from("OpaqueRef:vm1");

        Vm::set_vcpus_max(&session, &vm, 8).await.unwrap();
        Vm::snapshot(&session, &vm, "before-upgrade", &[]).await.unwrap();
        Vm::snapshot3(&session, &vm, "before-upgrade").await.unwrap();
        Vm::async_snapshot3(&session, &vm, "nightly").await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[1].method, "VM.set_VCPUs_max");
        assert_eq!(
            calls[1].params,
            vec![
                Value::from("OpaqueRef:s"),
                Value::from("OpaqueRef:vm1"),
                Value::from("8"),
            ]
        );
        assert_eq!(calls[2].method, "VM.snapshot");
        assert_eq!(calls[2].params.len(), 4);
        assert_eq!(calls[2].params[3], Value::Array(Vec::new()));
        assert_eq!(calls[3].method, "VM.snapshot");
        assert_eq!(calls[3].params.len(), 3);
        assert_eq!(calls[4].method, "Async.VM.snapshot");
    }

    #[tokio::test]
    async fn arguments_are_checked_before_sending() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            other => panic!("unexpected call {other}"),
        });
        let session = logged_in(&mock).await;
        let err = Vm::set_hvm_shadow_multiplier(
            &session,
            &VmRef::from("OpaqueRef:vm1"),
            f64::NAN,
        )
        .await
        .unwrap_err();
        match err {
            Error::Codec(e) => {
                assert_eq!(e.label, "VM.set_HVM_shadow_multiplier(value)")
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(mock.call_count(), 1);
    }

    proptest::proptest! {
        #[test]
        fn unknown_power_states_survive_a_round_trip(label in ".*") {
            proptest::prop_assume!(!VmPowerState::LABELS.contains(&&*label));
            let wire = Value::from(label.as_str());
            let state = VmPowerState::decode("VMRecord.power_state", &wire)
                .unwrap();
            proptest::prop_assert_eq!(&state, &VmPowerState::Unknown(label));
            proptest::prop_assert_eq!(state.encode("x").unwrap(), wire);
        }

        #[test]
        fn known_power_states_decode(i in 0..VmPowerState::LABELS.len()) {
            let label = VmPowerState::LABELS[i];
            let state =
                VmPowerState::decode("x", &Value::from(label)).unwrap();
            proptest::prop_assert!(!state.is_unknown());
            proptest::prop_assert_eq!(state.as_str(), label);
        }
    }
}
