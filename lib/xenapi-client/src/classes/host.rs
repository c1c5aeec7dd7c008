// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical hosts.

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::Timestamp;
use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{
    BlobRef, CertificateRef, FeatureRef, HostCpuRef, HostCrashdumpRef,
    HostMetricsRef, HostPatchRef, HostRef, NetworkRef, PbdRef, PciRef, PgpuRef,
    PifRef, PoolUpdateRef, PusbRef, SrRef, VmRef,
};

define_enum! {
    pub enum HostAllowedOperations {
        /// Indicates this host is able to provision another VM
        Provision = "provision",
        /// Indicates this host is evacuating
        Evacuate = "evacuate",
        /// Indicates this host is in the process of shutting itself down
        Shutdown = "shutdown",
        /// Indicates this host is in the process of rebooting
        Reboot = "reboot",
        /// Indicates this host is in the process of being powered on
        PowerOn = "power_on",
        /// This host is starting a VM
        VMStart = "vm_start",
        /// This host is resuming a VM
        VMResume = "vm_resume",
        /// This host is the migration target of a VM
        VMMigrate = "vm_migrate",
        /// Indicates this host is being updated
        ApplyUpdates = "apply_updates",
        /// Indicates this host is in the process of enabling
        Enable = "enable",
    }
}

define_enum! {
    /// State of a host's physical console output.
    pub enum HostDisplay {
        /// This host is outputting its console to a physical display device
        Enabled = "enabled",
        /// The host will stop outputting its console to a physical display
        /// device on next boot
        DisableOnReboot = "disable_on_reboot",
        /// This host is not outputting its console to a physical display device
        Disabled = "disabled",
        /// The host will start outputting its console to a physical display
        /// device on next boot
        EnableOnReboot = "enable_on_reboot",
    }
}

define_enum! {
    /// NUMA placement policy for guests on a host.
    pub enum HostNumaAffinityPolicy {
        /// VMs are spread across all available NUMA nodes
        Any = "any",
        /// VMs are placed on the smallest number of NUMA nodes that they fit
        /// using soft-pinning, but the policy doesn't guarantee a balanced
        /// placement, falling back to the 'any' policy.
        BestEffort = "best_effort",
        /// Use the NUMA affinity policy that is the default for the current
        /// version
        DefaultPolicy = "default_policy",
    }
}

define_enum! {
    /// Scheduling granularity of the hypervisor.
    pub enum HostSchedGran {
        /// core scheduling
        Core = "core",
        /// CPU scheduling
        CPU = "cpu",
        /// socket scheduling
        Socket = "socket",
    }
}

define_enum! {
    /// Whether a host runs the latest updates synced from the remote CDN.
    pub enum LatestSyncedUpdatesAppliedState {
        /// The host is up to date with the latest updates synced from remote
        /// CDN
        Yes = "yes",
        /// The host is outdated with the latest updates synced from remote CDN
        No = "no",
        /// If the host is up to date with the latest updates synced from remote
        /// CDN is unknown
        Unspecified = "unknown",
    }
}

define_enum! {
    /// Actions an administrator should take after applying updates.
    pub enum UpdateGuidances {
        /// Indicates the updated host should reboot as soon as possible
        RebootHost = "reboot_host",
        /// Indicates the updated host should reboot as soon as possible since
        /// one or more livepatch(es) failed to be applied.
        RebootHostOnLivepatchFailure = "reboot_host_on_livepatch_failure",
        /// Indicates the updated host should reboot as soon as possible since
        /// one or more kernel livepatch(es) failed to be applied.
        RebootHostOnKernelLivepatchFailure =
            "reboot_host_on_kernel_livepatch_failure",
        /// Indicates the updated host should reboot as soon as possible since
        /// one or more xen livepatch(es) failed to be applied.
        RebootHostOnXenLivepatchFailure =
            "reboot_host_on_xen_livepatch_failure",
        /// Indicates the Toolstack running on the updated host should restart
        /// as soon as possible
        RestartToolstack = "restart_toolstack",
        /// Indicates the device model of a running VM should restart as soon as
        /// possible
        RestartDeviceModel = "restart_device_model",
        /// Indicates the VM should restart as soon as possible
        RestartVM = "restart_vm",
    }
}

define_record! {
    pub struct HostRecord = "host" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// a human-readable name
        pub name_label: String,
        /// a notes field containing human-readable description
        pub name_description: String,
        /// Virtualization memory overhead (bytes).
        pub memory_overhead: i64,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<HostAllowedOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, HostAllowedOperations>,
        /// major version number
        pub api_version_major: i64 = "API_version_major",
        /// minor version number
        pub api_version_minor: i64 = "API_version_minor",
        /// identification of vendor
        pub api_version_vendor: String = "API_version_vendor",
        /// details of vendor implementation
        pub api_version_vendor_implementation: BTreeMap<String, String> =
            "API_version_vendor_implementation",
        /// True if the host is currently enabled
        pub enabled: bool,
        /// version strings
        pub software_version: BTreeMap<String, String>,
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// Xen capabilities
        pub capabilities: BTreeSet<String>,
        /// The CPU configuration on this host.
        pub cpu_configuration: BTreeMap<String, String>,
        /// Scheduler policy currently in force on this host
        pub sched_policy: String,
        /// a list of the bootloaders installed on the machine
        pub supported_bootloaders: BTreeSet<String>,
        /// list of VMs currently resident on host
        pub resident_vms: BTreeSet<VmRef> = "resident_VMs",
        /// logging configuration
        pub logging: BTreeMap<String, String>,
        /// physical network interfaces
        pub pifs: BTreeSet<PifRef> = "PIFs",
        /// The SR in which VDIs for suspend images are created
        pub suspend_image_sr: SrRef,
        /// The SR in which VDIs for crash dumps are created
        pub crash_dump_sr: SrRef,
        /// Set of host crash dumps
        pub crashdumps: BTreeSet<HostCrashdumpRef>,
        /// Set of host patches
        pub patches: BTreeSet<HostPatchRef>,
        /// Set of updates
        pub updates: BTreeSet<PoolUpdateRef>,
        /// physical blockdevices
        pub pbds: BTreeSet<PbdRef> = "PBDs",
        /// The physical CPUs on this host
        pub host_cpus: BTreeSet<HostCpuRef> = "host_CPUs",
        /// Details about the physical CPUs on this host
        pub cpu_info: BTreeMap<String, String>,
        /// The hostname of this host
        pub hostname: String,
        /// The address by which this host can be contacted from any other host
        /// in the pool
        pub address: String,
        /// metrics associated with this host
        pub metrics: HostMetricsRef,
        /// State of the current license
        pub license_params: BTreeMap<String, String>,
        /// The set of statefiles accessible from this host
        pub ha_statefiles: BTreeSet<String>,
        /// The set of hosts visible via the network from this host
        pub ha_network_peers: BTreeSet<String>,
        /// Binary blobs associated with this host
        pub blobs: BTreeMap<String, BlobRef>,
        /// user-specified tags for categorization purposes
        pub tags: BTreeSet<String>,
        /// type of external authentication service configured; empty if none
        /// configured.
        pub external_auth_type: String,
        /// name of external authentication service configured; empty if none
        /// configured.
        pub external_auth_service_name: String,
        /// configuration specific to external authentication service
        pub external_auth_configuration: BTreeMap<String, String>,
        /// Product edition
        pub edition: String,
        /// Contact information of the license server
        pub license_server: BTreeMap<String, String>,
        /// BIOS strings
        pub bios_strings: BTreeMap<String, String>,
        /// The power on mode
        pub power_on_mode: String,
        /// The power on config
        pub power_on_config: BTreeMap<String, String>,
        /// The SR that is used as a local cache
        pub local_cache_sr: SrRef,
        /// Information about chipset features
        pub chipset_info: BTreeMap<String, String>,
        /// List of PCI devices in the host
        pub pcis: BTreeSet<PciRef> = "PCIs",
        /// List of physical GPUs in the host
        pub pgpus: BTreeSet<PgpuRef> = "PGPUs",
        /// List of physical USBs in the host
        pub pusbs: BTreeSet<PusbRef> = "PUSBs",
        /// Allow SSLv3 protocol and ciphersuites as used by older server
        /// versions.
        pub ssl_legacy: bool,
        /// VCPUs params to apply to all resident guests
        pub guest_vcpus_params: BTreeMap<String, String> = "guest_VCPUs_params",
        /// indicates whether the host is configured to output its console to a
        /// physical display device
        pub display: HostDisplay,
        /// The set of versions of the virtual hardware platform that the host
        /// can offer to its guests
        pub virtual_hardware_platform_versions: BTreeSet<i64>,
        /// The control domain (domain 0)
        pub control_domain: VmRef,
        /// List of updates which require reboot
        pub updates_requiring_reboot: BTreeSet<PoolUpdateRef>,
        /// List of features available on this host
        pub features: BTreeSet<FeatureRef>,
        /// The initiator IQN for the host
        pub iscsi_iqn: String,
        /// Specifies whether multipathing is enabled
        pub multipathing: bool,
        /// The UEFI certificates allowing Secure Boot
        pub uefi_certificates: String,
        /// List of certificates installed in the host
        pub certificates: BTreeSet<CertificateRef>,
        /// List of all available product editions
        pub editions: BTreeSet<String>,
        /// The set of pending mandatory guidances after applying updates, which
        /// must be applied, as otherwise there may be e.g. VM failures
        pub pending_guidances: BTreeSet<UpdateGuidances>,
        /// True if this host has TLS verifcation enabled
        pub tls_verification_enabled: bool,
        /// Date and time when the last software update was applied
        pub last_software_update: Timestamp,
        /// Reflects whether port 80 is open (false) or not (true)
        pub https_only: bool,
        /// Default as 'unknown', 'yes' if the host is up to date with updates
        /// synced from remote CDN, otherwise 'no'
        pub latest_synced_updates_applied: LatestSyncedUpdatesAppliedState,
        /// NUMA-aware VM memory and vCPU placement policy
        pub numa_affinity_policy: HostNumaAffinityPolicy,
        /// The set of pending recommended guidances after applying updates,
        /// which most users should follow to make the updates effective, but if
        /// not followed, will not cause a failure
        pub pending_guidances_recommended: BTreeSet<UpdateGuidances>,
        /// The set of pending full guidances after applying updates, which a
        /// user should follow to make some updates, e.g. specific hardware
        /// drivers or CPU features, fully effective, but the 'average user'
        /// doesn't need to
        pub pending_guidances_full: BTreeSet<UpdateGuidances>,
        /// The SHA256 checksum of updateinfo of the most recently applied
        /// update on the host
        pub last_update_hash: String,
    }
}

rpc_class! {
    pub struct Host = "host";

    /// Return a map of host references to host records for all hosts known to
    /// the system.
    fn get_all_records() -> BTreeMap<HostRef, HostRecord>;
    /// Return a list of all the hosts known to the system.
    fn get_all() -> Vec<HostRef>;
    /// Clear the pending mandatory guidance on this host
    fn emergency_clear_mandatory_guidance() -> ();
    /// apply all recommended guidances both on the host and on all HVM VMs on
    /// the host after updates are applied on the host
    task fn apply_recommended_guidances(this: &HostRef) -> ();
    /// updates the host firewall to open or close port 80 depending on the
    /// value
    task fn set_https_only(this: &HostRef, value: bool) -> ();
    /// apply updates from current enabled repository on a host
    task fn apply_updates(this: &HostRef, hash: &str) -> Vec<Vec<String>>;
    /// Reenable TLS verification for this host only
    fn emergency_reenable_tls_verification() -> ();
    /// Disable TLS verification for this host only
    fn emergency_disable_tls_verification() -> ();
    /// Set VM placement NUMA affinity policy
    task fn set_numa_affinity_policy(
        this: &HostRef,
        value: &HostNumaAffinityPolicy,
    ) -> ();
    /// Gets xen's sched-gran on a host
    task fn get_sched_gran(this: &HostRef) -> HostSchedGran;
    /// Sets xen's sched-gran on a host.
    task fn set_sched_gran(this: &HostRef, value: &HostSchedGran) -> ();
    /// Sets the UEFI certificates on a host
    task fn set_uefi_certificates(host: &HostRef, value: &str) -> ();
    /// Specifies whether multipathing is enabled
    task fn set_multipathing(host: &HostRef, value: bool) -> ();
    /// Sets the initiator IQN for the host
    task fn set_iscsi_iqn(host: &HostRef, value: &str) -> ();
    /// Enable/disable SSLv3 for interoperability with older server versions.
    task fn set_ssl_legacy(this: &HostRef, value: bool) -> ();
    /// Disable console output to the physical display device next time this
    /// host boots
    task fn disable_display(host: &HostRef) -> HostDisplay;
    /// Enable console output to the physical display device next time this host
    /// boots
    task fn enable_display(host: &HostRef) -> HostDisplay;
    /// Declare that a host is dead.
    task fn declare_dead(host: &HostRef) -> ();
    /// Prepare to receive a VM, returning a token which can be passed to
    /// VM.migrate.
    task fn migrate_receive(
        host: &HostRef,
        network: &NetworkRef,
        options: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String>;
    /// Disable the use of a local SR for caching purposes
    fn disable_local_storage_caching(host: &HostRef) -> ();
    /// Enable the use of a local SR for caching purposes
    fn enable_local_storage_caching(host: &HostRef, sr: &SrRef) -> ();
    /// Remove the feature mask, such that after a reboot all features of the
    /// CPU are enabled.
    fn reset_cpu_features(host: &HostRef) -> ();
    /// Set the CPU features to be used after a reboot, if the given features
    /// string is valid.
    fn set_cpu_features(host: &HostRef, features: &str) -> ();
    /// Set the power-on-mode, host, user and password
    task fn set_power_on_mode(
        this: &HostRef,
        power_on_mode: &str,
        power_on_config: &BTreeMap<String, String>,
    ) -> ();
    /// Refresh the list of installed Supplemental Packs.
    task fn refresh_pack_info(host: &HostRef) -> ();
    /// Change to another edition, or reactivate the current edition after a
    /// license has expired.
    fn apply_edition(host: &HostRef, edition: &str, force: bool) -> ();
    /// Delete the current TLS server certificate and replace by a new,
    /// self-signed one.
    task fn reset_server_certificate(host: &HostRef) -> ();
    /// Delete the current TLS server certificate and replace by a new,
    /// self-signed one.
    fn emergency_reset_server_certificate() -> ();
    /// Install the TLS server certificate.
    task fn install_server_certificate(
        host: &HostRef,
        certificate: &str,
        private_key: &str,
        certificate_chain: &str,
    ) -> ();
    /// Replace the internal self-signed host certficate with a new one.
    task fn refresh_server_certificate(host: &HostRef) -> ();
    /// Get the installed server public TLS certificate.
    task fn get_server_certificate(host: &HostRef) -> String;
    /// Retrieves recommended host migrations to perform when evacuating the
    /// host from the wlb server.
    task fn retrieve_wlb_evacuate_recommendations(
        this: &HostRef,
    ) -> BTreeMap<VmRef, Vec<String>>;
    /// This call disables external authentication on the local host
    fn disable_external_auth(
        host: &HostRef,
        config: &BTreeMap<String, String>,
    ) -> ();
    /// This call enables external authentication on a host
    fn enable_external_auth(
        host: &HostRef,
        config: &BTreeMap<String, String>,
        service_name: &str,
        auth_type: &str,
    ) -> ();
    /// This call queries the host's clock for the current time in the host's
    /// local timezone
    fn get_server_localtime(host: &HostRef) -> Timestamp;
    /// This call queries the host's clock for the current time
    fn get_servertime(host: &HostRef) -> Timestamp;
    /// Call an API extension on this host
    fn call_extension(host: &HostRef, call: &str) -> String;
    /// Return true if the extension is available on the host
    task fn has_extension(host: &HostRef, name: &str) -> bool;
    /// Call an API plugin on this host
    task fn call_plugin(
        host: &HostRef,
        plugin: &str,
        function: &str = "fn",
        args: &BTreeMap<String, String>,
    ) -> String;
    /// Create a placeholder for a named binary blob of data that is associated
    /// with this host
    task fn create_new_blob(
        host: &HostRef,
        name: &str,
        mime_type: &str,
        public: bool,
    ) -> BlobRef;
    /// This causes the RRDs to be backed up to the master
    fn backup_rrds(host: &HostRef, delay: f64) -> ();
    /// This causes the synchronisation of the non-database data (messages, RRDs
    /// and so on) stored on the master to be synchronised with the host
    fn sync_data(host: &HostRef) -> ();
    /// Computes the virtualization memory overhead of a host.
    task fn compute_memory_overhead(host: &HostRef) -> i64;
    /// Computes the amount of free memory on the host.
    task fn compute_free_memory(host: &HostRef) -> i64;
    /// Sets the host name to the specified string.
    fn set_hostname_live(host: &HostRef, hostname: &str) -> ();
    /// Shuts the agent down after a 10 second pause.
    fn shutdown_agent() -> ();
    /// Restarts the agent after a 10 second pause.
    task fn restart_agent(host: &HostRef) -> ();
    fn get_system_status_capabilities(host: &HostRef) -> String;
    /// Returns the management interface for the specified host
    task fn get_management_interface(host: &HostRef) -> PifRef;
    /// Disable the management network interface
    fn management_disable() -> ();
    /// Reconfigure the management network interface.
    fn local_management_reconfigure(interface: &str) -> ();
    /// Reconfigure the management network interface
    task fn management_reconfigure(pif: &PifRef) -> ();
    /// Re-configure syslog logging
    task fn syslog_reconfigure(host: &HostRef) -> ();
    /// Migrate all VMs off of this host, where possible.
    task fn evacuate(
        host: &HostRef,
        network: &NetworkRef,
        evacuate_batch_size: i64,
    ) -> ();
    /// Return a set of VMs which are not co-operating with the host's memory
    /// control system
    task fn get_uncooperative_resident_vms as get_uncooperative_resident_VMs(
        this: &HostRef,
    ) -> Vec<VmRef>;
    /// Return a set of VMs which prevent the host being evacuated, with per-VM
    /// error codes
    task fn get_vms_which_prevent_evacuation(
        this: &HostRef,
    ) -> BTreeMap<VmRef, Vec<String>>;
    /// Check this host can be evacuated.
    task fn assert_can_evacuate(host: &HostRef) -> ();
    /// Forget the recorded statistics related to the specified data source
    fn forget_data_source_archives(host: &HostRef, data_source: &str) -> ();
    /// Query the latest value of the specified data source
    fn query_data_source(host: &HostRef, data_source: &str) -> f64;
    /// Start recording the specified data source
    fn record_data_source(host: &HostRef, data_source: &str) -> ();
    /// This call disables HA on the local host.
    fn emergency_ha_disable(soft: bool) -> ();
    /// Attempt to power-on the host (if the capability exists).
    task fn power_on(host: &HostRef) -> ();
    /// Destroy specified host record in database
    task fn destroy(this: &HostRef) -> ();
    /// Remove any license file from the specified host, and switch that host to
    /// the unlicensed edition
    task fn license_remove(host: &HostRef) -> ();
    /// Apply a new license to a host
    task fn license_add(host: &HostRef, contents: &str) -> ();
    /// Apply a new license to a host
    task fn license_apply(host: &HostRef, contents: &str) -> ();
    /// List all supported methods
    fn list_methods() -> Vec<String>;
    /// Run xen-bugtool --yestoall and upload the output to support
    task fn bugreport_upload(
        host: &HostRef,
        url: &str,
        options: &BTreeMap<String, String>,
    ) -> ();
    /// Inject the given string as debugging keys into Xen
    task fn send_debug_keys(host: &HostRef, keys: &str) -> ();
    /// Get the host's log file
    task fn get_log(host: &HostRef) -> String;
    /// Get the host xen dmesg, and clear the buffer.
    task fn dmesg_clear(host: &HostRef) -> String;
    /// Get the host xen dmesg.
    task fn dmesg(host: &HostRef) -> String;
    /// Reboot the host.
    task fn reboot(host: &HostRef) -> ();
    /// Shutdown the host.
    task fn shutdown(host: &HostRef) -> ();
    /// Puts the host into a state in which new VMs can be started.
    task fn enable(host: &HostRef) -> ();
    /// Puts the host into a state in which no new VMs can be started.
    task fn disable(host: &HostRef) -> ();
    fn set_display(this: &HostRef, value: &HostDisplay) -> ();
    /// Remove the given key and its corresponding value from the
    /// guest_VCPUs_params field of the given host.
    fn remove_from_guest_vcpus_params as remove_from_guest_VCPUs_params(
        this: &HostRef,
        key: &str,
    ) -> ();
    /// Add the given key-value pair to the guest_VCPUs_params field of the
    /// given host.
    fn add_to_guest_vcpus_params as add_to_guest_VCPUs_params(
        this: &HostRef,
        key: &str,
        value: &str,
    ) -> ();
    fn set_guest_vcpus_params as set_guest_VCPUs_params(
        this: &HostRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Remove the given key and its corresponding value from the license_server
    /// field of the given host.
    fn remove_from_license_server(this: &HostRef, key: &str) -> ();
    /// Add the given key-value pair to the license_server field of the given
    /// host.
    fn add_to_license_server(this: &HostRef, key: &str, value: &str) -> ();
    fn set_license_server(
        this: &HostRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Remove the given value from the tags field of the given host.
    fn remove_tags(this: &HostRef, value: &str) -> ();
    /// Add the given value to the tags field of the given host.
    fn add_tags(this: &HostRef, value: &str) -> ();
    fn set_tags(this: &HostRef, value: &[String]) -> ();
    fn set_address(this: &HostRef, value: &str) -> ();
    fn set_hostname(this: &HostRef, value: &str) -> ();
    fn set_crash_dump_sr(this: &HostRef, value: &SrRef) -> ();
    fn set_suspend_image_sr(this: &HostRef, value: &SrRef) -> ();
    /// Remove the given key and its corresponding value from the logging field
    /// of the given host.
    fn remove_from_logging(this: &HostRef, key: &str) -> ();
    /// Add the given key-value pair to the logging field of the given host.
    fn add_to_logging(this: &HostRef, key: &str, value: &str) -> ();
    fn set_logging(this: &HostRef, value: &BTreeMap<String, String>) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given host.
    fn remove_from_other_config(this: &HostRef, key: &str) -> ();
    /// Add the given key-value pair to the other_config field of the given
    /// host.
    fn add_to_other_config(this: &HostRef, key: &str, value: &str) -> ();
    fn set_other_config(this: &HostRef, value: &BTreeMap<String, String>) -> ();
    fn set_name_description(this: &HostRef, value: &str) -> ();
    fn set_name_label(this: &HostRef, value: &str) -> ();
    fn get_last_update_hash(this: &HostRef) -> String;
    fn get_pending_guidances_full(this: &HostRef) -> BTreeSet<UpdateGuidances>;
    fn get_pending_guidances_recommended(
        this: &HostRef,
    ) -> Vec<UpdateGuidances>;
    fn get_numa_affinity_policy(this: &HostRef) -> HostNumaAffinityPolicy;
    fn get_latest_synced_updates_applied(
        this: &HostRef,
    ) -> LatestSyncedUpdatesAppliedState;
    fn get_https_only(this: &HostRef) -> bool;
    fn get_last_software_update(this: &HostRef) -> Timestamp;
    fn get_tls_verification_enabled(this: &HostRef) -> bool;
    fn get_pending_guidances(this: &HostRef) -> BTreeSet<UpdateGuidances>;
    fn get_editions(this: &HostRef) -> BTreeSet<String>;
    fn get_certificates(this: &HostRef) -> BTreeSet<CertificateRef>;
    fn get_uefi_certificates(this: &HostRef) -> String;
    fn get_multipathing(this: &HostRef) -> bool;
    fn get_iscsi_iqn(this: &HostRef) -> String;
    fn get_features(this: &HostRef) -> BTreeSet<FeatureRef>;
    fn get_updates_requiring_reboot(this: &HostRef) -> BTreeSet<PoolUpdateRef>;
    fn get_control_domain(this: &HostRef) -> VmRef;
    fn get_virtual_hardware_platform_versions(this: &HostRef) -> BTreeSet<i64>;
    fn get_display(this: &HostRef) -> HostDisplay;
    fn get_guest_vcpus_params as get_guest_VCPUs_params(
        this: &HostRef,
    ) -> BTreeMap<String, String>;
    fn get_ssl_legacy(this: &HostRef) -> bool;
    fn get_pusbs as get_PUSBs(this: &HostRef) -> Vec<PusbRef>;
    fn get_pgpus as get_PGPUs(this: &HostRef) -> Vec<PgpuRef>;
    fn get_pcis as get_PCIs(this: &HostRef) -> Vec<PciRef>;
    fn get_chipset_info(this: &HostRef) -> BTreeMap<String, String>;
    fn get_local_cache_sr(this: &HostRef) -> SrRef;
    fn get_power_on_config(this: &HostRef) -> BTreeMap<String, String>;
    fn get_power_on_mode(this: &HostRef) -> String;
    fn get_bios_strings(this: &HostRef) -> BTreeMap<String, String>;
    fn get_license_server(this: &HostRef) -> BTreeMap<String, String>;
    fn get_edition(this: &HostRef) -> String;
    fn get_external_auth_configuration(
        this: &HostRef,
    ) -> BTreeMap<String, String>;
    fn get_external_auth_service_name(this: &HostRef) -> String;
    fn get_external_auth_type(this: &HostRef) -> String;
    fn get_tags(this: &HostRef) -> BTreeSet<String>;
    fn get_blobs(this: &HostRef) -> BTreeMap<String, BlobRef>;
    fn get_ha_network_peers(this: &HostRef) -> BTreeSet<String>;
    fn get_ha_statefiles(this: &HostRef) -> BTreeSet<String>;
    fn get_license_params(this: &HostRef) -> BTreeMap<String, String>;
    fn get_metrics(this: &HostRef) -> HostMetricsRef;
    fn get_address(this: &HostRef) -> String;
    fn get_hostname(this: &HostRef) -> String;
    fn get_cpu_info(this: &HostRef) -> BTreeMap<String, String>;
    fn get_host_cpus as get_host_CPUs(this: &HostRef) -> Vec<HostCpuRef>;
    fn get_pbds as get_PBDs(this: &HostRef) -> Vec<PbdRef>;
    fn get_updates(this: &HostRef) -> BTreeSet<PoolUpdateRef>;
    fn get_patches(this: &HostRef) -> BTreeSet<HostPatchRef>;
    fn get_crashdumps(this: &HostRef) -> BTreeSet<HostCrashdumpRef>;
    fn get_crash_dump_sr(this: &HostRef) -> SrRef;
    fn get_suspend_image_sr(this: &HostRef) -> SrRef;
    fn get_pifs as get_PIFs(this: &HostRef) -> Vec<PifRef>;
    fn get_logging(this: &HostRef) -> BTreeMap<String, String>;
    fn get_resident_vms as get_resident_VMs(this: &HostRef) -> Vec<VmRef>;
    fn get_supported_bootloaders(this: &HostRef) -> BTreeSet<String>;
    fn get_sched_policy(this: &HostRef) -> String;
    fn get_cpu_configuration(this: &HostRef) -> BTreeMap<String, String>;
    fn get_capabilities(this: &HostRef) -> BTreeSet<String>;
    fn get_other_config(this: &HostRef) -> BTreeMap<String, String>;
    fn get_software_version(this: &HostRef) -> BTreeMap<String, String>;
    fn get_enabled(this: &HostRef) -> bool;
    fn get_api_version_vendor_implementation
        as get_API_version_vendor_implementation(this: &HostRef)
        -> BTreeMap<String, String>;
    fn get_api_version_vendor as get_API_version_vendor(
        this: &HostRef,
    ) -> String;
    fn get_api_version_minor as get_API_version_minor(this: &HostRef) -> i64;
    fn get_api_version_major as get_API_version_major(this: &HostRef) -> i64;
    fn get_current_operations(
        this: &HostRef,
    ) -> BTreeMap<String, HostAllowedOperations>;
    fn get_allowed_operations(this: &HostRef)
        -> BTreeSet<HostAllowedOperations>;
    fn get_memory_overhead(this: &HostRef) -> i64;
    fn get_name_description(this: &HostRef) -> String;
    fn get_name_label(this: &HostRef) -> String;
    fn get_uuid(this: &HostRef) -> String;
    fn get_by_name_label(label: &str) -> Vec<HostRef>;
    fn get_by_uuid(uuid: &str) -> HostRef;
    /// Get a record containing the current state of the given host.
    fn get_record(this: &HostRef) -> HostRecord;
}
