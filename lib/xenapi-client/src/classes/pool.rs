// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pool-wide configuration.
//!
//! Every installation has exactly one pool object, even a single standalone
//! host.

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::Timestamp;
use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{
    BlobRef, HostRef, NetworkRef, PifRef, PoolRef, RepositoryRef, SecretRef,
    SrRef, VdiRef, VmRef,
};

define_enum! {
    pub enum PoolAllowedOperations {
        /// Indicates this pool is in the process of enabling HA
        HaEnable = "ha_enable",
        /// Indicates this pool is in the process of disabling HA
        HaDisable = "ha_disable",
        /// Indicates this pool is in the process of creating a cluster
        ClusterCreate = "cluster_create",
        /// Indicates this pool is in the process of changing master
        DesignateNewMaster = "designate_new_master",
        /// Indicates this pool is in the process of configuring repositories
        ConfigureRepositories = "configure_repositories",
        /// Indicates this pool is in the process of syncing updates
        SyncUpdates = "sync_updates",
        /// Indicates this pool is in the process of getting updates
        GetUpdates = "get_updates",
        /// Indicates this pool is in the process of applying updates
        ApplyUpdates = "apply_updates",
        /// Indicates this pool is in the process of enabling TLS verification
        TLSVerificationEnable = "tls_verification_enable",
        /// A certificate refresh and distribution is in progress
        CertRefresh = "cert_refresh",
        /// Indicates this pool is exchanging internal certificates with a new
        /// joiner
        ExchangeCertificatesOnJoin = "exchange_certificates_on_join",
        /// Indicates this pool is exchanging ca certificates with a new joiner
        ExchangeCaCertificatesOnJoin = "exchange_ca_certificates_on_join",
        /// Indicates the primary host is sending its certificates to another
        /// host
        CopyPrimaryHostCerts = "copy_primary_host_certs",
        /// Ejection of a host from the pool is under way
        Eject = "eject",
    }
}

define_enum! {
    pub enum TelemetryFrequency {
        /// Run telemetry task daily
        Daily = "daily",
        /// Run telemetry task weekly
        Weekly = "weekly",
        /// Run telemetry task monthly
        Monthly = "monthly",
    }
}

define_enum! {
    pub enum UpdateSyncFrequency {
        /// The update synchronizations happen every day
        Daily = "daily",
        /// The update synchronizations happen every week on the chosen day
        Weekly = "weekly",
    }
}

define_record! {
    pub struct PoolRecord = "pool" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// Short name
        pub name_label: String,
        /// Description
        pub name_description: String,
        /// The host that is pool master
        pub master: HostRef,
        /// Default SR for VDIs
        pub default_sr: SrRef = "default_SR",
        /// The SR in which VDIs for suspend images are created
        pub suspend_image_sr: SrRef = "suspend_image_SR",
        /// The SR in which VDIs for crash dumps are created
        pub crash_dump_sr: SrRef = "crash_dump_SR",
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// true if HA is enabled on the pool, false otherwise
        pub ha_enabled: bool,
        /// The current HA configuration
        pub ha_configuration: BTreeMap<String, String>,
        /// HA statefile VDIs in use
        pub ha_statefiles: BTreeSet<String>,
        /// Number of host failures to tolerate before the Pool is declared to
        /// be overcommitted
        pub ha_host_failures_to_tolerate: i64,
        /// Number of future host failures we have managed to find a plan for.
        pub ha_plan_exists_for: i64,
        /// If set to false then operations which would cause the Pool to become
        /// overcommitted will be blocked.
        pub ha_allow_overcommit: bool,
        /// True if the Pool is considered to be overcommitted i.e. if there
        /// exist insufficient physical resources to tolerate the configured
        /// number of host failures
        pub ha_overcommitted: bool,
        /// Binary blobs associated with this pool
        pub blobs: BTreeMap<String, BlobRef>,
        /// user-specified tags for categorization purposes
        pub tags: BTreeSet<String>,
        /// gui-specific configuration for pool
        pub gui_config: BTreeMap<String, String>,
        /// Configuration for the automatic health check feature
        pub health_check_config: BTreeMap<String, String>,
        /// Url for the configured workload balancing host
        pub wlb_url: String,
        /// Username for accessing the workload balancing host
        pub wlb_username: String,
        /// true if workload balancing is enabled on the pool, false otherwise
        pub wlb_enabled: bool,
        /// true if communication with the WLB server should enforce TLS
        /// certificate verification.
        pub wlb_verify_cert: bool,
        /// true a redo-log is to be used other than when HA is enabled, false
        /// otherwise
        pub redo_log_enabled: bool,
        /// indicates the VDI to use for the redo-log other than when HA is
        /// enabled
        pub redo_log_vdi: VdiRef,
        /// address of the vswitch controller
        pub vswitch_controller: String,
        /// Pool-wide restrictions currently in effect
        pub restrictions: BTreeMap<String, String>,
        /// The set of currently known metadata VDIs for this pool
        pub metadata_vdis: BTreeSet<VdiRef> = "metadata_VDIs",
        /// The HA cluster stack that is currently in use.
        pub ha_cluster_stack: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<PoolAllowedOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, PoolAllowedOperations>,
        /// Pool-wide guest agent configuration information
        pub guest_agent_config: BTreeMap<String, String>,
        /// Details about the physical CPUs on the pool
        pub cpu_info: BTreeMap<String, String>,
        /// The pool-wide policy for clients on whether to use the vendor device
        /// or not on newly created VMs.
        pub policy_no_vendor_device: bool,
        /// The pool-wide flag to show if the live patching feauture is disabled
        /// or not.
        pub live_patching_disabled: bool,
        /// true if IGMP snooping is enabled in the pool, false otherwise.
        pub igmp_snooping_enabled: bool,
        /// The UEFI certificates allowing Secure Boot
        pub uefi_certificates: String,
        /// Custom UEFI certificates allowing Secure Boot
        pub custom_uefi_certificates: String,
        /// True if either a PSR is running or we are waiting for a PSR to be
        /// re-run
        pub is_psr_pending: bool,
        /// True iff TLS certificate verification is enabled
        pub tls_verification_enabled: bool,
        /// The set of currently enabled repositories
        pub repositories: BTreeSet<RepositoryRef>,
        /// True if authentication by TLS client certificates is enabled
        pub client_certificate_auth_enabled: bool,
        /// The name (CN/SAN) that an incoming client certificate must have to
        /// allow authentication
        pub client_certificate_auth_name: String,
        /// Url of the proxy used in syncing with the enabled repositories
        pub repository_proxy_url: String,
        /// Username for the authentication of the proxy used in syncing with
        /// the enabled repositories
        pub repository_proxy_username: String,
        /// Password for the authentication of the proxy used in syncing with
        /// the enabled repositories
        pub repository_proxy_password: SecretRef,
        /// Default behaviour during migration, True if stream compression
        /// should be used
        pub migration_compression: bool,
        /// true if bias against pool master when scheduling vms is enabled,
        /// false otherwise
        pub coordinator_bias: bool,
        /// Maximum number of threads to use for PAM authentication
        pub local_auth_max_threads: i64,
        /// Maximum number of threads to use for external (AD) authentication
        pub ext_auth_max_threads: i64,
        /// The UUID of the pool for identification of telemetry data
        pub telemetry_uuid: SecretRef,
        /// How often the telemetry collection will be carried out
        pub telemetry_frequency: TelemetryFrequency,
        /// The earliest timestamp (in UTC) when the next round of telemetry
        /// collection can be carried out
        pub telemetry_next_collection: Timestamp,
        /// time of the last update sychronization
        pub last_update_sync: Timestamp,
        /// The frequency at which updates are synchronized from a remote CDN:
        /// daily or weekly.
        pub update_sync_frequency: UpdateSyncFrequency,
        /// The day of the week the update synchronizations will be scheduled,
        /// based on pool's local timezone.
        pub update_sync_day: i64,
        /// Whether periodic update synchronization is enabled or not
        pub update_sync_enabled: bool,
    }
}

rpc_class! {
    pub struct Pool = "pool";

    /// Return a map of pool references to pool records for all pools known to
    /// the system.
    fn get_all_records() -> BTreeMap<PoolRef, PoolRecord>;
    /// Return a list of all the pools known to the system.
    fn get_all() -> Vec<PoolRef>;
    fn set_ext_auth_max_threads(this: &PoolRef, value: i64) -> ();
    fn set_local_auth_max_threads(this: &PoolRef, value: i64) -> ();
    /// enable or disable periodic update synchronization depending on the value
    task fn set_update_sync_enabled(this: &PoolRef, value: bool) -> ();
    /// Configure periodic update synchronization to sync updates from a remote
    /// CDN
    task fn configure_update_sync(
        this: &PoolRef,
        update_sync_frequency: &UpdateSyncFrequency,
        update_sync_day: i64,
    ) -> ();
    /// Assign a new UUID to telemetry data.
    task fn reset_telemetry_uuid(this: &PoolRef) -> ();
    /// Set the timestamp for the next telemetry data collection.
    task fn set_telemetry_next_collection(
        this: &PoolRef,
        value: Timestamp,
    ) -> ();
    /// updates all the host firewalls in the pool to open or close port 80
    /// depending on the value
    task fn set_https_only(this: &PoolRef, value: bool) -> ();
    /// Set custom UEFI certificates for a pool and all its hosts.
    task fn set_custom_uefi_certificates(this: &PoolRef, value: &str) -> ();
    /// Set the UEFI certificates for a pool and all its hosts.
    task fn set_uefi_certificates(this: &PoolRef, value: &str) -> ();
    /// Disable the proxy for RPM package repositories.
    task fn disable_repository_proxy(this: &PoolRef) -> ();
    /// Configure proxy for RPM package repositories.
    task fn configure_repository_proxy(
        this: &PoolRef,
        url: &str,
        username: &str,
        password: &str,
    ) -> ();
    /// Disable client certificate authentication on the pool
    task fn disable_client_certificate_auth(this: &PoolRef) -> ();
    /// Enable client certificate authentication on the pool
    task fn enable_client_certificate_auth(this: &PoolRef, name: &str) -> ();
    /// Check if the pool is ready to be updated.
    task fn check_update_readiness(
        this: &PoolRef,
        requires_reboot: bool,
    ) -> Vec<Vec<String>>;
    /// Sync with the enabled repository
    task fn sync_updates(
        this: &PoolRef,
        force: bool,
        token: &str,
        token_id: &str,
    ) -> String;
    /// Remove a repository from the enabled set
    task fn remove_repository(this: &PoolRef, value: &RepositoryRef) -> ();
    /// Add a repository to the enabled set
    task fn add_repository(this: &PoolRef, value: &RepositoryRef) -> ();
    /// Set enabled set of repositories
    task fn set_repositories(this: &PoolRef, value: &[RepositoryRef]) -> ();
    task fn rotate_secret() -> ();
    /// Remove a key-value pair from the pool-wide guest agent configuration
    task fn remove_from_guest_agent_config(this: &PoolRef, key: &str) -> ();
    /// Add a key-value pair to the pool-wide guest agent configuration
    task fn add_to_guest_agent_config(
        this: &PoolRef,
        key: &str,
        value: &str,
    ) -> ();
    /// Return true if the extension is available on the pool
    task fn has_extension(this: &PoolRef, name: &str) -> bool;
    /// Enable or disable IGMP Snooping on the pool.
    task fn set_igmp_snooping_enabled(this: &PoolRef, value: bool) -> ();
    /// Sets ssl_legacy false on each host, pool-master last.
    task fn disable_ssl_legacy(this: &PoolRef) -> ();
    /// Sets ssl_legacy true on each host, pool-master last.
    task fn enable_ssl_legacy(this: &PoolRef) -> ();
    /// Apply an edition to all hosts in the pool
    task fn apply_edition(this: &PoolRef, edition: &str) -> ();
    /// This call returns the license state for the pool
    task fn get_license_state(this: &PoolRef) -> BTreeMap<String, String>;
    /// This call disables pool-wide local storage caching
    task fn disable_local_storage_caching(this: &PoolRef) -> ();
    /// This call attempts to enable pool-wide local storage caching
    task fn enable_local_storage_caching(this: &PoolRef) -> ();
    /// This call tests if a location is valid
    fn test_archive_target(
        this: &PoolRef,
        config: &BTreeMap<String, String>,
    ) -> String;
    /// Set the IP address of the vswitch controller.
    task fn set_vswitch_controller(address: &str) -> ();
    /// Disable the redo log if in use, unless HA is enabled.
    task fn disable_redo_log() -> ();
    /// Enable the redo log on the given SR and start using it, unless HA is
    /// enabled.
    task fn enable_redo_log(sr: &SrRef) -> ();
    /// Enable TLS server certificate verification
    fn enable_tls_verification() -> ();
    /// Copy the TLS CA certificates and CRLs of the master to all slaves.
    task fn certificate_sync() -> ();
    /// List the names of all installed TLS CA-issued Certificate Revocation
    /// Lists.
    task fn crl_list() -> Vec<String>;
    /// Remove a pool-wide TLS CA-issued Certificate Revocation List.
    task fn crl_uninstall(name: &str) -> ();
    /// Install a TLS CA-issued Certificate Revocation List, pool-wide.
    task fn crl_install(name: &str, cert: &str) -> ();
    /// Remove a pool-wide TLS CA certificate.
    task fn uninstall_ca_certificate(name: &str) -> ();
    /// Install a TLS CA certificate, pool-wide.
    task fn install_ca_certificate(name: &str, cert: &str) -> ();
    /// List the names of all installed TLS CA certificates.
    task fn certificate_list() -> Vec<String>;
    /// Remove a pool-wide TLS CA certificate.
    task fn certificate_uninstall(name: &str) -> ();
    /// Install a TLS CA certificate, pool-wide.
    task fn certificate_install(name: &str, cert: &str) -> ();
    /// Send the given body to the given host and port, using HTTPS, and print
    /// the response.
    task fn send_test_post(host: &str, port: i64, body: &str) -> String;
    /// Retrieves vm migrate recommendations for the pool from the workload
    /// balancing server
    task fn retrieve_wlb_recommendations() -> BTreeMap<VmRef, Vec<String>>;
    /// Retrieves the pool optimization criteria from the workload balancing
    /// server
    task fn retrieve_wlb_configuration() -> BTreeMap<String, String>;
    /// Sets the pool optimization criteria for the workload balancing server
    task fn send_wlb_configuration(config: &BTreeMap<String, String>) -> ();
    /// Permanently deconfigures workload balancing monitoring on this pool
    task fn deconfigure_wlb() -> ();
    /// Initializes workload balancing monitoring on this pool with the
    /// specified wlb server
    task fn initialize_wlb(
        wlb_url: &str,
        wlb_username: &str,
        wlb_password: &str,
        xenserver_username: &str,
        xenserver_password: &str,
    ) -> ();
    /// This call asynchronously detects if the external authentication
    /// configuration in any slave is different from that in the master and
    /// raises appropriate alerts
    fn detect_nonhomogeneous_external_auth(pool: &PoolRef) -> ();
    /// This call disables external authentication on all the hosts of the pool
    fn disable_external_auth(
        pool: &PoolRef,
        config: &BTreeMap<String, String>,
    ) -> ();
    /// This call enables external authentication on all the hosts of the pool
    fn enable_external_auth(
        pool: &PoolRef,
        config: &BTreeMap<String, String>,
        service_name: &str,
        auth_type: &str,
    ) -> ();
    /// Create a placeholder for a named binary blob of data that is associated
    /// with this pool
    task fn create_new_blob(
        pool: &PoolRef,
        name: &str,
        mime_type: &str,
        public: bool,
    ) -> BlobRef;
    /// Set the maximum number of host failures to consider in the HA VM restart
    /// planner
    task fn set_ha_host_failures_to_tolerate(this: &PoolRef, value: i64) -> ();
    /// Return a VM failover plan assuming a given subset of hosts fail
    fn ha_compute_vm_failover_plan(
        failed_hosts: &[HostRef],
        failed_vms: &[VmRef],
    ) -> BTreeMap<VmRef, BTreeMap<String, String>>;
    /// Returns the maximum number of host failures we could tolerate before we
    /// would be unable to restart the provided VMs
    fn ha_compute_hypothetical_max_host_failures_to_tolerate(
        configuration: &BTreeMap<VmRef, String>,
    ) -> i64;
    /// Returns the maximum number of host failures we could tolerate before we
    /// would be unable to restart configured VMs
    fn ha_compute_max_host_failures_to_tolerate() -> i64;
    /// Returns true if a VM failover plan exists for up to 'n' host failures
    fn ha_failover_plan_exists(n: i64) -> bool;
    /// When this call returns the VM restart logic will not run for the
    /// requested number of seconds.
    fn ha_prevent_restarts_for(seconds: i64) -> ();
    /// Perform an orderly handover of the role of master to the referenced
    /// host.
    task fn designate_new_master(host: &HostRef) -> ();
    /// Forcibly synchronise the database now
    task fn sync_database() -> ();
    /// Turn off High Availability mode
    task fn disable_ha() -> ();
    /// Turn on High Availability mode
    task fn enable_ha(
        heartbeat_srs: &[SrRef],
        configuration: &BTreeMap<String, String>,
    ) -> ();
    /// Create a pool-wide VLAN by taking the PIF.
    task fn create_vlan_from_pif as create_VLAN_from_PIF(
        pif: &PifRef,
        network: &NetworkRef,
        vlan: i64 = "VLAN",
    ) -> Vec<PifRef>;
    /// Reconfigure the management network interface for all Hosts in the Pool
    task fn management_reconfigure(network: &NetworkRef) -> ();
    /// Create PIFs, mapping a network to the same physical interface/VLAN on
    /// each host.
    task fn create_vlan as create_VLAN(
        device: &str,
        network: &NetworkRef,
        vlan: i64 = "VLAN",
    ) -> Vec<PifRef>;
    /// Instruct a pool master, M, to try and contact its slaves and, if slaves
    /// are in emergency mode, reset their master address to M.
    task fn recover_slaves() -> Vec<HostRef>;
    /// Instruct a slave already in a pool that the master has changed
    fn emergency_reset_master(master_address: &str) -> ();
    /// Instruct host that's currently a slave to transition to being master
    fn emergency_transition_to_master() -> ();
    /// Instruct a pool master to eject a host from the pool
    task fn eject(host: &HostRef) -> ();
    /// Instruct host to join a new pool
    task fn join_force(
        master_address: &str,
        master_username: &str,
        master_password: &str,
    ) -> ();
    /// Instruct host to join a new pool
    task fn join(
        master_address: &str,
        master_username: &str,
        master_password: &str,
    ) -> ();
    fn set_coordinator_bias(this: &PoolRef, value: bool) -> ();
    fn set_migration_compression(this: &PoolRef, value: bool) -> ();
    fn set_is_psr_pending(this: &PoolRef, value: bool) -> ();
    fn set_live_patching_disabled(this: &PoolRef, value: bool) -> ();
    fn set_policy_no_vendor_device(this: &PoolRef, value: bool) -> ();
    fn set_wlb_verify_cert(this: &PoolRef, value: bool) -> ();
    fn set_wlb_enabled(this: &PoolRef, value: bool) -> ();
    /// Remove the given key and its corresponding value from the
    /// health_check_config field of the given pool.
    fn remove_from_health_check_config(this: &PoolRef, key: &str) -> ();
    /// Add the given key-value pair to the health_check_config field of the
    /// given pool.
    fn add_to_health_check_config(this: &PoolRef, key: &str, value: &str) -> ();
    fn set_health_check_config(
        this: &PoolRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Remove the given key and its corresponding value from the gui_config
    /// field of the given pool.
    fn remove_from_gui_config(this: &PoolRef, key: &str) -> ();
    /// Add the given key-value pair to the gui_config field of the given pool.
    fn add_to_gui_config(this: &PoolRef, key: &str, value: &str) -> ();
    fn set_gui_config(this: &PoolRef, value: &BTreeMap<String, String>) -> ();
    /// Remove the given value from the tags field of the given pool.
    fn remove_tags(this: &PoolRef, value: &str) -> ();
    /// Add the given value to the tags field of the given pool.
    fn add_tags(this: &PoolRef, value: &str) -> ();
    fn set_tags(this: &PoolRef, value: &[String]) -> ();
    fn set_ha_allow_overcommit(this: &PoolRef, value: bool) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given pool.
    fn remove_from_other_config(this: &PoolRef, key: &str) -> ();
    /// Add the given key-value pair to the other_config field of the given
    /// pool.
    fn add_to_other_config(this: &PoolRef, key: &str, value: &str) -> ();
    fn set_other_config(this: &PoolRef, value: &BTreeMap<String, String>) -> ();
    fn set_crash_dump_sr as set_crash_dump_SR(
        this: &PoolRef,
        value: &SrRef,
    ) -> ();
    fn set_suspend_image_sr as set_suspend_image_SR(
        this: &PoolRef,
        value: &SrRef,
    ) -> ();
    fn set_default_sr as set_default_SR(this: &PoolRef, value: &SrRef) -> ();
    fn set_name_description(this: &PoolRef, value: &str) -> ();
    fn set_name_label(this: &PoolRef, value: &str) -> ();
    fn get_update_sync_enabled(this: &PoolRef) -> bool;
    fn get_update_sync_day(this: &PoolRef) -> i64;
    fn get_update_sync_frequency(this: &PoolRef) -> UpdateSyncFrequency;
    fn get_last_update_sync(this: &PoolRef) -> Timestamp;
    fn get_telemetry_next_collection(this: &PoolRef) -> Timestamp;
    fn get_telemetry_frequency(this: &PoolRef) -> TelemetryFrequency;
    fn get_telemetry_uuid(this: &PoolRef) -> SecretRef;
    fn get_ext_auth_max_threads(this: &PoolRef) -> i64;
    fn get_local_auth_max_threads(this: &PoolRef) -> i64;
    fn get_coordinator_bias(this: &PoolRef) -> bool;
    fn get_migration_compression(this: &PoolRef) -> bool;
    fn get_repository_proxy_password(this: &PoolRef) -> SecretRef;
    fn get_repository_proxy_username(this: &PoolRef) -> String;
    fn get_repository_proxy_url(this: &PoolRef) -> String;
    fn get_client_certificate_auth_name(this: &PoolRef) -> String;
    fn get_client_certificate_auth_enabled(this: &PoolRef) -> bool;
    fn get_repositories(this: &PoolRef) -> BTreeSet<RepositoryRef>;
    fn get_tls_verification_enabled(this: &PoolRef) -> bool;
    fn get_is_psr_pending(this: &PoolRef) -> bool;
    fn get_custom_uefi_certificates(this: &PoolRef) -> String;
    fn get_uefi_certificates(this: &PoolRef) -> String;
    fn get_igmp_snooping_enabled(this: &PoolRef) -> bool;
    fn get_live_patching_disabled(this: &PoolRef) -> bool;
    fn get_policy_no_vendor_device(this: &PoolRef) -> bool;
    fn get_cpu_info(this: &PoolRef) -> BTreeMap<String, String>;
    fn get_guest_agent_config(this: &PoolRef) -> BTreeMap<String, String>;
    fn get_current_operations(
        this: &PoolRef,
    ) -> BTreeMap<String, PoolAllowedOperations>;
    fn get_allowed_operations(this: &PoolRef)
        -> BTreeSet<PoolAllowedOperations>;
    fn get_ha_cluster_stack(this: &PoolRef) -> String;
    fn get_metadata_vdis as get_metadata_VDIs(this: &PoolRef) -> Vec<VdiRef>;
    fn get_restrictions(this: &PoolRef) -> BTreeMap<String, String>;
    fn get_vswitch_controller(this: &PoolRef) -> String;
    fn get_redo_log_vdi(this: &PoolRef) -> VdiRef;
    fn get_redo_log_enabled(this: &PoolRef) -> bool;
    fn get_wlb_verify_cert(this: &PoolRef) -> bool;
    fn get_wlb_enabled(this: &PoolRef) -> bool;
    fn get_wlb_username(this: &PoolRef) -> String;
    fn get_wlb_url(this: &PoolRef) -> String;
    fn get_health_check_config(this: &PoolRef) -> BTreeMap<String, String>;
    fn get_gui_config(this: &PoolRef) -> BTreeMap<String, String>;
    fn get_tags(this: &PoolRef) -> BTreeSet<String>;
    fn get_blobs(this: &PoolRef) -> BTreeMap<String, BlobRef>;
    fn get_ha_overcommitted(this: &PoolRef) -> bool;
    fn get_ha_allow_overcommit(this: &PoolRef) -> bool;
    fn get_ha_plan_exists_for(this: &PoolRef) -> i64;
    fn get_ha_host_failures_to_tolerate(this: &PoolRef) -> i64;
    fn get_ha_statefiles(this: &PoolRef) -> BTreeSet<String>;
    fn get_ha_configuration(this: &PoolRef) -> BTreeMap<String, String>;
    fn get_ha_enabled(this: &PoolRef) -> bool;
    fn get_other_config(this: &PoolRef) -> BTreeMap<String, String>;
    fn get_crash_dump_sr as get_crash_dump_SR(this: &PoolRef) -> SrRef;
    fn get_suspend_image_sr as get_suspend_image_SR(this: &PoolRef) -> SrRef;
    fn get_default_sr as get_default_SR(this: &PoolRef) -> SrRef;
    fn get_master(this: &PoolRef) -> HostRef;
    fn get_name_description(this: &PoolRef) -> String;
    fn get_name_label(this: &PoolRef) -> String;
    fn get_uuid(this: &PoolRef) -> String;
    fn get_by_uuid(uuid: &str) -> PoolRef;
    /// Get a record containing the current state of the given pool.
    fn get_record(this: &PoolRef) -> PoolRecord;
}
