// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storage repositories.

use std::collections::{BTreeMap, BTreeSet};

use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{BlobRef, DrTaskRef, HostRef, PbdRef, SrRef, VdiRef};

define_enum! {
    /// Operations that may be in flight on an SR.
    pub enum StorageOperations {
        /// Scanning backends for new or deleted VDIs
        Scan = "scan",
        /// Destroying the SR
        Destroy = "destroy",
        /// Forgetting about SR
        Forget = "forget",
        /// Plugging a PBD into this SR
        Plug = "plug",
        /// Unplugging a PBD from this SR
        Unplug = "unplug",
        /// Refresh the fields on the SR
        Update = "update",
        /// Creating a new VDI
        VdiCreate = "vdi_create",
        /// Introducing a new VDI
        VdiIntroduce = "vdi_introduce",
        /// Destroying a VDI
        VdiDestroy = "vdi_destroy",
        /// Resizing a VDI
        VdiResize = "vdi_resize",
        /// Cloneing a VDI
        VdiClone = "vdi_clone",
        /// Snapshotting a VDI
        VdiSnapshot = "vdi_snapshot",
        /// Mirroring a VDI
        VdiMirror = "vdi_mirror",
        /// Enabling changed block tracking for a VDI
        VdiEnableCbt = "vdi_enable_cbt",
        /// Disabling changed block tracking for a VDI
        VdiDisableCbt = "vdi_disable_cbt",
        /// Deleting the data of the VDI
        VdiDataDestroy = "vdi_data_destroy",
        /// Exporting a bitmap that shows the changed blocks between two VDIs
        VdiListChangedBlocks = "vdi_list_changed_blocks",
        /// Setting the on_boot field of the VDI
        VdiSetOnBoot = "vdi_set_on_boot",
        /// Creating a PBD for this SR
        PbdCreate = "pbd_create",
        /// Destroying one of this SR's PBDs
        PbdDestroy = "pbd_destroy",
    }
}

define_record! {
    pub struct SrRecord = "SR" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// a human-readable name
        pub name_label: String,
        /// a notes field containing human-readable description
        pub name_description: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<StorageOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, StorageOperations>,
        /// all virtual disks known to this storage repository
        pub vdis: BTreeSet<VdiRef> = "VDIs",
        /// describes how particular hosts can see this storage repository
        pub pbds: BTreeSet<PbdRef> = "PBDs",
        /// sum of virtual_sizes of all VDIs in this storage repository (in
        /// bytes)
        pub virtual_allocation: i64,
        /// physical space currently utilised on this storage repository (in
        /// bytes).
        pub physical_utilisation: i64,
        /// total physical size of the repository (in bytes)
        pub physical_size: i64,
        /// type of the storage repository
        pub kind: String = "type",
        /// the type of the SR's content, if required (e.g. ISOs)
        pub content_type: String,
        /// true if this SR is (capable of being) shared between multiple hosts
        pub shared: bool,
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// user-specified tags for categorization purposes
        pub tags: BTreeSet<String>,
        /// SM dependent data
        pub sm_config: BTreeMap<String, String>,
        /// Binary blobs associated with this SR
        pub blobs: BTreeMap<String, BlobRef>,
        /// True if this SR is assigned to be the local cache for its host
        pub local_cache_enabled: bool,
        /// The disaster recovery task which introduced this SR
        pub introduced_by: DrTaskRef,
        /// True if the SR is using aggregated local storage
        pub clustered: bool,
        /// True if this is the SR that contains the Tools ISO VDIs
        pub is_tools_sr: bool,
    }
}

rpc_class! {
    pub struct Sr = "SR";

    /// Return a map of SR references to SR records for all SRs known to the
    /// system.
    fn get_all_records() -> BTreeMap<SrRef, SrRecord>;
    /// Return a list of all the SRs known to the system.
    fn get_all() -> Vec<SrRef>;
    /// Forget the recorded statistics related to the specified data source
    fn forget_data_source_archives(sr: &SrRef, data_source: &str) -> ();
    /// Query the latest value of the specified data source
    fn query_data_source(sr: &SrRef, data_source: &str) -> f64;
    /// Start recording the specified data source
    fn record_data_source(sr: &SrRef, data_source: &str) -> ();
    task fn disable_database_replication(sr: &SrRef) -> ();
    task fn enable_database_replication(sr: &SrRef) -> ();
    /// Returns successfully if the given SR supports database replication.
    task fn assert_supports_database_replication(sr: &SrRef) -> ();
    /// Returns successfully if the given SR can host an HA statefile.
    task fn assert_can_host_ha_statefile(sr: &SrRef) -> ();
    /// Sets the SR's physical_size field
    fn set_physical_size(this: &SrRef, value: i64) -> ();
    /// Create a placeholder for a named binary blob of data that is associated
    /// with this SR
    task fn create_new_blob(
        sr: &SrRef,
        name: &str,
        mime_type: &str,
        public: bool,
    ) -> BlobRef;
    /// Set the name description of the SR
    task fn set_name_description(sr: &SrRef, value: &str) -> ();
    /// Set the name label of the SR
    task fn set_name_label(sr: &SrRef, value: &str) -> ();
    /// Sets the shared flag on the SR
    task fn set_shared(sr: &SrRef, value: bool) -> ();
    /// Refreshes the list of VDIs associated with an SR
    task fn scan(sr: &SrRef) -> ();
    /// Return a set of all the SR types supported by the system
    fn get_supported_types() -> Vec<String>;
    /// Refresh the fields on the SR object
    task fn update(sr: &SrRef) -> ();
    /// Removing specified SR-record from database, without attempting to remove
    /// SR from disk
    task fn forget(sr: &SrRef) -> ();
    /// Destroy specified SR, removing SR-record from database and remove SR
    /// from disk.
    task fn destroy(sr: &SrRef) -> ();
    /// Create a new Storage Repository on disk.
    task fn make(
        host: &HostRef,
        device_config: &BTreeMap<String, String>,
        physical_size: i64,
        name_label: &str,
        name_description: &str,
        kind: &str = "type",
        content_type: &str,
        sm_config: &BTreeMap<String, String>,
    ) -> String;
    /// Introduce a new Storage Repository into the managed system
    task fn introduce(
        uuid: &str,
        name_label: &str,
        name_description: &str,
        kind: &str = "type",
        content_type: &str,
        shared: bool,
        sm_config: &BTreeMap<String, String>,
    ) -> SrRef;
    /// Create a new Storage Repository and introduce it into the managed
    /// system, creating both SR record and PBD record to attach it to current
    /// host (with specified device_config parameters)
    task fn create(
        host: &HostRef,
        device_config: &BTreeMap<String, String>,
        physical_size: i64,
        name_label: &str,
        name_description: &str,
        kind: &str = "type",
        content_type: &str,
        shared: bool,
        sm_config: &BTreeMap<String, String>,
    ) -> SrRef;
    /// Remove the given key and its corresponding value from the sm_config
    /// field of the given SR.
    fn remove_from_sm_config(this: &SrRef, key: &str) -> ();
    /// Add the given key-value pair to the sm_config field of the given SR.
    fn add_to_sm_config(this: &SrRef, key: &str, value: &str) -> ();
    fn set_sm_config(this: &SrRef, value: &BTreeMap<String, String>) -> ();
    /// Remove the given value from the tags field of the given SR.
    fn remove_tags(this: &SrRef, value: &str) -> ();
    /// Add the given value to the tags field of the given SR.
    fn add_tags(this: &SrRef, value: &str) -> ();
    fn set_tags(this: &SrRef, value: &[String]) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given SR.
    fn remove_from_other_config(this: &SrRef, key: &str) -> ();
    /// Add the given key-value pair to the other_config field of the given SR.
    fn add_to_other_config(this: &SrRef, key: &str, value: &str) -> ();
    fn set_other_config(this: &SrRef, value: &BTreeMap<String, String>) -> ();
    fn get_is_tools_sr(this: &SrRef) -> bool;
    fn get_clustered(this: &SrRef) -> bool;
    fn get_introduced_by(this: &SrRef) -> DrTaskRef;
    fn get_local_cache_enabled(this: &SrRef) -> bool;
    fn get_blobs(this: &SrRef) -> BTreeMap<String, BlobRef>;
    fn get_sm_config(this: &SrRef) -> BTreeMap<String, String>;
    fn get_tags(this: &SrRef) -> BTreeSet<String>;
    fn get_other_config(this: &SrRef) -> BTreeMap<String, String>;
    fn get_shared(this: &SrRef) -> bool;
    fn get_content_type(this: &SrRef) -> String;
    fn get_type(this: &SrRef) -> String;
    fn get_physical_size(this: &SrRef) -> i64;
    fn get_physical_utilisation(this: &SrRef) -> i64;
    fn get_virtual_allocation(this: &SrRef) -> i64;
    fn get_pbds as get_PBDs(this: &SrRef) -> Vec<PbdRef>;
    fn get_vdis as get_VDIs(this: &SrRef) -> Vec<VdiRef>;
    fn get_current_operations(
        this: &SrRef,
    ) -> BTreeMap<String, StorageOperations>;
    fn get_allowed_operations(this: &SrRef) -> BTreeSet<StorageOperations>;
    fn get_name_description(this: &SrRef) -> String;
    fn get_name_label(this: &SrRef) -> String;
    fn get_uuid(this: &SrRef) -> String;
    fn get_by_name_label(label: &str) -> Vec<SrRef>;
    fn get_by_uuid(uuid: &str) -> SrRef;
    /// Get a record containing the current state of the given SR.
    fn get_record(this: &SrRef) -> SrRecord;
}
