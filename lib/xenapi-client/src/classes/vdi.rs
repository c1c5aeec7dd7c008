// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual disk images.

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::Timestamp;
use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{CrashdumpRef, PoolRef, SessionRef, SrRef, VbdRef, VdiRef};

define_enum! {
    pub enum VdiOperations {
        /// Cloning the VDI
        Clone = "clone",
        /// Copying the VDI
        Copy = "copy",
        /// Resizing the VDI
        Resize = "resize",
        /// Resizing the VDI which may or may not be online
        ResizeOnline = "resize_online",
        /// Snapshotting the VDI
        Snapshot = "snapshot",
        /// Mirroring the VDI
        Mirror = "mirror",
        /// Destroying the VDI
        Destroy = "destroy",
        /// Forget about the VDI
        Forget = "forget",
        /// Refreshing the fields of the VDI
        Update = "update",
        /// Forcibly unlocking the VDI
        ForceUnlock = "force_unlock",
        /// Generating static configuration
        GenerateConfig = "generate_config",
        /// Enabling changed block tracking for a VDI
        EnableCbt = "enable_cbt",
        /// Disabling changed block tracking for a VDI
        DisableCbt = "disable_cbt",
        /// Deleting the data of the VDI
        DataDestroy = "data_destroy",
        /// Exporting a bitmap that shows the changed blocks between two VDIs
        ListChangedBlocks = "list_changed_blocks",
        /// Setting the on_boot field of the VDI
        SetOnBoot = "set_on_boot",
        /// Operations on this VDI are temporarily blocked
        Blocked = "blocked",
    }
}

define_enum! {
    /// Role of a VDI.
    pub enum VdiType {
        /// a disk that may be replaced on upgrade
        System = "system",
        /// a disk that is always preserved on upgrade
        User = "user",
        /// a disk that may be reformatted on upgrade
        Ephemeral = "ephemeral",
        /// a disk that stores a suspend image
        Suspend = "suspend",
        /// a disk that stores VM crashdump information
        Crashdump = "crashdump",
        /// a disk used for HA storage heartbeating
        HaStatefile = "ha_statefile",
        /// a disk used for HA Pool metadata
        Metadata = "metadata",
        /// a disk used for a general metadata redo-log
        RedoLog = "redo_log",
        /// a disk that stores SR-level RRDs
        Rrd = "rrd",
        /// a disk that stores PVS cache data
        PvsCache = "pvs_cache",
        /// Metadata about a snapshot VDI that has been deleted: the set of
        /// blocks that changed between some previous version of the disk and
        /// the version tracked by the snapshot.
        CbtMetadata = "cbt_metadata",
    }
}

define_enum! {
    /// What happens to a VDI's contents when its VM boots.
    pub enum OnBoot {
        /// When a VM containing this VDI is started, the contents of the VDI
        /// are reset to the state they were in when this flag was last set.
        Reset = "reset",
        /// Standard behaviour.
        Persist = "persist",
    }
}

define_record! {
    pub struct VdiRecord = "VDI" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// a human-readable name
        pub name_label: String,
        /// a notes field containing human-readable description
        pub name_description: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<VdiOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, VdiOperations>,
        /// storage repository in which the VDI resides
        pub sr: SrRef = "SR",
        /// list of vbds that refer to this disk
        pub vbds: BTreeSet<VbdRef> = "VBDs",
        /// list of crash dumps that refer to this disk
        pub crash_dumps: BTreeSet<CrashdumpRef>,
        /// size of disk as presented to the guest (in bytes).
        pub virtual_size: i64,
        /// amount of physical space that the disk image is currently taking up
        /// on the storage repository (in bytes)
        pub physical_utilisation: i64,
        /// type of the VDI
        pub kind: VdiType = "type",
        /// true if this disk may be shared
        pub sharable: bool,
        /// true if this disk may ONLY be mounted read-only
        pub read_only: bool,
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// true if this disk is locked at the storage level
        pub storage_lock: bool,
        /// location information
        pub location: String,
        pub managed: bool,
        /// true if SR scan operation reported this VDI as not present on disk
        pub missing: bool,
        /// This field is always null.
        pub parent: VdiRef,
        /// data to be inserted into the xenstore tree
        /// (/local/domain/0/backend/vbd/<domid>/<device-id>/sm-data) after the
        /// VDI is attached.
        pub xenstore_data: BTreeMap<String, String>,
        /// SM dependent data
        pub sm_config: BTreeMap<String, String>,
        /// true if this is a snapshot.
        pub is_a_snapshot: bool,
        /// Ref pointing to the VDI this snapshot is of.
        pub snapshot_of: VdiRef,
        /// List pointing to all the VDIs snapshots.
        pub snapshots: BTreeSet<VdiRef>,
        /// Date/time when this snapshot was created.
        pub snapshot_time: Timestamp,
        /// user-specified tags for categorization purposes
        pub tags: BTreeSet<String>,
        /// true if this VDI is to be cached in the local cache SR
        pub allow_caching: bool,
        /// The behaviour of this VDI on a VM boot
        pub on_boot: OnBoot,
        /// The pool whose metadata is contained in this VDI
        pub metadata_of_pool: PoolRef,
        /// Whether this VDI contains the latest known accessible metadata for
        /// the pool
        pub metadata_latest: bool,
        /// Whether this VDI is a Tools ISO
        pub is_tools_iso: bool,
        /// True if changed blocks are tracked for this VDI
        pub cbt_enabled: bool,
    }
}

rpc_class! {
    pub struct Vdi = "VDI";

    /// Get a record containing the current state of the given VDI.
    fn get_record(this: &VdiRef) -> VdiRecord;
    fn get_by_uuid(uuid: &str) -> VdiRef;
    /// Create a new VDI instance, and return its handle.
    task fn create(args: &VdiRecord) -> VdiRef;
    /// Destroy the specified VDI instance.
    task fn destroy(this: &VdiRef) -> ();
    fn get_by_name_label(label: &str) -> Vec<VdiRef>;
    fn get_uuid(this: &VdiRef) -> String;
    fn get_name_label(this: &VdiRef) -> String;
    fn get_name_description(this: &VdiRef) -> String;
    fn get_allowed_operations(this: &VdiRef) -> BTreeSet<VdiOperations>;
    fn get_current_operations(this: &VdiRef) -> BTreeMap<String, VdiOperations>;
    fn get_sr as get_SR(this: &VdiRef) -> SrRef;
    fn get_vbds as get_VBDs(this: &VdiRef) -> Vec<VbdRef>;
    fn get_crash_dumps(this: &VdiRef) -> BTreeSet<CrashdumpRef>;
    fn get_virtual_size(this: &VdiRef) -> i64;
    fn get_physical_utilisation(this: &VdiRef) -> i64;
    fn get_type(this: &VdiRef) -> VdiType;
    fn get_sharable(this: &VdiRef) -> bool;
    fn get_read_only(this: &VdiRef) -> bool;
    fn get_other_config(this: &VdiRef) -> BTreeMap<String, String>;
    fn get_storage_lock(this: &VdiRef) -> bool;
    fn get_location(this: &VdiRef) -> String;
    fn get_managed(this: &VdiRef) -> bool;
    fn get_missing(this: &VdiRef) -> bool;
    fn get_parent(this: &VdiRef) -> VdiRef;
    fn get_xenstore_data(this: &VdiRef) -> BTreeMap<String, String>;
    fn get_sm_config(this: &VdiRef) -> BTreeMap<String, String>;
    fn get_is_a_snapshot(this: &VdiRef) -> bool;
    fn get_snapshot_of(this: &VdiRef) -> VdiRef;
    fn get_snapshots(this: &VdiRef) -> BTreeSet<VdiRef>;
    fn get_snapshot_time(this: &VdiRef) -> Timestamp;
    fn get_tags(this: &VdiRef) -> BTreeSet<String>;
    fn get_allow_caching(this: &VdiRef) -> bool;
    fn get_on_boot(this: &VdiRef) -> OnBoot;
    fn get_metadata_of_pool(this: &VdiRef) -> PoolRef;
    fn get_metadata_latest(this: &VdiRef) -> bool;
    fn get_is_tools_iso(this: &VdiRef) -> bool;
    fn get_cbt_enabled(this: &VdiRef) -> bool;
    fn set_other_config(this: &VdiRef, value: &BTreeMap<String, String>) -> ();
    /// Add the given key-value pair to the other_config field of the given VDI.
    fn add_to_other_config(this: &VdiRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given VDI.
    fn remove_from_other_config(this: &VdiRef, key: &str) -> ();
    fn set_xenstore_data(this: &VdiRef, value: &BTreeMap<String, String>) -> ();
    /// Add the given key-value pair to the xenstore_data field of the given
    /// VDI.
    fn add_to_xenstore_data(this: &VdiRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the xenstore_data
    /// field of the given VDI.
    fn remove_from_xenstore_data(this: &VdiRef, key: &str) -> ();
    fn set_sm_config(this: &VdiRef, value: &BTreeMap<String, String>) -> ();
    /// Add the given key-value pair to the sm_config field of the given VDI.
    fn add_to_sm_config(this: &VdiRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the sm_config
    /// field of the given VDI.
    fn remove_from_sm_config(this: &VdiRef, key: &str) -> ();
    fn set_tags(this: &VdiRef, value: &[String]) -> ();
    /// Add the given value to the tags field of the given VDI.
    fn add_tags(this: &VdiRef, value: &str) -> ();
    /// Remove the given value from the tags field of the given VDI.
    fn remove_tags(this: &VdiRef, value: &str) -> ();
    /// Take a read-only snapshot of the VDI, returning a reference to the
    /// snapshot.
    task fn snapshot2 as snapshot(vdi: &VdiRef) -> VdiRef;
    /// Take a read-only snapshot of the VDI, returning a reference to the
    /// snapshot.
    task fn snapshot(
        vdi: &VdiRef,
        driver_params: &BTreeMap<String, String>,
    ) -> VdiRef;
    /// Take an exact copy of the VDI and return a reference to the new disk.
    task fn clone2 as clone(vdi: &VdiRef) -> VdiRef;
    /// Take an exact copy of the VDI and return a reference to the new disk.
    task fn clone(
        vdi: &VdiRef,
        driver_params: &BTreeMap<String, String>,
    ) -> VdiRef;
    /// Resize the VDI.
    task fn resize(vdi: &VdiRef, size: i64) -> ();
    /// Resize the VDI which may or may not be attached to running guests.
    task fn resize_online(vdi: &VdiRef, size: i64) -> ();
    /// Create a new VDI record in the database only
    task fn introduce11 as introduce(
        uuid: &str,
        name_label: &str,
        name_description: &str,
        sr: &SrRef = "SR",
        kind: &VdiType = "type",
        sharable: bool,
        read_only: bool,
        other_config: &BTreeMap<String, String>,
        location: &str,
        xenstore_data: &BTreeMap<String, String>,
    ) -> VdiRef;
    /// Create a new VDI record in the database only
    task fn introduce12 as introduce(
        uuid: &str,
        name_label: &str,
        name_description: &str,
        sr: &SrRef = "SR",
        kind: &VdiType = "type",
        sharable: bool,
        read_only: bool,
        other_config: &BTreeMap<String, String>,
        location: &str,
        xenstore_data: &BTreeMap<String, String>,
        sm_config: &BTreeMap<String, String>,
    ) -> VdiRef;
    /// Create a new VDI record in the database only
    task fn introduce(
        uuid: &str,
        name_label: &str,
        name_description: &str,
        sr: &SrRef = "SR",
        kind: &VdiType = "type",
        sharable: bool,
        read_only: bool,
        other_config: &BTreeMap<String, String>,
        location: &str,
        xenstore_data: &BTreeMap<String, String>,
        sm_config: &BTreeMap<String, String>,
        managed: bool,
        virtual_size: i64,
        physical_utilisation: i64,
        metadata_of_pool: &PoolRef,
        is_a_snapshot: bool,
        snapshot_time: Timestamp,
        snapshot_of: &VdiRef,
    ) -> VdiRef;
    /// Ask the storage backend to refresh the fields in the VDI object
    task fn update(vdi: &VdiRef) -> ();
    /// Copy either a full VDI or the block differences between two VDIs into
    /// either a fresh VDI or an existing VDI.
    task fn copy3 as copy(vdi: &VdiRef, sr: &SrRef) -> VdiRef;
    /// Copy either a full VDI or the block differences between two VDIs into
    /// either a fresh VDI or an existing VDI.
    task fn copy(
        vdi: &VdiRef,
        sr: &SrRef,
        base_vdi: &VdiRef,
        into_vdi: &VdiRef,
    ) -> VdiRef;
    /// Removes a VDI record from the database
    task fn forget(vdi: &VdiRef) -> ();
    /// Sets the VDI's sharable field
    fn set_sharable(this: &VdiRef, value: bool) -> ();
    /// Sets the VDI's read_only field
    fn set_read_only(this: &VdiRef, value: bool) -> ();
    /// Set the name label of the VDI.
    task fn set_name_label(this: &VdiRef, value: &str) -> ();
    /// Set the name description of the VDI.
    task fn set_name_description(this: &VdiRef, value: &str) -> ();
    /// Set the value of the on_boot parameter.
    task fn set_on_boot(this: &VdiRef, value: &OnBoot) -> ();
    /// Set the value of the allow_caching parameter.
    task fn set_allow_caching(this: &VdiRef, value: bool) -> ();
    /// Load the metadata found on the supplied VDI and return a session
    /// reference which can be used in API calls to query its contents.
    task fn open_database(this: &VdiRef) -> SessionRef;
    /// Check the VDI cache for the pool UUID of the database on this VDI.
    task fn read_database_pool_uuid(this: &VdiRef) -> String;
    /// Migrate a VDI, which may be attached to a running guest, to a different
    /// SR.
    task fn pool_migrate(
        vdi: &VdiRef,
        sr: &SrRef,
        options: &BTreeMap<String, String>,
    ) -> VdiRef;
    /// Enable changed block tracking for the VDI.
    task fn enable_cbt(this: &VdiRef) -> ();
    /// Disable changed block tracking for the VDI.
    task fn disable_cbt(this: &VdiRef) -> ();
    /// Delete the data of the snapshot VDI, but keep its changed block tracking
    /// metadata.
    task fn data_destroy(this: &VdiRef) -> ();
    /// Compare two VDIs in 64k block increments and report which blocks differ.
    task fn list_changed_blocks(vdi_from: &VdiRef, vdi_to: &VdiRef) -> String;
    /// Return a list of all the VDIs known to the system.
    fn get_all() -> Vec<VdiRef>;
    /// Return a map of VDI references to VDI records for all VDIs known to the
    /// system.
    fn get_all_records() -> BTreeMap<VdiRef, VdiRecord>;
}
