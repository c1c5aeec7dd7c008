// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual networks.

use std::collections::{BTreeMap, BTreeSet};

use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{BlobRef, NetworkRef, PifRef, VifRef};

define_enum! {
    pub enum NetworkOperations {
        /// Indicates this network is attaching to a VIF or PIF
        Attaching = "attaching",
    }
}

define_enum! {
    /// Default locking mode for VIFs attached to a network.
    pub enum NetworkDefaultLockingMode {
        /// Treat all VIFs on this network with locking_mode = 'default' as if
        /// they have locking_mode = 'unlocked'
        Unlocked = "unlocked",
        /// Treat all VIFs on this network with locking_mode = 'default' as if
        /// they have locking_mode = 'disabled'
        Disabled = "disabled",
    }
}

define_enum! {
    /// Special purposes a network may be tagged with.
    pub enum NetworkPurpose {
        /// Network Block Device service using TLS
        Nbd = "nbd",
        /// Network Block Device service without integrity or confidentiality:
        /// NOT RECOMMENDED
        InsecureNbd = "insecure_nbd",
    }
}

define_record! {
    pub struct NetworkRecord = "network" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// a human-readable name
        pub name_label: String,
        /// a notes field containing human-readable description
        pub name_description: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<NetworkOperations>,
        /// links each of the running tasks using this object (by reference) to
        /// a current_operation enum which describes the nature of the task.
        pub current_operations: BTreeMap<String, NetworkOperations>,
        /// list of connected vifs
        pub vifs: BTreeSet<VifRef> = "VIFs",
        /// list of connected pifs
        pub pifs: BTreeSet<PifRef> = "PIFs",
        /// MTU in octets
        pub mtu: i64 = "MTU",
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// name of the bridge corresponding to this network on the local host
        pub bridge: String,
        /// true if the bridge is managed by xapi
        pub managed: bool,
        /// Binary blobs associated with this network
        pub blobs: BTreeMap<String, BlobRef>,
        /// user-specified tags for categorization purposes
        pub tags: BTreeSet<String>,
        /// The network will use this value to determine the behaviour of all
        /// VIFs where locking_mode = default
        pub default_locking_mode: NetworkDefaultLockingMode,
        /// The IP addresses assigned to VIFs on networks that have active
        /// xapi-managed DHCP
        pub assigned_ips: BTreeMap<VifRef, String>,
        /// Set of purposes for which the server will use this network
        pub purpose: BTreeSet<NetworkPurpose>,
    }
}

rpc_class! {
    pub struct Network = "network";

    /// Get a record containing the current state of the given network.
    fn get_record(this: &NetworkRef) -> NetworkRecord;
    fn get_by_uuid(uuid: &str) -> NetworkRef;
    /// Create a new network instance, and return its handle.
    task fn create(args: &NetworkRecord) -> NetworkRef;
    /// Destroy the specified network instance.
    task fn destroy(this: &NetworkRef) -> ();
    fn get_by_name_label(label: &str) -> Vec<NetworkRef>;
    fn get_uuid(this: &NetworkRef) -> String;
    fn get_name_label(this: &NetworkRef) -> String;
    fn get_name_description(this: &NetworkRef) -> String;
    fn get_allowed_operations(this: &NetworkRef) -> BTreeSet<NetworkOperations>;
    fn get_current_operations(
        this: &NetworkRef,
    ) -> BTreeMap<String, NetworkOperations>;
    fn get_vifs as get_VIFs(this: &NetworkRef) -> Vec<VifRef>;
    fn get_pifs as get_PIFs(this: &NetworkRef) -> Vec<PifRef>;
    fn get_mtu as get_MTU(this: &NetworkRef) -> i64;
    fn get_other_config(this: &NetworkRef) -> BTreeMap<String, String>;
    fn get_bridge(this: &NetworkRef) -> String;
    fn get_managed(this: &NetworkRef) -> bool;
    fn get_blobs(this: &NetworkRef) -> BTreeMap<String, BlobRef>;
    fn get_tags(this: &NetworkRef) -> BTreeSet<String>;
    fn get_default_locking_mode(this: &NetworkRef) -> NetworkDefaultLockingMode;
    fn get_assigned_ips(this: &NetworkRef) -> BTreeMap<VifRef, String>;
    fn get_purpose(this: &NetworkRef) -> BTreeSet<NetworkPurpose>;
    fn set_name_label(this: &NetworkRef, value: &str) -> ();
    fn set_name_description(this: &NetworkRef, value: &str) -> ();
    fn set_mtu as set_MTU(this: &NetworkRef, value: i64) -> ();
    fn set_other_config(
        this: &NetworkRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Add the given key-value pair to the other_config field of the given
    /// network.
    fn add_to_other_config(this: &NetworkRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given network.
    fn remove_from_other_config(this: &NetworkRef, key: &str) -> ();
    fn set_tags(this: &NetworkRef, value: &[String]) -> ();
    /// Add the given value to the tags field of the given network.
    fn add_tags(this: &NetworkRef, value: &str) -> ();
    /// Remove the given value from the tags field of the given network.
    fn remove_tags(this: &NetworkRef, value: &str) -> ();
    /// Create a placeholder for a named binary blob of data that is associated
    /// with this pool
    task fn create_new_blob4 as create_new_blob(
        network: &NetworkRef,
        name: &str,
        mime_type: &str,
    ) -> BlobRef;
    /// Create a placeholder for a named binary blob of data that is associated
    /// with this pool
    task fn create_new_blob(
        network: &NetworkRef,
        name: &str,
        mime_type: &str,
        public: bool,
    ) -> BlobRef;
    /// Set the default locking mode for VIFs attached to this network
    task fn set_default_locking_mode(
        network: &NetworkRef,
        value: &NetworkDefaultLockingMode,
    ) -> ();
    /// Give a network a new purpose (if not present already)
    task fn add_purpose(this: &NetworkRef, value: &NetworkPurpose) -> ();
    /// Remove a purpose from a network (if present)
    task fn remove_purpose(this: &NetworkRef, value: &NetworkPurpose) -> ();
    /// Return a list of all the networks known to the system.
    fn get_all() -> Vec<NetworkRef>;
    /// Return a map of network references to network records for all networks
    /// known to the system.
    fn get_all_records() -> BTreeMap<NetworkRef, NetworkRecord>;
}
