// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical block devices: the per-host attachment of an SR.

use std::collections::BTreeMap;

use crate::macros::{define_record, rpc_class};
use crate::refs::{HostRef, PbdRef, SrRef};

define_record! {
    pub struct PbdRecord = "PBD" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// physical machine on which the pbd is available
        pub host: HostRef,
        /// the storage repository that the pbd realises
        pub sr: SrRef = "SR",
        /// a config string to string map that is provided to the host's
        /// SR-backend-driver
        pub device_config: BTreeMap<String, String>,
        /// is the SR currently attached on this host?
        pub currently_attached: bool,
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
    }
}

rpc_class! {
    pub struct Pbd = "PBD";

    /// Get a record containing the current state of the given PBD.
    fn get_record(this: &PbdRef) -> PbdRecord;
    fn get_by_uuid(uuid: &str) -> PbdRef;
    /// Create a new PBD instance, and return its handle.
    task fn create(args: &PbdRecord) -> PbdRef;
    /// Destroy the specified PBD instance.
    task fn destroy(this: &PbdRef) -> ();
    fn get_uuid(this: &PbdRef) -> String;
    fn get_host(this: &PbdRef) -> HostRef;
    fn get_sr as get_SR(this: &PbdRef) -> SrRef;
    fn get_device_config(this: &PbdRef) -> BTreeMap<String, String>;
    fn get_currently_attached(this: &PbdRef) -> bool;
    fn get_other_config(this: &PbdRef) -> BTreeMap<String, String>;
    fn set_other_config(this: &PbdRef, value: &BTreeMap<String, String>) -> ();
    /// Add the given key-value pair to the other_config field of the given PBD.
    fn add_to_other_config(this: &PbdRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the other_config
    /// field of the given PBD.
    fn remove_from_other_config(this: &PbdRef, key: &str) -> ();
    /// Activate the specified PBD, causing the referenced SR to be attached and
    /// scanned
    task fn plug(this: &PbdRef) -> ();
    /// Deactivate the specified PBD, causing the referenced SR to be detached
    /// and nolonger scanned
    task fn unplug(this: &PbdRef) -> ();
    /// Sets the PBD's device_config field
    task fn set_device_config(
        this: &PbdRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Return a list of all the PBDs known to the system.
    fn get_all() -> Vec<PbdRef>;
    /// Return a map of PBD references to PBD records for all PBDs known to the
    /// system.
    fn get_all_records() -> BTreeMap<PbdRef, PbdRecord>;
}
