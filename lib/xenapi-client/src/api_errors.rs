// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Symbolic error codes the server reports in [`crate::ServerError::code`].
//!
//! The server's catalog runs to several hundred codes and grows with every
//! release; this is the subset callers most commonly branch on. Codes not
//! listed here are still surfaced verbatim.

// Session and authentication
pub const SESSION_AUTHENTICATION_FAILED: &str = "SESSION_AUTHENTICATION_FAILED";
pub const SESSION_INVALID: &str = "SESSION_INVALID";
pub const SESSION_NOT_REGISTERED: &str = "SESSION_NOT_REGISTERED";
pub const EVENTS_LOST: &str = "EVENTS_LOST";
pub const EVENT_FROM_TOKEN_PARSE_FAILURE: &str =
    "EVENT_FROM_TOKEN_PARSE_FAILURE";
pub const HOST_IS_SLAVE: &str = "HOST_IS_SLAVE";
pub const HOST_STILL_BOOTING: &str = "HOST_STILL_BOOTING";
pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
pub const RBAC_PERMISSION_DENIED: &str = "RBAC_PERMISSION_DENIED";
pub const CHANGE_PASSWORD_REJECTED: &str = "CHANGE_PASSWORD_REJECTED";

// Generic failures
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
pub const MESSAGE_METHOD_UNKNOWN: &str = "MESSAGE_METHOD_UNKNOWN";
pub const MESSAGE_PARAMETER_COUNT_MISMATCH: &str =
    "MESSAGE_PARAMETER_COUNT_MISMATCH";
pub const MESSAGE_DEPRECATED: &str = "MESSAGE_DEPRECATED";
pub const MESSAGE_REMOVED: &str = "MESSAGE_REMOVED";
pub const HANDLE_INVALID: &str = "HANDLE_INVALID";
pub const UUID_INVALID: &str = "UUID_INVALID";
pub const FIELD_TYPE_ERROR: &str = "FIELD_TYPE_ERROR";
pub const INVALID_VALUE: &str = "INVALID_VALUE";
pub const VALUE_NOT_SUPPORTED: &str = "VALUE_NOT_SUPPORTED";
pub const MAP_DUPLICATE_KEY: &str = "MAP_DUPLICATE_KEY";
pub const OPERATION_NOT_ALLOWED: &str = "OPERATION_NOT_ALLOWED";
pub const OPERATION_BLOCKED: &str = "OPERATION_BLOCKED";
pub const OPERATION_PARTIALLY_FAILED: &str = "OPERATION_PARTIALLY_FAILED";
pub const OTHER_OPERATION_IN_PROGRESS: &str = "OTHER_OPERATION_IN_PROGRESS";
pub const LICENCE_RESTRICTION: &str = "LICENCE_RESTRICTION";

// Tasks
pub const TASK_CANCELLED: &str = "TASK_CANCELLED";

// Hosts and pools
pub const HOST_NOT_LIVE: &str = "HOST_NOT_LIVE";
pub const HOST_OFFLINE: &str = "HOST_OFFLINE";
pub const HOST_IN_USE: &str = "HOST_IN_USE";
pub const HOST_NOT_ENOUGH_FREE_MEMORY: &str = "HOST_NOT_ENOUGH_FREE_MEMORY";
pub const CANNOT_EVACUATE_HOST: &str = "CANNOT_EVACUATE_HOST";
pub const POOL_JOINING_HOST_MUST_HAVE_SAME_API_VERSION: &str =
    "POOL_JOINING_HOST_MUST_HAVE_SAME_API_VERSION";

// VMs
pub const VM_BAD_POWER_STATE: &str = "VM_BAD_POWER_STATE";
pub const VM_IS_TEMPLATE: &str = "VM_IS_TEMPLATE";
pub const VM_REQUIRES_SR: &str = "VM_REQUIRES_SR";
pub const VM_REQUIRES_VDI: &str = "VM_REQUIRES_VDI";
pub const VM_REQUIRES_NETWORK: &str = "VM_REQUIRES_NETWORK";
pub const VM_MISSING_PV_DRIVERS: &str = "VM_MISSING_PV_DRIVERS";
pub const VM_NOT_RESIDENT_HERE: &str = "VM_NOT_RESIDENT_HERE";
pub const VM_MIGRATE_FAILED: &str = "VM_MIGRATE_FAILED";
pub const VM_NO_SUSPEND_SR: &str = "VM_NO_SUSPEND_SR";
pub const VM_HAS_TOO_MANY_SNAPSHOTS: &str = "VM_HAS_TOO_MANY_SNAPSHOTS";
pub const VM_CANNOT_DELETE_DEFAULT_TEMPLATE: &str =
    "VM_CANNOT_DELETE_DEFAULT_TEMPLATE";

// Storage
pub const SR_FULL: &str = "SR_FULL";
pub const SR_NOT_EMPTY: &str = "SR_NOT_EMPTY";
pub const SR_HAS_PBD: &str = "SR_HAS_PBD";
pub const SR_ATTACH_FAILED: &str = "SR_ATTACH_FAILED";
pub const SR_BACKEND_FAILURE: &str = "SR_BACKEND_FAILURE";
pub const SR_OPERATION_NOT_SUPPORTED: &str = "SR_OPERATION_NOT_SUPPORTED";
pub const PBD_EXISTS: &str = "PBD_EXISTS";
pub const VDI_IN_USE: &str = "VDI_IN_USE";
pub const VDI_READONLY: &str = "VDI_READONLY";
pub const VDI_MISSING: &str = "VDI_MISSING";
pub const VDI_TOO_SMALL: &str = "VDI_TOO_SMALL";
pub const VBD_NOT_EMPTY: &str = "VBD_NOT_EMPTY";
pub const VBD_IS_EMPTY: &str = "VBD_IS_EMPTY";
pub const VBD_NOT_UNPLUGGABLE: &str = "VBD_NOT_UNPLUGGABLE";

// Networking
pub const VIF_IN_USE: &str = "VIF_IN_USE";
pub const CANNOT_PLUG_VIF: &str = "CANNOT_PLUG_VIF";
pub const NETWORK_CONTAINS_VIF: &str = "NETWORK_CONTAINS_VIF";
pub const NETWORK_CONTAINS_PIF: &str = "NETWORK_CONTAINS_PIF";
