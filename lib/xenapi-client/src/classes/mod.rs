// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed facades, records and enumerations of the managed classes.
//!
//! Each class is a unit struct whose associated functions are its remote
//! operations, e.g. `Vm::start(&session, &vm, false, false)`. Operations
//! that can run as server-side tasks also have an `async_` twin returning a
//! [`TaskRef`](crate::refs::TaskRef); see [`Task::wait_for`].

mod event;
mod host;
mod network;
mod pbd;
mod pool;
mod sr;
mod task;
mod vbd;
mod vdi;
mod vif;
mod vm;
mod vm_appliance;

pub use event::*;
pub use host::*;
pub use network::*;
pub use pbd::*;
pub use pool::*;
pub use sr::*;
pub use task::*;
pub use vbd::*;
pub use vdi::*;
pub use vif::*;
pub use vm::*;
pub use vm_appliance::*;
