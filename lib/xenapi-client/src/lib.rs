// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A typed client for the XenAPI management interface.
//!
//! Calls travel as XML-RPC over HTTP(S). A [`Session`] logs in to the pool,
//! follows the pool master when a member host redirects it, and carries
//! the session ref on every call made through the class facades in
//! [`classes`]:
//!
//! ```ignore
//! let opts = ClientOpts::new("https://pool.example".parse()?);
//! let session = Session::new(opts)?;
//! session
//!     .login_with_password("root", "secret", CLIENT_VERSION, "backup")
//!     .await?;
//! for vm in Vm::get_all(&session).await? {
//!     let record = Vm::get_record(&session, &vm).await?;
//!     println!("{} {}", record.name_label, record.power_state);
//! }
//! ```

// Facades mirror the server's parameter lists, however long they are.
#![allow(clippy::too_many_arguments)]
// `rpc_class!` recurses once per operation of a class.
#![recursion_limit = "512"]

pub mod api_errors;
pub mod api_version;
pub mod classes;
pub mod codec;
pub mod config;
pub mod endpoint;
pub mod error;
mod macros;
pub mod refs;
pub mod rpc;
pub mod session;
pub mod transport;
pub mod value;
pub mod xml;

pub use api_version::ApiVersion;
pub use classes::*;
pub use config::ClientOpts;
pub use endpoint::Endpoint;
pub use error::{CodecError, Error, ServerError, TransportError};
pub use refs::*;
pub use session::{Session, CLIENT_VERSION};
pub use value::Value;
