// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual network interfaces, which attach a VM to a network.

use std::collections::{BTreeMap, BTreeSet};

use crate::codec::ToWire;
use crate::error::Error;
use crate::macros::{define_enum, define_record, rpc_class};
use crate::refs::{NetworkRef, TaskRef, VifMetricsRef, VifRef, VmRef};
use crate::session::Session;

define_enum! {
    pub enum VifOperations {
        /// Attempting to attach this VIF to a VM
        Attach = "attach",
        /// Attempting to hotplug this VIF
        Plug = "plug",
        /// Attempting to hot unplug this VIF
        Unplug = "unplug",
    }
}

define_enum! {
    /// Traffic filtering applied to a VIF.
    pub enum VifLockingMode {
        /// No specific configuration set; the network's default applies
        NetworkDefault = "network_default",
        /// Only traffic to a specific MAC and a list of IPv4 or IPv6
        /// addresses is permitted
        Locked = "locked",
        /// All traffic is permitted
        Unlocked = "unlocked",
        /// No traffic is permitted
        Disabled = "disabled",
    }
}

define_enum! {
    pub enum VifIpv4ConfigurationMode {
        /// Follow the default IPv4 configuration of the guest
        None = "None",
        /// Static IPv4 address configuration
        Static = "Static",
    }
}

define_enum! {
    pub enum VifIpv6ConfigurationMode {
        /// Follow the default IPv6 configuration of the guest
        None = "None",
        /// Static IPv6 address configuration
        Static = "Static",
    }
}

define_record! {
    pub struct VifRecord = "VIF" {
        /// Unique identifier/object reference
        pub uuid: String,
        /// list of the operations allowed in this state.
        pub allowed_operations: BTreeSet<VifOperations>,
        /// links each of the running tasks using this object (by reference)
        /// to a current_operation enum which describes the nature of the
        /// task.
        pub current_operations: BTreeMap<String, VifOperations>,
        /// order in which VIF backends are created by xapi
        pub device: String,
        /// virtual network to which this vif is connected
        pub network: NetworkRef,
        /// virtual machine to which this vif is connected
        pub vm: VmRef = "VM",
        /// ethernet MAC address of virtual interface, as exposed to guest
        pub mac: String = "MAC",
        /// MTU in octets
        pub mtu: i64 = "MTU",
        /// additional configuration
        pub other_config: BTreeMap<String, String>,
        /// is the device currently attached (erased on reboot)
        pub currently_attached: bool,
        /// error/success code associated with last attach-operation
        pub status_code: i64,
        /// error/success information associated with last attach-operation
        /// status
        pub status_detail: String,
        /// Device runtime properties
        pub runtime_properties: BTreeMap<String, String>,
        /// QoS algorithm to use
        pub qos_algorithm_type: String,
        /// parameters for chosen QoS algorithm
        pub qos_algorithm_params: BTreeMap<String, String>,
        /// supported QoS algorithms for this VIF
        pub qos_supported_algorithms: BTreeSet<String>,
        /// metrics associated with this VIF
        pub metrics: VifMetricsRef,
        /// true if the MAC was autogenerated; false indicates it was set
        /// manually
        pub mac_autogenerated: bool = "MAC_autogenerated",
        /// current locking mode of the VIF
        pub locking_mode: VifLockingMode,
        /// A list of IPv4 addresses which can be used to filter traffic
        /// passing through this VIF
        pub ipv4_allowed: BTreeSet<String>,
        /// A list of IPv6 addresses which can be used to filter traffic
        /// passing through this VIF
        pub ipv6_allowed: BTreeSet<String>,
        /// Determines whether IPv4 addresses are configured on the VIF
        pub ipv4_configuration_mode: VifIpv4ConfigurationMode,
        /// IPv4 addresses in CIDR format
        pub ipv4_addresses: BTreeSet<String>,
        /// IPv4 gateway (the empty string means that no gateway is set)
        pub ipv4_gateway: String,
        /// Determines whether IPv6 addresses are configured on the VIF
        pub ipv6_configuration_mode: VifIpv6ConfigurationMode,
        /// IPv6 addresses in CIDR format
        pub ipv6_addresses: BTreeSet<String>,
        /// IPv6 gateway (the empty string means that no gateway is set)
        pub ipv6_gateway: String,
    }
}

rpc_class! {
    pub struct Vif = "VIF";

    /// Get a record containing the current state of the given VIF.
    fn get_record(this: &VifRef) -> VifRecord;
    fn get_by_uuid(uuid: &str) -> VifRef;
    /// Create a new VIF instance, and return its handle.
    task fn create(args: &VifRecord) -> VifRef;
    /// Destroy the specified VIF instance.
    task fn destroy(this: &VifRef) -> ();
    fn get_uuid(this: &VifRef) -> String;
    fn get_allowed_operations(this: &VifRef) -> BTreeSet<VifOperations>;
    fn get_current_operations(
        this: &VifRef,
    ) -> BTreeMap<String, VifOperations>;
    fn get_device(this: &VifRef) -> String;
    fn get_network(this: &VifRef) -> NetworkRef;
    fn get_vm as get_VM(this: &VifRef) -> VmRef;
    fn get_mac as get_MAC(this: &VifRef) -> String;
    fn get_mtu as get_MTU(this: &VifRef) -> i64;
    fn get_other_config(this: &VifRef) -> BTreeMap<String, String>;
    fn get_currently_attached(this: &VifRef) -> bool;
    fn get_status_code(this: &VifRef) -> i64;
    fn get_status_detail(this: &VifRef) -> String;
    fn get_runtime_properties(this: &VifRef) -> BTreeMap<String, String>;
    fn get_qos_algorithm_type(this: &VifRef) -> String;
    fn get_qos_algorithm_params(this: &VifRef) -> BTreeMap<String, String>;
    fn get_qos_supported_algorithms(this: &VifRef) -> BTreeSet<String>;
    fn get_metrics(this: &VifRef) -> VifMetricsRef;
    fn get_mac_autogenerated as get_MAC_autogenerated(this: &VifRef) -> bool;
    fn get_locking_mode(this: &VifRef) -> VifLockingMode;
    fn get_ipv4_allowed(this: &VifRef) -> BTreeSet<String>;
    fn get_ipv6_allowed(this: &VifRef) -> BTreeSet<String>;
    fn get_ipv4_configuration_mode(
        this: &VifRef,
    ) -> VifIpv4ConfigurationMode;
    fn get_ipv4_addresses(this: &VifRef) -> BTreeSet<String>;
    fn get_ipv4_gateway(this: &VifRef) -> String;
    fn get_ipv6_configuration_mode(
        this: &VifRef,
    ) -> VifIpv6ConfigurationMode;
    fn get_ipv6_addresses(this: &VifRef) -> BTreeSet<String>;
    fn get_ipv6_gateway(this: &VifRef) -> String;
    fn set_other_config(
        this: &VifRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    /// Add the given key-value pair to the other_config field of the given
    /// VIF.
    fn add_to_other_config(this: &VifRef, key: &str, value: &str) -> ();
    /// Remove the given key and its corresponding value from the
    /// other_config field of the given VIF.
    fn remove_from_other_config(this: &VifRef, key: &str) -> ();
    fn set_qos_algorithm_type(this: &VifRef, value: &str) -> ();
    fn set_qos_algorithm_params(
        this: &VifRef,
        value: &BTreeMap<String, String>,
    ) -> ();
    fn add_to_qos_algorithm_params(
        this: &VifRef,
        key: &str,
        value: &str,
    ) -> ();
    fn remove_from_qos_algorithm_params(this: &VifRef, key: &str) -> ();
    /// Hotplug the specified VIF, dynamically attaching it to the running
    /// VM
    task fn plug(this: &VifRef) -> ();
    /// Hot-unplug the specified VIF, dynamically detaching it from the
    /// running VM
    task fn unplug(this: &VifRef) -> ();
    /// Forcibly unplug the specified VIF
    task fn unplug_force(this: &VifRef) -> ();
    /// Set the locking mode for this VIF
    task fn set_locking_mode(this: &VifRef, value: &VifLockingMode) -> ();
    /// Set the IPv4 addresses to which traffic on this VIF can be
    /// restricted
    task fn set_ipv4_allowed(this: &VifRef, value: &[String]) -> ();
    /// Associates an IPv4 address with this VIF
    task fn add_ipv4_allowed(this: &VifRef, value: &str) -> ();
    /// Removes an IPv4 address from this VIF
    task fn remove_ipv4_allowed(this: &VifRef, value: &str) -> ();
    /// Set the IPv6 addresses to which traffic on this VIF can be
    /// restricted
    task fn set_ipv6_allowed(this: &VifRef, value: &[String]) -> ();
    /// Associates an IPv6 address with this VIF
    task fn add_ipv6_allowed(this: &VifRef, value: &str) -> ();
    /// Removes an IPv6 address from this VIF
    task fn remove_ipv6_allowed(this: &VifRef, value: &str) -> ();
    /// Configure IPv4 settings for this virtual interface
    task fn configure_ipv4(
        this: &VifRef,
        mode: &VifIpv4ConfigurationMode,
        address: &str,
        gateway: &str,
    ) -> ();
    /// Configure IPv6 settings for this virtual interface
    task fn configure_ipv6(
        this: &VifRef,
        mode: &VifIpv6ConfigurationMode,
        address: &str,
        gateway: &str,
    ) -> ();
    /// Return a list of all the VIFs known to the system.
    fn get_all() -> Vec<VifRef>;
    /// Return a map of VIF references to VIF records for all VIFs known to
    /// the system.
    fn get_all_records() -> BTreeMap<VifRef, VifRecord>;
}

// `move` is a keyword, so this pair is spelled out by hand.
impl Vif {
    /// Move the specified VIF to the specified network, even while the VM is
    /// running.
    pub async fn move_to(
        session: &Session,
        this: &VifRef,
        network: &NetworkRef,
    ) -> Result<(), Error> {
        let params = vec![
            this.to_wire("VIF.move(self)")?,
            network.to_wire("VIF.move(network)")?,
        ];
        session.invoke("VIF.move", params, "VIF.move -> ").await
    }

    pub async fn async_move_to(
        session: &Session,
        this: &VifRef,
        network: &NetworkRef,
    ) -> Result<TaskRef, Error> {
        let params = vec![
            this.to_wire("Async.VIF.move(self)")?,
            network.to_wire("Async.VIF.move(network)")?,
        ];
        session.invoke("Async.VIF.move", params, "Async.VIF.move -> ").await
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::codec::Codec;
    use crate::config::ClientOpts;
    use crate::endpoint::Endpoint;
    use crate::transport::MockTransport;
    use crate::value::Value;

    #[test]
    fn record_uses_wire_field_names() {
        let rec = VifRecord {
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
            mtu: 9000,
            locking_mode: VifLockingMode::Locked,
            ipv4_configuration_mode: VifIpv4ConfigurationMode::Static,
            ..VifRecord::default()
        };
        let wire = rec.encode("VIF.create(args)").unwrap();
        let members = wire.as_struct().unwrap();
        assert_eq!(members["MAC"], Value::from("aa:bb:cc:dd:ee:ff"));
        assert_eq!(members["MTU"], Value::from("9000"));
        assert_eq!(members["locking_mode"], Value::from("locked"));
        assert_eq!(members["ipv4_configuration_mode"], Value::from("Static"));
        assert_eq!(members.len(), VifRecord::FIELDS.len());
        assert!(members.contains_key("VM"));
        assert!(members.contains_key("MAC_autogenerated"));

        let back = VifRecord::decode("VIF.get_record -> ", &wire).unwrap();
        assert_eq!(back, rec);
    }

    #[tokio::test]
    async fn move_is_sent_as_move() {
        let mock = MockTransport::new(|call| match call.method.as_str() {
            "session.login_with_password" => Ok("OpaqueRef:s".into()),
            "VIF.move" => Ok(Value::Nil),
            "Async.VIF.move" => Ok("OpaqueRef:task".into()),
            other => panic!("unexpected call {other}"),
        });
        let session = Session::with_transport(
            Arc::new(mock.clone()),
            ClientOpts::new(Endpoint::https("hostA.example")),
        );
        session.login_with_password("root", "pw", "1.0", "test").await.unwrap();

        let vif = VifRef::from("OpaqueRef:vif");
        let net = NetworkRef::from("OpaqueRef:net");
        Vif::move_to(&session, &vif, &net).await.unwrap();
        let task = Vif::async_move_to(&session, &vif, &net).await.unwrap();
        assert_eq!(task.as_str(), "OpaqueRef:task");

        let calls = mock.calls();
        assert_eq!(
            calls[1].params,
            vec![
                Value::from("OpaqueRef:s"),
                Value::from("OpaqueRef:vif"),
                Value::from("OpaqueRef:net"),
            ]
        );
        assert_eq!(calls[2].method, "Async.VIF.move");
    }
}
