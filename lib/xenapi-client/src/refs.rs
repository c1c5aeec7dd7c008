// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opaque references, one type per managed class.
//!
//! Refs of different classes are distinct types, so a `VdiRef` cannot be
//! passed where a `VmRef` is expected. The empty ref is the null ref, which
//! the server uses for "unset".

use crate::macros::define_refs;

define_refs! {
    pub struct SessionRef = "session";
    pub struct TaskRef = "task";
    pub struct VmRef = "VM";
    pub struct HostRef = "host";
    pub struct PoolRef = "pool";
    pub struct SrRef = "SR";
    pub struct VdiRef = "VDI";
    pub struct VbdRef = "VBD";
    pub struct VifRef = "VIF";
    pub struct NetworkRef = "network";
    pub struct PbdRef = "PBD";
    pub struct PifRef = "PIF";
    pub struct VmApplianceRef = "VM_appliance";

    pub struct ConsoleRef = "console";
    pub struct VmMetricsRef = "VM_metrics";
    pub struct VmGuestMetricsRef = "VM_guest_metrics";
    pub struct VmppRef = "VMPP";
    pub struct VmssRef = "VMSS";
    pub struct CrashdumpRef = "crashdump";
    pub struct VtpmRef = "VTPM";
    pub struct VusbRef = "VUSB";
    pub struct VgpuRef = "VGPU";
    pub struct PciRef = "PCI";
    pub struct PgpuRef = "PGPU";
    pub struct PusbRef = "PUSB";
    pub struct BlobRef = "blob";
    pub struct MessageRef = "message";
    pub struct SecretRef = "secret";
    pub struct UserRef = "user";
    pub struct SubjectRef = "subject";
    pub struct RoleRef = "role";
    pub struct HostMetricsRef = "host_metrics";
    pub struct HostCpuRef = "host_cpu";
    pub struct HostPatchRef = "host_patch";
    pub struct HostCrashdumpRef = "host_crashdump";
    pub struct PoolUpdateRef = "pool_update";
    pub struct FeatureRef = "Feature";
    pub struct CertificateRef = "Certificate";
    pub struct RepositoryRef = "Repository";
    pub struct DrTaskRef = "DR_task";
    pub struct VbdMetricsRef = "VBD_metrics";
    pub struct VifMetricsRef = "VIF_metrics";
    pub struct SmRef = "SM";
    pub struct GpuGroupRef = "GPU_group";
    pub struct VgpuTypeRef = "VGPU_type";
    pub struct VlanRef = "VLAN";
    pub struct TunnelRef = "tunnel";
    pub struct BondRef = "Bond";
    pub struct NetworkSriovRef = "network_sriov";
    pub struct ClusterHostRef = "Cluster_host";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::{Codec, MapKey};
    use crate::value::Value;
    use std::collections::BTreeMap;

    #[test]
    fn null_ref_is_the_empty_string() {
        let null = VmRef::null();
        assert!(null.is_null());
        assert_eq!(null, VmRef::default());
        assert_eq!(null.encode("l").unwrap(), Value::from(""));
        assert!(VmRef::decode("l", &Value::from("")).unwrap().is_null());
        assert_eq!(VmRef::zero(), null);
    }

    #[test]
    fn content_is_carried_verbatim() {
        let r = SrRef::decode("l", &Value::from("OpaqueRef:sr9")).unwrap();
        assert_eq!(r.as_str(), "OpaqueRef:sr9");
        assert_eq!(r.to_string(), "OpaqueRef:sr9");
        assert_eq!(r.encode("l").unwrap(), Value::from("OpaqueRef:sr9"));
        assert!(SrRef::decode("l", &Value::Int(3)).is_err());
    }

    #[test]
    fn ref_keyed_maps_keep_their_class() {
        let mut m = BTreeMap::new();
        m.insert(VdiRef::new("OpaqueRef:d1"), SrRef::new("OpaqueRef:s1"));
        let wire = m.encode("VM.migrate_send(vdi_map)").unwrap();
        let back = BTreeMap::<VdiRef, SrRef>::decode("l", &wire).unwrap();
        assert_eq!(back, m);
        assert_eq!(
            VdiRef::from_key("l", "OpaqueRef:d1").unwrap().to_key("l").unwrap(),
            "OpaqueRef:d1"
        );
    }
}
