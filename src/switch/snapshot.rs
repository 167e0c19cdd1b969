//! In-memory image of a SwOS switch configuration.
//!
//! Enumerated settings are kept as the raw codes the firmware reports. A code
//! the catalog has no label for is preserved as-is and surfaces as an
//! unrepresentable value on the next read.

use serde::{Deserialize, Serialize};

macro_rules! device_code {
    ($(#[$meta:meta])* $name:ident { $($konst:ident = $code:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u8);

        impl $name {
            $(pub const $konst: Self = Self($code);)*
        }
    };
}

device_code!(
    /// PoE output mode of a port.
    PoeMode { OFF = 0, AUTO = 1, ON = 2, CALIB = 3 }
);

device_code!(
    /// 802.1Q handling on ingress.
    VlanMode { DISABLED = 0, OPTIONAL = 1, ENABLED = 2, STRICT = 3 }
);

device_code!(
    /// Which frames a port accepts.
    VlanReceive { ANY = 0, TAGGED = 1, UNTAGGED = 2 }
);

device_code!(
    /// VLAN header rewrite on egress.
    VlanHeader { LEAVE_AS_IS = 0, STRIP = 1, ADD_IF_MISSING = 2 }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub enabled: bool,
    pub flow_control: bool,
    pub poe_mode: PoeMode,
    pub poe_priority: u8,
}

/// Per-port forwarding and VLAN settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortForward {
    pub vlan_mode: VlanMode,
    pub vlan_receive: VlanReceive,
    pub default_vlan_id: u16,
    pub force_vlan_id: bool,
    pub vlan_header: VlanHeader,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u16,
    pub independent_vlan_lookup: bool,
    pub igmp_snooping: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub system: System,
    pub links: Vec<Link>,
    pub forwarding: Vec<PortForward>,
    pub vlans: Vec<Vlan>,
}

impl Snapshot {
    /// Configuration of a freshly reset switch with `ports` ports.
    pub fn factory(ports: usize) -> Self {
        Self {
            system: System {
                identity: "MikroTik".to_string(),
            },
            links: (1..=ports)
                .map(|i| Link {
                    name: format!("Port{i}"),
                    enabled: true,
                    flow_control: false,
                    poe_mode: PoeMode::AUTO,
                    poe_priority: 1,
                })
                .collect(),
            forwarding: (0..ports)
                .map(|_| PortForward {
                    vlan_mode: VlanMode::OPTIONAL,
                    vlan_receive: VlanReceive::ANY,
                    default_vlan_id: 1,
                    force_vlan_id: false,
                    vlan_header: VlanHeader::LEAVE_AS_IS,
                })
                .collect(),
            vlans: Vec::new(),
        }
    }
}
