// ── Branch specification ──
//
// Everything needed to stand up one branch site: identity, contact, the
// LAN-side subnets and exactly two WAN uplinks.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One WAN uplink of a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WanUplink {
    /// Carrier or circuit label.
    pub name: String,
    pub network: Ipv4Net,
    /// Address assigned to the edge's WAN interface.
    pub local: Ipv4Addr,
    /// Upstream next hop.
    pub gateway: Ipv4Addr,
    pub upstream_mbps: f64,
    pub downstream_mbps: f64,
    /// Backup-only link.
    #[serde(default)]
    pub standby: bool,
}

/// A branch site to provision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSpec {
    pub name: String,
    pub country: String,
    pub postal_code: String,
    pub contact_name: String,
    pub contact_email: String,
    /// Point-to-point link to the LAN core; host `.1` is the edge, `.2` the core.
    pub transit_net: Ipv4Net,
    /// Subnets behind the LAN core, reached via static routes.
    pub corporate_nets: Vec<Ipv4Net>,
    pub byod_net: Ipv4Net,
    pub guest_net: Ipv4Net,
    pub wans: [WanUplink; 2],
}

/// The `n`th address of `net`, counting the network address as 0.
///
/// Returns `None` when the address falls outside the subnet.
pub fn nth_host(net: &Ipv4Net, n: u32) -> Option<Ipv4Addr> {
    let addr = Ipv4Addr::from(u32::from(net.network()).checked_add(n)?);
    net.contains(&addr).then_some(addr)
}

impl BranchSpec {
    /// Edge-side address on the transit link.
    pub fn transit_local(&self) -> Result<Ipv4Addr, CoreError> {
        host_of(&self.transit_net, 1, "transit_net")
    }

    /// LAN-core address on the transit link; next hop for corporate routes.
    pub fn transit_peer(&self) -> Result<Ipv4Addr, CoreError> {
        host_of(&self.transit_net, 2, "transit_net")
    }

    pub fn byod_gateway(&self) -> Result<Ipv4Addr, CoreError> {
        host_of(&self.byod_net, 1, "byod_net")
    }

    pub fn guest_gateway(&self) -> Result<Ipv4Addr, CoreError> {
        host_of(&self.guest_net, 1, "guest_net")
    }

    /// Check internal consistency before anything is sent to the orchestrator.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("name", &self.name),
            ("country", &self.country),
            ("postal_code", &self.postal_code),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{field} must not be empty")));
            }
        }

        for (field, net) in [
            ("transit_net", &self.transit_net),
            ("byod_net", &self.byod_net),
            ("guest_net", &self.guest_net),
        ] {
            strict_network(field, net)?;
            // `.2` must be a usable host, not the broadcast address.
            if net.prefix_len() > 30 {
                return Err(invalid(format!(
                    "{field} {net} is too small; it needs host addresses .1 and .2"
                )));
            }
        }

        if self.corporate_nets.is_empty() {
            return Err(invalid("corporate_nets must list at least one subnet"));
        }
        for net in &self.corporate_nets {
            strict_network("corporate_nets", net)?;
        }

        for (i, wan) in self.wans.iter().enumerate() {
            strict_network("wans.network", &wan.network)?;
            for (field, addr) in [("local", wan.local), ("gateway", wan.gateway)] {
                if !wan.network.contains(&addr) {
                    return Err(invalid(format!(
                        "wans[{i}].{field} {addr} is outside {}",
                        wan.network
                    )));
                }
            }
            if wan.local == wan.gateway {
                return Err(invalid(format!(
                    "wans[{i}] local and gateway are both {}",
                    wan.local
                )));
            }
            if !(wan.upstream_mbps > 0.0 && wan.downstream_mbps > 0.0) {
                return Err(invalid(format!("wans[{i}] bandwidth must be positive")));
            }
        }

        Ok(())
    }
}

fn host_of(net: &Ipv4Net, n: u32, field: &str) -> Result<Ipv4Addr, CoreError> {
    nth_host(net, n).ok_or_else(|| invalid(format!("{field} {net} has no host .{n}")))
}

/// Host bits must be zero, as in `10.0.0.0/30` rather than `10.0.0.1/30`.
fn strict_network(field: &str, net: &Ipv4Net) -> Result<(), CoreError> {
    if net.addr() == net.network() {
        Ok(())
    } else {
        Err(invalid(format!("{field} {net} has host bits set")))
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::ValidationFailed {
        message: message.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_branch() -> BranchSpec {
        BranchSpec {
            name: "branch-042".into(),
            country: "US".into(),
            postal_code: "62269".into(),
            contact_name: "Pat Doe".into(),
            contact_email: "pat@example.com".into(),
            transit_net: "10.42.0.0/30".parse().unwrap(),
            corporate_nets: vec![
                "10.42.10.0/24".parse().unwrap(),
                "10.42.20.0/23".parse().unwrap(),
            ],
            byod_net: "10.42.30.0/24".parse().unwrap(),
            guest_net: "10.42.40.0/24".parse().unwrap(),
            wans: [
                WanUplink {
                    name: "Comcast".into(),
                    network: "198.51.100.0/29".parse().unwrap(),
                    local: "198.51.100.2".parse().unwrap(),
                    gateway: "198.51.100.1".parse().unwrap(),
                    upstream_mbps: 20.0,
                    downstream_mbps: 200.0,
                    standby: false,
                },
                WanUplink {
                    name: "AT&T".into(),
                    network: "203.0.113.8/30".parse().unwrap(),
                    local: "203.0.113.10".parse().unwrap(),
                    gateway: "203.0.113.9".parse().unwrap(),
                    upstream_mbps: 50.0,
                    downstream_mbps: 50.0,
                    standby: true,
                },
            ],
        }
    }

    #[test]
    fn sample_branch_is_valid() {
        sample_branch().validate().unwrap();
    }

    #[test]
    fn host_indexing_counts_from_network_address() {
        let net: Ipv4Net = "10.42.0.0/30".parse().unwrap();
        assert_eq!(nth_host(&net, 1), Some(Ipv4Addr::new(10, 42, 0, 1)));
        assert_eq!(nth_host(&net, 2), Some(Ipv4Addr::new(10, 42, 0, 2)));
        assert_eq!(nth_host(&net, 4), None);
    }

    #[test]
    fn transit_hosts() {
        let branch = sample_branch();
        assert_eq!(branch.transit_local().unwrap(), Ipv4Addr::new(10, 42, 0, 1));
        assert_eq!(branch.transit_peer().unwrap(), Ipv4Addr::new(10, 42, 0, 2));
        assert_eq!(branch.byod_gateway().unwrap(), Ipv4Addr::new(10, 42, 30, 1));
    }

    #[test]
    fn gateway_outside_network_is_rejected() {
        let mut branch = sample_branch();
        branch.wans[1].gateway = "203.0.113.1".parse().unwrap();
        let err = branch.validate().unwrap_err();
        assert!(err.to_string().contains("wans[1].gateway"), "{err}");
    }

    #[test]
    fn tiny_transit_is_rejected() {
        let mut branch = sample_branch();
        branch.transit_net = "10.42.0.0/31".parse().unwrap();
        assert!(matches!(
            branch.validate(),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn host_bits_are_rejected() {
        let mut branch = sample_branch();
        branch.corporate_nets.push("10.42.50.7/24".parse().unwrap());
        let err = branch.validate().unwrap_err();
        assert!(err.to_string().contains("host bits"), "{err}");
    }

    #[test]
    fn empty_corporate_list_is_rejected() {
        let mut branch = sample_branch();
        branch.corporate_nets.clear();
        assert!(branch.validate().is_err());
    }
}
