//! Resource identity resolution for raw CloudTrail events.
//!
//! Live LookupEvents responses usually carry a structured resource list next
//! to the raw event body; archive events never do. For events without a
//! structured entry, identity is reconstructed from the action name through a
//! static table: an auditable whitelist of which actions create resources and
//! where the created resource's name lives inside that action's
//! request/response shape.

use crate::app::arn;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Where to find a raw event's resource: its type, and the dotted search path
/// for its name within the event body.
#[derive(Debug, Clone, Copy)]
pub struct RawEventIdentity {
    pub resource_type: &'static str,
    pub resource_name_path: &'static str,
}

/// Maps CloudTrail `eventName` to a [`RawEventIdentity`]. Absence of an
/// action name means "no fallback mapping": such events are dropped, not
/// errors.
pub static RAW_EVENT_IDENTITIES: Lazy<HashMap<&'static str, RawEventIdentity>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        "RunInstances",
        RawEventIdentity {
            resource_type: arn::EC2_INSTANCE_RTYPE,
            resource_name_path: "responseElements.instancesSet.items.0.instanceId",
        },
    );
    map.insert(
        "CreateBucket",
        RawEventIdentity {
            resource_type: arn::S3_BUCKET_RTYPE,
            resource_name_path: "requestParameters.bucketName",
        },
    );
    map.insert(
        "CreateAutoScalingGroup",
        RawEventIdentity {
            resource_type: arn::AUTOSCALING_GROUP_RTYPE,
            resource_name_path: "requestParameters.autoScalingGroupName",
        },
    );
    map.insert(
        "CreateVpc",
        RawEventIdentity {
            resource_type: arn::EC2_VPC_RTYPE,
            resource_name_path: "responseElements.vpc.vpcId",
        },
    );
    map.insert(
        "CreateSubnet",
        RawEventIdentity {
            resource_type: arn::EC2_SUBNET_RTYPE,
            resource_name_path: "responseElements.subnet.subnetId",
        },
    );
    map.insert(
        "CreateLoadBalancer",
        RawEventIdentity {
            resource_type: arn::ELB_LOAD_BALANCER_RTYPE,
            resource_name_path: "requestParameters.loadBalancerName",
        },
    );
    map.insert(
        "CreateInternetGateway",
        RawEventIdentity {
            resource_type: arn::EC2_INTERNET_GATEWAY_RTYPE,
            resource_name_path: "responseElements.internetGateway.internetGatewayId",
        },
    );
    map.insert(
        "CreateSecurityGroup",
        RawEventIdentity {
            resource_type: arn::EC2_SECURITY_GROUP_RTYPE,
            resource_name_path: "responseElements.groupId",
        },
    );
    map.insert(
        "CreateNetworkInterface",
        RawEventIdentity {
            resource_type: arn::EC2_NETWORK_INTERFACE_RTYPE,
            resource_name_path: "responseElements.networkInterface.networkInterfaceId",
        },
    );

    map
});

/// A structured resource entry from the live LookupEvents envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub resource_type: String,
    pub resource_name: String,
}

impl ResourceRef {
    /// A ref with an empty name or type carries no usable identity and is
    /// discarded.
    pub fn is_valid(&self) -> bool {
        !self.resource_type.is_empty() && !self.resource_name.is_empty()
    }
}

/// Extract a value from JSON using a dotted path where numeric segments index
/// into arrays (e.g. `"responseElements.instancesSet.items.0.instanceId"`).
pub fn get_json_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = json;

    for part in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => current.get(part)?,
        };
    }

    Some(current)
}

/// Resolve the `(resource type, resource name)` identity of one event.
///
/// A valid structured ref wins outright; otherwise the event's `eventName`
/// is looked up in [`RAW_EVENT_IDENTITIES`] and the name is extracted by
/// following the table entry's search path. A table miss or an empty
/// extracted name means the resource cannot be identified and yields `None`.
pub fn resolve_identity(
    event: &Value,
    resource: Option<&ResourceRef>,
) -> Option<(String, String)> {
    if let Some(r) = resource.filter(|r| r.is_valid()) {
        return Some((r.resource_type.clone(), r.resource_name.clone()));
    }

    let event_name = event.get("eventName").and_then(Value::as_str)?;
    let identity = match RAW_EVENT_IDENTITIES.get(event_name) {
        Some(identity) => identity,
        None => {
            debug!(event_name, "no identity mapping for action, dropping event");
            return None;
        }
    };

    let name = get_json_path(event, identity.resource_name_path)
        .and_then(Value::as_str)
        .unwrap_or("");
    if name.is_empty() {
        debug!(
            event_name,
            path = identity.resource_name_path,
            "resource name not found in event body, dropping event"
        );
        return None;
    }

    Some((identity.resource_type.to_string(), name.to_string()))
}
