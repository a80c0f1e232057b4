//! Canonical ARN synthesis.
//!
//! Maps a `(resource type, resource name)` pair plus the raw event body to
//! the resource's canonical ARN. Region and account id are taken from the
//! event itself (`awsRegion`, `recipientAccountId`); a resource type this
//! module does not know how to render, or a missing prerequisite field,
//! yields `None` and the event is dropped downstream.

use serde_json::Value;

pub const EC2_INSTANCE_RTYPE: &str = "ec2Instance";
pub const S3_BUCKET_RTYPE: &str = "s3Bucket";
pub const AUTOSCALING_GROUP_RTYPE: &str = "autoscalingGroup";
pub const EC2_VPC_RTYPE: &str = "ec2Vpc";
pub const EC2_SUBNET_RTYPE: &str = "ec2Subnet";
pub const ELB_LOAD_BALANCER_RTYPE: &str = "elasticLoadBalancingLoadBalancer";
pub const EC2_INTERNET_GATEWAY_RTYPE: &str = "ec2InternetGateway";
pub const EC2_SECURITY_GROUP_RTYPE: &str = "ec2SecurityGroup";
pub const EC2_NETWORK_INTERFACE_RTYPE: &str = "ec2NetworkInterface";

fn event_str<'a>(event: &'a Value, key: &str) -> &'a str {
    event.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Synthesize the canonical ARN for a resource, or `None` when synthesis is
/// impossible for this type or event shape.
///
/// The live LookupEvents API reports resource types in their
/// `AWS::Service::Type` spelling; those are accepted as aliases of the
/// canonical lowerCamel types used by the identity table.
pub fn map_resource_type_to_arn(rtype: &str, rname: &str, event: &Value) -> Option<String> {
    if rname.is_empty() {
        return None;
    }

    // S3 bucket ARNs carry neither region nor account.
    if matches!(rtype, S3_BUCKET_RTYPE | "AWS::S3::Bucket") {
        return Some(format!("arn:aws:s3:::{rname}"));
    }

    let region = event_str(event, "awsRegion");
    let account = event_str(event, "recipientAccountId");
    if region.is_empty() || account.is_empty() {
        return None;
    }

    let arn = match rtype {
        EC2_INSTANCE_RTYPE | "AWS::EC2::Instance" => {
            format!("arn:aws:ec2:{region}:{account}:instance/{rname}")
        }
        AUTOSCALING_GROUP_RTYPE | "AWS::AutoScaling::AutoScalingGroup" => format!(
            "arn:aws:autoscaling:{region}:{account}:autoScalingGroup:*:autoScalingGroupName/{rname}"
        ),
        EC2_VPC_RTYPE | "AWS::EC2::VPC" => {
            format!("arn:aws:ec2:{region}:{account}:vpc/{rname}")
        }
        EC2_SUBNET_RTYPE | "AWS::EC2::Subnet" => {
            format!("arn:aws:ec2:{region}:{account}:subnet/{rname}")
        }
        ELB_LOAD_BALANCER_RTYPE | "AWS::ElasticLoadBalancing::LoadBalancer" => format!(
            "arn:aws:elasticloadbalancing:{region}:{account}:loadbalancer/{rname}"
        ),
        EC2_INTERNET_GATEWAY_RTYPE | "AWS::EC2::InternetGateway" => {
            format!("arn:aws:ec2:{region}:{account}:internet-gateway/{rname}")
        }
        EC2_SECURITY_GROUP_RTYPE | "AWS::EC2::SecurityGroup" => {
            format!("arn:aws:ec2:{region}:{account}:security-group/{rname}")
        }
        EC2_NETWORK_INTERFACE_RTYPE | "AWS::EC2::NetworkInterface" => {
            format!("arn:aws:ec2:{region}:{account}:network-interface/{rname}")
        }
        _ => return None,
    };

    Some(arn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event() -> Value {
        json!({
            "awsRegion": "us-east-1",
            "recipientAccountId": "123456789012"
        })
    }

    #[test]
    fn s3_bucket_needs_no_region_or_account() {
        let arn = map_resource_type_to_arn(S3_BUCKET_RTYPE, "my-bucket", &json!({})).unwrap();
        assert_eq!(arn, "arn:aws:s3:::my-bucket");
    }

    #[test]
    fn ec2_instance_arn_is_region_scoped() {
        let arn =
            map_resource_type_to_arn(EC2_INSTANCE_RTYPE, "i-0123456789abcdef0", &event()).unwrap();
        assert_eq!(
            arn,
            "arn:aws:ec2:us-east-1:123456789012:instance/i-0123456789abcdef0"
        );
    }

    #[test]
    fn cloudtrail_type_spelling_is_accepted() {
        let arn = map_resource_type_to_arn("AWS::EC2::VPC", "vpc-123", &event()).unwrap();
        assert_eq!(arn, "arn:aws:ec2:us-east-1:123456789012:vpc/vpc-123");
    }

    #[test]
    fn unknown_type_yields_none() {
        assert_eq!(map_resource_type_to_arn("dynamoTable", "t", &event()), None);
    }

    #[test]
    fn missing_account_yields_none() {
        let event = json!({ "awsRegion": "us-east-1" });
        assert_eq!(
            map_resource_type_to_arn(EC2_VPC_RTYPE, "vpc-123", &event),
            None
        );
    }

    #[test]
    fn empty_name_yields_none() {
        assert_eq!(map_resource_type_to_arn(S3_BUCKET_RTYPE, "", &event()), None);
    }
}
