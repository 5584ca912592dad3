//! Value paths written by profile normalization and CLI flags

pub const CLOUDCORE_IMAGE_REPOSITORY: &str = "cloudCore.image.repository";
pub const CLOUDCORE_IMAGE_TAG: &str = "cloudCore.image.tag";
pub const IPTABLES_MGR_IMAGE_REPOSITORY: &str = "iptablesManager.image.repository";
pub const IPTABLES_MGR_IMAGE_TAG: &str = "iptablesManager.image.tag";
pub const IPTABLES_MGR_MODE: &str = "iptablesManager.mode";
pub const CLOUDHUB_ADVERTISE_ADDRESS: &str = "cloudCore.modules.cloudHub.advertiseAddress";
