// Resolved interface identity

/// Fixed for the life of a polling session once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceIdentity {
    /// ifIndex; every counter OID is built from it.
    pub index: u32,
    pub name: String,
    /// Operator description (ifAlias), may be empty.
    pub alias: String,
    /// ifHighSpeed, megabits per second.
    pub speed_mbps: u64,
}

/// Identity plus the device-level text shown in the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub identity: InterfaceIdentity,
    pub sys_name: String,
}
