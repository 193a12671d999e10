//! Behavioral policy switches.

/// Policies that tighten behavior the upstream system left loose.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyConfig {
    /// When set, settlement status PATCHes must follow
    /// pending → processing → completed | failed | cancelled, with the three
    /// end states terminal. When unset, any status can be set from any other,
    /// which is the historical behavior.
    pub strict_settlement_transitions: bool,
}
