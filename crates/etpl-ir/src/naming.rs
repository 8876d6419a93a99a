//! Sibling name disambiguation (§3.1: "names are disambiguated on insertion
//! by appending `_2`, `_3`, ... when a clash exists") and synthetic-name
//! generation for anonymous nodes (§4.2).

/// Find a name not already present in `existing`, starting from `proposal`
/// and trying `proposal_2`, `proposal_3`, ... Mirrors `core.py`'s
/// `getUniqueName`.
#[must_use]
pub fn unique_name(existing: &[String], proposal: &str) -> String {
    if !existing.iter().any(|n| n == proposal) {
        return proposal.to_string();
    }
    for i in 2u64.. {
        let candidate = format!("{proposal}_{i}");
        if !existing.iter().any(|n| n == &candidate) {
            return candidate;
        }
    }
    unreachable!("existing names set cannot be infinite")
}
