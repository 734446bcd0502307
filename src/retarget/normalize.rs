//! Bone name canonicalization.
//!
//! Rigs from different tools name the same anatomical joint differently
//! (`mixamorig:LeftArm`, `Armature_LeftArm`, `left_arm`). [`normalize`]
//! reduces such names to a comparable key.

/// Rig prefixes removed from the start of a key.
pub const RIG_PREFIXES: [&str; 2] = ["mixamorig", "armature"];

/// Canonicalizes a raw joint name.
///
/// - lowercases,
/// - drops leading colon-qualified namespaces (`beta:`, `rig:beta:`), so
///   only the text after the last colon survives,
/// - keeps only `[a-z0-9]`,
/// - strips the [`RIG_PREFIXES`] from the front.
///
/// The result never starts with a rig prefix and contains only ASCII
/// lowercase letters and digits, so `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let lower = raw.to_lowercase();

    let unqualified = match lower.rfind(':') {
        Some(pos) => &lower[pos + 1..],
        None => lower.as_str(),
    };

    let filtered: String = unqualified
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();

    let mut key = filtered.as_str();
    while let Some(rest) = RIG_PREFIXES.iter().find_map(|p| key.strip_prefix(p)) {
        key = rest;
    }

    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_vendor_namespace() {
        assert_eq!(normalize("mixamorig:Hips"), "hips");
        assert_eq!(normalize("mixamorig:LeftUpLeg"), "leftupleg");
        assert_eq!(normalize("beta:Spine1"), "spine1");
        assert_eq!(normalize("rig:beta:Spine1"), "spine1");
        assert_eq!(normalize("Character1:mixamorig:Head"), "head");
    }

    #[test]
    fn strips_unqualified_prefixes() {
        assert_eq!(normalize("mixamorigHips"), "hips");
        assert_eq!(normalize("Armature_Hips"), "hips");
        assert_eq!(normalize("Armature|mixamorig:Head"), "head");
        assert_eq!(normalize("armature_mixamorig_Neck"), "neck");
    }

    #[test]
    fn keeps_digits_drops_punctuation() {
        assert_eq!(normalize("Spine_01"), "spine01");
        assert_eq!(normalize("Left Hand.R"), "lefthandr");
    }

    #[test]
    fn total_on_degenerate_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("___"), "");
        assert_eq!(normalize("::"), "");
        assert_eq!(normalize("Armature"), "");
        assert_eq!(normalize("ßñ"), "");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "mixamorig:Hips",
            "mixamorig_mixamorigHips",
            "Armature|Armature:Spine02",
            "UPPER-case 9",
            "",
            "::a::b",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
