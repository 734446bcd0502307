//! Source → target joint name mapping.
//!
//! Matching runs in three tiers per source joint, each exposed on its own so
//! it can be exercised in isolation:
//!
//! 1. [`exact_match`] on normalized keys,
//! 2. [`fuzzy_match`] on key suffix/prefix containment,
//! 3. [`repair_root`] once all joints are processed, forcing a pelvis mapping
//!    when neither tier produced one.
//!
//! Ties always resolve to the first candidate in target enumeration order.

use rustc_hash::FxHashMap;

use crate::retarget::normalize::normalize;

/// Normalized names that identify the pelvis/root joint of a humanoid.
pub const ROOT_TOKENS: [&str; 3] = ["hips", "pelvis", "root"];

/// Partial mapping from source joint names to target joint names.
///
/// Built once per skeleton pair and read-only afterwards. Equality ignores
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    names: FxHashMap<String, String>,
}

impl NameMap {
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.names.get(source).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, source: &str) -> bool {
        self.names.contains_key(source)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(source, target)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.names.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.values().map(String::as_str)
    }

    fn insert(&mut self, source: &str, target: &str) -> Option<String> {
        self.names.insert(source.to_string(), target.to_string())
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for NameMap {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(s, t)| (s.into(), t.into())).collect(),
        }
    }
}

/// A target joint name paired with its normalized key.
#[derive(Debug, Clone)]
pub struct KeyedName<'a> {
    pub key: String,
    pub name: &'a str,
}

/// Normalizes every name once, keeping enumeration order.
#[must_use]
pub fn keyed<'a, T: AsRef<str>>(names: &'a [T]) -> Vec<KeyedName<'a>> {
    names
        .iter()
        .map(|n| KeyedName {
            key: normalize(n.as_ref()),
            name: n.as_ref(),
        })
        .collect()
}

/// Tier 1: first target whose key equals `key`.
#[must_use]
pub fn exact_match<'a>(key: &str, targets: &[KeyedName<'a>]) -> Option<&'a str> {
    targets.iter().find(|t| t.key == key).map(|t| t.name)
}

/// Tier 2: first target where either key ends with the other, or whose key
/// extends the source key (`spine` -> `spine01`).
///
/// A source key never matches a shorter target key by prefix, so `spine1`
/// and `spine2` do not both collapse onto `spine`. Empty keys never match.
#[must_use]
pub fn fuzzy_match<'a>(key: &str, targets: &[KeyedName<'a>]) -> Option<&'a str> {
    if key.is_empty() {
        return None;
    }
    targets
        .iter()
        .filter(|t| !t.key.is_empty())
        .find(|t| {
            let k = t.key.as_str();
            k.ends_with(key) || key.ends_with(k) || k.starts_with(key)
        })
        .map(|t| t.name)
}

fn contains_root_token(key: &str) -> bool {
    ROOT_TOKENS.iter().any(|token| key.contains(token))
}

/// Tier 3: make sure the pelvis is driven.
///
/// If no mapped target normalizes exactly to a [`ROOT_TOKENS`] entry, the
/// first source joint whose key contains a root token is force-mapped to the
/// first target joint whose key does. An existing mapping for that source
/// joint is overwritten. Returns the forced pair, if any.
pub fn repair_root<'a, S: AsRef<str>>(
    map: &mut NameMap,
    source: &'a [S],
    targets: &[KeyedName<'a>],
) -> Option<(&'a str, &'a str)> {
    let root_mapped = map
        .targets()
        .any(|t| ROOT_TOKENS.contains(&normalize(t).as_str()));
    if root_mapped {
        return None;
    }

    let target_root = targets.iter().find(|t| contains_root_token(&t.key))?.name;
    let source_root = source
        .iter()
        .map(AsRef::as_ref)
        .find(|s| contains_root_token(&normalize(s)))?;

    if let Some(previous) = map.insert(source_root, target_root) {
        log::debug!("Root repair replaced '{source_root}' -> '{previous}' with '{target_root}'");
    } else {
        log::debug!("Root repair mapped '{source_root}' -> '{target_root}'");
    }
    Some((source_root, target_root))
}

/// Builds the joint name map between two skeletons.
///
/// Deterministic: the same two name lists always produce the same map.
/// Duplicate source names keep their first mapping.
#[must_use]
pub fn build_map<S: AsRef<str>, T: AsRef<str>>(source: &[S], target: &[T]) -> NameMap {
    let mut map = NameMap::default();
    if source.is_empty() || target.is_empty() {
        return map;
    }

    let targets = keyed(target);

    for s in source {
        let s = s.as_ref();
        if map.contains_key(s) {
            continue;
        }
        let key = normalize(s);
        if let Some(t) = exact_match(&key, &targets).or_else(|| fuzzy_match(&key, &targets)) {
            map.insert(s, t);
        }
    }

    repair_root(&mut map, source, &targets);

    log::debug!(
        "Mapped {}/{} source joints onto {} target joints",
        map.len(),
        source.len(),
        target.len()
    );
    map
}
