use glam::{Affine3A, Vec3};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::errors::{OlloError, Result};
use crate::skeleton::transform::Transform;

/// Index of a joint inside its [`Skeleton`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointId(pub usize);

impl JointId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Joint {
    pub name: String,
    /// `None` for a root joint
    pub parent: Option<JointId>,
    /// Local rest (bind) transform relative to the parent
    pub rest: Transform,
}

/// Arena of joints forming a tree.
///
/// Joints are stored in insertion order and a parent always precedes its
/// children, so a single forward pass evaluates world transforms.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub id: Uuid,
    pub name: String,

    joints: Vec<Joint>,
    // First joint wins when names collide
    by_name: FxHashMap<String, JointId>,

    unit_scale: f32,
    units_normalized: bool,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            joints: Vec::new(),
            by_name: FxHashMap::default(),
            unit_scale: 1.0,
            units_normalized: false,
        }
    }

    /// Appends a joint. The parent must already be in the arena.
    pub fn add_joint(
        &mut self,
        name: &str,
        parent: Option<JointId>,
        rest: Transform,
    ) -> Result<JointId> {
        let id = JointId(self.joints.len());

        if let Some(parent) = parent
            && parent.0 >= id.0
        {
            return Err(OlloError::InvalidSkeleton {
                skeleton: self.name.clone(),
                reason: format!(
                    "joint '{name}' references parent {} which is not defined before it",
                    parent.0
                ),
            });
        }

        self.by_name.entry(name.to_string()).or_insert(id);
        self.joints.push(Joint {
            name: name.to_string(),
            parent,
            rest,
        });

        Ok(id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id.0)
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// Joint names in enumeration order.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.joints.iter().map(|j| j.name.as_str())
    }

    /// Finds a joint by exact name (first in enumeration order).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<JointId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn parent(&self, id: JointId) -> Option<JointId> {
        self.joints.get(id.0)?.parent
    }

    /// Multiplier that converts this skeleton's authored units into the
    /// target unit system (1.0 until [`normalize_units`](Self::normalize_units) is applied).
    #[inline]
    #[must_use]
    pub fn unit_scale(&self) -> f32 {
        self.unit_scale
    }

    /// Records the factor converting authored units into scene units, exactly once.
    ///
    /// Rest transforms keep their authored values; the factor is applied as a
    /// uniform scale above the root joints when composing world matrices, so
    /// clips authored in the same units stay consistent with the rest pose.
    /// Returns `false` (and leaves the skeleton untouched) when the skeleton
    /// was already normalized.
    pub fn normalize_units(&mut self, factor: f32) -> bool {
        if self.units_normalized {
            log::warn!(
                "Skeleton '{}' already normalized (unit scale {}), ignoring factor {factor}",
                self.name,
                self.unit_scale
            );
            return false;
        }

        self.unit_scale = factor;
        self.units_normalized = true;

        log::debug!(
            "Normalized skeleton '{}' units by {factor} ({} joints)",
            self.name,
            self.joints.len()
        );
        true
    }

    /// World-space rest matrices, indexed like the joints.
    #[must_use]
    pub fn world_rest_matrices(&self) -> Vec<Affine3A> {
        let locals: Vec<Transform> = self.joints.iter().map(|j| j.rest).collect();
        self.world_matrices(&locals)
    }

    /// Composes local transforms into world matrices, unit scale included.
    ///
    /// Missing entries in `locals` fall back to the rest transform.
    #[must_use]
    pub fn world_matrices(&self, locals: &[Transform]) -> Vec<Affine3A> {
        let units = Affine3A::from_scale(Vec3::splat(self.unit_scale));
        let mut world = Vec::with_capacity(self.joints.len());
        for (i, joint) in self.joints.iter().enumerate() {
            let local = locals.get(i).unwrap_or(&joint.rest).to_affine();
            let matrix = match joint.parent {
                Some(parent) => world[parent.0] * local,
                None => units * local,
            };
            world.push(matrix);
        }
        world
    }
}
