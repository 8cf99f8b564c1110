//! Collectible resource nodes and the material power ladder
//!
//! A material's power is used twice: as weapon strength once collected and
//! as the value a mine emits. Collection only ever upgrades a weapon.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slotmap::Key;

use crate::core::error::SandboxError;
use crate::core::types::Vec2;
use crate::ecs::roster::Roster;
use crate::simulation::events::{EntityKind, SimulationEvent};
use crate::spatial::query::Positioned;

/// Agents pick up nodes strictly closer than this
pub const COLLECT_RADIUS: f32 = 15.0;

/// Tagged collectible material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Wood,
    Stone,
    Copper,
    Iron,
    Lapis,
    Gold,
    Peridot,
    Steel,
    Platinum,
    Topaz,
    Amethyst,
    Aquamarine,
    Sapphire,
    Emerald,
    Diamond,
    Ruby,
    Netherite,
    /// Rare ore only the mine produces
    Amandite,
}

impl Material {
    pub const ALL: [Material; 18] = [
        Material::Wood,
        Material::Stone,
        Material::Copper,
        Material::Iron,
        Material::Lapis,
        Material::Gold,
        Material::Peridot,
        Material::Steel,
        Material::Platinum,
        Material::Topaz,
        Material::Amethyst,
        Material::Aquamarine,
        Material::Sapphire,
        Material::Emerald,
        Material::Diamond,
        Material::Ruby,
        Material::Netherite,
        Material::Amandite,
    ];

    /// Power rank (1-16)
    pub fn power(&self) -> f32 {
        match self {
            Material::Wood => 1.0,
            Material::Stone => 2.0,
            Material::Copper => 3.0,
            Material::Iron | Material::Lapis => 4.0,
            Material::Gold | Material::Peridot | Material::Steel | Material::Platinum => 5.0,
            Material::Topaz | Material::Amethyst | Material::Aquamarine => 6.0,
            Material::Sapphire | Material::Emerald => 7.0,
            Material::Diamond => 8.0,
            Material::Ruby => 10.0,
            Material::Netherite => 12.0,
            Material::Amandite => 16.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Material::Wood => "wood",
            Material::Stone => "stone",
            Material::Copper => "copper",
            Material::Iron => "iron",
            Material::Lapis => "lapis",
            Material::Gold => "gold",
            Material::Peridot => "peridot",
            Material::Steel => "steel",
            Material::Platinum => "platinum",
            Material::Topaz => "topaz",
            Material::Amethyst => "amethyst",
            Material::Aquamarine => "aquamarine",
            Material::Sapphire => "sapphire",
            Material::Emerald => "emerald",
            Material::Diamond => "diamond",
            Material::Ruby => "ruby",
            Material::Netherite => "netherite",
            Material::Amandite => "amandite",
        }
    }
}

impl FromStr for Material {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if let Some(m) = Material::ALL.iter().find(|m| m.name() == lowered) {
            return Ok(*m);
        }
        // Portuguese tags used by older spawn menus
        match lowered.as_str() {
            "esmeralda" => Ok(Material::Emerald),
            "ametista" => Ok(Material::Amethyst),
            "peridote" => Ok(Material::Peridot),
            "aco" | "aço" => Ok(Material::Steel),
            "aquamarino" => Ok(Material::Aquamarine),
            "platina" => Ok(Material::Platinum),
            "amandita" => Ok(Material::Amandite),
            _ => Err(SandboxError::UnknownMaterial(s.to_string())),
        }
    }
}

/// A collectible material lying on the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub position: Vec2,
    pub material: Material,
}

impl ResourceNode {
    pub fn new(position: Vec2, material: Material) -> Self {
        Self { position, material }
    }
}

impl Positioned for ResourceNode {
    fn position(&self) -> Vec2 {
        self.position
    }
}

/// Visual/defense tier derived from weapon power
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ArmorTier {
    #[default]
    None = 0,
    Iron = 1,
    Gold = 2,
    Gem = 3,
}

impl ArmorTier {
    pub fn for_power(power: f32) -> Self {
        if power >= Material::Diamond.power() {
            ArmorTier::Gem
        } else if power >= Material::Gold.power() {
            ArmorTier::Gold
        } else if power >= Material::Iron.power() {
            ArmorTier::Iron
        } else {
            ArmorTier::None
        }
    }

    pub fn level(&self) -> u8 {
        *self as u8
    }
}

/// Weapon carried by a collecting agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Armament {
    pub power: f32,
    /// `None` until something has been collected
    pub material: Option<Material>,
}

impl Armament {
    pub fn bare(power: f32) -> Self {
        Self {
            power,
            material: None,
        }
    }

    /// Offer a collected material; returns true if the weapon changed
    ///
    /// A bare weapon adopts anything at least as strong. Afterwards only a
    /// strictly stronger material replaces it, so on ties the first
    /// material to reach the top power is kept.
    pub fn offer(&mut self, material: Material) -> bool {
        let power = material.power();
        let adopt = power > self.power || (self.material.is_none() && power >= self.power);
        if adopt {
            self.power = power;
            self.material = Some(material);
        }
        adopt
    }

    pub fn armor_tier(&self) -> ArmorTier {
        ArmorTier::for_power(self.power)
    }
}

/// Pick up every node strictly within [`COLLECT_RADIUS`] of `at`
///
/// Each node is removed and offered to `weapon`. Returns how many were taken.
pub fn collect_within<K: Key>(
    nodes: &mut Roster<K, ResourceNode>,
    at: Vec2,
    weapon: &mut Armament,
    collector: EntityKind,
    events: &mut Vec<SimulationEvent>,
) -> usize {
    let mut taken = 0;
    nodes.retain(|_, node| {
        if node.position.distance(&at) >= COLLECT_RADIUS {
            return true;
        }
        let upgraded = weapon.offer(node.material);
        events.push(SimulationEvent::ResourceCollected {
            collector,
            material: node.material,
            upgraded,
        });
        taken += 1;
        false
    });
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::new_key_type;

    new_key_type! {
        struct NodeId;
    }

    #[test]
    fn test_power_range() {
        for m in Material::ALL {
            assert!(m.power() >= 1.0 && m.power() <= 16.0, "{:?}", m);
        }
        assert_eq!(Material::Amandite.power(), 16.0);
    }

    #[test]
    fn test_parse_material_with_aliases() {
        assert_eq!("Diamond".parse::<Material>().unwrap(), Material::Diamond);
        assert_eq!("esmeralda".parse::<Material>().unwrap(), Material::Emerald);
        assert_eq!("aco".parse::<Material>().unwrap(), Material::Steel);
        assert!(matches!(
            "mithril".parse::<Material>(),
            Err(SandboxError::UnknownMaterial(_))
        ));
    }

    #[test]
    fn test_armament_never_downgrades() {
        let mut weapon = Armament::bare(1.0);
        assert!(weapon.offer(Material::Gold));
        assert!(!weapon.offer(Material::Stone));
        assert_eq!(weapon.power, 5.0);
        assert_eq!(weapon.material, Some(Material::Gold));
    }

    #[test]
    fn test_armament_tie_keeps_first_material() {
        let mut weapon = Armament::bare(1.0);
        weapon.offer(Material::Iron);
        assert!(!weapon.offer(Material::Lapis));
        assert_eq!(weapon.power, 4.0);
        assert_eq!(weapon.material, Some(Material::Iron));
    }

    #[test]
    fn test_bare_weapon_adopts_equal_power() {
        let mut weapon = Armament::bare(1.0);
        assert!(weapon.offer(Material::Wood));
        assert_eq!(weapon.material, Some(Material::Wood));
    }

    #[test]
    fn test_wanderer_starting_weapon_ignores_wood() {
        let mut weapon = Armament::bare(2.4);
        assert!(!weapon.offer(Material::Wood));
        assert!(!weapon.offer(Material::Stone));
        assert!(weapon.offer(Material::Copper));
    }

    #[test]
    fn test_collect_within_takes_only_nearby_nodes() {
        let mut nodes: Roster<NodeId, ResourceNode> = Roster::new();
        nodes.insert(ResourceNode::new(Vec2::new(10.0, 0.0), Material::Gold));
        nodes.insert(ResourceNode::new(Vec2::new(14.0, 0.0), Material::Stone));
        let far = nodes.insert(ResourceNode::new(Vec2::new(15.0, 0.0), Material::Ruby));

        let mut weapon = Armament::bare(1.0);
        let mut events = Vec::new();
        let taken = collect_within(
            &mut nodes,
            Vec2::ZERO,
            &mut weapon,
            EntityKind::Settler,
            &mut events,
        );

        assert_eq!(taken, 2);
        assert_eq!(nodes.len(), 1);
        assert!(nodes.contains(far));
        assert_eq!(weapon.material, Some(Material::Gold));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_collect_within_reports_in_insertion_order() {
        let mut nodes: Roster<NodeId, ResourceNode> = Roster::new();
        nodes.insert(ResourceNode::new(Vec2::new(5.0, 0.0), Material::Ruby));
        let kept = nodes.insert(ResourceNode::new(Vec2::new(30.0, 0.0), Material::Wood));
        nodes.insert(ResourceNode::new(Vec2::new(1.0, 0.0), Material::Stone));

        let mut weapon = Armament::bare(1.0);
        let mut events = Vec::new();
        collect_within(
            &mut nodes,
            Vec2::ZERO,
            &mut weapon,
            EntityKind::Wanderer,
            &mut events,
        );

        let materials: Vec<Material> = events
            .iter()
            .filter_map(|e| match e {
                SimulationEvent::ResourceCollected { material, .. } => Some(*material),
                _ => None,
            })
            .collect();
        assert_eq!(materials, vec![Material::Ruby, Material::Stone]);
        assert_eq!(nodes.first().map(|(id, _)| id), Some(kept));
        assert_eq!(weapon.material, Some(Material::Ruby));
    }

    #[test]
    fn test_armor_ladder() {
        assert_eq!(ArmorTier::for_power(1.0), ArmorTier::None);
        assert_eq!(ArmorTier::for_power(4.0), ArmorTier::Iron);
        assert_eq!(ArmorTier::for_power(5.0), ArmorTier::Gold);
        assert_eq!(ArmorTier::for_power(7.0), ArmorTier::Gold);
        assert_eq!(ArmorTier::for_power(8.0), ArmorTier::Gem);
        assert_eq!(ArmorTier::for_power(16.0), ArmorTier::Gem);
        assert_eq!(ArmorTier::Gem.level(), 3);
    }
}
