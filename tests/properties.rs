//! Property tests for the weapon ladder, terrain repulsion and edge handling

use proptest::prelude::*;

use life_sandbox::core::types::{Vec2, Viewport};
use life_sandbox::simulation::resource::{Armament, Material};
use life_sandbox::spatial::steering::Kinematics;
use life_sandbox::world::terrain::{Terrain, WorldShape};

fn material() -> impl Strategy<Value = Material> {
    (0..Material::ALL.len()).prop_map(|i| Material::ALL[i])
}

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

proptest! {
    #[test]
    fn test_weapon_is_running_maximum(collected in prop::collection::vec(material(), 1..40)) {
        let mut weapon = Armament::bare(1.0);
        let mut best = 0.0f32;
        let mut first_best = None;

        for m in &collected {
            let before = weapon.power;
            weapon.offer(*m);
            prop_assert!(weapon.power >= before);

            if m.power() > best {
                best = m.power();
                first_best = Some(*m);
            }
        }

        prop_assert_eq!(weapon.power, best);
        prop_assert_eq!(weapon.material, first_best);
    }

    #[test]
    fn test_complete_world_never_repels(x in 0.0f32..1280.0, y in 0.0f32..720.0) {
        let terrain = Terrain::new(WorldShape::Complete, viewport());
        let repel = terrain.repulsion(Vec2::new(x, y));
        prop_assert!(!repel.is_active());
        prop_assert!(!repel.inside);
    }

    #[test]
    fn test_repulsion_direction_is_unit(x in 0.0f32..1280.0, y in 0.0f32..720.0) {
        for shape in [WorldShape::Four, WorldShape::Half] {
            let terrain = Terrain::new(shape, viewport());
            let p = Vec2::new(x, y);
            let repel = terrain.repulsion(p);

            prop_assert_eq!(repel.inside, terrain.is_impassable(p));
            if repel.is_active() {
                prop_assert!((repel.direction.length() - 1.0).abs() < 1e-3);
                if repel.inside {
                    prop_assert!((repel.magnitude - 1.4).abs() < 1e-5);
                } else {
                    prop_assert!(repel.magnitude >= 0.15 && repel.magnitude <= 1.05 + 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_half_water_points_back_to_land(x in 641.0f32..850.0, y in 240.0f32..480.0) {
        let terrain = Terrain::new(WorldShape::Half, viewport());
        let repel = terrain.repulsion(Vec2::new(x, y));
        prop_assert!(repel.inside);
        prop_assert!(repel.is_active());
        prop_assert!(repel.direction.x < 0.0);
    }

    #[test]
    fn test_half_shore_pushes_inland(x in 0.0f32..640.0, y in 240.0f32..480.0) {
        let terrain = Terrain::new(WorldShape::Half, viewport());
        let repel = terrain.repulsion(Vec2::new(x, y));
        prop_assert!(!repel.inside);
        if repel.is_active() {
            prop_assert!(repel.direction.x < 0.0);
        }
    }

    #[test]
    fn test_steering_stays_inside_edge_margin(
        x in 0.0f32..1280.0,
        y in 0.0f32..720.0,
        dx in -5.0f32..5.0,
        dy in -5.0f32..5.0,
        speed in 0.1f32..6.0,
    ) {
        let mut body = Kinematics::at(Vec2::new(x, y), 0.0);
        body.velocity = Vec2::new(dx * 4.0, dy * 4.0);
        body.steer(Vec2::new(dx, dy), speed, std::iter::empty(), viewport());

        prop_assert!(body.position.x >= 6.0 && body.position.x <= 1274.0);
        prop_assert!(body.position.y >= 6.0 && body.position.y <= 714.0);
        prop_assert!(body.velocity.length() <= speed * 1.25 + 1e-3);
    }
}
