//! Unit tests for fc-nav.

#[cfg(test)]
mod kinematic {
    use fc_core::Vec3;

    use crate::{KinematicFollower, Motion, PathFollower};

    fn follower_at(x: f32) -> KinematicFollower {
        KinematicFollower::new(Vec3::new(x, 0.0, 0.0), Vec3::Z, 2.0)
    }

    #[test]
    fn no_destination_no_motion() {
        let mut f = follower_at(0.0);
        f.integrate(1.0);
        assert_eq!(f.position, Vec3::ZERO);
        assert_eq!(f.velocity, Vec3::ZERO);
        assert!(f.has_arrived(), "no destination counts as arrived");
        assert!(!f.has_path());
    }

    #[test]
    fn moves_toward_destination_at_speed() {
        let mut f = follower_at(0.0);
        assert!(f.set_destination(Vec3::new(10.0, 0.0, 0.0)));
        f.integrate(0.5);
        assert!((f.position.x - 1.0).abs() < 1e-4, "2 u/s for 0.5 s");
        assert!((f.velocity.length() - 2.0).abs() < 1e-3);
        assert!(f.has_path());
        assert!(!f.has_arrived());
        assert!((f.remaining_distance() - 9.0).abs() < 1e-3);
    }

    #[test]
    fn arrives_and_stops_moving() {
        let mut f = follower_at(0.0);
        f.set_destination(Vec3::new(1.0, 0.0, 0.0));
        for _ in 0..20 {
            f.integrate(0.1);
        }
        assert!(f.has_arrived());
        assert!(f.position.distance(Vec3::new(1.0, 0.0, 0.0)) <= f.arrive_radius);
        assert_eq!(f.velocity, Vec3::ZERO, "no residual velocity after arrival");
    }

    #[test]
    fn does_not_overshoot() {
        let mut f = follower_at(0.0);
        f.set_destination(Vec3::new(0.5, 0.0, 0.0));
        f.integrate(10.0); // one huge step
        assert!((f.position.x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn obstructed_blocks_motion() {
        let mut f = follower_at(0.0);
        f.set_destination(Vec3::new(10.0, 0.0, 0.0));
        f.obstructed = true;
        f.integrate(1.0);
        assert_eq!(f.position, Vec3::ZERO);
        assert_eq!(f.velocity, Vec3::ZERO);
        assert!(f.has_path(), "path stays active while obstructed");
        assert!(!f.has_arrived());
    }

    #[test]
    fn stop_clears_path() {
        let mut f = follower_at(0.0);
        f.set_destination(Vec3::new(10.0, 0.0, 0.0));
        f.stop();
        assert!(!f.has_path());
        assert_eq!(f.remaining_distance(), 0.0);
    }

    #[test]
    fn facing_is_normalized() {
        let mut f = follower_at(0.0);
        f.set_facing(Vec3::new(0.0, 0.0, 10.0));
        assert!((f.facing().length() - 1.0).abs() < 1e-5);
        // A zero direction is ignored rather than zeroing the facing.
        f.set_facing(Vec3::ZERO);
        assert!((f.facing().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sample_position_is_identity() {
        let f = follower_at(0.0);
        let mut p = Vec3::new(3.0, 4.0, 5.0);
        assert!(f.sample_position(&mut p));
        assert_eq!(p, Vec3::new(3.0, 4.0, 5.0));
    }
}

#[cfg(test)]
mod access {
    use std::collections::HashMap;

    use fc_core::{AgentId, Vec3};

    use crate::{KinematicFollower, NavAccess, PathFollower};

    fn fleet(n: usize) -> Vec<KinematicFollower> {
        (0..n)
            .map(|i| KinematicFollower::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::Z, 1.0))
            .collect()
    }

    #[test]
    fn slice_lookup_by_index() {
        let mut fleet = fleet(3);
        let f = fleet.follower_mut(AgentId(1)).unwrap();
        assert_eq!(f.position().x, 1.0);
        assert!(fleet.follower_mut(AgentId(3)).is_none());
        assert!(fleet.follower_mut(AgentId::INVALID).is_none());
    }

    #[test]
    fn map_lookup_by_key() {
        let mut map: HashMap<AgentId, KinematicFollower> = HashMap::new();
        map.insert(
            AgentId(7),
            KinematicFollower::new(Vec3::new(7.0, 0.0, 0.0), Vec3::Z, 1.0),
        );
        assert_eq!(map.follower_mut(AgentId(7)).unwrap().position().x, 7.0);
        assert!(map.follower_mut(AgentId(0)).is_none());
    }

    #[test]
    fn mutation_through_access() {
        let mut fleet = fleet(2);
        fleet
            .follower_mut(AgentId(0))
            .unwrap()
            .set_speed(9.0);
        assert_eq!(fleet[0].speed, 9.0);
    }
}
