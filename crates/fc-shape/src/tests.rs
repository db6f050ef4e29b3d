//! Unit tests for fc-shape.

use fc_core::Vec3;

use crate::SlotShape;

fn close(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < 1e-4
}

#[cfg(test)]
mod line {
    use super::*;
    use crate::Line;

    #[test]
    fn two_members_straddle_center() {
        let line = Line { spacing: 2.0 };
        // Facing +Z, lateral is +X (Z × Y = -X... verified by symmetry below).
        let a = line.slot_position(0, 2, Vec3::ZERO, Vec3::Z, false);
        let b = line.slot_position(1, 2, Vec3::ZERO, Vec3::Z, false);
        assert!(close(a + b, Vec3::ZERO), "slots are symmetric about center");
        assert!((a.distance(b) - 2.0).abs() < 1e-4, "spacing respected");
        assert_eq!(a.z, 0.0, "line is perpendicular to facing");
    }

    #[test]
    fn single_member_sits_at_center() {
        let line = Line::default();
        let p = line.slot_position(0, 1, Vec3::new(5.0, 0.0, 5.0), Vec3::X, false);
        assert!(close(p, Vec3::new(5.0, 0.0, 5.0)));
    }

    #[test]
    fn capability_flags() {
        let line = Line::default();
        assert!(line.allows_optimal_assignment());
        assert!(line.allows_pre_formation_movement());
    }
}

#[cfg(test)]
mod column {
    use super::*;
    use crate::Column;

    #[test]
    fn trails_behind_facing() {
        let col = Column { spacing: 3.0 };
        let head = col.slot_position(0, 4, Vec3::ZERO, Vec3::Z, false);
        let second = col.slot_position(1, 4, Vec3::ZERO, Vec3::Z, false);
        assert!(close(head, Vec3::ZERO));
        assert!(close(second, Vec3::new(0.0, 0.0, -3.0)));
    }
}

#[cfg(test)]
mod circle {
    use super::*;
    use crate::Circle;

    #[test]
    fn all_slots_on_radius() {
        let circle = Circle { radius: 4.0 };
        let center = Vec3::new(1.0, 0.0, 2.0);
        for slot in 0..6 {
            let p = circle.slot_position(slot, 6, center, Vec3::Z, false);
            assert!((p.distance(center) - 4.0).abs() < 1e-3, "slot {slot} off radius");
        }
    }

    #[test]
    fn slot_zero_on_forward_axis() {
        let circle = Circle { radius: 4.0 };
        let p = circle.slot_position(0, 6, Vec3::ZERO, Vec3::Z, false);
        assert!(close(p, Vec3::new(0.0, 0.0, 4.0)));
    }

    #[test]
    fn slots_are_distinct() {
        let circle = Circle::default();
        let positions: Vec<Vec3> =
            (0..8).map(|s| circle.slot_position(s, 8, Vec3::ZERO, Vec3::X, false)).collect();
        for i in 0..positions.len() {
            for j in i + 1..positions.len() {
                assert!(positions[i].distance(positions[j]) > 0.1);
            }
        }
    }
}

#[cfg(test)]
mod grid {
    use super::*;
    use crate::Grid;

    #[test]
    fn fills_rows_then_columns() {
        let grid = Grid { columns: 3, spacing: 2.0 };
        let r0 = grid.slot_position(1, 6, Vec3::ZERO, Vec3::Z, false); // row 0, middle
        let r1 = grid.slot_position(4, 6, Vec3::ZERO, Vec3::Z, false); // row 1, middle
        assert!(close(r0, Vec3::ZERO), "middle of first row is the center");
        assert!(close(r1, Vec3::new(0.0, 0.0, -2.0)), "second row trails by spacing");
    }

    #[test]
    fn row_is_centered() {
        let grid = Grid { columns: 3, spacing: 2.0 };
        let left = grid.slot_position(0, 3, Vec3::ZERO, Vec3::Z, false);
        let right = grid.slot_position(2, 3, Vec3::ZERO, Vec3::Z, false);
        assert!(close(left + right, Vec3::ZERO));
    }
}

#[cfg(test)]
mod wedge {
    use super::*;
    use crate::Wedge;

    #[test]
    fn apex_at_center() {
        let wedge = Wedge::default();
        assert!(close(wedge.slot_position(0, 5, Vec3::ZERO, Vec3::Z, false), Vec3::ZERO));
    }

    #[test]
    fn arms_are_mirrored() {
        let wedge = Wedge { spacing: 2.0, half_angle_deg: 30.0 };
        let l = wedge.slot_position(1, 5, Vec3::ZERO, Vec3::Z, false);
        let r = wedge.slot_position(2, 5, Vec3::ZERO, Vec3::Z, false);
        assert!((l.z - r.z).abs() < 1e-4, "same distance behind apex");
        assert!((l.x + r.x).abs() < 1e-4, "opposite sides");
        assert!(l.z < 0.0, "arms trail the apex");
    }

    #[test]
    fn later_ranks_trail_further() {
        let wedge = Wedge::default();
        let near = wedge.slot_position(1, 7, Vec3::ZERO, Vec3::Z, false);
        let far = wedge.slot_position(3, 7, Vec3::ZERO, Vec3::Z, false);
        assert!(far.z < near.z);
    }
}

#[cfg(test)]
mod scatter {
    use super::*;
    use crate::Scatter;

    #[test]
    fn deterministic_per_slot() {
        let scatter = Scatter { radius: 5.0, seed: 99 };
        let a = scatter.slot_position(3, 10, Vec3::ZERO, Vec3::Z, false);
        let b = scatter.slot_position(3, 10, Vec3::ZERO, Vec3::Z, false);
        assert_eq!(a, b);
    }

    #[test]
    fn stays_inside_radius() {
        let scatter = Scatter { radius: 5.0, seed: 1 };
        for slot in 0..32 {
            let p = scatter.slot_position(slot, 32, Vec3::ZERO, Vec3::Z, false);
            assert!(p.length() <= 5.0 + 1e-3, "slot {slot} escaped the disc");
        }
    }

    #[test]
    fn declines_optimal_assignment() {
        assert!(!Scatter::default().allows_optimal_assignment());
    }

    #[test]
    fn seeds_diverge() {
        let a = Scatter { radius: 5.0, seed: 1 }.slot_position(0, 4, Vec3::ZERO, Vec3::Z, false);
        let b = Scatter { radius: 5.0, seed: 2 }.slot_position(0, 4, Vec3::ZERO, Vec3::Z, false);
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod registry {
    use std::sync::Arc;

    use super::*;
    use crate::{Line, ShapeRegistry};

    #[test]
    fn builtins_are_registered() {
        let reg = ShapeRegistry::with_builtins();
        for name in ["line", "column", "circle", "grid", "wedge", "scatter"] {
            assert!(reg.get(name).is_some(), "missing builtin {name}");
        }
        assert_eq!(reg.names().len(), 6);
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(ShapeRegistry::with_builtins().get("phalanx").is_none());
    }

    #[test]
    fn registration_replaces() {
        let mut reg = ShapeRegistry::with_builtins();
        reg.register(Arc::new(Line { spacing: 99.0 }));
        let line = reg.get("line").unwrap();
        let a = line.slot_position(0, 2, Vec3::ZERO, Vec3::Z, false);
        let b = line.slot_position(1, 2, Vec3::ZERO, Vec3::Z, false);
        assert!((a.distance(b) - 99.0).abs() < 1e-3);
    }
}
