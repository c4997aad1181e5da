/// Round construction: the boxes shown for one level.
///
/// Exactly one box per round carries the target flag and the deviated
/// (darker) color; every other box shares the identical base color. Which
/// position is the target is chosen uniformly at random, so the view can
/// lay the boxes out in order without leaking the answer.

use rand::Rng;

use crate::game::color::Color;

#[derive(Clone, Copy, Debug)]
pub struct BoxSpec {
    pub color: Color,
    pub is_target: bool,
}

/// Build the boxes for one round. `count` must be ≥ 1.
pub fn build_boxes<R: Rng>(
    count: usize,
    base: Color,
    deviation: u8,
    rng: &mut R,
) -> Vec<BoxSpec> {
    let count = count.max(1);
    let target = rng.gen_range(0..count);

    (0..count)
        .map(|i| {
            if i == target {
                BoxSpec { color: base.deviated(deviation), is_target: true }
            } else {
                BoxSpec { color: base, is_target: false }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_target_per_round() {
        let mut rng = rand::thread_rng();
        let base = Color::new(200, 180, 160);
        for _ in 0..100 {
            let boxes = build_boxes(12, base, 20, &mut rng);
            assert_eq!(boxes.len(), 12);
            assert_eq!(boxes.iter().filter(|b| b.is_target).count(), 1);
        }
    }

    #[test]
    fn decoys_share_base_color_and_target_is_deviated() {
        let mut rng = rand::thread_rng();
        let base = Color::new(210, 190, 170);
        let boxes = build_boxes(9, base, 30, &mut rng);
        for b in &boxes {
            if b.is_target {
                assert_eq!(b.color, base.deviated(30));
            } else {
                assert_eq!(b.color, base);
            }
        }
    }

    #[test]
    fn single_box_round_is_the_target() {
        let mut rng = rand::thread_rng();
        let boxes = build_boxes(1, Color::new(128, 128, 128), 3, &mut rng);
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].is_target);
    }

    #[test]
    fn target_position_varies() {
        let mut rng = rand::thread_rng();
        let base = Color::new(200, 200, 200);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let boxes = build_boxes(8, base, 10, &mut rng);
            let idx = boxes.iter().position(|b| b.is_target).unwrap();
            seen.insert(idx);
        }
        // 200 draws across 8 positions: a stuck generator would show here.
        assert!(seen.len() > 1);
    }
}
