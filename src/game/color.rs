/// RGB color model for box rendering.
///
/// All gameplay colors come from `Color::random()`, which biases every
/// channel into the pastel range `[128, 255]`. The target box uses
/// `deviated()`, which darkens all three channels by the round's deviation.

use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }

    /// Generate a random pastel color.
    ///
    /// Each channel is drawn uniformly from [1, 255], then remapped through
    /// `(v + 255) / 2` to land in [128, 255]. Keeping the base colors light
    /// guarantees the darkened target stays well above black even at the
    /// maximum deviation.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Color {
            red: pastel(rng.gen_range(1..=255u16)),
            green: pastel(rng.gen_range(1..=255u16)),
            blue: pastel(rng.gen_range(1..=255u16)),
        }
    }

    /// The target's color: every channel darkened by `deviation`.
    /// Saturates at 0; with pastel base colors this never triggers.
    pub fn deviated(self, deviation: u8) -> Self {
        Color {
            red: self.red.saturating_sub(deviation),
            green: self.green.saturating_sub(deviation),
            blue: self.blue.saturating_sub(deviation),
        }
    }
}

fn pastel(v: u16) -> u8 {
    ((v + 255) / 2) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_channels_stay_in_pastel_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let c = Color::random(&mut rng);
            assert!(c.red >= 128, "red {} below pastel floor", c.red);
            assert!(c.green >= 128, "green {} below pastel floor", c.green);
            assert!(c.blue >= 128, "blue {} below pastel floor", c.blue);
        }
    }

    #[test]
    fn pastel_mapping_covers_full_domain() {
        assert_eq!(pastel(1), 128);
        assert_eq!(pastel(255), 255);
    }

    #[test]
    fn deviated_subtracts_from_every_channel() {
        let c = Color::new(200, 150, 128);
        let d = c.deviated(60);
        assert_eq!(d, Color::new(140, 90, 68));
    }

    #[test]
    fn deviated_saturates_at_zero() {
        let c = Color::new(130, 128, 129);
        let d = c.deviated(200);
        assert_eq!(d, Color::new(0, 0, 0));
    }

    #[test]
    fn deviation_of_zero_is_identity() {
        let c = Color::new(128, 200, 255);
        assert_eq!(c.deviated(0), c);
    }
}
