use std::fmt;

/// Renders a float into a fixed seven-character cell, switching to SI
/// suffixes outside the range where a plain decimal fits.
pub struct SiFloat(pub f64);

impl fmt::Display for SiFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.0.log10().floor() as isize;
        let si_scale = scale.div_euclid(3);
        if !self.0.is_finite() || self.0.is_sign_negative() {
            write!(f, "{:7.0e}", self.0)
        } else if (-2..=2).contains(&scale) {
            write!(f, "{:7.3}", self.0)
        } else if si_scale > 0 {
            if let Some(suffix) = ["k", "M", "G", "T"].get(si_scale as usize - 1) {
                let scaled = self.0 / (1000f64).powi(si_scale as i32);
                write!(f, "{scaled:5.1} {suffix}")
            } else {
                write!(f, "{:7e}", self.0)
            }
        } else if let Some(suffix) = ["m", "µ", "n", "p"].get(-si_scale as usize - 1) {
            let scaled = self.0 / (1000f64).powi(si_scale as i32);
            write!(f, "{scaled:5.1} {suffix}")
        } else {
            write!(f, "{:7}", 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_rendering() {
        let cases = [
            (1e-20, "      0"),
            (1e-6, "  1.0 µ"),
            (5e-6, "  5.0 µ"),
            (1e-5, " 10.0 µ"),
            (1e-4, "100.0 µ"),
            (1e-3, "  1.0 m"),
            (1e-2, "  0.010"),
            (1e-1, "  0.100"),
            (1e+0, "  1.000"),
            (5e+0, "  5.000"),
            (1e+1, " 10.000"),
            (1e+2, "100.000"),
            (5e+2, "500.000"),
            (1e+3, "  1.0 k"),
            (1e+4, " 10.0 k"),
            (1e+105, "  1e105"),
        ];
        for x in cases {
            assert_eq!(SiFloat(x.0).to_string(), x.1);
        }
    }

    #[test]
    fn special_values_keep_the_width() {
        let cases = [
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NAN,
            -f64::NAN,
            0f64,
            -0f64,
            f64::EPSILON / 4.0,
            -f64::EPSILON / 4.0,
        ];
        for x in cases {
            assert!(
                SiFloat(x).to_string().chars().count() == 7,
                "bad length: {}",
                SiFloat(x)
            );
        }
    }
}
