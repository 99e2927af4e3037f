//! Social adoption projection using discrete Bass diffusion.

use cac_types::SocialAdoption;

use crate::config::AdoptionConfig;

/// Cumulative adopted share of a normalised market after each month.
pub fn bass_cumulative(config: &AdoptionConfig, months: u32) -> Vec<f64> {
    let mut adopted = 0.0_f64;
    (0..months)
        .map(|_| {
            let new_adopters = (config.innovation + config.imitation * adopted) * (1.0 - adopted);
            adopted = (adopted + new_adopters).min(1.0);
            adopted
        })
        .collect()
}

pub fn project(config: &AdoptionConfig, horizon_months: u32) -> SocialAdoption {
    let cumulative = bass_cumulative(config, horizon_months);
    SocialAdoption {
        adoption_share: cumulative.last().copied().unwrap_or(0.0),
        yearly_curve: cumulative.iter().skip(11).step_by(12).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_month_is_pure_innovation() {
        let curve = bass_cumulative(&AdoptionConfig::default(), 3);
        assert!((curve[0] - 0.02).abs() < 1e-12);
        assert!(curve.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ten_year_projection_samples_each_year() {
        let adoption = project(&AdoptionConfig::default(), 120);
        assert_eq!(adoption.yearly_curve.len(), 10);
        assert_eq!(adoption.yearly_curve.last().copied(), Some(adoption.adoption_share));
        assert!(adoption.adoption_share > 0.99 && adoption.adoption_share <= 1.0);
    }
}
