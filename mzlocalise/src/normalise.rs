use std::collections::BTreeMap;

use context_error::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    binomial::log_sum_exp,
    error::{LocalisationError, LocalisationErrorKind},
    precision::Precision,
    profiles::Profile,
};

/// The final score of one placement profile
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProfileScore {
    /// The sites occupied in this profile
    pub sites: Profile,
    /// The natural log of the binomial probability of the matches being random
    pub ln_probability: f64,
    /// The share of this profile, as percentage of all profiles
    pub percentage: f64,
}

impl ProfileScore {
    /// The binomial probability of the matches being random, this can underflow to zero
    pub fn probability(&self) -> f64 {
        self.ln_probability.exp()
    }
}

/// Turn the raw probabilities of all profiles into percentages, with every profile weighted by
/// its inverse probability `(1/P) / sum(1/P) * 100`, and sum those per site. The sum over all
/// profiles is 100 and the sum over all sites is `100 * profile size`.
/// # Errors
/// * When a probability is out of range or zero.
/// * When a percentage is out of range.
/// * When one of the possible sites is not part of any profile.
pub fn normalise(
    profiles: &[Profile],
    ln_probabilities: &[f64],
    possible_sites: &[usize],
    precision: Precision,
) -> Result<(BTreeMap<usize, f64>, Vec<ProfileScore>), LocalisationError> {
    let ln_probabilities = ln_probabilities
        .iter()
        .map(|ln_p| precision.check_ln(*ln_p))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(index) = ln_probabilities.iter().position(|ln_p| !ln_p.is_finite()) {
        return Err(BoxedError::new(
            LocalisationErrorKind::NumericInconsistency,
            "Zero probability",
            format!(
                "The probability for profile [{}] is zero so its inverse is undefined",
                profiles.get(index).map_or_else(String::new, |p| p.iter().join(", "))
            ),
            Context::none(),
        ));
    }
    let ln_total = log_sum_exp(ln_probabilities.iter().map(|ln_p| -ln_p));
    if !ln_total.is_finite() {
        return Err(BoxedError::new(
            LocalisationErrorKind::NumericInconsistency,
            "Invalid inverse probability total",
            "The sum of inverse probabilities is not a positive finite number",
            Context::show(ln_total.to_string()),
        ));
    }

    let mut scores = Vec::with_capacity(profiles.len());
    let mut sites: BTreeMap<usize, f64> = BTreeMap::new();
    for (profile, ln_p) in profiles.iter().zip(ln_probabilities) {
        let share = precision.check((-ln_p - ln_total).exp())?;
        let percentage = share * 100.0;
        for site in profile {
            *sites.entry(*site).or_default() += percentage;
        }
        scores.push(ProfileScore {
            sites: profile.clone(),
            ln_probability: ln_p,
            percentage,
        });
    }

    if let Some(site) = possible_sites.iter().find(|site| !sites.contains_key(*site)) {
        return Err(BoxedError::new(
            LocalisationErrorKind::MissingSiteScore,
            "Site not scored",
            format!(
                "Site {site} did not receive a score, scored sites: {}",
                sites.keys().join(", ")
            ),
            Context::none(),
        ));
    }
    Ok((sites, scores))
}
