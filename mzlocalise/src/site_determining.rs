//! Site determining ions: the fragments that distinguish one placement of the modifications from
//! another, and the grouping of placements by the ions they produce in an m/z window.

use std::collections::{BTreeMap, BTreeSet};

use mzpeptide::prelude::*;
use ordered_float::OrderedFloat;

/// The m/z as used for comparing fragments between profiles. Rounded to micro Thomson so that
/// fragments with an identical composition compare equal regardless of summation order.
fn mz_key(mz: MassOverCharge) -> OrderedFloat<f64> {
    OrderedFloat((mz.value * 1e6).round() / 1e6)
}

/// All theoretical fragment m/z values that are generated by some but not all profiles, together
/// with the indices of the profiles that generate them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteDeterminingIons {
    ions: BTreeMap<OrderedFloat<f64>, Vec<usize>>,
}

impl SiteDeterminingIons {
    /// Find the site determining ions given the theoretical fragments for every profile
    pub fn new(profile_fragments: &[Vec<Fragment>]) -> Self {
        let mut ions: BTreeMap<OrderedFloat<f64>, Vec<usize>> = BTreeMap::new();
        for (profile, fragments) in profile_fragments.iter().enumerate() {
            let unique: BTreeSet<_> = fragments.iter().map(|f| mz_key(f.mz)).collect();
            for mz in unique {
                ions.entry(mz).or_default().push(profile);
            }
        }
        ions.retain(|_, profiles| profiles.len() < profile_fragments.len());
        Self { ions }
    }

    /// The number of site determining ions
    pub fn len(&self) -> usize {
        self.ions.len()
    }

    /// If there are no site determining ions, meaning that no profile can be distinguished from another
    pub fn is_empty(&self) -> bool {
        self.ions.is_empty()
    }

    /// All site determining ions with the profiles generating them
    pub fn iter(&self) -> impl Iterator<Item = (MassOverCharge, &[usize])> {
        self.ions
            .iter()
            .map(|(value, profiles)| (mz(value.0), profiles.as_slice()))
    }

    /// The site determining ions with `start < mz <= end`
    pub fn in_window(
        &self,
        start: MassOverCharge,
        end: MassOverCharge,
    ) -> impl Iterator<Item = (MassOverCharge, &[usize])> {
        self.iter().filter(move |(value, _)| *value > start && *value <= end)
    }

    /// Group the profiles on the set of site determining ions they have in the given window, and
    /// return one representative profile per group. All profiles without site determining ions in
    /// the window form one group. Returns `None` when the window has no site determining ions.
    pub fn window_groups(
        &self,
        start: MassOverCharge,
        end: MassOverCharge,
        profiles: usize,
    ) -> Option<Vec<usize>> {
        let mut per_profile: Vec<Vec<OrderedFloat<f64>>> = vec![Vec::new(); profiles];
        let mut any = false;
        for (value, generating) in self.in_window(start, end) {
            any = true;
            for profile in generating {
                if let Some(ions) = per_profile.get_mut(*profile) {
                    ions.push(mz_key(value));
                }
            }
        }
        if !any {
            return None;
        }
        let mut groups: BTreeMap<Vec<OrderedFloat<f64>>, usize> = BTreeMap::new();
        for (profile, ions) in per_profile.into_iter().enumerate() {
            groups.entry(ions).or_insert(profile);
        }
        let mut representatives = groups.into_values().collect::<Vec<_>>();
        representatives.sort_unstable();
        Some(representatives)
    }
}
