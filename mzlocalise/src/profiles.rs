use thin_vec::ThinVec;

/// One placement hypothesis, the ascending sites of all modifications
pub type Profile = ThinVec<usize>;

/// Generate all ways of placing `count` indistinguishable modifications on the given sites. Every
/// profile is sorted ascending and every combination occurs exactly once. The sites are sorted and
/// deduplicated first. When there are fewer sites than modifications no profiles are returned.
pub fn site_profiles(sites: &[usize], count: usize) -> Vec<Profile> {
    let mut sites = sites.to_vec();
    sites.sort_unstable();
    sites.dedup();
    if count == 0 || sites.len() < count {
        return Vec::new();
    }

    let mut profiles: Vec<Profile> = sites.iter().map(|site| thin_vec::thin_vec![*site]).collect();
    for _ in 1..count {
        profiles = profiles
            .iter()
            .flat_map(|profile| {
                let last = profile.last().copied().unwrap_or_default();
                sites.iter().filter(move |site| **site > last).map(move |site| {
                    let mut extended = profile.clone();
                    extended.push(*site);
                    extended
                })
            })
            .collect();
    }
    profiles
}
