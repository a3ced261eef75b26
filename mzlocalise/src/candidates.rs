use context_error::*;
use itertools::Itertools;
use mzpeptide::prelude::*;

use crate::error::{LocalisationError, LocalisationErrorKind};

/// The validated input of a localisation run: which modifications are localised, how many of them
/// are on the peptide, and where they could go.
#[derive(Clone, Debug)]
pub(crate) struct LocalisationProblem<'a> {
    /// The names of the modifications to localise
    pub names: Vec<&'a str>,
    /// The number of modifications to place
    pub count: usize,
    /// All sites where any of the modifications could be placed, sorted
    pub possible_sites: Vec<usize>,
    /// The peptide without the modifications to localise
    pub base: Peptide,
    /// The possible sites of each modification on the base peptide
    sites_per_modification: Vec<(&'a Modification, Vec<usize>)>,
}

impl<'a> LocalisationProblem<'a> {
    /// Check the input and determine the possible sites.
    /// # Errors
    /// * When no modifications are given.
    /// * When the modifications do not have the same mass (within `tolerance`).
    /// * When none of the modifications are placed as variable modification on the peptide.
    /// * When there are fewer possible sites than modifications to place.
    pub(crate) fn new(
        peptide: &Peptide,
        modifications: &'a [Modification],
        tolerance: Mass,
    ) -> Result<Self, LocalisationError> {
        let Some(first) = modifications.first() else {
            return Err(BoxedError::new(
                LocalisationErrorKind::InvalidInput,
                "No modifications to localise",
                "At least one modification has to be given to localise",
                Context::show(peptide.to_string()),
            ));
        };
        if let Some(different) = modifications
            .iter()
            .find(|m| (m.mass - first.mass).value.abs() > tolerance.value)
        {
            return Err(BoxedError::new(
                LocalisationErrorKind::InvalidInput,
                "Modifications of different mass",
                format!(
                    "All modifications localised together need the same mass, but {} ({}) differs from {} ({})",
                    different.name, different.mass.value, first.name, first.mass.value
                ),
                Context::none(),
            ));
        }
        let names = modifications.iter().map(|m| m.name.as_str()).unique().collect_vec();
        let count = peptide.count_variable(&names);
        if count == 0 {
            return Err(BoxedError::new(
                LocalisationErrorKind::InvalidInput,
                "Modifications not found",
                format!(
                    "None of the modifications to localise ({}) are placed as variable modification on the peptide",
                    names.join(", ")
                ),
                Context::show(peptide.to_string()),
            ));
        }
        let base = peptide.without_variable_modifications(&names);
        let sites_per_modification = modifications
            .iter()
            .map(|m| (m, m.possible_sites(&base)))
            .collect_vec();
        let possible_sites = sites_per_modification
            .iter()
            .flat_map(|(_, sites)| sites.iter().copied())
            .sorted_unstable()
            .dedup()
            .collect_vec();
        if possible_sites.len() < count {
            return Err(BoxedError::new(
                LocalisationErrorKind::InvalidInput,
                "Too few possible sites",
                format!(
                    "Found {} possible sites ({}) for {count} modifications",
                    possible_sites.len(),
                    possible_sites.iter().join(", ")
                ),
                Context::show(peptide.to_string()),
            ));
        }
        Ok(Self {
            names,
            count,
            possible_sites,
            base,
            sites_per_modification,
        })
    }

    /// If every possible site has to be occupied
    pub(crate) fn is_unambiguous(&self) -> bool {
        self.possible_sites.len() == self.count
    }

    /// The base peptide with the modifications placed on the given sites. Each site receives the
    /// first modification that allows that site.
    /// # Errors
    /// When a site is not a possible site.
    pub(crate) fn candidate(&self, sites: &[usize]) -> Result<Peptide, LocalisationError> {
        let mut peptide = self.base.clone();
        for site in sites {
            let Some((modification, _)) = self
                .sites_per_modification
                .iter()
                .find(|(_, possible)| possible.contains(site))
            else {
                return Err(BoxedError::new(
                    LocalisationErrorKind::InvalidInput,
                    "Impossible site",
                    format!("None of the modifications can be placed on site {site}"),
                    Context::show(self.base.to_string()),
                ));
            };
            peptide = peptide
                .with_modification((*modification).clone(), *site, true)
                .map_err(|err| {
                    err.convert::<LocalisationErrorKind, LocalisationError>(|_| {
                        LocalisationErrorKind::InvalidInput
                    })
                })?;
        }
        Ok(peptide)
    }
}

/// The annotation settings used for scoring: only backbone fragments, and the neutral losses only
/// when requested and when they cannot be confused with the modification itself.
pub(crate) fn scoring_parameters(
    specific_parameters: &SpecificAnnotationParameters,
    modifications: &[Modification],
    account_neutral_losses: bool,
    tolerance: Mass,
) -> SpecificAnnotationParameters {
    let losses = if account_neutral_losses {
        specific_parameters
            .neutral_losses
            .iter()
            .filter(|loss| {
                modifications
                    .iter()
                    .all(|m| (loss.mass - m.mass).value.abs() > tolerance.value)
            })
            .cloned()
            .collect_vec()
    } else {
        Vec::new()
    };
    specific_parameters
        .clone()
        .precursor_ions(false)
        .immonium_ions(false)
        .neutral_losses(losses)
}
