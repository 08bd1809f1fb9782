use chrono::NaiveDate;

use crate::error::MatchError;
use crate::models::{AgeRange, BudgetBounds, DiscoveryFilters, Gender, HousingType, Profile};

/// Reject filter ranges whose minimum exceeds their maximum
pub fn validate_filters(filters: &DiscoveryFilters) -> Result<(), MatchError> {
    if filters.age_range.min > filters.age_range.max {
        return Err(MatchError::InvalidInput(format!(
            "age range min {} exceeds max {}",
            filters.age_range.min, filters.age_range.max
        )));
    }
    if filters.budget_range.min > filters.budget_range.max {
        return Err(MatchError::InvalidInput(format!(
            "budget range min {} exceeds max {}",
            filters.budget_range.min, filters.budget_range.max
        )));
    }
    if filters.min_compatibility_score > 100 {
        return Err(MatchError::InvalidInput(format!(
            "minimum compatibility score {} exceeds 100",
            filters.min_compatibility_score
        )));
    }
    Ok(())
}

// A missing attribute passes a filter only when that filter excludes nothing.

/// Whether the age filter is narrower than the default 18-99
pub fn restricts_age(filters: &DiscoveryFilters) -> bool {
    let default = AgeRange::default();
    filters.age_range.min > default.min || filters.age_range.max < default.max
}

pub fn restricts_budget(filters: &DiscoveryFilters) -> bool {
    let default = BudgetBounds::default();
    filters.budget_range.min > default.min || filters.budget_range.max < default.max
}

pub fn restricts_gender(filters: &DiscoveryFilters) -> bool {
    !filters.genders.is_empty() && !Gender::ALL.iter().all(|g| filters.genders.contains(g))
}

pub fn restricts_housing(filters: &DiscoveryFilters) -> bool {
    !filters.housing_types.is_empty()
        && !HousingType::ALL.iter().all(|h| filters.housing_types.contains(h))
}

/// Candidate age within the filter range
#[inline]
pub fn matches_age(profile: &Profile, filters: &DiscoveryFilters, today: NaiveDate) -> bool {
    match profile.age_on(today) {
        Some(age) => filters.age_range.contains(age),
        None => profile.birth_date.is_none() && !restricts_age(filters),
    }
}

/// Candidate budget overlaps the filter bounds
#[inline]
pub fn matches_budget(profile: &Profile, filters: &DiscoveryFilters) -> bool {
    match profile.preferences.budget {
        Some(budget) if budget.is_valid() => {
            budget.min.max(filters.budget_range.min) <= budget.max.min(filters.budget_range.max)
        }
        Some(_) => false,
        None => !restricts_budget(filters),
    }
}

#[inline]
pub fn matches_gender(profile: &Profile, filters: &DiscoveryFilters) -> bool {
    match profile.gender {
        Some(gender) => filters.genders.is_empty() || filters.genders.contains(&gender),
        None => !restricts_gender(filters),
    }
}

#[inline]
pub fn matches_housing(profile: &Profile, filters: &DiscoveryFilters) -> bool {
    let theirs = &profile.preferences.housing_types;
    if theirs.is_empty() {
        return !restricts_housing(filters);
    }
    filters.housing_types.is_empty() || !filters.housing_types.is_disjoint(theirs)
}

#[inline]
pub fn matches_photo(profile: &Profile, filters: &DiscoveryFilters) -> bool {
    !filters.require_photo || profile.has_photo()
}

#[inline]
pub fn matches_verification(profile: &Profile, filters: &DiscoveryFilters) -> bool {
    !filters.require_verified || profile.is_verified
}

/// All hard filters, cheapest first
#[inline]
pub fn passes_hard_filters(profile: &Profile, filters: &DiscoveryFilters, today: NaiveDate) -> bool {
    matches_verification(profile, filters)
        && matches_photo(profile, filters)
        && matches_gender(profile, filters)
        && matches_housing(profile, filters)
        && matches_age(profile, filters, today)
        && matches_budget(profile, filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetRange, Currency};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn create_test_profile(born: i32, gender: Gender) -> Profile {
        let mut profile = Profile::new("candidate");
        profile.birth_date = NaiveDate::from_ymd_opt(born, 6, 1);
        profile.gender = Some(gender);
        profile.preferences.budget = Some(BudgetRange { min: 900, max: 1400, currency: Currency::Usd });
        profile.preferences.housing_types = [HousingType::House].into_iter().collect();
        profile.photo_count = 2;
        profile
    }

    #[test]
    fn test_default_filters_accept() {
        let profile = create_test_profile(1996, Gender::Male);
        assert!(passes_hard_filters(&profile, &DiscoveryFilters::default(), today()));
    }

    #[test]
    fn test_age_filter() {
        let profile = create_test_profile(1996, Gender::Male); // 28
        let mut filters = DiscoveryFilters::default();
        filters.age_range = AgeRange { min: 30, max: 40 };
        assert!(!matches_age(&profile, &filters, today()));

        filters.age_range = AgeRange { min: 28, max: 28 };
        assert!(matches_age(&profile, &filters, today()));
    }

    #[test]
    fn test_budget_filter_overlap() {
        let profile = create_test_profile(1996, Gender::Male);
        let mut filters = DiscoveryFilters::default();

        filters.budget_range = BudgetBounds { min: 1400, max: 2000 };
        assert!(matches_budget(&profile, &filters));

        filters.budget_range = BudgetBounds { min: 1500, max: 2000 };
        assert!(!matches_budget(&profile, &filters));
    }

    #[test]
    fn test_gender_and_housing_sets() {
        let profile = create_test_profile(1996, Gender::Male);
        let mut filters = DiscoveryFilters::default();

        filters.genders = [Gender::Female].into_iter().collect();
        assert!(!matches_gender(&profile, &filters));
        filters.genders.insert(Gender::Male);
        assert!(matches_gender(&profile, &filters));

        filters.housing_types = [HousingType::Apartment].into_iter().collect();
        assert!(!matches_housing(&profile, &filters));
        filters.housing_types.insert(HousingType::House);
        assert!(matches_housing(&profile, &filters));
    }

    #[test]
    fn test_photo_and_verification() {
        let mut profile = create_test_profile(1996, Gender::Male);
        let filters = DiscoveryFilters {
            require_photo: true,
            require_verified: true,
            ..DiscoveryFilters::default()
        };
        assert!(!passes_hard_filters(&profile, &filters, today()));

        profile.is_verified = true;
        assert!(passes_hard_filters(&profile, &filters, today()));

        profile.photo_count = 0;
        assert!(!passes_hard_filters(&profile, &filters, today()));
    }

    #[test]
    fn test_malformed_ranges_rejected() {
        let filters = DiscoveryFilters {
            age_range: AgeRange { min: 40, max: 30 },
            ..DiscoveryFilters::default()
        };
        assert!(matches!(validate_filters(&filters), Err(MatchError::InvalidInput(_))));

        let filters = DiscoveryFilters {
            budget_range: BudgetBounds { min: 2000, max: 1000 },
            ..DiscoveryFilters::default()
        };
        assert!(validate_filters(&filters).is_err());
        assert!(validate_filters(&DiscoveryFilters::default()).is_ok());
    }

    #[test]
    fn test_missing_attributes_fail_only_restrictive_filters() {
        let sparse = Profile::new("sparse");
        assert!(passes_hard_filters(&sparse, &DiscoveryFilters::default(), today()));

        let every_value = DiscoveryFilters {
            genders: Gender::ALL.into_iter().collect(),
            housing_types: HousingType::ALL.into_iter().collect(),
            ..DiscoveryFilters::default()
        };
        assert!(passes_hard_filters(&sparse, &every_value, today()));

        let mut filters = DiscoveryFilters::default();
        filters.age_range = AgeRange { min: 30, max: 40 };
        assert!(!matches_age(&sparse, &filters, today()));

        let mut filters = DiscoveryFilters::default();
        filters.budget_range = BudgetBounds { min: 1000, max: 1200 };
        assert!(!matches_budget(&sparse, &filters));

        let mut filters = DiscoveryFilters::default();
        filters.genders = [Gender::Female].into_iter().collect();
        assert!(!matches_gender(&sparse, &filters));

        let mut filters = DiscoveryFilters::default();
        filters.housing_types = [HousingType::Studio].into_iter().collect();
        assert!(!matches_housing(&sparse, &filters));
    }
}
