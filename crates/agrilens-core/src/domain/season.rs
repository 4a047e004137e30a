use serde::{Deserialize, Serialize};
use time::Month;

/// Indian cropping season derived from the calendar month.
///
/// The mapping is total: every month falls into exactly one season, so
/// season derivation can never fail and needs no network access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
}

impl Season {
    pub fn for_month(month: Month) -> Self {
        match month {
            Month::June | Month::July | Month::August | Month::September | Month::October => {
                Self::Kharif
            }
            Month::November
            | Month::December
            | Month::January
            | Month::February
            | Month::March => Self::Rabi,
            Month::April | Month::May => Self::Zaid,
        }
    }

    pub fn current() -> Self {
        Self::for_month(time::OffsetDateTime::now_utc().month())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Kharif => "Kharif (Monsoon)",
            Self::Rabi => "Rabi (Winter)",
            Self::Zaid => "Zaid (Summer)",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_month_maps_to_a_season() {
        let expected = [
            (Month::January, Season::Rabi),
            (Month::February, Season::Rabi),
            (Month::March, Season::Rabi),
            (Month::April, Season::Zaid),
            (Month::May, Season::Zaid),
            (Month::June, Season::Kharif),
            (Month::July, Season::Kharif),
            (Month::August, Season::Kharif),
            (Month::September, Season::Kharif),
            (Month::October, Season::Kharif),
            (Month::November, Season::Rabi),
            (Month::December, Season::Rabi),
        ];

        for (month, season) in expected {
            assert_eq!(Season::for_month(month), season, "month {month:?}");
        }
    }

    #[test]
    fn labels_match_the_advisory_wording() {
        assert_eq!(Season::Kharif.label(), "Kharif (Monsoon)");
        assert_eq!(Season::Rabi.label(), "Rabi (Winter)");
        assert_eq!(Season::Zaid.label(), "Zaid (Summer)");
    }
}
