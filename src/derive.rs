// Column derivations computed per report from the raw table cells

use nom::{
    bytes::complete::tag,
    character::complete::digit1,
    combinator::{all_consuming, map_res},
    sequence::separated_pair,
    IResult,
};

/// Manufacturer of a vehicle: the first whitespace-delimited token of its name.
///
/// A blank name maps to the empty string, which still forms its own group.
/// Multi-word makes ("Aston Martin") are split like any other name.
pub fn manufacturer(vehicle: &str) -> &str {
    vehicle.split_whitespace().next().unwrap_or("")
}

fn number(input: &str) -> IResult<&str, u64> {
    map_res(digit1, |s: &str| s.parse::<u64>())(input)
}

/// Parse the composite power/weight field.
/// Format: `<digits> / <digits>` with exactly one space either side of the slash.
fn parse_power_weight_field(input: &str) -> IResult<&str, (u64, u64)> {
    all_consuming(separated_pair(number, tag(" / "), number))(input)
}

/// Split a `"PS / KG"` cell into its power and mass, or `None` when the cell
/// does not hold exactly two non-negative integers around `" / "`.
pub fn power_weight(field: &str) -> Option<(u64, u64)> {
    parse_power_weight_field(field).ok().map(|(_, pair)| pair)
}

/// Paired power/mass values, with a count of the cells that were left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowerWeightSeries {
    pub power: Vec<u64>,
    pub mass: Vec<u64>,
    pub skipped: usize,
}

impl PowerWeightSeries {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }
}

/// Derive the power/mass view of a column. Unparseable cells only drop their
/// own record from this view.
pub fn power_weight_series<'a, I>(fields: I) -> PowerWeightSeries
where
    I: IntoIterator<Item = &'a str>,
{
    let mut series = PowerWeightSeries::default();
    for field in fields {
        match power_weight(field) {
            Some((ps, kg)) => {
                series.power.push(ps);
                series.mass.push(kg);
            }
            None => series.skipped += 1,
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_first_token() {
        assert_eq!(manufacturer("Porsche 911 GT2 RS MR"), "Porsche");
        assert_eq!(manufacturer("Acme"), "Acme");
        assert_eq!(manufacturer("  Zeta   Z  "), "Zeta");
    }

    #[test]
    fn test_manufacturer_blank_vehicle() {
        assert_eq!(manufacturer(""), "");
        assert_eq!(manufacturer("   "), "");
    }

    #[test]
    fn test_manufacturer_multi_word_make_is_split() {
        assert_eq!(manufacturer("Aston Martin Valkyrie"), "Aston");
    }

    #[test]
    fn test_power_weight_valid() {
        assert_eq!(power_weight("300 / 1200"), Some((300, 1200)));
        assert_eq!(power_weight("0 / 0"), Some((0, 0)));
    }

    #[test]
    fn test_power_weight_rejects_bad_tokens() {
        assert_eq!(power_weight("abc / 1200"), None);
        assert_eq!(power_weight("300 / ?"), None);
        assert_eq!(power_weight("-300 / 1200"), None);
        assert_eq!(power_weight("300.5 / 1200"), None);
        assert_eq!(power_weight(""), None);
    }

    #[test]
    fn test_power_weight_requires_spaced_separator() {
        assert_eq!(power_weight("300/1200"), None);
        assert_eq!(power_weight("300  / 1200"), None);
        assert_eq!(power_weight(" 300 / 1200"), None);
    }

    #[test]
    fn test_power_weight_requires_exactly_two_tokens() {
        assert_eq!(power_weight("300 / 1200 / 5"), None);
        assert_eq!(power_weight("300"), None);
    }

    #[test]
    fn test_power_weight_large_values_kept() {
        assert_eq!(power_weight("5000000000 / 1200"), Some((5_000_000_000, 1200)));
    }

    #[test]
    fn test_power_weight_overflow_is_skipped() {
        assert_eq!(power_weight("99999999999999999999 / 1200"), None);
    }

    #[test]
    fn test_series_counts_skipped_records() {
        let series = power_weight_series(["300 / 1200", "abc / 1200", "300/1200", "720 / 1470"]);
        assert_eq!(series.power, vec![300, 720]);
        assert_eq!(series.mass, vec![1200, 1470]);
        assert_eq!(series.skipped, 2);
        assert_eq!(series.len(), 2);
    }
}
