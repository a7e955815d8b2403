//! Daily aggregation of 3-hour forecast samples.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::types::{DaySummary, ForecastSample};

/// Group samples by calendar day in the system time zone.
///
/// See [`aggregate_daily_in`].
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DaySummary> {
    aggregate_daily_in(samples, &Local)
}

/// Group samples by their calendar day in `tz` and reduce each day to one summary.
///
/// Days appear in the order their first sample appears. Each summary is a copy
/// of the day's first sample with `temp_max`/`temp_min` replaced by the highest
/// `temp_max` and lowest `temp_min` of that day. Samples whose timestamp cannot
/// be represented are skipped.
pub fn aggregate_daily_in<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<DaySummary> {
    let mut days: Vec<DaySummary> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let Some(date) = local_date(sample.dt, tz) else {
            tracing::debug!("Skipping forecast sample with out-of-range timestamp {}", sample.dt);
            continue;
        };

        match index.get(&date) {
            Some(&i) => {
                let main = &mut days[i].sample.main;
                main.temp_max = main.temp_max.max(sample.main.temp_max);
                main.temp_min = main.temp_min.min(sample.main.temp_min);
            }
            None => {
                index.insert(date, days.len());
                days.push(DaySummary {
                    date,
                    sample: sample.clone(),
                });
            }
        }
    }

    days
}

fn local_date<Tz: TimeZone>(epoch_secs: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_secs, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::types::{ConditionInfo, MainInfo};
    use chrono::{FixedOffset, Utc};

    // 2024-09-28T00:00:00Z
    const DAY_ONE: i64 = 1_727_481_600;
    const THREE_HOURS: i64 = 3 * 3600;

    fn sample(dt: i64, temp_min: f64, temp_max: f64, description: &str) -> ForecastSample {
        ForecastSample {
            dt,
            main: MainInfo {
                temp: (temp_min + temp_max) / 2.0,
                feels_like: temp_max,
                temp_min,
                temp_max,
                pressure: 1010,
                humidity: 60,
            },
            weather: vec![ConditionInfo {
                id: 800,
                main: "Clear".to_string(),
                description: description.to_string(),
                icon: "01d".to_string(),
            }],
            clouds: Default::default(),
            wind: Default::default(),
            visibility: 10000,
            pop: 0.0,
            dt_txt: String::new(),
        }
    }

    /// Two UTC days, eight samples each, with varying temperatures.
    fn two_days() -> Vec<ForecastSample> {
        let day_one_max = [20.0, 22.5, 27.0, 31.0, 29.5, 24.0, 21.0, 19.0];
        let day_two_max = [18.0, 17.5, 23.0, 26.0, 25.0, 22.0, 20.0, 16.0];
        let mut samples = Vec::new();
        for (i, max) in day_one_max.iter().enumerate() {
            let desc = if i == 0 { "first of day one" } else { "later" };
            samples.push(sample(DAY_ONE + i as i64 * THREE_HOURS, max - 5.0, *max, desc));
        }
        for (i, max) in day_two_max.iter().enumerate() {
            let desc = if i == 0 { "first of day two" } else { "later" };
            samples.push(sample(DAY_ONE + 86_400 + i as i64 * THREE_HOURS, max - 6.0, *max, desc));
        }
        samples
    }

    #[test]
    fn test_two_days_yield_two_summaries() {
        let days = aggregate_daily_in(&two_days(), &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].max_temp(), 31.0);
        assert_eq!(days[0].min_temp(), 14.0);
        assert_eq!(days[1].max_temp(), 26.0);
        assert_eq!(days[1].min_temp(), 10.0);
    }

    #[test]
    fn test_summary_keeps_first_sample_fields() {
        let input = two_days();
        let days = aggregate_daily_in(&input, &Utc);

        assert_eq!(days[0].sample.dt, input[0].dt);
        assert_eq!(days[0].sample.weather[0].description, "first of day one");
        assert_eq!(days[0].sample.main.temp, input[0].main.temp);
        assert_eq!(days[1].sample.dt, input[8].dt);
        assert_eq!(days[1].sample.weather[0].description, "first of day two");
        assert!(days[0].date < days[1].date);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let input = two_days();
        let first = aggregate_daily_in(&input, &Utc);
        let second = aggregate_daily_in(&input, &Utc);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_daily_in(&[], &Utc).is_empty());
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn test_single_sample_group_is_unchanged() {
        let only = sample(DAY_ONE, 3.0, 9.0, "alone");
        let days = aggregate_daily_in(std::slice::from_ref(&only), &Utc);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].sample, only);
    }

    #[test]
    fn test_grouping_follows_time_zone() {
        // 22:00Z and 23:00Z on day one are already the next day at UTC+3.
        let late = vec![
            sample(DAY_ONE + 20 * 3600, 10.0, 12.0, "a"),
            sample(DAY_ONE + 22 * 3600, 8.0, 11.0, "b"),
            sample(DAY_ONE + 23 * 3600, 7.0, 15.0, "c"),
        ];
        let utc_days = aggregate_daily_in(&late, &Utc);
        assert_eq!(utc_days.len(), 1);

        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        let shifted = aggregate_daily_in(&late, &plus_three);
        assert_eq!(shifted.len(), 2);
        assert_eq!(shifted[0].max_temp(), 12.0);
        assert_eq!(shifted[1].max_temp(), 15.0);
        assert_eq!(shifted[1].min_temp(), 7.0);
    }

    #[test]
    fn test_out_of_range_timestamp_is_skipped() {
        let input = vec![sample(i64::MAX, 0.0, 1.0, "bad"), sample(DAY_ONE, 4.0, 6.0, "good")];
        let days = aggregate_daily_in(&input, &Utc);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].sample.weather[0].description, "good");
    }
}
