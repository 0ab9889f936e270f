use anyhow::{anyhow, bail};
use chrono::{Duration, NaiveDateTime};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rs422core::parameters::ParameterConfig;
use rs422core::prelude::{SeriesRecord, SeriesSource};

/// Draws simulated samples from `Normal(mean, std_dev)` of each parameter,
/// one per minute, ending one minute before `end`.
pub struct NormalSeriesGenerator {
    rng: StdRng,
    points: usize,
    end: NaiveDateTime,
}

impl NormalSeriesGenerator {
    pub fn new(points: usize, seed: Option<u64>, end: NaiveDateTime) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, points, end }
    }
}

impl SeriesSource for NormalSeriesGenerator {
    type Error = anyhow::Error;

    fn generate_series(&mut self, config: &ParameterConfig) -> anyhow::Result<SeriesRecord> {
        if config.std_dev < 0.0 {
            bail!("negative std_dev {} for {}", config.std_dev, config.name);
        }
        let normal = Normal::new(config.mean, config.std_dev)
            .map_err(|err| anyhow!("invalid distribution for {}: {}", config.name, err))?;

        let mut series = SeriesRecord::with_capacity(self.points);
        for minutes_back in (1..=self.points).rev() {
            let timestamp = self.end - Duration::minutes(minutes_back as i64);
            series.push(timestamp, normal.sample(&mut self.rng));
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rs422core::parameters::ParameterTable;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn generator_builds_expected_sample_count() {
        let table = ParameterTable::builtin();
        let mut generator = NormalSeriesGenerator::new(30, Some(7), noon());
        let series = generator
            .generate_series(table.get("Temperature").unwrap())
            .unwrap();
        assert_eq!(series.len(), 30);
        assert_eq!(series.time_labels().first().unwrap(), "11:30");
        assert_eq!(series.time_labels().last().unwrap(), "11:59");
    }

    #[test]
    fn seeded_generators_repeat() {
        let table = ParameterTable::builtin();
        let config = table.get("Voltage").unwrap();
        let a = NormalSeriesGenerator::new(10, Some(42), noon())
            .generate_series(config)
            .unwrap();
        let b = NormalSeriesGenerator::new(10, Some(42), noon())
            .generate_series(config)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_spread_yields_mean() {
        let mut config = ParameterTable::builtin().get("Humidity").unwrap().clone();
        config.std_dev = 0.0;
        let series = NormalSeriesGenerator::new(3, Some(1), noon())
            .generate_series(&config)
            .unwrap();
        assert!(series.values.iter().all(|&v| v == 45.0));
    }

    #[test]
    fn negative_spread_is_rejected() {
        let mut config = ParameterTable::builtin().get("Humidity").unwrap().clone();
        config.std_dev = -1.0;
        let err = NormalSeriesGenerator::new(3, Some(1), noon())
            .generate_series(&config)
            .unwrap_err();
        assert!(err.to_string().contains("negative std_dev"));
    }
}
