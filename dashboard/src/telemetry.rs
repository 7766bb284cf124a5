use crate::model::{Metric, Reading};
use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use rand::Rng;

/// Shape of one simulated signal: `base + amplitude * wave(minute / period)`,
/// plus uniform jitter in `[-jitter, jitter)`, clamped to `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct SignalShape {
    pub base: f64,
    pub amplitude: f64,
    pub period: f64,
    pub wave: Wave,
    pub jitter: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy)]
pub enum Wave {
    Sin,
    Cos,
}

const SOIL: SignalShape = SignalShape {
    base: 50.0,
    amplitude: 10.0,
    period: 5.0,
    wave: Wave::Sin,
    jitter: 5.0,
    min: 15.0,
    max: 85.0,
};

const HUMIDITY: SignalShape = SignalShape {
    base: 60.0,
    amplitude: 15.0,
    period: 7.0,
    wave: Wave::Cos,
    jitter: 4.0,
    min: 20.0,
    max: 90.0,
};

const WIND: SignalShape = SignalShape {
    base: 25.0,
    amplitude: 8.0,
    period: 3.0,
    wave: Wave::Sin,
    jitter: 3.0,
    min: 5.0,
    max: 45.0,
};

const TEMPERATURE: SignalShape = SignalShape {
    base: 22.0,
    amplitude: 5.0,
    period: 10.0,
    wave: Wave::Sin,
    jitter: 2.0,
    min: 10.0,
    max: 35.0,
};

pub fn shape(metric: Metric) -> &'static SignalShape {
    match metric {
        Metric::Soil => &SOIL,
        Metric::Humidity => &HUMIDITY,
        Metric::Wind => &WIND,
        Metric::Temperature => &TEMPERATURE,
    }
}

impl SignalShape {
    /// Deterministic part of the signal for a wall-clock minute (0..=59)
    pub fn base_at(&self, minute: u32) -> f64 {
        let x = f64::from(minute) / self.period;
        let wave = match self.wave {
            Wave::Sin => x.sin(),
            Wave::Cos => x.cos(),
        };
        self.base + self.amplitude * wave
    }

    pub fn sample(&self, rng: &mut impl Rng, minute: u32) -> f64 {
        let jitter = rng.gen_range(-self.jitter..self.jitter);
        (self.base_at(minute) + jitter).clamp(self.min, self.max)
    }
}

/// Produces one reading for the given local time
pub fn generate_reading<Tz: TimeZone>(rng: &mut impl Rng, now: &DateTime<Tz>) -> Reading
where
    Tz::Offset: std::fmt::Display,
{
    let minute = now.minute();

    Reading {
        timestamp: now.with_timezone(&Utc),
        label: now.format("%H:%M:%S").to_string(),
        soil: shape(Metric::Soil).sample(rng, minute),
        humidity: shape(Metric::Humidity).sample(rng, minute),
        wind: shape(Metric::Wind).sample(rng, minute),
        temperature: shape(Metric::Temperature).sample(rng, minute),
    }
}

pub fn generate_reading_now(rng: &mut impl Rng) -> Reading {
    generate_reading(rng, &Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_readings_stay_within_clamp_ranges() {
        let mut rng = StdRng::seed_from_u64(7);

        for minute in 0..60 {
            let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 30).unwrap();
            for _ in 0..50 {
                let reading = generate_reading(&mut rng, &now);
                for metric in Metric::ALL {
                    let s = shape(metric);
                    let v = reading.value(metric);
                    assert!(
                        v >= s.min && v <= s.max,
                        "{} value {} out of [{}, {}]",
                        metric,
                        v,
                        s.min,
                        s.max
                    );
                }
            }
        }
    }

    #[test]
    fn test_readings_stay_near_base_term() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 17, 0).unwrap();

        for _ in 0..200 {
            let reading = generate_reading(&mut rng, &now);
            for metric in Metric::ALL {
                let s = shape(metric);
                let expected = s.base_at(17).clamp(s.min, s.max);
                assert!((reading.value(metric) - expected).abs() <= s.jitter);
            }
        }
    }

    #[test]
    fn test_base_terms() {
        assert!((SOIL.base_at(0) - 50.0).abs() < 1e-9);
        assert!((HUMIDITY.base_at(0) - 75.0).abs() < 1e-9);
        assert!((WIND.base_at(0) - 25.0).abs() < 1e-9);
        assert!((TEMPERATURE.base_at(0) - 22.0).abs() < 1e-9);

        let expected = 50.0 + 10.0 * (30.0_f64 / 5.0).sin();
        assert!((SOIL.base_at(30) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_label_is_wall_clock_time() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 3).unwrap();
        let reading = generate_reading(&mut rng, &now);
        assert_eq!(reading.label, "09:05:03");
        assert_eq!(reading.timestamp, now);
    }
}
