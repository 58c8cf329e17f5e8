//! Synthetic source histories for demos and tests.
//!
//! Random walks with plausible magnitudes (billions of USD for liquidity,
//! a PMI wandering around 50, a volatile asset price). These are clearly
//! fake and the resulting `LoadedData` is tagged as synthetic.

use chrono::{Datelike, Duration, NaiveDate};
use macrodex_core::clock::start_of_day;
use macrodex_core::domain::IntradaySeries;
use macrodex_core::SourceSeries;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data_loader::LoadedData;

/// Generate `days` days of synthetic data starting at `start`.
///
/// Liquidity components are weekly, PMI is monthly (first of month), price
/// is daily. The same seed always produces the same data.
pub fn generate_synthetic(seed: u64, start: NaiveDate, days: u32) -> LoadedData {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sources = SourceSeries {
        pmi_note: Some("synthetic".into()),
        ..SourceSeries::default()
    };

    let mut fed = 7_500.0_f64;
    let mut tga = 700.0_f64;
    let mut rrp = 2_000.0_f64;
    let mut pmi = 50.0_f64;
    let mut price = 30_000.0_f64;
    let mut price_intraday = IntradaySeries::new();

    for offset in 0..days {
        let date = start + Duration::days(i64::from(offset));

        if offset % 7 == 0 {
            fed = (fed + rng.gen_range(-40.0..45.0)).max(1_000.0);
            tga = (tga + rng.gen_range(-60.0..60.0)).clamp(100.0, 1_500.0);
            rrp = (rrp * rng.gen_range(0.95..1.03)).max(0.0);
            sources.fed_balance_sheet.insert(date, fed);
            sources.treasury_account.insert(date, tga);
            sources.reverse_repo.insert(date, rrp);
        }

        if date.day() == 1 {
            pmi = (pmi + rng.gen_range(-1.5..1.5)).clamp(40.0, 60.0);
            sources.pmi.insert(date, pmi);
        }

        let daily_return: f64 = rng.gen_range(-0.04..0.042);
        price *= 1.0 + daily_return;
        sources.price.insert(date, price);
        price_intraday.insert(start_of_day(date), price);
    }

    tracing::info!(seed, days, "generated synthetic sources");
    LoadedData::from_sources(sources, price_intraday, 0, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn same_seed_same_data() {
        let a = generate_synthetic(7, start(), 120);
        let b = generate_synthetic(7, start(), 120);
        assert_eq!(a.sources, b.sources);
        assert_eq!(a.dataset_hash, b.dataset_hash);
        assert!(a.synthetic);
    }

    #[test]
    fn different_seed_different_data() {
        let a = generate_synthetic(1, start(), 60);
        let b = generate_synthetic(2, start(), 60);
        assert_ne!(a.dataset_hash, b.dataset_hash);
    }

    #[test]
    fn cadences_match_sources() {
        let data = generate_synthetic(42, start(), 365);
        assert_eq!(data.sources.price.len(), 365);
        assert_eq!(data.price_intraday.len(), 365);
        assert_eq!(data.sources.fed_balance_sheet.len(), 53);
        assert_eq!(data.sources.pmi.len(), 12);
        assert!(data
            .sources
            .pmi
            .values()
            .all(|v| (40.0..=60.0).contains(&v)));
    }
}
