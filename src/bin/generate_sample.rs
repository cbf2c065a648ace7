use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// One row of the synthetic metadata file, same columns as the USGS export
/// plus a couple the filter tool ignores.
#[derive(Serialize)]
struct SampleRow {
    entity_id: String,
    acquisition_date: String,
    cloud_cover: f64,
    horizontal_grid: i32,
    vertical_grid: i32,
    region: &'static str,
    sensor: &'static str,
    satellite: u8,
    collection_category: &'static str,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

/// (region, horizontal range, vertical range) of the ARD grid
const REGIONS: [(&str, i32, i32); 3] = [("CU", 33, 22), ("AK", 20, 15), ("HI", 6, 3)];

/// (entity prefix, satellite number, sensor label, first operational year)
const MISSIONS: [(&str, u8, &str, i32); 3] = [
    ("LT05", 5, "TM", 1984),
    ("LE07", 7, "ETM", 1999),
    ("LC08", 8, "OLI/TIRS", 2013),
];

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 5_000;
    let last_day = NaiveDate::from_ymd_opt(2019, 12, 31).expect("valid date");

    let output_path = "sample_scenes.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    for _ in 0..n_rows {
        let &(region, h_max, v_max) = rng.pick(&REGIONS);
        let &(prefix, satellite, sensor, first_year) = rng.pick(&MISSIONS);

        let first_day = NaiveDate::from_ymd_opt(first_year, 1, 1).expect("valid date");
        let span = (last_day - first_day).num_days() as u64;
        let acquired = first_day + Duration::days(rng.below(span + 1) as i64);

        let h = rng.below(h_max as u64) as i32;
        let v = rng.below(v_max as u64) as i32;

        // about one scene in twenty has no cloud assessment
        let cloud_cover = if rng.below(20) == 0 {
            -1.0
        } else {
            (rng.next_f64() * 10_000.0).round() / 100.0
        };

        let row = SampleRow {
            entity_id: format!(
                "{prefix}_{region}_{h:03}{v:03}_{}_C01_V01",
                acquired.format("%Y%m%d")
            ),
            acquisition_date: acquired.format("%Y-%m-%d").to_string(),
            cloud_cover,
            horizontal_grid: h,
            vertical_grid: v,
            region,
            sensor,
            satellite,
            collection_category: if cloud_cover < 50.0 { "T1" } else { "T2" },
        };
        writer.serialize(&row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");

    println!("Wrote {n_rows} scenes to {output_path}");
}
