use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

#[derive(Debug, Parser)]
#[command(name = "generate_sample", about = "Write a synthetic dataEveryYear table as CSV and Parquet")]
struct Args {
    /// Directory to write into (created if missing).
    #[arg(default_value = ".")]
    out_dir: PathBuf,
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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// (country, fertility 1960, fertility 2015, life exp. 1960, life exp. 2015, population 1960 in millions)
const COUNTRIES: &[(&str, f64, f64, f64, f64, f64)] = &[
    ("Afghanistan", 7.5, 4.8, 32.0, 61.0, 9.0),
    ("Bangladesh", 6.7, 2.1, 45.0, 72.0, 48.0),
    ("Brazil", 6.1, 1.8, 54.0, 75.0, 72.0),
    ("Chad", 6.3, 6.0, 38.0, 53.0, 3.0),
    ("China", 4.5, 1.6, 44.0, 76.0, 667.0),
    ("Egypt", 6.6, 3.3, 48.0, 71.0, 27.0),
    ("France", 2.8, 2.0, 70.0, 82.0, 46.0),
    ("India", 5.9, 2.4, 41.0, 68.0, 450.0),
    ("Japan", 2.0, 1.4, 68.0, 84.0, 92.0),
    ("Kenya", 7.9, 3.9, 46.0, 66.0, 8.0),
    ("Mexico", 6.8, 2.2, 57.0, 77.0, 38.0),
    ("Nigeria", 6.4, 5.6, 37.0, 53.0, 45.0),
    ("Norway", 2.9, 1.7, 73.0, 82.0, 3.6),
    ("Peru", 6.9, 2.4, 48.0, 75.0, 10.0),
    ("Russia", 2.5, 1.8, 66.0, 71.0, 120.0),
    ("United States", 3.7, 1.8, 70.0, 79.0, 186.0),
];

const FIRST_YEAR: i64 = 1960;
const LAST_YEAR: i64 = 2015;

struct Columns {
    time: Vec<i64>,
    location: Vec<String>,
    fertility_rate: Vec<f64>,
    life_expectancy: Vec<f64>,
    pop_mlns: Vec<f64>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns {
        time: Vec::new(),
        location: Vec::new(),
        fertility_rate: Vec::new(),
        life_expectancy: Vec::new(),
        pop_mlns: Vec::new(),
    };

    let span = (LAST_YEAR - FIRST_YEAR) as f64;
    for year in FIRST_YEAR..=LAST_YEAR {
        let t = (year - FIRST_YEAR) as f64 / span;
        for &(name, fert0, fert1, life0, life1, pop0) in COUNTRIES {
            let growth = rng.uniform(0.005, 0.025);
            cols.time.push(year);
            cols.location.push(name.to_string());
            cols.fertility_rate
                .push(round2(fert0 + (fert1 - fert0) * t + rng.uniform(-0.1, 0.1)));
            cols.life_expectancy
                .push(round2(life0 + (life1 - life0) * t + rng.uniform(-0.5, 0.5)));
            cols.pop_mlns
                .push(round4(pop0 * (1.0 + growth).powf((year - FIRST_YEAR) as f64)));
        }
    }
    cols
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn write_csv(path: &Path, cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["time", "location", "fertility_rate", "life_expectancy", "pop_mlns"])?;
    for i in 0..cols.time.len() {
        writer.write_record([
            cols.time[i].to_string(),
            cols.location[i].clone(),
            cols.fertility_rate[i].to_string(),
            cols.life_expectancy[i].to_string(),
            cols.pop_mlns[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, cols: &Columns) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("time", DataType::Int64, false),
        Field::new("location", DataType::Utf8, false),
        Field::new("fertility_rate", DataType::Float64, false),
        Field::new("life_expectancy", DataType::Float64, false),
        Field::new("pop_mlns", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(cols.time.clone())),
            Arc::new(StringArray::from(
                cols.location.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(cols.fertility_rate.clone())),
            Arc::new(Float64Array::from(cols.life_expectancy.clone())),
            Arc::new(Float64Array::from(cols.pop_mlns.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let Args { out_dir } = Args::parse();
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng);

    let csv_path = out_dir.join("dataEveryYear.csv");
    write_csv(&csv_path, &cols)?;
    let parquet_path = out_dir.join("dataEveryYear.parquet");
    write_parquet(&parquet_path, &cols)?;

    println!(
        "Wrote {} rows ({} countries × {} years) to {} and {}",
        cols.time.len(),
        COUNTRIES.len(),
        LAST_YEAR - FIRST_YEAR + 1,
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_dir_defaults_to_current_directory() {
        let args = Args::parse_from(["generate_sample"]);
        assert_eq!(args.out_dir, PathBuf::from("."));
        let args = Args::parse_from(["generate_sample", "samples"]);
        assert_eq!(args.out_dir, PathBuf::from("samples"));
    }

    #[test]
    fn writes_a_loadable_csv() {
        let dir = tempfile::tempdir().unwrap();
        let cols = generate(&mut SimpleRng::new(7));
        let path = dir.path().join("dataEveryYear.csv");
        write_csv(&path, &cols).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("time,location,fertility_rate,life_expectancy,pop_mlns")
        );
        assert_eq!(lines.count(), COUNTRIES.len() * (LAST_YEAR - FIRST_YEAR + 1) as usize);
    }
}
