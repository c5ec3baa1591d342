use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

/// Minimal deterministic PRNG (xorshift64*)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1) | 1,
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One sales record; `None` fields are written as empty cells.
#[derive(Clone, Copy)]
struct Sale {
    region: &'static str,
    product: &'static str,
    units: Option<f64>,
    unit_price: Option<f64>,
    rep: &'static str,
}

fn generate_sales(rng: &mut SimpleRng, n: usize) -> Vec<Sale> {
    const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
    const PRODUCTS: [&str; 3] = ["Widget", "Gadget", "Doohickey"];
    const REPS: [&str; 3] = ["Alice", "Bob", "Chen"];

    let mut sales: Vec<Sale> = (0..n)
        .map(|_| {
            // Roughly one cell in eight is left blank.
            let units = (rng.next_f64() > 0.125).then(|| (rng.next_f64() * 50.0).round());
            let unit_price =
                (rng.next_f64() > 0.125).then(|| (rng.next_f64() * 2000.0).round() / 100.0);
            Sale {
                region: rng.pick(&REGIONS),
                product: rng.pick(&PRODUCTS),
                units,
                unit_price,
                rep: rng.pick(&REPS),
            }
        })
        .collect();

    // Exact duplicates of a few earlier rows.
    for i in [0, 3, 7] {
        if let Some(s) = sales.get(i) {
            let copy = *s;
            sales.push(copy);
        }
    }
    sales
}

const HEADERS: [&str; 5] = ["region", "product", "units", "unit_price", "rep"];

fn write_csv(path: &str, sales: &[Sale]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for s in sales {
        let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        writer.write_record([
            s.region.to_string(),
            s.product.to_string(),
            fmt(s.units),
            fmt(s.unit_price),
            s.rep.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(path: &str, sales: &[Sale]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, s) in sales.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, s.region)?;
        sheet.write_string(row, 1, s.product)?;
        if let Some(v) = s.units {
            sheet.write_number(row, 2, v)?;
        }
        if let Some(v) = s.unit_price {
            sheet.write_number(row, 3, v)?;
        }
        sheet.write_string(row, 4, s.rep)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let sales = generate_sales(&mut rng, 40);

    write_csv("sample_sales.csv", &sales)?;
    write_xlsx("sample_sales.xlsx", &sales)?;

    println!(
        "Wrote {} rows ({} columns) to sample_sales.csv and sample_sales.xlsx",
        sales.len(),
        HEADERS.len()
    );
    Ok(())
}
