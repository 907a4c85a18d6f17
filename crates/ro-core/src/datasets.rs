//! Bundled reference datasets

use crate::data::{DataFrame, DataFrameBuilder, Index, Result, Series};

/// Column names of [`mtcars`], response first.
pub const MTCARS_COLUMNS: [&str; 11] = [
    "mpg", "cyl", "disp", "hp", "drat", "wt", "qsec", "vs", "am", "gear", "carb",
];

#[rustfmt::skip]
const MTCARS_ROWS: [(&str, [f64; 11]); 32] = [
    ("Mazda RX4",           [21.0, 6.0, 160.0, 110.0, 3.90, 2.620, 16.46, 0.0, 1.0, 4.0, 4.0]),
    ("Mazda RX4 Wag",       [21.0, 6.0, 160.0, 110.0, 3.90, 2.875, 17.02, 0.0, 1.0, 4.0, 4.0]),
    ("Datsun 710",          [22.8, 4.0, 108.0,  93.0, 3.85, 2.320, 18.61, 1.0, 1.0, 4.0, 1.0]),
    ("Hornet 4 Drive",      [21.4, 6.0, 258.0, 110.0, 3.08, 3.215, 19.44, 1.0, 0.0, 3.0, 1.0]),
    ("Hornet Sportabout",   [18.7, 8.0, 360.0, 175.0, 3.15, 3.440, 17.02, 0.0, 0.0, 3.0, 2.0]),
    ("Valiant",             [18.1, 6.0, 225.0, 105.0, 2.76, 3.460, 20.22, 1.0, 0.0, 3.0, 1.0]),
    ("Duster 360",          [14.3, 8.0, 360.0, 245.0, 3.21, 3.570, 15.84, 0.0, 0.0, 3.0, 4.0]),
    ("Merc 240D",           [24.4, 4.0, 146.7,  62.0, 3.69, 3.190, 20.00, 1.0, 0.0, 4.0, 2.0]),
    ("Merc 230",            [22.8, 4.0, 140.8,  95.0, 3.92, 3.150, 22.90, 1.0, 0.0, 4.0, 2.0]),
    ("Merc 280",            [19.2, 6.0, 167.6, 123.0, 3.92, 3.440, 18.30, 1.0, 0.0, 4.0, 4.0]),
    ("Merc 280C",           [17.8, 6.0, 167.6, 123.0, 3.92, 3.440, 18.90, 1.0, 0.0, 4.0, 4.0]),
    ("Merc 450SE",          [16.4, 8.0, 275.8, 180.0, 3.07, 4.070, 17.40, 0.0, 0.0, 3.0, 3.0]),
    ("Merc 450SL",          [17.3, 8.0, 275.8, 180.0, 3.07, 3.730, 17.60, 0.0, 0.0, 3.0, 3.0]),
    ("Merc 450SLC",         [15.2, 8.0, 275.8, 180.0, 3.07, 3.780, 18.00, 0.0, 0.0, 3.0, 3.0]),
    ("Cadillac Fleetwood",  [10.4, 8.0, 472.0, 205.0, 2.93, 5.250, 17.98, 0.0, 0.0, 3.0, 4.0]),
    ("Lincoln Continental", [10.4, 8.0, 460.0, 215.0, 3.00, 5.424, 17.82, 0.0, 0.0, 3.0, 4.0]),
    ("Chrysler Imperial",   [14.7, 8.0, 440.0, 230.0, 3.23, 5.345, 17.42, 0.0, 0.0, 3.0, 4.0]),
    ("Fiat 128",            [32.4, 4.0,  78.7,  66.0, 4.08, 2.200, 19.47, 1.0, 1.0, 4.0, 1.0]),
    ("Honda Civic",         [30.4, 4.0,  75.7,  52.0, 4.93, 1.615, 18.52, 1.0, 1.0, 4.0, 2.0]),
    ("Toyota Corolla",      [33.9, 4.0,  71.1,  65.0, 4.22, 1.835, 19.90, 1.0, 1.0, 4.0, 1.0]),
    ("Toyota Corona",       [21.5, 4.0, 120.1,  97.0, 3.70, 2.465, 20.01, 1.0, 0.0, 3.0, 1.0]),
    ("Dodge Challenger",    [15.5, 8.0, 318.0, 150.0, 2.76, 3.520, 16.87, 0.0, 0.0, 3.0, 2.0]),
    ("AMC Javelin",         [15.2, 8.0, 304.0, 150.0, 3.15, 3.435, 17.30, 0.0, 0.0, 3.0, 2.0]),
    ("Camaro Z28",          [13.3, 8.0, 350.0, 245.0, 3.73, 3.840, 15.41, 0.0, 0.0, 3.0, 4.0]),
    ("Pontiac Firebird",    [19.2, 8.0, 400.0, 175.0, 3.08, 3.845, 17.05, 0.0, 0.0, 3.0, 2.0]),
    ("Fiat X1-9",           [27.3, 4.0,  79.0,  66.0, 4.08, 1.935, 18.90, 1.0, 1.0, 4.0, 1.0]),
    ("Porsche 914-2",       [26.0, 4.0, 120.3,  91.0, 4.43, 2.140, 16.70, 0.0, 1.0, 5.0, 2.0]),
    ("Lotus Europa",        [30.4, 4.0,  95.1, 113.0, 3.77, 1.513, 16.90, 1.0, 1.0, 5.0, 2.0]),
    ("Ford Pantera L",      [15.8, 8.0, 351.0, 264.0, 4.22, 3.170, 14.50, 0.0, 1.0, 5.0, 4.0]),
    ("Ferrari Dino",        [19.7, 6.0, 145.0, 175.0, 3.62, 2.770, 15.50, 0.0, 1.0, 5.0, 6.0]),
    ("Maserati Bora",       [15.0, 8.0, 301.0, 335.0, 3.54, 3.570, 14.60, 0.0, 1.0, 5.0, 8.0]),
    ("Volvo 142E",          [21.4, 4.0, 121.0, 109.0, 4.11, 2.780, 18.60, 1.0, 1.0, 4.0, 2.0]),
];

/// Motor Trend road tests of 32 cars (1973–74 models).
///
/// Columns: `mpg` (miles per US gallon), `cyl` (cylinders), `disp`
/// (displacement, cu.in.), `hp` (gross horsepower), `drat` (rear axle
/// ratio), `wt` (weight, 1000 lbs), `qsec` (quarter mile time), `vs`
/// (engine, 0 = V-shaped, 1 = straight), `am` (transmission, 0 = automatic,
/// 1 = manual), `gear` (forward gears), `carb` (carburetors).
///
/// Integer-valued columns are stored as `Int`, the binary `vs`/`am` as
/// `Bool`; the index carries the car names.
pub fn mtcars() -> Result<DataFrame> {
    let mut builder = DataFrameBuilder::new()
        .with_index(Index::labels(MTCARS_ROWS.iter().map(|(name, _)| *name)));

    for (j, &name) in MTCARS_COLUMNS.iter().enumerate() {
        let values = MTCARS_ROWS.iter().map(|(_, row)| row[j]);
        let series = match name {
            "cyl" | "hp" | "gear" | "carb" => Series::int(values.map(|v| v as i64).collect::<Vec<_>>()),
            "vs" | "am" => Series::bool(values.map(|v| v != 0.0).collect::<Vec<_>>()),
            _ => Series::float(values.collect::<Vec<_>>()),
        };
        builder = builder.with_column(name, series)?;
    }

    builder.build()
}
