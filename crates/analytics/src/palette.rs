use rand::Rng;

/// The fixed series colours, in assignment order.
pub const BASE_PALETTE: [&str; 10] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8",
    "#82ca9d", "#ffc658", "#8dd1e1", "#a4de6c", "#d0ed57",
];

/// Returns `count` colours: a prefix of [`BASE_PALETTE`], extended with random
/// `rgb(r, g, b)` colours when more than ten are needed.
pub fn generate_colors(count: usize) -> Vec<String> {
    generate_colors_with(count, &mut rand::rng())
}

/// Like [`generate_colors`], drawing the extra colours from `rng`.
///
/// Passing a seeded generator keeps the colours of series past the tenth stable
/// between renders.
pub fn generate_colors_with<R: Rng>(count: usize, rng: &mut R) -> Vec<String> {
    let mut colors: Vec<String> = BASE_PALETTE
        .iter()
        .take(count)
        .map(|c| c.to_string())
        .collect();

    for _ in BASE_PALETTE.len()..count {
        let r: u8 = rng.random_range(0..255);
        let g: u8 = rng.random_range(0..255);
        let b: u8 = rng.random_range(0..255);
        colors.push(format!("rgb({}, {}, {})", r, g, b));
    }

    colors
}
