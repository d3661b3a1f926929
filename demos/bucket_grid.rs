use distance_clouds::prelude::*;

const BUCKETS: usize = 15;

fn main() -> Result<()> {
    let mut seed = 12345u64;
    let mut rng = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed as f64 / u64::MAX as f64
    };

    // Each bucket drifts toward its end-state composition.
    let mut sample = |shift: f64| {
        let centers = [
            (Category::FOOD_COMPOST, 0.62),
            (Category::SOIL, 0.70),
            (Category::FECAL, 0.82),
            (Category::BULKING_MATERIAL, 0.88),
        ];
        centers
            .into_iter()
            .map(|(category, center)| {
                let values: Vec<f64> = (0..12)
                    .map(|_| (center + shift + (rng() - 0.5) * 0.12).clamp(0.5, 1.0))
                    .collect();
                (category, values)
            })
            .collect::<GroupedDistances>()
    };

    let mut builder = figure()
        .bandwidth(Bandwidth::Fixed(0.02))
        .layout(LayoutConfig::default().size(1200.0, 2400.0))
        .columns(3);
    for bucket in 1..=BUCKETS {
        let start = sample(0.0);
        let end = sample(-0.04);
        builder = builder.add_panel(|p| p.title(format!("Bucket {bucket}")).start(start).end(end));
    }
    let fig = builder.build()?;

    for panel in &fig.panels {
        let peaks: Vec<String> = panel.series[0]
            .clouds
            .iter()
            .map(|c| format!("{}={:.1}", c.category, c.density.max))
            .collect();
        println!(
            "{:<10} row {} col {}  {}",
            panel.title.as_deref().unwrap_or("-"),
            panel.scales.position.row,
            panel.scales.position.column,
            peaks.join(" ")
        );
    }

    let json = fig.to_json()?;
    println!("figure json: {} bytes", json.len());
    Ok(())
}
