//! Demonstration of the ABP feature-extraction pipeline.
//!
//! This example shows how to:
//! 1. Generate a synthetic arterial pressure waveform
//! 2. Aggregate it into window summaries
//! 3. Add the lookback feature and usability flags
//! 4. Compute beat-level MAP from confirmed peaks
//! 5. Export a model-ready snapshot
//!
//! Run with: cargo run --example extract_demo

use abp_features::{
    config::PipelineConfig,
    core::{
        add_lookback, aggregate, confirm_cycles, diastolic_candidates, flag_usable,
        mean_arterial_pressure, systolic_candidates,
    },
    export::SnapshotBuilder,
    waveform::{SyntheticWaveform, WaveformFrame},
};

fn main() {
    println!("ABP Features - Extraction Demo");
    println!("==============================");
    println!();

    // Ten minutes of a 1 Hz pressure wave swinging between 60 and 140 mmHg
    let synth = SyntheticWaveform {
        duration_secs: 600,
        ..SyntheticWaveform::default()
    };
    let record = synth.record("w-demo");
    println!(
        "Generated {} samples on channel {:?}",
        record.channels[0].values.len(),
        record.channels[0].name
    );

    let config = PipelineConfig {
        chunk_duration_secs: 30,
        step_duration_secs: 10,
        ..PipelineConfig::default()
    };

    let frame = WaveformFrame::from_record(&record, &config.channel_name)
        .expect("synthetic record has an ABP channel");

    // Beat-level MAP over the whole trace
    let sys = confirm_cycles(&systolic_candidates(&frame.indices, &frame.values));
    let dias = confirm_cycles(
        &diastolic_candidates(&frame.indices, &frame.values)
            .expect("synthetic waveform is strictly positive"),
    );
    let beats = sys.len().min(dias.len());
    let map_points = mean_arterial_pressure(&sys[..beats], &dias[..beats])
        .expect("sequences truncated to a common length");
    println!(
        "Beat-level MAP: {} beats, first = {:.1} mmHg at sample {:.0}",
        map_points.len(),
        map_points[0].value,
        map_points[0].position
    );
    println!();

    // Windowed summary table
    let table = aggregate(&frame, &config).expect("trace is long enough for windows");
    let table = add_lookback(table, config.lookback_minutes).expect("lookback covers spacing");
    let table = flag_usable(table);

    println!("=== Summary Table ===");
    println!("  Windows: {}", table.len());
    println!("  Usable for modeling: {}", table.usable_rows());
    for row in table.rows.iter().take(3) {
        println!(
            "  [{} - {}] sys {:.1}  dias {:.1}  map {:.1}  hypo {}",
            row.start_window,
            row.end_window,
            row.avg_sys.unwrap_or(f64::NAN),
            row.avg_dias.unwrap_or(f64::NAN),
            row.avg_map.unwrap_or(f64::NAN),
            row.current_hypotensive
        );
    }
    println!();

    // Show a snippet of the exported snapshot
    let builder = SnapshotBuilder::new();
    println!("Run ID: {}", builder.run_id());
    let json = builder.build_json(&table, &config, None);
    println!("Model-ready snapshot (truncated):");
    for line in json.lines().take(20) {
        println!("  {line}");
    }
    println!("  ...");
    println!();
    println!("Demo complete!");
}
