//! Sample formatting for terminal and JSON output

use control_core::TelemetrySample;

/// Output format for samples
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human-readable line per sample
    Text,
    /// One JSON object per line
    Json,
}

/// Render one sample in the chosen format
pub fn render(sample: &TelemetrySample, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(sample)),
        OutputFormat::Json => Ok(serde_json::to_string(sample)?),
    }
}

fn render_text(sample: &TelemetrySample) -> String {
    let traffic = if sample.traffic_available {
        format!(
            "in {} out {}",
            format_bytes(i64::from(sample.bytes_in)),
            format_bytes(i64::from(sample.bytes_out))
        )
    } else {
        "traffic n/a".to_string()
    };

    format!(
        "memory {} | goroutines {} | {}",
        format_bytes(sample.memory_bytes),
        sample.goroutine_count,
        traffic
    )
}

/// Format a byte count with a binary unit suffix
pub fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
