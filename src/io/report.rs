//! CSV measurement reports
//!
//! Each report row is one cell measurement on one frame, with geometry in
//! micrometers followed by mean/sd/median columns for every fluorescence
//! channel.

use crate::detection::cell::CellMeasurement;
use crate::io::error::{MeasureError, Result};
use std::path::Path;

/// Write cell measurements to a CSV report
///
/// The fluorescence columns follow the order of `fl_channels`. Cells missing a
/// channel get empty fields in that channel's columns.
///
/// # Errors
///
/// Returns an error when the report file cannot be written.
pub fn export_measurements<P: AsRef<Path>>(
    cells: &[CellMeasurement],
    fl_channels: &[usize],
    path: P,
) -> Result<()> {
    let path_buf = path.as_ref().to_path_buf();
    let report_error = |source: csv::Error| MeasureError::ReportExport {
        path: path_buf.clone(),
        source,
    };

    let mut writer = csv::Writer::from_path(&path_buf).map_err(report_error)?;

    let mut header = vec![
        "cell".to_string(),
        "frame".to_string(),
        "x".to_string(),
        "y".to_string(),
        "major".to_string(),
        "minor".to_string(),
        "angle".to_string(),
        "edge_width".to_string(),
        "volume".to_string(),
    ];
    for &channel in fl_channels {
        header.push(format!("ch{channel}_mean"));
        header.push(format!("ch{channel}_sd"));
        header.push(format!("ch{channel}_median"));
    }
    writer.write_record(&header).map_err(report_error)?;

    for cell in cells {
        let mut row = vec![
            cell.id.to_string(),
            cell.frame.to_string(),
            format!("{:.4}", cell.x_centroid),
            format!("{:.4}", cell.y_centroid),
            format!("{:.4}", cell.semi_major),
            format!("{:.4}", cell.semi_minor),
            format!("{:.4}", cell.angle),
            format!("{:.4}", cell.edge_width),
            format!("{:.4}", cell.volume),
        ];
        for &channel in fl_channels {
            match cell
                .fluorescence
                .iter()
                .find(|stats| stats.channel == channel)
            {
                Some(stats) => {
                    row.push(format!("{:.4}", stats.mean));
                    row.push(format!("{:.4}", stats.sd));
                    row.push(format!("{:.4}", stats.median));
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        writer.write_record(&row).map_err(report_error)?;
    }

    writer.flush().map_err(|e| MeasureError::FileSystem {
        path: path_buf.clone(),
        operation: "flush report",
        source: e,
    })
}
