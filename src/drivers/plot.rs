use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::*;

use crate::drivers::error::ScopeError;
use crate::drivers::viewport::ViewportBounds;
use crate::drivers::TimeSeriesFrame;
use crate::types::Channel;

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub background: RGBColor,
    pub palette: [RGBColor; 2],
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            title: "Real-time Data from Serial Port".to_owned(),
            background: RGBColor(10, 10, 10),
            palette: [RGBColor(0, 255, 255), YELLOW],
        }
    }
}

/// Draws the window as the live view shows it: fixed viewport bounds, both
/// channels, legend and grid.
pub fn render_scope_png(
    frame: &TimeSeriesFrame,
    bounds: ViewportBounds,
    style: &PlotStyle,
) -> Result<Vec<u8>, ScopeError> {
    if frame.is_empty() {
        return Err(ScopeError::Plot("time-series frame has no samples".into()));
    }
    if style.width == 0 || style.height == 0 {
        return Err(ScopeError::Plot("image size must be non-zero".into()));
    }
    let with_text = fonts_available();
    if !with_text {
        log::warn!("no usable sans-serif font, snapshot drawn without text");
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if with_text {
            builder
                .caption(&style.title, ("sans-serif", 20).into_font().color(&WHITE))
                .set_label_area_size(LabelAreaPosition::Left, 55)
                .set_label_area_size(LabelAreaPosition::Bottom, 45);
        }
        let mut chart =
            builder.build_cartesian_2d(0f64..bounds.x_max, bounds.y_min..bounds.y_max)?;
        let mut mesh = chart.configure_mesh();
        mesh.axis_style(WHITE.mix(0.6))
            .bold_line_style(WHITE.mix(0.2))
            .light_line_style(WHITE.mix(0.1));
        if with_text {
            mesh.x_desc("Time (s)")
                .y_desc("Voltage (V)")
                .axis_desc_style(("sans-serif", 14).into_font().color(&WHITE))
                .label_style(("sans-serif", 12).into_font().color(&WHITE));
        }
        mesh.draw()?;
        for (idx, channel) in Channel::ALL.into_iter().enumerate() {
            let color = style.palette[idx];
            let series = frame.series(channel).iter().map(|p| (p[0], p[1]));
            chart
                .draw_series(LineSeries::new(series, &color))?
                .label(channel.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        if with_text {
            chart
                .configure_series_labels()
                .label_font(("sans-serif", 12).into_font().color(&WHITE))
                .border_style(WHITE.mix(0.2))
                .background_style(style.background)
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}

pub fn write_scope_png(
    path: &Path,
    frame: &TimeSeriesFrame,
    bounds: ViewportBounds,
    style: &PlotStyle,
) -> Result<(), ScopeError> {
    let png = render_scope_png(frame, bounds, style)?;
    std::fs::write(path, png)
        .map_err(|e| ScopeError::Plot(format!("cannot write {}: {e}", path.display())))
}

fn fonts_available() -> bool {
    ("sans-serif", 12).into_font().box_size("0").is_ok()
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScopeError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ScopeError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_is_rejected() {
        let err = render_scope_png(
            &TimeSeriesFrame::default(),
            ViewportBounds::for_device(3.3, 2.0),
            &PlotStyle::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ScopeError::Plot(_)));
    }

    fn three_samples() -> TimeSeriesFrame {
        TimeSeriesFrame {
            channel1: vec![[0.0, 0.0], [1.0, 1.65], [2.0, 3.3]],
            channel2: vec![[0.0, 3.3], [1.0, 0.0], [2.0, 0.0]],
        }
    }

    #[test]
    fn renders_window_to_png() {
        let style = PlotStyle {
            width: 320,
            height: 200,
            ..PlotStyle::default()
        };
        let png =
            render_scope_png(&three_samples(), ViewportBounds::for_device(3.3, 2.0), &style)
                .unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn writes_snapshot_file() {
        let path = std::env::temp_dir().join(format!("voltscope-{}.png", std::process::id()));
        let style = PlotStyle {
            width: 160,
            height: 100,
            ..PlotStyle::default()
        };
        let mut bounds = ViewportBounds::for_device(3.3, 2.0);
        bounds.y_min = -1.0;
        write_scope_png(&path, &three_samples(), bounds, &style).unwrap();
        let written = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(&written[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn encodes_png_signature() {
        let png = encode_png(&[0u8; 4 * 4 * 3], 4, 4).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn mismatched_buffer_is_an_error() {
        assert!(encode_png(&[0u8; 5], 4, 4).is_err());
    }
}
