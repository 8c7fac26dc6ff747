use crate::color::Rgba;
use crate::context::PortalHandle;
use crate::theme::ChartPalette;
use crate::ui::StyleTokens;
use gtk4::cairo;
use gtk4::prelude::*;
use gtk4::{Box as GtkBox, DrawingArea, Label, Orientation};

const CHART_PADDING: f64 = 12.0;

/// Weekly call volume shown until a usage data source is attached.
const USAGE_SAMPLE: [(&str, f64); 7] = [
    ("Mon", 12_400.0),
    ("Tue", 15_100.0),
    ("Wed", 13_800.0),
    ("Thu", 18_200.0),
    ("Fri", 21_500.0),
    ("Sat", 9_700.0),
    ("Sun", 8_300.0),
];

pub(super) fn build_usage_chart(handle: &PortalHandle, tokens: StyleTokens) -> GtkBox {
    let card = GtkBox::new(Orientation::Vertical, tokens.spacing_8);
    card.add_css_class("portal-card");

    let title = Label::new(Some("API Usage"));
    title.add_css_class("card-title");
    title.set_xalign(0.0);
    let description = Label::new(Some("Calls over the last 7 days"));
    description.add_css_class("dim-label");
    description.set_xalign(0.0);

    let area = DrawingArea::new();
    area.set_content_height(tokens.chart_height);
    area.set_hexpand(true);
    {
        let handle = handle.clone();
        area.set_draw_func(move |_, cr, width, height| {
            let palette = ChartPalette::from_primary(&handle.branding().primary_color);
            let values: Vec<f64> = USAGE_SAMPLE.iter().map(|(_, value)| *value).collect();
            if let Err(err) = draw_usage(cr, f64::from(width), f64::from(height), &values, &palette)
            {
                tracing::warn!(?err, "failed to draw usage chart");
            }
        });
    }
    {
        let area = area.clone();
        handle.connect_branding_changed(move |_| area.queue_draw());
    }

    card.append(&title);
    card.append(&description);
    card.append(&area);
    card
}

fn draw_usage(
    cr: &cairo::Context,
    width: f64,
    height: f64,
    values: &[f64],
    palette: &ChartPalette,
) -> Result<(), cairo::Error> {
    let points = chart_points(values, width, height, CHART_PADDING);
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(());
    };
    let baseline = height - CHART_PADDING;

    cr.move_to(first.0, baseline);
    for (x, y) in &points {
        cr.line_to(*x, *y);
    }
    cr.line_to(last.0, baseline);
    cr.close_path();

    let gradient = cairo::LinearGradient::new(0.0, CHART_PADDING, 0.0, baseline);
    for stop in palette.fill {
        let color = stop.color.to_rgba();
        gradient.add_color_stop_rgba(stop.offset, color.red, color.green, color.blue, color.alpha);
    }
    cr.set_source(&gradient)?;
    cr.fill()?;

    cr.move_to(first.0, first.1);
    for (x, y) in points.iter().skip(1) {
        cr.line_to(*x, *y);
    }
    set_source_color(cr, palette.stroke.to_rgba());
    cr.set_line_width(2.0);
    cr.stroke()
}

fn set_source_color(cr: &cairo::Context, color: Rgba) {
    cr.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

/// Maps values onto the drawable area, highest value at the top padding.
fn chart_points(values: &[f64], width: f64, height: f64, padding: f64) -> Vec<(f64, f64)> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let plot_width = (width - 2.0 * padding).max(0.0);
    let plot_height = (height - 2.0 * padding).max(0.0);
    let step = if values.len() > 1 {
        plot_width / (values.len() - 1) as f64
    } else {
        0.0
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let ratio = if max > 0.0 { value / max } else { 0.0 };
            (
                padding + step * index as f64,
                padding + plot_height * (1.0 - ratio),
            )
        })
        .collect()
}
