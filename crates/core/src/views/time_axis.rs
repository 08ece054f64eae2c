use bfg_protocol::{Point, RenderCommand, SharedStr, TextAlign, ThemeToken};

const TICK_LENGTH: f64 = 6.0;
const LABEL_Y: f64 = 16.0;
const FONT_SIZE: f64 = 10.0;

/// Render the run-time axis along the top edge of the content.
///
/// The axis maps `[0, run_time]` seconds onto `[0, width]` pixels with
/// roughly `width / pixels_per_tick` ticks on 1/2/5 steps.
pub fn render_time_axis(width: f64, run_time: f64, pixels_per_tick: f64) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(32);
    commands.push(RenderCommand::DrawLine {
        from: Point::new(0.0, 0.0),
        to: Point::new(width, 0.0),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });

    if run_time <= 0.0 || width <= 0.0 {
        return commands;
    }

    let count = (width / pixels_per_tick).floor() as usize;
    for t in nice_ticks(run_time, count) {
        let x = t / run_time * width;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, 0.0),
            to: Point::new(x, TICK_LENGTH),
            color: ThemeToken::AxisLine,
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x, LABEL_Y),
            text: SharedStr::from(format_seconds(t)),
            color: ThemeToken::AxisText,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
            visible: true,
        });
    }

    commands
}

/// Tick values in `[0, stop]` spaced by a 1, 2 or 5 × 10^k step chosen so
/// that about `count` ticks fit.
fn nice_ticks(stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || stop <= 0.0 || !stop.is_finite() {
        return Vec::new();
    }

    let raw = stop / count as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // Compute each tick from its index to keep values like 0.3 exact
    // rather than accumulating 0.1 + 0.1 + 0.1.
    let last = if power >= 0.0 {
        let step = factor * 10f64.powf(power);
        (stop / step).floor() as u64
    } else {
        let inverse = 10f64.powf(-power) / factor;
        (stop * inverse).floor() as u64
    };
    (0..=last)
        .map(|i| {
            if power >= 0.0 {
                i as f64 * factor * 10f64.powf(power)
            } else {
                i as f64 / (10f64.powf(-power) / factor)
            }
        })
        .collect()
}

/// Format seconds with two significant digits and a trailing `s`,
/// dropping insignificant zeros: `1.2s`, `0.05s`, `15s`, `0s`.
pub fn format_seconds(seconds: f64) -> String {
    if seconds == 0.0 || !seconds.is_finite() {
        return "0s".to_string();
    }

    let magnitude = seconds.abs().log10().floor() as i32;
    let text = if magnitude >= 1 {
        let unit = 10f64.powi(magnitude - 1);
        format!("{:.0}", (seconds / unit).round() * unit)
    } else {
        let decimals = (1 - magnitude) as usize;
        let fixed = format!("{seconds:.decimals$}");
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    };
    format!("{text}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_follow_nice_steps() {
        assert_eq!(nice_ticks(10.0, 5), [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(1.0, 10), [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]);
        assert_eq!(nice_ticks(7.3, 3), [0.0, 2.0, 4.0, 6.0]);
        assert!(nice_ticks(5.0, 0).is_empty());
    }

    #[test]
    fn tick_count_scales_with_width() {
        let labels = |width: f64| {
            render_time_axis(width, 10.0, 100.0)
                .into_iter()
                .filter(|c| matches!(c, RenderCommand::DrawText { .. }))
                .count()
        };
        assert_eq!(labels(500.0), 6);
        assert!(labels(1000.0) >= labels(500.0));
        assert_eq!(labels(50.0), 0);
    }

    #[test]
    fn formats_two_significant_digits() {
        assert_eq!(format_seconds(0.0), "0s");
        assert_eq!(format_seconds(1.2), "1.2s");
        assert_eq!(format_seconds(1.23), "1.2s");
        assert_eq!(format_seconds(2.0), "2s");
        assert_eq!(format_seconds(0.5), "0.5s");
        assert_eq!(format_seconds(0.05), "0.05s");
        assert_eq!(format_seconds(0.25), "0.25s");
        assert_eq!(format_seconds(15.0), "15s");
        assert_eq!(format_seconds(123.0), "120s");
    }

    #[test]
    fn axis_labels_sit_on_tick_positions() {
        let cmds = render_time_axis(1000.0, 4.0, 100.0);
        let positions: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { position, text, .. } => {
                    Some((position.x, text.to_string()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(positions.first(), Some(&(0.0, "0s".to_string())));
        assert_eq!(positions.last(), Some(&(1000.0, "4s".to_string())));
    }

    #[test]
    fn zero_run_time_draws_only_the_baseline() {
        let cmds = render_time_axis(800.0, 0.0, 100.0);
        assert_eq!(cmds.len(), 1);
    }
}
