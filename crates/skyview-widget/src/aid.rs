//! Astro Image Display viewport API over a HiPS widget
//!
//! `fov` in this API always describes the shorter viewport axis, while the
//! widget's own `fov` is horizontal. Setting a fov therefore rescales the
//! widget's horizontal fov by `desired / min(fov_x, fov_y)`.

use skyview_core::{
    Angle, CoordinateFrame, FovXY, ViewportError, ViewportResult, ViewportState, ViewportUpdate,
};
use tracing::warn;

use crate::widget::HipsWidget;

/// Apply a partial viewport change
///
/// Every value is validated, and the new horizontal fov computed, before
/// anything is applied; then center, fov and rotation are set in that order.
pub fn set_viewport(widget: &dyn HipsWidget, update: &ViewportUpdate) -> ViewportResult<()> {
    update.validate()?;

    if let Some(label) = &update.image_label {
        warn!(
            "HiPS viewers hold a single image, ignoring image_label '{}'",
            label
        );
    }

    let fov = match (update.fov, widget.fov_xy()) {
        (Some(fov), Some(fov_xy)) => Some(widget.fov() * fov_xy.scale_factor_for(fov)?),
        // Before the first render the axes are unknown; treat both as equal.
        (fov, None) => fov,
        (None, Some(_)) => None,
    };

    if let Some(center) = update.center {
        widget.set_target(center);
    }

    if let Some(fov) = fov {
        widget.set_fov(fov);
    }

    if let Some(rotation) = update.rotation {
        widget.set_rotation(rotation);
    }

    Ok(())
}

/// Read the current viewport
///
/// HiPS viewers have no pixel frame, so `CoordinateFrame::Pixel` fails.
pub fn get_viewport(
    widget: &dyn HipsWidget,
    frame: Option<CoordinateFrame>,
    image_label: Option<&str>,
) -> ViewportResult<ViewportState> {
    if frame.unwrap_or_default() == CoordinateFrame::Pixel {
        return Err(ViewportError::Unsupported(
            "HiPS viewers do not have a pixel frame, use the sky frame".to_string(),
        ));
    }

    if let Some(label) = image_label {
        warn!(
            "HiPS viewers hold a single image, ignoring image_label '{}'",
            label
        );
    }

    ViewportState::new(widget.target(), current_fov(widget), Some(widget.rotation()))
}

/// Per-axis fov, if the widget has rendered
pub fn current_fov_xy(widget: &dyn HipsWidget) -> Option<FovXY> {
    widget.fov_xy()
}

/// The shorter-axis fov the widget currently shows
pub fn current_fov(widget: &dyn HipsWidget) -> Angle {
    current_fov_xy(widget).map_or_else(|| widget.fov(), |fov_xy| fov_xy.shorter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHipsWidget;
    use approx::assert_relative_eq;
    use skyview_core::SkyCoord;

    fn widget(x: f64, y: f64) -> HeadlessHipsWidget {
        HeadlessHipsWidget::new(SkyCoord::new(0.0, 0.0).unwrap(), FovXY { x, y })
    }

    #[test]
    fn test_fov_scales_shorter_axis() {
        let widget = widget(60.0, 40.0);
        set_viewport(&widget, &ViewportUpdate::new().with_fov(45.0)).unwrap();

        let fov_xy = widget.fov_xy().unwrap();
        assert_relative_eq!(fov_xy.x, 67.5, epsilon = 1e-9);
        assert_relative_eq!(fov_xy.y, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fov_round_trip_any_aspect() {
        for (x, y) in [(60.0, 40.0), (40.0, 60.0), (10.0, 10.0), (180.0, 3.5)] {
            let widget = widget(x, y);
            set_viewport(&widget, &ViewportUpdate::new().with_fov(12.5)).unwrap();
            let viewport = get_viewport(&widget, None, None).unwrap();
            assert_relative_eq!(viewport.fov.degrees(), 12.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_none_leaves_dimensions_unchanged() {
        let widget = widget(60.0, 40.0);
        widget.set_rotation(Angle::from_degrees(15.0));
        let center = SkyCoord::new(83.633, 22.0145).unwrap();

        set_viewport(&widget, &ViewportUpdate::new().with_center(center)).unwrap();

        assert_eq!(widget.target(), center);
        assert_eq!(widget.fov_xy(), Some(FovXY { x: 60.0, y: 40.0 }));
        assert_eq!(widget.rotation(), Angle::from_degrees(15.0));
    }

    #[test]
    fn test_invalid_values_apply_nothing() {
        let widget = widget(60.0, 40.0);
        let center = SkyCoord::new(83.633, 22.0145).unwrap();

        let result = set_viewport(
            &widget,
            &ViewportUpdate::new().with_center(center).with_fov(-1.0),
        );
        assert!(matches!(result, Err(ViewportError::InvalidFov(_))));
        assert_ne!(widget.target(), center);

        let result = set_viewport(&widget, &ViewportUpdate::new().with_rotation(f64::NAN));
        assert!(matches!(result, Err(ViewportError::InvalidRotation(_))));
    }

    #[test]
    fn test_degenerate_axes_apply_nothing() {
        let widget = widget(0.0, 10.0);
        let center = SkyCoord::new(83.633, 22.0145).unwrap();

        let result = set_viewport(
            &widget,
            &ViewportUpdate::new().with_center(center).with_fov(5.0),
        );

        assert!(matches!(result, Err(ViewportError::FovUnavailable(_))));
        assert_ne!(widget.target(), center);
        assert_eq!(widget.fov_xy(), Some(FovXY { x: 0.0, y: 10.0 }));
        assert_eq!(widget.fov(), Angle::from_degrees(0.0));
    }

    #[test]
    fn test_pixel_frame_unsupported() {
        let widget = widget(60.0, 40.0);
        assert!(matches!(
            get_viewport(&widget, Some(CoordinateFrame::Pixel), None),
            Err(ViewportError::Unsupported(_))
        ));
        assert!(get_viewport(&widget, Some(CoordinateFrame::Sky), None).is_ok());
    }

    #[test]
    fn test_unrendered_widget_uses_horizontal_fov() {
        let widget =
            HeadlessHipsWidget::unrendered(SkyCoord::new(0.0, 0.0).unwrap(), Angle::from_degrees(30.0));
        assert_relative_eq!(current_fov(&widget).degrees(), 30.0);

        set_viewport(&widget, &ViewportUpdate::new().with_fov(20.0)).unwrap();
        let viewport = get_viewport(&widget, None, None).unwrap();
        assert_relative_eq!(viewport.fov.degrees(), 20.0);
    }
}
