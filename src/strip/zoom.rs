//! Zoom and rotation

use super::state::ViewState;

/// Change the scale by `delta`, keeping the horizontal anchor.
///
/// The bias is converted to document space at the old scale and back at the
/// new one, so the same column of the page stays in view.
pub fn rescale(state: &mut ViewState, delta: f32) {
    if !delta.is_finite() {
        return;
    }
    let anchor = state.bias() / state.scale();
    state.set_scale(state.scale() + delta);
    state.set_bias(anchor * state.scale());
}

/// Rotate by `degrees`; cached images re-render on next use
pub fn rotate(state: &mut ViewState, degrees: f32) {
    state.set_rotation(state.rotation() + degrees);
}
