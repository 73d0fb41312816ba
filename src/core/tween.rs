//! Scalar easing helpers.

/// Exponential approach from `current` toward `target`.
///
/// Each call covers `speed * dt` of the remaining distance (clamped to the
/// whole distance), so the value eases in and settles exactly on the target.
/// A non-positive speed snaps straight to the target.
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }

    let distance = target - current;
    if distance * distance < 1.0e-8 {
        return target;
    }

    let alpha = (dt * speed).clamp(0.0, 1.0);
    current + distance * alpha
}
