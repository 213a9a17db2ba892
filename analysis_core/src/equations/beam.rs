//! # Uniform-Load Beam Formulas
//!
//! Closed-form results for a prismatic member carrying a uniform load `w`
//! over its full length, for the four support idealizations the member
//! analysis distinguishes.
//!
//! ## Notation
//!
//! - `L` = Span length
//! - `w` = Uniform load intensity (force per unit length)
//! - `E` = Modulus of elasticity
//! - `I` = Moment of inertia
//! - `K` = Effective length factor
//!
//! All functions expect consistent units (e.g., lb/in, in, psi, in⁴).
//!
//! ## References
//!
//! - AISC Steel Construction Manual, Table 3-23, Cases 1, 12, 15, 22
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1
//! - Blevins, Formulas for Natural Frequency and Mode Shape, Table 8-1

use std::f64::consts::PI;

// =============================================================================
// SIMPLY SUPPORTED (pin-roller)
// =============================================================================

/// Reactions for uniform load w over a simply supported span
///
/// ```text
///    ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓ w
///    ═════════════════
///    △                △
///   R1  ←─────L─────→ R2
/// ```
///
/// # Formula
/// R1 = R2 = wL/2
#[inline]
pub fn uniform_load_reactions(w: f64, l: f64) -> (f64, f64) {
    let r = w * l / 2.0;
    (r, r)
}

/// Maximum moment (midspan)
///
/// # Formula
/// M_max = wL²/8
#[inline]
pub fn uniform_load_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 8.0
}

/// Maximum deflection (midspan)
///
/// # Formula
/// δ_max = 5wL⁴ / (384EI)
#[inline]
pub fn uniform_load_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    5.0 * w * l.powi(4) / (384.0 * e * i)
}

// =============================================================================
// FIXED-FIXED
// =============================================================================

/// End moment magnitude, which governs over the midspan moment wL²/24
///
/// # Formula
/// M_end = wL²/12
#[inline]
pub fn fixed_fixed_uniform_end_moment(w: f64, l: f64) -> f64 {
    w * l * l / 12.0
}

/// Maximum deflection (midspan)
///
/// # Formula
/// δ_max = wL⁴ / (384EI)
#[inline]
pub fn fixed_fixed_uniform_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    w * l.powi(4) / (384.0 * e * i)
}

// =============================================================================
// PROPPED CANTILEVER (fixed at one end, pinned/roller at the other)
// =============================================================================

/// Reactions (fixed end, propped end)
///
/// # Formula
/// R_fixed = 5wL/8, R_prop = 3wL/8
#[inline]
pub fn fixed_pinned_uniform_reactions(w: f64, l: f64) -> (f64, f64) {
    (5.0 * w * l / 8.0, 3.0 * w * l / 8.0)
}

/// Fixed-end moment magnitude, which governs over the span moment 9wL²/128
///
/// # Formula
/// M_fixed = wL²/8
#[inline]
pub fn fixed_pinned_uniform_end_moment(w: f64, l: f64) -> f64 {
    w * l * l / 8.0
}

/// Maximum deflection (at 0.4215L from the propped end)
///
/// # Formula
/// δ_max = wL⁴ / (185EI)
#[inline]
pub fn fixed_pinned_uniform_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    w * l.powi(4) / (185.0 * e * i)
}

// =============================================================================
// CANTILEVER (fixed-free)
// =============================================================================

/// Fixed-end reaction
///
/// # Formula
/// R = wL
#[inline]
pub fn cantilever_uniform_reaction(w: f64, l: f64) -> f64 {
    w * l
}

/// Fixed-end moment
///
/// # Formula
/// M = wL²/2
#[inline]
pub fn cantilever_uniform_moment(w: f64, l: f64) -> f64 {
    w * l * l / 2.0
}

/// Tip deflection
///
/// # Formula
/// δ_max = wL⁴ / (8EI)
#[inline]
pub fn cantilever_uniform_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    w * l.powi(4) / (8.0 * e * i)
}

// =============================================================================
// STABILITY AND DYNAMICS
// =============================================================================

/// Euler critical buckling load
///
/// # Formula
/// Pe = π²EI / (KL)²
#[inline]
pub fn euler_buckling_load(e: f64, i: f64, k: f64, l: f64) -> f64 {
    PI * PI * e * i / (k * l).powi(2)
}

/// First-mode bending natural frequency of a uniform member (Hz)
///
/// # Formula
/// f = (λ² / 2π) · √(EI·g / (w·L⁴))
///
/// where `w` is the weight per unit length (so w/g is the mass per unit
/// length) and `λ²` the mode constant for the supports: π² simply
/// supported, 22.373 fixed-fixed, 15.418 fixed-pinned, 3.516 cantilever.
#[inline]
pub fn natural_frequency_hz(lambda_sq: f64, e: f64, i: f64, w: f64, l: f64, g: f64) -> f64 {
    lambda_sq / (2.0 * PI) * (e * i * g / (w * l.powi(4))).sqrt()
}
