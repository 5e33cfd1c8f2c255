//! Leis de interpolação em uma dimensão
//!
//! As tabelas só trazem um ponto de referência (32 bits). A energia em outra
//! largura é extrapolada a partir desse ponto e da origem implícita `(0, 0)`.

use crate::error::{EstimatorError, EstimatorResult};
use serde::{Deserialize, Serialize};

/// Ponto conhecido (atributo, energia)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    /// Cria ponto `(x, y)`
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Lei usada para extrapolar pela largura de dados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationLaw {
    /// Somadores: energia proporcional à largura
    Linear,
    /// Multiplicadores: coeficiente de inclinação ao quadrado
    Quadratic,
}

impl InterpolationLaw {
    /// Aplica a lei em `desired_x`
    pub fn apply(&self, desired_x: f64, known: [Anchor; 2]) -> EstimatorResult<f64> {
        match self {
            InterpolationLaw::Linear => linear(desired_x, known),
            InterpolationLaw::Quadratic => quadratic(desired_x, known),
        }
    }
}

/// Ordena os pontos por x e calcula a inclinação entre eles
fn slope_from_lower(known: [Anchor; 2]) -> EstimatorResult<(Anchor, f64)> {
    let [a, b] = known;
    if a.x == b.x {
        return Err(EstimatorError::DegenerateAnchors(a.x));
    }
    let lower = if b.x < a.x { b } else { a };
    let slope = (b.y - a.y) / (b.x - a.x);
    Ok((lower, slope))
}

/// Interpolação linear: `slope · (x - x0) + y0`
pub fn linear(desired_x: f64, known: [Anchor; 2]) -> EstimatorResult<f64> {
    let (lower, slope) = slope_from_lower(known)?;
    Ok(slope * (desired_x - lower.x) + lower.y)
}

/// Interpolação "quadrática" herdada: `slope² · (x - x0) + y0`
///
/// Não é um ajuste quadrático pelos dois pontos: o quadrado da inclinação
/// linear entra como coeficiente. Com `(0, 0)` e `(32, E)` o valor em 32 é
/// `E² / 32`, não `E`.
pub fn quadratic(desired_x: f64, known: [Anchor; 2]) -> EstimatorResult<f64> {
    let (lower, slope) = slope_from_lower(known)?;
    Ok(slope.powi(2) * (desired_x - lower.x) + lower.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(reference: f64) -> [Anchor; 2] {
        [Anchor::new(0.0, 0.0), Anchor::new(32.0, reference)]
    }

    #[test]
    fn test_linear_hits_anchors() {
        let known = anchors(0.2114);
        assert_eq!(linear(0.0, known).unwrap(), 0.0);
        assert!((linear(32.0, known).unwrap() - 0.2114).abs() < 1e-12);
    }

    #[test]
    fn test_linear_scales_with_width() {
        let known = anchors(8.0);
        assert!((linear(16.0, known).unwrap() - 4.0).abs() < 1e-12);
        assert!((linear(64.0, known).unwrap() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_anchor_order_irrelevant() {
        let forward = [Anchor::new(8.0, 1.0), Anchor::new(32.0, 4.0)];
        let reversed = [forward[1], forward[0]];
        let a = linear(20.0, forward).unwrap();
        let b = linear(20.0, reversed).unwrap();
        assert!((a - b).abs() < 1e-12);
        assert!((a - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_legacy_formula() {
        let known = anchors(11.4515);
        let slope = 11.4515 / 32.0;

        assert_eq!(quadratic(0.0, known).unwrap(), 0.0);
        let at_reference = quadratic(32.0, known).unwrap();
        assert!((at_reference - slope * slope * 32.0).abs() < 1e-12);
        assert!((at_reference - 11.4515 * 11.4515 / 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_quadratic_collapses_only_when_reference_equals_width() {
        // E²/32 == E apenas para E = 32
        let known = anchors(32.0);
        assert!((quadratic(32.0, known).unwrap() - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_offset_from_lower_anchor() {
        let known = [Anchor::new(32.0, 6.0), Anchor::new(16.0, 2.0)];
        // slope = 0.25, x0 = 16, y0 = 2
        let energy = quadratic(24.0, known).unwrap();
        assert!((energy - (0.0625 * 8.0 + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_anchors() {
        let known = [Anchor::new(32.0, 1.0), Anchor::new(32.0, 2.0)];
        assert!(matches!(
            linear(16.0, known),
            Err(EstimatorError::DegenerateAnchors(x)) if x == 32.0
        ));
        assert!(quadratic(16.0, known).is_err());
    }

    #[test]
    fn test_law_dispatch() {
        let known = anchors(4.0);
        assert_eq!(
            InterpolationLaw::Linear.apply(8.0, known).unwrap(),
            linear(8.0, known).unwrap()
        );
        assert_eq!(
            InterpolationLaw::Quadratic.apply(8.0, known).unwrap(),
            quadratic(8.0, known).unwrap()
        );
    }
}
