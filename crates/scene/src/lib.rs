//! Grid scene: a rows × cols field of quads in the XY plane.
//!
//! The layout is pure data; the renderer turns it into an instance buffer
//! once at startup.

use glam::{Mat4, Vec3};

/// A centered grid of quads facing +Z.
///
/// Quads sit `spacing` apart; `quad_size` below `spacing` leaves a visible
/// gap between neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridScene {
    pub rows: u32,
    pub cols: u32,
    pub spacing: f32,
    pub quad_size: f32,
}

impl Default for GridScene {
    /// The stock scene: 10×10 quads, one unit apart, 0.8 units wide.
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            spacing: 1.0,
            quad_size: 0.8,
        }
    }
}

impl GridScene {
    /// A square grid of `n` × `n` quads with the stock spacing and size.
    pub fn square(n: u32) -> Self {
        Self {
            rows: n,
            cols: n,
            ..Self::default()
        }
    }

    /// Total number of quads in the grid.
    pub fn quad_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// One translation matrix per quad, row-major order, centered so the
    /// grid's middle lands on the origin.
    pub fn model_matrices(&self) -> Vec<Mat4> {
        let x_center = (self.cols.saturating_sub(1)) as f32 / 2.0;
        let y_center = (self.rows.saturating_sub(1)) as f32 / 2.0;

        let mut matrices = Vec::with_capacity(self.quad_count());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = (col as f32 - x_center) * self.spacing;
                let y = (row as f32 - y_center) * self.spacing;
                matrices.push(Mat4::from_translation(Vec3::new(x, y, 0.0)));
            }
        }
        matrices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn translation_of(m: &Mat4) -> Vec3 {
        m.w_axis.truncate()
    }

    #[test]
    fn stock_grid_has_100_quads() {
        let scene = GridScene::default();
        assert_eq!(scene.quad_count(), 100);
        assert_eq!(scene.model_matrices().len(), 100);
    }

    #[test]
    fn grid_is_centered_on_origin() {
        let scene = GridScene::default();
        let sum: Vec3 = scene
            .model_matrices()
            .iter()
            .map(translation_of)
            .sum();
        assert!(sum.length() < 1e-4);
    }

    #[test]
    fn corners_of_the_stock_grid() {
        let matrices = GridScene::default().model_matrices();
        assert_eq!(
            translation_of(&matrices[0]),
            Vec3::new(-4.5, -4.5, 0.0)
        );
        assert_eq!(
            translation_of(matrices.last().unwrap()),
            Vec3::new(4.5, 4.5, 0.0)
        );
    }

    #[test]
    fn quads_lie_in_the_xy_plane() {
        for m in GridScene::default().model_matrices() {
            assert_eq!(translation_of(&m).z, 0.0);
        }
    }

    #[test]
    fn spacing_scales_placement() {
        let scene = GridScene {
            spacing: 2.0,
            ..GridScene::default()
        };
        let matrices = scene.model_matrices();
        assert_eq!(
            translation_of(&matrices[0]),
            Vec3::new(-9.0, -9.0, 0.0)
        );
    }

    #[test]
    fn single_quad_sits_at_origin() {
        let scene = GridScene::square(1);
        let matrices = scene.model_matrices();
        assert_eq!(matrices.len(), 1);
        assert_eq!(matrices[0].w_axis, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn rectangular_grid() {
        let scene = GridScene {
            rows: 2,
            cols: 3,
            ..GridScene::default()
        };
        assert_eq!(scene.quad_count(), 6);
        let matrices = scene.model_matrices();
        assert_eq!(translation_of(&matrices[0]), Vec3::new(-1.0, -0.5, 0.0));
        assert_eq!(
            translation_of(matrices.last().unwrap()),
            Vec3::new(1.0, 0.5, 0.0)
        );
    }
}
