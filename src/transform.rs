/// The user-editable placement state: a scale factor plus X/Y pixel offsets
/// applied on top of the centered fit. Offsets are in preview-canvas pixels;
/// the export path multiplies them by the resolution factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0,
            offset_y: 0,
        }
    }
}

impl Transform {
    /// Restore the centered, unscaled placement.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clamp all fields into the configured control ranges.
    pub fn clamp_to(&mut self, limits: &TransformLimits) {
        self.scale = self.scale.clamp(limits.scale_min, limits.scale_max);
        self.offset_x = self.offset_x.clamp(-limits.offset_range, limits.offset_range);
        self.offset_y = self.offset_y.clamp(-limits.offset_range, limits.offset_range);
    }
}

/// Control ranges, derived from [`crate::config::AppConfig`].
#[derive(Debug, Clone, Copy)]
pub struct TransformLimits {
    pub scale_min: f32,
    pub scale_max: f32,
    pub scale_step: f32,
    pub offset_range: i32,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self {
            scale_min: 0.5,
            scale_max: 3.0,
            scale_step: 0.1,
            offset_range: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_restores_defaults() {
        let mut t = Transform {
            scale: 2.3,
            offset_x: -40,
            offset_y: 99,
        };
        t.reset();
        assert_eq!(t, Transform::default());
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset_x, 0);
        assert_eq!(t.offset_y, 0);
    }

    #[test]
    fn test_clamp_pulls_values_into_range() {
        let limits = TransformLimits::default();
        let mut t = Transform {
            scale: 9.0,
            offset_x: -500,
            offset_y: 101,
        };
        t.clamp_to(&limits);
        assert_eq!(t.scale, 3.0);
        assert_eq!(t.offset_x, -100);
        assert_eq!(t.offset_y, 100);
    }

    #[test]
    fn test_clamp_leaves_in_range_values_alone() {
        let limits = TransformLimits::default();
        let mut t = Transform {
            scale: 1.5,
            offset_x: 12,
            offset_y: -7,
        };
        let before = t;
        t.clamp_to(&limits);
        assert_eq!(t, before);
    }
}
