use livechart_core::Color;

/// How the geometries of one paint task are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_thickness: f32,
    /// Paint order; lower values are drawn first.
    pub z_index: f64,
}

impl PaintStyle {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Default::default()
        }
    }

    pub fn stroke(color: Color, thickness: f32) -> Self {
        Self {
            stroke: Some(color),
            stroke_thickness: thickness,
            ..Default::default()
        }
    }

    pub fn with_z_index(mut self, z_index: f64) -> Self {
        self.z_index = z_index;
        self
    }
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_thickness: 1.0,
            z_index: 0.0,
        }
    }
}
