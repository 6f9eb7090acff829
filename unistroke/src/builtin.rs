use serde_derive::{Deserialize, Serialize};

use super::{Point, Result};

// Produced by template_convert from data/templates.json
static TEMPLATE_BYTES: &[u8] = include_bytes!("../data/templates.bin");

/// A gesture as recorded: its class name and raw (unnormalized) points.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RawTemplate {
    pub name: String,
    pub points: Vec<[f32; 2]>,
}

impl RawTemplate {
    pub fn to_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|pt| Point::new(pt[0] as f64, pt[1] as f64))
            .collect()
    }
}

/// Decodes the template library compiled into the crate.
pub fn load_templates() -> Result<Vec<RawTemplate>> {
    let res: Vec<RawTemplate> = bincode::deserialize(TEMPLATE_BYTES)?;
    Ok(res)
}
