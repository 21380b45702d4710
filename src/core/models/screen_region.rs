use std::str::FromStr;

/// A rectangle in logical screen points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRegion {
    pub x_position: i32,
    pub y_position: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRegion {
    pub fn with_size(x_position: i32, y_position: i32, width: u32, height: u32) -> Self {
        log::debug!(
            "[SCREEN_REGION] creating region {}x{} at ({}, {})",
            width,
            height,
            x_position,
            y_position
        );

        Self {
            x_position,
            y_position,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl FromStr for ScreenRegion {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            anyhow::bail!("Expected region as X,Y,WIDTH,HEIGHT, got '{}'", value);
        }

        let x_position = parts[0].parse::<i32>()?;
        let y_position = parts[1].parse::<i32>()?;
        let width = parts[2].parse::<u32>()?;
        let height = parts[3].parse::<u32>()?;

        Ok(Self::with_size(x_position, y_position, width, height))
    }
}
